//! `LocalSchedule` — the agents one process will step, in firing order.
//!
//! Keyed like the envelope asks: ascending time, then ascending ordering,
//! then arrival order.  A `BTreeMap` keeps the earliest entry at the front,
//! so draining a step is a walk off the head of the map.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use dsim_core::Tick;

use crate::AgentEnvelope;

/// `f64` time ordered with `total_cmp`.  Only finite non-negative times are
/// ever stored.
#[derive(Clone, Copy, Debug)]
struct Time(f64);

impl PartialEq for Time {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Time {}

impl PartialOrd for Time {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Time {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Key {
    time:     Time,
    ordering: i32,
    seq:      u64,
}

pub struct LocalSchedule<A> {
    inner:    BTreeMap<Key, AgentEnvelope<A>>,
    next_seq: u64,
}

impl<A> Default for LocalSchedule<A> {
    fn default() -> Self {
        Self { inner: BTreeMap::new(), next_seq: 0 }
    }
}

impl<A> LocalSchedule<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `envelope`.  Immediate envelopes, and ones whose time has
    /// already passed, are queued at `now`.
    pub fn push(&mut self, envelope: AgentEnvelope<A>, now: Tick) {
        let time = envelope.schedule_time(now);
        let key = Key { time: Time(time), ordering: envelope.ordering(), seq: self.next_seq };
        self.next_seq += 1;
        self.inner.insert(key, envelope);
    }

    /// Remove and return every envelope due at or before `now`, in firing
    /// order.
    pub fn drain_due(&mut self, now: Tick) -> Vec<AgentEnvelope<A>> {
        let limit = now.as_time();
        let mut due = Vec::new();
        while let Some(entry) = self.inner.first_entry() {
            if entry.key().time.0 > limit {
                break;
            }
            due.push(entry.remove());
        }
        due
    }

    /// The earliest queued time, or `None` if empty.
    pub fn next_time(&self) -> Option<f64> {
        self.inner.keys().next().map(|k| k.time.0)
    }

    /// Queued envelopes, in firing order.
    pub fn iter(&self) -> impl Iterator<Item = &AgentEnvelope<A>> {
        self.inner.values()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
