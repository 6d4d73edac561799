//! `AgentEnvelope` — an agent plus the scheduling data that travels with it.
//!
//! When an agent crosses into another process's region it is serialized
//! inside its envelope, so the receiver can schedule it at the same time and
//! priority the sender would have.  An envelope is never modified once
//! built; [`AgentEnvelope::map`] produces a new one.

use serde::{Deserialize, Serialize};

use dsim_core::Tick;

/// Priority used when none is given.  Lower orderings run first within a
/// time.
pub const DEFAULT_ORDERING: i32 = 1;

/// Time meaning "no explicit time; run at the receiver's current step".
pub const UNSCHEDULED: f64 = -1.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentEnvelope<A> {
    ordering: i32,
    time:     f64,
    agent:    A,
}

impl<A> AgentEnvelope<A> {
    /// Default ordering, unscheduled.
    pub fn new(agent: A) -> Self {
        Self { ordering: DEFAULT_ORDERING, time: UNSCHEDULED, agent }
    }

    /// Explicit ordering, unscheduled.
    pub fn with_ordering(agent: A, ordering: i32) -> Self {
        Self { ordering, time: UNSCHEDULED, agent }
    }

    /// Default ordering at `time`.
    pub fn with_time(agent: A, time: f64) -> Self {
        Self { ordering: DEFAULT_ORDERING, time, agent }
    }

    pub fn with_ordering_and_time(agent: A, ordering: i32, time: f64) -> Self {
        Self { ordering, time, agent }
    }

    #[inline]
    pub fn ordering(&self) -> i32 {
        self.ordering
    }

    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    #[inline]
    pub fn agent(&self) -> &A {
        &self.agent
    }

    /// `true` when the envelope carries no usable time (negative or NaN).
    #[inline]
    pub fn is_immediate(&self) -> bool {
        self.time.is_nan() || self.time < 0.0
    }

    /// When the agent should run given the receiver is at `now`.  Immediate
    /// envelopes and times already in the past resolve to `now`.
    pub fn schedule_time(&self, now: Tick) -> f64 {
        let now = now.as_time();
        if self.is_immediate() || self.time < now { now } else { self.time }
    }

    /// A new envelope around `f(agent)` with the same ordering and time.
    pub fn map<B>(self, f: impl FnOnce(A) -> B) -> AgentEnvelope<B> {
        AgentEnvelope { ordering: self.ordering, time: self.time, agent: f(self.agent) }
    }

    pub fn into_agent(self) -> A {
        self.agent
    }
}
