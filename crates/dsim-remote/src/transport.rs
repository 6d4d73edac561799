//! The point-to-point transport this crate layers on, plus an in-memory
//! implementation.
//!
//! A real deployment backs [`Transport`] with MPI ranks or sockets.  The
//! protocol needs only two guarantees from it:
//!
//! - reliable, in-order delivery per (sender, receiver) channel;
//! - a [`TransportEvent::Unreachable`] notice when a peer goes away.
//!
//! [`LoopbackNetwork`] provides both inside one address space.  Every
//! simulated process gets a [`LoopbackTransport`] handle onto a shared hub
//! of FIFO inboxes; `disconnect` simulates a crashed process.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use dsim_core::ProcessorId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("peer {0} is unreachable")]
    Unreachable(ProcessorId),

    #[error("{0} is not part of this network")]
    UnknownPeer(ProcessorId),
}

/// Something the transport has for this process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Message { from: ProcessorId, payload: Vec<u8> },
    Unreachable { peer: ProcessorId },
}

/// Reliable, per-channel FIFO message passing between processes.
pub trait Transport {
    /// This process's rank.
    fn local_id(&self) -> ProcessorId;

    /// Every other process in the run, ascending.
    fn peers(&self) -> Vec<ProcessorId>;

    /// Queue `payload` for `to`.  Never blocks.  Sending to `local_id()` is
    /// allowed and delivers to this process's own inbox.
    fn send(&mut self, to: ProcessorId, payload: Vec<u8>) -> Result<(), TransportError>;

    /// Drain everything that has arrived since the last poll, in arrival order.
    fn poll(&mut self) -> Vec<TransportEvent>;
}

// ── LoopbackNetwork ───────────────────────────────────────────────────────────

#[derive(Default)]
struct Hub {
    inboxes: BTreeMap<ProcessorId, VecDeque<TransportEvent>>,
    down:    BTreeSet<ProcessorId>,
}

/// Shared in-memory hub for a fixed set of simulated processes.
#[derive(Clone, Default)]
pub struct LoopbackNetwork {
    hub: Arc<Mutex<Hub>>,
}

impl LoopbackNetwork {
    /// A network of `n` processes, ranks `0..n`.
    pub fn new(n: u32) -> Self {
        let hub = Hub {
            inboxes: (0..n).map(|p| (ProcessorId(p), VecDeque::new())).collect(),
            down:    BTreeSet::new(),
        };
        Self { hub: Arc::new(Mutex::new(hub)) }
    }

    fn lock(&self) -> MutexGuard<'_, Hub> {
        self.hub.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// A transport handle for process `id`.
    pub fn endpoint(&self, id: ProcessorId) -> Result<LoopbackTransport, TransportError> {
        if !self.lock().inboxes.contains_key(&id) {
            return Err(TransportError::UnknownPeer(id));
        }
        Ok(LoopbackTransport { id, network: self.clone() })
    }

    /// Take `id` down: its queued messages are dropped, further sends to it
    /// fail, and every live process is told it is unreachable.
    pub fn disconnect(&self, id: ProcessorId) {
        let mut hub = self.lock();
        if !hub.down.insert(id) {
            return;
        }
        let down = hub.down.clone();
        for (&p, inbox) in hub.inboxes.iter_mut() {
            if p == id {
                inbox.clear();
            } else if !down.contains(&p) {
                inbox.push_back(TransportEvent::Unreachable { peer: id });
            }
        }
    }

    /// Messages queued but not yet polled, across all processes.
    pub fn in_flight(&self) -> usize {
        self.lock().inboxes.values().map(VecDeque::len).sum()
    }
}

/// One process's handle onto a [`LoopbackNetwork`].
#[derive(Clone)]
pub struct LoopbackTransport {
    id:      ProcessorId,
    network: LoopbackNetwork,
}

impl Transport for LoopbackTransport {
    fn local_id(&self) -> ProcessorId {
        self.id
    }

    fn peers(&self) -> Vec<ProcessorId> {
        self.network
            .lock()
            .inboxes
            .keys()
            .copied()
            .filter(|&p| p != self.id)
            .collect()
    }

    fn send(&mut self, to: ProcessorId, payload: Vec<u8>) -> Result<(), TransportError> {
        let mut hub = self.network.lock();
        if hub.down.contains(&self.id) {
            return Err(TransportError::Unreachable(self.id));
        }
        if hub.down.contains(&to) {
            return Err(TransportError::Unreachable(to));
        }
        let inbox = hub.inboxes.get_mut(&to).ok_or(TransportError::UnknownPeer(to))?;
        inbox.push_back(TransportEvent::Message { from: self.id, payload });
        Ok(())
    }

    fn poll(&mut self) -> Vec<TransportEvent> {
        self.network
            .lock()
            .inboxes
            .get_mut(&self.id)
            .map(|inbox| inbox.drain(..).collect())
            .unwrap_or_default()
    }
}
