//! `Promise` — polled handle on a pending remote call.
//!
//! A promise starts `Pending` and moves to exactly one terminal state:
//!
//! ```text
//!            settle(Ok)      ┌─────────┐
//!        ┌──────────────────▶│  Ready  │
//!        │                   └─────────┘
//! ┌─────────┐ settle(Err)    ┌─────────┐
//! │ Pending │───────────────▶│ Failed  │
//! └─────────┘                └─────────┘
//!        │   abandon()       ┌───────────┐
//!        └──────────────────▶│ Abandoned │
//!                            └───────────┘
//! ```
//!
//! The caller keeps one handle and polls it on later steps; the endpoint
//! keeps another in its pending table and settles it when the reply (or a
//! failure notice) arrives.  Nothing ever blocks.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::de::DeserializeOwned;

use dsim_core::{CorrelationId, ProcessorId, Tick};

use crate::{Payload, RemoteError, RemoteResult};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PromiseState {
    Pending,
    Ready(Payload),
    Failed(String),
    Abandoned,
}

#[derive(Debug)]
struct PromiseSlot {
    state:       PromiseState,
    target:      String,
    tag:         u32,
    argument:    Payload,
    correlation: CorrelationId,
    owner:       ProcessorId,
    issued_at:   Tick,
}

/// Cheaply cloneable handle; all clones observe the same state.
#[derive(Clone, Debug)]
pub struct Promise {
    slot: Arc<Mutex<PromiseSlot>>,
}

impl Promise {
    pub(crate) fn pending(
        target:      &str,
        tag:         u32,
        argument:    Payload,
        correlation: CorrelationId,
        owner:       ProcessorId,
        issued_at:   Tick,
    ) -> Self {
        let slot = PromiseSlot {
            state: PromiseState::Pending,
            target: target.to_owned(),
            tag,
            argument,
            correlation,
            owner,
            issued_at,
        };
        Self { slot: Arc::new(Mutex::new(slot)) }
    }

    fn lock(&self) -> MutexGuard<'_, PromiseSlot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// `true` once the reply has arrived with a value.
    pub fn is_ready(&self) -> bool {
        matches!(self.lock().state, PromiseState::Ready(_))
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.lock().state, PromiseState::Pending)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.lock().state, PromiseState::Failed(_))
    }

    pub fn is_abandoned(&self) -> bool {
        matches!(self.lock().state, PromiseState::Abandoned)
    }

    pub fn state(&self) -> PromiseState {
        self.lock().state.clone()
    }

    /// The raw result bytes.
    pub fn payload(&self) -> RemoteResult<Payload> {
        let slot = self.lock();
        match &slot.state {
            PromiseState::Ready(p) => Ok(p.clone()),
            PromiseState::Pending => Err(RemoteError::NotReady {
                target: slot.target.clone(),
                tag:    slot.tag,
            }),
            PromiseState::Failed(reason) => Err(RemoteError::DeliveryFailed {
                target: slot.target.clone(),
                tag:    slot.tag,
                reason: reason.clone(),
            }),
            PromiseState::Abandoned => Err(RemoteError::Abandoned {
                target: slot.target.clone(),
                tag:    slot.tag,
            }),
        }
    }

    /// The result decoded as `T`.  Fails with `NotReady` until the reply
    /// arrives; afterwards every call returns the same value.
    pub fn get<T: DeserializeOwned>(&self) -> RemoteResult<T> {
        self.payload()?.decode()
    }

    /// Stop waiting.  The endpoint drops its side on the next pump and a
    /// late reply is discarded.  No effect on a settled promise.
    pub fn abandon(&self) {
        let mut slot = self.lock();
        if slot.state == PromiseState::Pending {
            slot.state = PromiseState::Abandoned;
        }
    }

    /// Move out of `Pending`.  Returns `false` (and changes nothing) if the
    /// promise had already left it.
    pub(crate) fn settle(&self, outcome: Result<Payload, String>) -> bool {
        let mut slot = self.lock();
        if slot.state != PromiseState::Pending {
            return false;
        }
        slot.state = match outcome {
            Ok(p) => PromiseState::Ready(p),
            Err(reason) => PromiseState::Failed(reason),
        };
        true
    }

    pub fn target(&self) -> String {
        self.lock().target.clone()
    }

    pub fn tag(&self) -> u32 {
        self.lock().tag
    }

    pub fn argument(&self) -> Payload {
        self.lock().argument.clone()
    }

    pub fn correlation(&self) -> CorrelationId {
        self.lock().correlation
    }

    /// The process the request was sent to.
    pub fn owner(&self) -> ProcessorId {
        self.lock().owner
    }

    pub fn issued_at(&self) -> Tick {
        self.lock().issued_at
    }
}
