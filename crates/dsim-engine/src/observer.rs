//! Step-loop observer for progress reporting and diagnostics.

use dsim_core::{ProcessorId, Tick};

use crate::AgentEnvelope;

/// Callbacks invoked by [`ProcessRuntime::step`][crate::ProcessRuntime::step].
///
/// All methods default to no-ops.
///
/// # Example: arrival logger
///
/// ```rust,ignore
/// struct Arrivals(usize);
///
/// impl<A> RuntimeObserver<A> for Arrivals {
///     fn on_migrated_in(&mut self, _tick: Tick, _from: ProcessorId, _env: &AgentEnvelope<A>) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait RuntimeObserver<A> {
    /// Called before the endpoint is pumped.
    fn on_step_start(&mut self, _tick: Tick) {}

    /// Called for each agent that arrived from another process, after it has
    /// been decoded and before it is scheduled.
    fn on_migrated_in(&mut self, _tick: Tick, _from: ProcessorId, _envelope: &AgentEnvelope<A>) {}

    /// Called after every due agent has been stepped.
    fn on_step_end(&mut self, _tick: Tick, _stepped: usize) {}
}

/// A [`RuntimeObserver`] that does nothing.
pub struct NoopObserver;

impl<A> RuntimeObserver<A> for NoopObserver {}
