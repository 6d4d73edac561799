//! `ProcessRuntime` — one process's step loop.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace, warn};

use dsim_core::{Double2D, IntRect2D, ProcessorId, RuntimeConfig, StepClock, Tick};
use dsim_partition::PartitionLayout;
use dsim_remote::{NameDirectory, Payload, RemoteEndpoint, Transport};

use crate::{AgentEnvelope, EngineError, EngineResult, LocalSchedule, RuntimeObserver};

/// Where an agent ended up after [`ProcessRuntime::migrate_if_needed`].
#[derive(Debug, PartialEq)]
pub enum Placement<A> {
    /// Still inside this process's region; the envelope is handed back.
    Stay(AgentEnvelope<A>),
    /// Serialized and sent to the owner of its new location.
    Migrated { to: ProcessorId },
}

/// The per-process half of a distributed run.
///
/// Owns the process's view of the partition (an immutable
/// [`PartitionLayout`]), its [`RemoteEndpoint`], and the schedule of agents
/// that currently live here.  Each call to [`step`](Self::step):
///
/// 1. **Pump**: serve remote requests, settle replies, apply directory
///    broadcasts.
/// 2. **Arrivals**: decode migrated envelopes and schedule them.
/// 3. **Step**: drain every envelope due at the current tick and hand each
///    to the caller's closure, in (time, ordering, arrival) order.
/// 4. **Advance** the clock.
///
/// Agents are stepped sequentially; nothing here blocks.
pub struct ProcessRuntime<A, T: Transport, D: NameDirectory> {
    clock:    StepClock,
    end_tick: Tick,
    layout:   PartitionLayout,
    endpoint: RemoteEndpoint<T, D>,
    schedule: LocalSchedule<A>,
}

impl<A, T, D> ProcessRuntime<A, T, D>
where
    A: Serialize + DeserializeOwned,
    T: Transport,
    D: NameDirectory,
{
    /// Fails with `UnknownProcessor` if `layout` gives this process no region.
    pub fn new(
        config:   &RuntimeConfig,
        layout:   PartitionLayout,
        endpoint: RemoteEndpoint<T, D>,
    ) -> EngineResult<Self> {
        let pid = endpoint.local_id();
        if layout.bounds_of(pid).is_none() {
            return Err(EngineError::UnknownProcessor(pid));
        }
        Ok(Self {
            clock:    config.make_clock(),
            end_tick: config.end_tick(),
            layout,
            endpoint: endpoint.with_promise_timeout(config.promise_timeout_ticks),
            schedule: LocalSchedule::new(),
        })
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn pid(&self) -> ProcessorId {
        self.endpoint.local_id()
    }

    #[inline]
    pub fn now(&self) -> Tick {
        self.clock.current_tick
    }

    /// `true` once the clock has reached the configured end of the run.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.clock.current_tick >= self.end_tick
    }

    #[inline]
    pub fn layout(&self) -> &PartitionLayout {
        &self.layout
    }

    /// This process's region, or `None` if the current layout released it.
    pub fn local_bounds(&self) -> Option<IntRect2D> {
        self.layout.bounds_of(self.pid())
    }

    /// `true` if `location` lies in this process's region.
    pub fn is_local(&self, location: impl Into<Double2D>) -> bool {
        self.layout.owner_of(location) == Some(self.pid())
    }

    pub fn endpoint(&self) -> &RemoteEndpoint<T, D> {
        &self.endpoint
    }

    pub fn endpoint_mut(&mut self) -> &mut RemoteEndpoint<T, D> {
        &mut self.endpoint
    }

    pub fn schedule(&self) -> &LocalSchedule<A> {
        &self.schedule
    }

    /// Install a new partition description, returning the old one.  Agents
    /// already scheduled stay put; the next `migrate_if_needed` against the
    /// new layout moves them.
    pub fn update_layout(&mut self, layout: PartitionLayout) -> PartitionLayout {
        debug!(pid = self.pid().0, regions = layout.regions().len(), "layout updated");
        std::mem::replace(&mut self.layout, layout)
    }

    // ── Agents ────────────────────────────────────────────────────────────

    /// Queue `envelope` here.  Inside a step closure an immediate envelope
    /// runs on the following step.
    pub fn add_agent(&mut self, envelope: AgentEnvelope<A>) {
        self.schedule.push(envelope, self.clock.current_tick);
    }

    /// Hand the agent to the owner of `location` if that is not this process.
    ///
    /// The envelope travels whole, so the receiver schedules it with the
    /// same ordering and time.  Fails with `OutsideDomain` if no process
    /// owns `location`.
    pub fn migrate_if_needed(
        &mut self,
        envelope: AgentEnvelope<A>,
        location: impl Into<Double2D>,
    ) -> EngineResult<Placement<A>> {
        let location = location.into();
        let owner = self
            .layout
            .owner_of(location)
            .ok_or(EngineError::OutsideDomain(location))?;
        if owner == self.pid() {
            return Ok(Placement::Stay(envelope));
        }
        let payload = Payload::encode(&envelope)?;
        self.endpoint.send_migration(owner, payload)?;
        debug!(from = self.pid().0, to = owner.0, %location, "agent migrated");
        Ok(Placement::Migrated { to: owner })
    }

    /// `migrate_if_needed`, then schedule the agent here if it stayed.
    /// Returns the new owner when it moved.
    pub fn place(
        &mut self,
        envelope: AgentEnvelope<A>,
        location: impl Into<Double2D>,
    ) -> EngineResult<Option<ProcessorId>> {
        match self.migrate_if_needed(envelope, location)? {
            Placement::Stay(envelope) => {
                self.add_agent(envelope);
                Ok(None)
            }
            Placement::Migrated { to } => Ok(Some(to)),
        }
    }

    // ── Step loop ─────────────────────────────────────────────────────────

    /// Run one step, calling `step_agent` once per due envelope.
    ///
    /// The closure owns the envelope it is given: it must hand it back via
    /// [`add_agent`](Self::add_agent) or [`place`](Self::place), or the agent
    /// leaves the simulation.  Returns the number of agents stepped.
    ///
    /// A step always runs to completion.  An arrival that cannot be decoded
    /// is skipped and a closure error does not stop the remaining agents;
    /// the first such error is returned once the clock has advanced.
    pub fn step<O, F>(&mut self, observer: &mut O, mut step_agent: F) -> EngineResult<usize>
    where
        O: RuntimeObserver<A>,
        F: FnMut(&mut Self, AgentEnvelope<A>) -> EngineResult<()>,
    {
        let now = self.clock.current_tick;
        observer.on_step_start(now);
        let mut first_error: Option<EngineError> = None;

        // ── Pump ──────────────────────────────────────────────────────────
        let report = self.endpoint.pump(now);
        if report.failed + report.expired + report.malformed > 0 {
            debug!(
                pid = self.pid().0,
                failed = report.failed,
                expired = report.expired,
                malformed = report.malformed,
                "pump reported failures"
            );
        }

        // ── Arrivals ──────────────────────────────────────────────────────
        for (from, payload) in report.arrivals {
            let envelope: AgentEnvelope<A> = match payload.decode() {
                Ok(envelope) => envelope,
                Err(e) => {
                    warn!(pid = self.pid().0, from = from.0, error = %e, "undecodable agent dropped");
                    first_error = first_error.or(Some(e.into()));
                    continue;
                }
            };
            trace!(pid = self.pid().0, from = from.0, "agent arrived");
            observer.on_migrated_in(now, from, &envelope);
            self.schedule.push(envelope, now);
        }

        // ── Step due agents ───────────────────────────────────────────────
        let due = self.schedule.drain_due(now);
        let stepped = due.len();
        for envelope in due {
            if let Err(e) = step_agent(self, envelope) {
                warn!(pid = self.pid().0, %now, error = %e, "agent step failed");
                first_error = first_error.or(Some(e));
            }
        }

        observer.on_step_end(now, stepped);
        self.clock.advance();
        match first_error {
            Some(e) => Err(e),
            None => Ok(stepped),
        }
    }
}
