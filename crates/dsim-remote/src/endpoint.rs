//! `RemoteEndpoint` — one process's side of the invocation protocol.
//!
//! # Per-step usage
//!
//! ```text
//! endpoint.pump(now)            ① serve requests, settle replies, apply
//!                                  announcements, fail/expire pending calls
//! agents step:
//!   promise.is_ready()?         ② poll handles issued on earlier steps
//!   endpoint.invoke(name, ..)   ③ issue new calls; returns immediately
//! ```
//!
//! Requests for one target process leave in call order and the transport
//! keeps each channel FIFO, and the owner serves its inbox in arrival order,
//! so replies on a (caller, target) channel come back in request order.

use serde::Serialize;
use tracing::{debug, trace, warn};

use rustc_hash::FxHashMap;

use dsim_core::{CorrelationId, ProcessorId, Tick};

use crate::wire::{Fault, WireMessage};
use crate::{
    Distinguished, NameDirectory, Payload, Promise, RemoteError, RemoteObjectRegistry,
    RemoteResult, Transport, TransportEvent,
};

/// What one [`RemoteEndpoint::pump`] call did.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PumpReport {
    /// Requests answered (with a value or a fault).
    pub requests_served: usize,
    /// Pending promises completed by a reply.
    pub replies_settled: usize,
    /// `Announce`/`Withdraw` messages applied to the directory.
    pub directory_updates: usize,
    /// Pending promises failed because their target became unreachable.
    pub failed: usize,
    /// Pending promises failed by the timeout.
    pub expired: usize,
    /// Messages that could not be decoded.
    pub malformed: usize,
    /// Serialized agent envelopes that arrived, with their sender.
    pub arrivals: Vec<(ProcessorId, Payload)>,
}

struct PendingCall {
    promise: Promise,
    owner:   ProcessorId,
}

/// Registry, directory handle, transport, and pending-call table for one
/// process.
pub struct RemoteEndpoint<T: Transport, D: NameDirectory> {
    transport:        T,
    directory:        D,
    registry:         RemoteObjectRegistry,
    pending:          FxHashMap<CorrelationId, PendingCall>,
    next_correlation: CorrelationId,
    timeout_ticks:    Option<u64>,
    now:              Tick,
}

impl<T: Transport, D: NameDirectory> RemoteEndpoint<T, D> {
    pub fn new(transport: T, directory: D) -> Self {
        Self {
            transport,
            directory,
            registry:         RemoteObjectRegistry::new(),
            pending:          FxHashMap::default(),
            next_correlation: CorrelationId(0),
            timeout_ticks:    None,
            now:              Tick::ZERO,
        }
    }

    /// Fail calls still pending `ticks` steps after they were issued.
    pub fn with_promise_timeout(mut self, ticks: Option<u64>) -> Self {
        self.timeout_ticks = ticks;
        self
    }

    #[inline]
    pub fn local_id(&self) -> ProcessorId {
        self.transport.local_id()
    }

    #[inline]
    pub fn registry(&self) -> &RemoteObjectRegistry {
        &self.registry
    }

    #[inline]
    pub fn directory(&self) -> &D {
        &self.directory
    }

    #[inline]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Calls issued and not yet settled or dropped.
    #[inline]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    // ── Registration ──────────────────────────────────────────────────────

    /// Host `object` here under `name` and tell every process where it is.
    pub fn register(&mut self, name: &str, object: Box<dyn Distinguished>) -> RemoteResult<()> {
        self.registry.insert(name, object)?;
        let me = self.local_id();
        self.directory.publish(name, me);
        debug!(object = name, pid = me.0, "registered distinguished object");
        self.broadcast(&WireMessage::Announce { name: name.to_owned(), owner: me })
    }

    /// Stop hosting `name` (e.g. the agent is migrating away) and hand the
    /// object back.
    pub fn unregister(&mut self, name: &str) -> RemoteResult<Box<dyn Distinguished>> {
        let object = self.registry.remove(name)?;
        let me = self.local_id();
        self.directory.withdraw(name, me);
        debug!(object = name, pid = me.0, "unregistered distinguished object");
        self.broadcast(&WireMessage::Withdraw { name: name.to_owned(), owner: me })?;
        Ok(object)
    }

    /// Re-announce that `name` lives here.
    pub fn republish(&mut self, name: &str) -> RemoteResult<()> {
        if !self.registry.contains(name) {
            return Err(RemoteError::UnknownName(name.to_owned()));
        }
        let me = self.local_id();
        self.directory.publish(name, me);
        self.broadcast(&WireMessage::Announce { name: name.to_owned(), owner: me })
    }

    /// Send `msg` to every peer when the directory is replicated.  An
    /// unreachable peer is skipped.
    fn broadcast(&mut self, msg: &WireMessage) -> RemoteResult<()> {
        if !self.directory.is_replica() {
            return Ok(());
        }
        let bytes = msg.encode()?;
        for peer in self.transport.peers() {
            if let Err(e) = self.transport.send(peer, bytes.clone()) {
                warn!(peer = peer.0, kind = msg.kind(), error = %e, "broadcast skipped peer");
            }
        }
        Ok(())
    }

    // ── Invocation ────────────────────────────────────────────────────────

    /// Call `tag` on the object named `target`, wherever it lives.
    ///
    /// Returns a pending [`Promise`] immediately.  If the owner cannot be
    /// reached the promise comes back already failed; only an unresolvable
    /// name or an unencodable argument is an error here.
    pub fn invoke<A: Serialize + ?Sized>(
        &mut self,
        target:   &str,
        tag:      u32,
        argument: &A,
    ) -> RemoteResult<Promise> {
        let owner = self
            .directory
            .resolve(target)
            .ok_or_else(|| RemoteError::UnknownName(target.to_owned()))?;
        let argument = Payload::encode(argument)?;

        let correlation = self.next_correlation;
        self.next_correlation = correlation.next();

        let promise = Promise::pending(target, tag, argument.clone(), correlation, owner, self.now);
        let bytes = WireMessage::Request {
            correlation,
            target: target.to_owned(),
            tag,
            argument,
        }
        .encode()?;

        match self.transport.send(owner, bytes) {
            Ok(()) => {
                trace!(object = target, tag, owner = owner.0, correlation = correlation.0, "request sent");
                self.pending.insert(correlation, PendingCall { promise: promise.clone(), owner });
            }
            Err(e) => {
                debug!(object = target, tag, owner = owner.0, error = %e, "request not delivered");
                promise.settle(Err(e.to_string()));
            }
        }
        Ok(promise)
    }

    /// Ship a serialized agent envelope to `to`.
    pub fn send_migration(&mut self, to: ProcessorId, envelope: Payload) -> RemoteResult<()> {
        let bytes = WireMessage::Migrate { envelope }.encode()?;
        self.transport.send(to, bytes)?;
        Ok(())
    }

    // ── Receive path ──────────────────────────────────────────────────────

    /// Process everything the transport has delivered, then fail calls that
    /// outlived the timeout and drop abandoned ones.
    pub fn pump(&mut self, now: Tick) -> PumpReport {
        self.now = now;
        let mut report = PumpReport::default();

        for event in self.transport.poll() {
            match event {
                TransportEvent::Message { from, payload } => match WireMessage::decode(&payload) {
                    Ok(msg) => self.handle(from, msg, &mut report),
                    Err(e) => {
                        warn!(from = from.0, error = %e, "dropping malformed message");
                        report.malformed += 1;
                    }
                },
                TransportEvent::Unreachable { peer } => {
                    report.failed += self.fail_calls_to(peer);
                }
            }
        }

        let timeout = self.timeout_ticks;
        self.pending.retain(|correlation, call| {
            if call.promise.is_abandoned() {
                trace!(correlation = correlation.0, "dropping abandoned call");
                return false;
            }
            match timeout {
                Some(t) if now.since(call.promise.issued_at()) >= t => {
                    call.promise.settle(Err(format!("no reply within {t} ticks")));
                    report.expired += 1;
                    false
                }
                _ => true,
            }
        });

        report
    }

    fn handle(&mut self, from: ProcessorId, msg: WireMessage, report: &mut PumpReport) {
        match msg {
            WireMessage::Request { correlation, target, tag, argument } => {
                let outcome = match self.registry.get_mut(&target) {
                    Some(object) => object
                        .fill_remote_promise(tag, &argument)
                        .map_err(|e| Fault::Handler(e.to_string())),
                    None => Err(Fault::NoSuchObject(target)),
                };
                report.requests_served += 1;
                let reply = WireMessage::Reply { correlation, outcome };
                let sent = reply.encode().and_then(|bytes| Ok(self.transport.send(from, bytes)?));
                if let Err(e) = sent {
                    warn!(to = from.0, correlation = correlation.0, error = %e, "reply not sent");
                }
            }
            WireMessage::Reply { correlation, outcome } => match self.pending.remove(&correlation) {
                Some(call) => {
                    if call.promise.settle(outcome.map_err(|f| f.to_string())) {
                        report.replies_settled += 1;
                    }
                }
                None => trace!(correlation = correlation.0, "reply for a dropped call"),
            },
            WireMessage::Announce { name, owner } => {
                if self.accepts_broadcast_for(&name) {
                    self.directory.publish(&name, owner);
                    report.directory_updates += 1;
                }
            }
            WireMessage::Withdraw { name, owner } => {
                if self.accepts_broadcast_for(&name) {
                    self.directory.withdraw(&name, owner);
                    report.directory_updates += 1;
                }
            }
            WireMessage::Migrate { envelope } => {
                report.arrivals.push((from, envelope));
            }
        }
    }

    /// A replica applies peer broadcasts except for names hosted here; the
    /// local registry is authoritative for those.
    fn accepts_broadcast_for(&self, name: &str) -> bool {
        if !self.directory.is_replica() {
            return false;
        }
        if self.registry.contains(name) {
            trace!(object = name, "ignoring broadcast for locally hosted name");
            return false;
        }
        true
    }

    fn fail_calls_to(&mut self, peer: ProcessorId) -> usize {
        let mut failed = 0;
        self.pending.retain(|_, call| {
            if call.owner != peer {
                return true;
            }
            if call.promise.settle(Err(format!("{peer} became unreachable"))) {
                failed += 1;
            }
            false
        });
        if failed > 0 {
            debug!(peer = peer.0, failed, "failed calls to unreachable peer");
        }
        failed
    }
}
