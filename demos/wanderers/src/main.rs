//! wanderers — two agents circling a four-way partitioned domain.
//!
//! A `[0,200)²` domain is cut at (100, 100) into four regions, one per
//! process.  Agents "A" and "B" start on opposite corners of the square
//! `[50,150]²` and walk clockwise around it, 5 cells per step, so they keep
//! crossing region borders and always sit on different processes.  Every
//! step each agent asks the other, by name, which process it is on, and
//! logs the previous step's answer once it has arrived.
//!
//! All four processes run in this one thread over a `LoopbackNetwork`, each
//! stepping in turn.  Run with `RUST_LOG=debug` to see migrations.

use std::collections::BTreeMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use dsim_core::{Double2D, Int2D, ProcessorId, RuntimeConfig, Tick};
use dsim_engine::{
    AgentEnvelope, EngineResult, Placement, ProcessRuntime, RuntimeObserver,
};
use dsim_partition::PartitionDirectory;
use dsim_remote::{
    Distinguished, LoopbackNetwork, LoopbackTransport, Payload, Promise, RemoteEndpoint,
    RemoteError, RemoteResult, SharedDirectory,
};

// ── Constants ─────────────────────────────────────────────────────────────────

const SIZE:         i32 = 200;
const PROCESSORS:   u32 = 4;
const STEPS:        u64 = 120;
const TIMEOUT:      u64 = 4;    // steps before an unanswered call fails
const LOW:          f64 = 50.0; // the square the agents walk
const HIGH:         f64 = 150.0;
const STRIDE:       f64 = 5.0;

/// Tag asking a wanderer which process hosts it.
const WHERE_ARE_YOU: u32 = 0;

// ── Agent ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Wanderer {
    name: String,
    loc:  Double2D,
}

impl Wanderer {
    fn new(name: &str, x: f64, y: f64) -> Self {
        Self { name: name.to_owned(), loc: Double2D::new(x, y) }
    }

    fn friend(&self) -> &'static str {
        if self.name == "A" { "B" } else { "A" }
    }

    /// One stride clockwise along the square.
    fn advance(&mut self) {
        let Double2D { x, y } = self.loc;
        self.loc = if (LOW..HIGH).contains(&x) && y == LOW {
            Double2D::new(x + STRIDE, y)
        } else if x == HIGH && (LOW..HIGH).contains(&y) {
            Double2D::new(x, y + STRIDE)
        } else if x > LOW && x <= HIGH && y == HIGH {
            Double2D::new(x - STRIDE, y)
        } else if x == LOW && y > LOW && y <= HIGH {
            Double2D::new(x, y - STRIDE)
        } else {
            self.loc
        };
    }
}

/// The distinguished face of a wanderer: answers with the hosting process.
struct PidResponder(ProcessorId);

impl Distinguished for PidResponder {
    fn fill_remote_promise(&mut self, tag: u32, _argument: &Payload) -> RemoteResult<Payload> {
        match tag {
            WHERE_ARE_YOU => Payload::encode(&self.0),
            _ => Payload::encode(&()),
        }
    }
}

// ── Per-process state ─────────────────────────────────────────────────────────

type Runtime = ProcessRuntime<Wanderer, LoopbackTransport, SharedDirectory>;

/// Outstanding calls on one process, by calling agent.  Promises are local
/// handles and never travel with a migrating agent.
type Calls = BTreeMap<String, Promise>;

#[derive(Default)]
struct Tally {
    stepped:  usize,
    arrivals: usize,
}

impl RuntimeObserver<Wanderer> for Tally {
    fn on_migrated_in(&mut self, tick: Tick, from: ProcessorId, envelope: &AgentEnvelope<Wanderer>) {
        debug!(%tick, from = from.0, agent = envelope.agent().name.as_str(), "arrival");
        self.arrivals += 1;
    }

    fn on_step_end(&mut self, _tick: Tick, stepped: usize) {
        self.stepped += stepped;
    }
}

fn step_wanderer(rt: &mut Runtime, calls: &mut Calls, env: AgentEnvelope<Wanderer>) -> EngineResult<()> {
    let now = rt.now();
    let pid = rt.pid();
    let name = env.agent().name.clone();
    let friend = env.agent().friend();

    // A freshly arrived agent becomes reachable here.
    if !rt.endpoint().registry().contains(&name) {
        rt.endpoint_mut().register(&name, Box::new(PidResponder(pid)))?;
    }

    if let Some(promise) = calls.get(&name) {
        if promise.is_ready() {
            let there: ProcessorId = promise.get()?;
            info!(%now, agent = name.as_str(), friend, on = there.0, "friend located");
        } else if promise.is_failed() {
            warn!(%now, agent = name.as_str(), friend, "call failed");
        }
    }

    let env = env.map(|mut w| {
        w.advance();
        w
    });
    let loc = env.agent().loc;

    match rt.endpoint_mut().invoke(friend, WHERE_ARE_YOU, &()) {
        Ok(promise) => {
            calls.insert(name.clone(), promise);
        }
        // The friend is between processes.
        Err(RemoteError::UnknownName(_)) => {
            debug!(%now, agent = name.as_str(), friend, "friend unresolved");
            calls.remove(&name);
        }
        Err(e) => return Err(e.into()),
    }

    match rt.migrate_if_needed(env, loc)? {
        Placement::Stay(env) => rt.add_agent(env),
        Placement::Migrated { to } => {
            rt.endpoint_mut().unregister(&name)?;
            if let Some(promise) = calls.remove(&name) {
                promise.abandon();
            }
            debug!(%now, agent = name.as_str(), from = pid.0, to = to.0, %loc, "left");
        }
    }
    Ok(())
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = RuntimeConfig {
        width:                 SIZE,
        height:                SIZE,
        num_processors:        PROCESSORS,
        aoi:                   1,
        total_steps:           STEPS,
        promise_timeout_ticks: Some(TIMEOUT),
    };
    config.validate()?;

    // ── Partition ─────────────────────────────────────────────────────────
    let mut partition = PartitionDirectory::new(config.domain(), config.aoi)?;
    let root = partition.tree().root();
    let owners: Vec<ProcessorId> = (0..PROCESSORS).map(ProcessorId).collect();
    partition.split(root, Int2D::new(SIZE / 2, SIZE / 2), &owners)?;
    partition.check_tiling()?;
    println!("{}", partition.tree());
    let layout = partition.layout();

    // ── Processes ─────────────────────────────────────────────────────────
    let net = LoopbackNetwork::new(PROCESSORS);
    let names = SharedDirectory::new();
    let mut runtimes: Vec<Runtime> = Vec::new();
    for &pid in &owners {
        let endpoint = RemoteEndpoint::new(net.endpoint(pid)?, names.clone());
        runtimes.push(ProcessRuntime::new(&config, layout.clone(), endpoint)?);
    }
    let mut calls: Vec<Calls> = owners.iter().map(|_| Calls::new()).collect();
    let mut tallies: Vec<Tally> = owners.iter().map(|_| Tally::default()).collect();

    // ── Agents ────────────────────────────────────────────────────────────
    for agent in [Wanderer::new("A", LOW, LOW), Wanderer::new("B", HIGH, HIGH)] {
        let Some(rt) = runtimes.iter_mut().find(|rt| rt.is_local(agent.loc)) else {
            anyhow::bail!("agent {} starts outside the domain", agent.name);
        };
        let pid = rt.pid();
        rt.endpoint_mut().register(&agent.name, Box::new(PidResponder(pid)))?;
        info!(agent = agent.name.as_str(), pid = pid.0, loc = %agent.loc, "placed");
        rt.add_agent(AgentEnvelope::new(agent));
    }

    // ── Run ───────────────────────────────────────────────────────────────
    while !runtimes.iter().all(Runtime::is_finished) {
        for ((rt, calls), tally) in runtimes.iter_mut().zip(&mut calls).zip(&mut tallies) {
            rt.step(tally, |rt, env| step_wanderer(rt, calls, env))?;
        }
    }

    println!("\nprocess  stepped  arrivals  pending");
    for (rt, tally) in runtimes.iter().zip(&tallies) {
        println!(
            "{:>7}  {:>7}  {:>8}  {:>7}",
            rt.pid().0,
            tally.stepped,
            tally.arrivals,
            rt.endpoint().pending_count()
        );
    }
    Ok(())
}
