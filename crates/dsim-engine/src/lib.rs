//! `dsim-engine` — the per-process step loop that ties partitioning and
//! remote invocation together.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`envelope`] | `AgentEnvelope` — agent + ordering + schedule time        |
//! | [`schedule`] | `LocalSchedule` — envelopes in (time, ordering) order     |
//! | [`runtime`]  | `ProcessRuntime` (pump / arrivals / step), `Placement`    |
//! | [`observer`] | `RuntimeObserver` trait, `NoopObserver`                   |
//! | [`error`]    | `EngineError`, `EngineResult<T>`                          |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! let mut rt = ProcessRuntime::new(&config, layout, endpoint)?;
//! rt.add_agent(AgentEnvelope::new(walker));
//! while !rt.is_finished() {
//!     rt.step(&mut NoopObserver, |rt, env| {
//!         let env = env.map(Walker::advanced);
//!         let next = env.agent().location();
//!         rt.place(env, next)?;
//!         Ok(())
//!     })?;
//! }
//! ```

pub mod envelope;
pub mod error;
pub mod observer;
pub mod runtime;
pub mod schedule;


pub use envelope::{AgentEnvelope, DEFAULT_ORDERING, UNSCHEDULED};
pub use error::{EngineError, EngineResult};
pub use observer::{NoopObserver, RuntimeObserver};
pub use runtime::{Placement, ProcessRuntime};
pub use schedule::LocalSchedule;
