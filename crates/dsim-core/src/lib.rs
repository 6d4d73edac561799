//! `dsim-core` — foundational types for the `rust_dsim` distributed runtime.
//!
//! This crate is a dependency of every other `dsim-*` crate.  It has no
//! `dsim-*` dependencies and minimal external ones (only `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `ProcessorId`, `NodeId`, `CorrelationId`              |
//! | [`geo`]         | `Int2D`, `Double2D`, `IntRect2D` (half-open)          |
//! | [`time`]        | `Tick`, `StepClock`                                   |
//! | [`config`]      | `RuntimeConfig`                                       |
//! | [`error`]       | `DsimError`, `DsimResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                                 |
//! |---------|------------------------------------------------------------------------|
//! | `serde` | `Serialize`/`Deserialize` on all public types (needed by the wire crates) |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::RuntimeConfig;
pub use error::{DsimError, DsimResult};
pub use geo::{Double2D, Int2D, IntRect2D};
pub use ids::{CorrelationId, NodeId, ProcessorId};
pub use time::{StepClock, Tick};
