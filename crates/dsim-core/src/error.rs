//! Framework error type.
//!
//! Sub-crates define their own error enums (`PartitionError`, `RemoteError`,
//! `EngineError`) and convert into each other via `From` where a layer wraps
//! the one below it.  `DsimError` covers what is left over at the bottom:
//! configuration failures.

use thiserror::Error;

/// The top-level error type for `dsim-core`.
#[derive(Debug, Error)]
pub enum DsimError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `dsim-core`.
pub type DsimResult<T> = Result<T, DsimError>;
