//! Engine error type.

use dsim_core::{Double2D, ProcessorId};
use dsim_partition::PartitionError;
use dsim_remote::RemoteError;
use thiserror::Error;

/// Errors produced by `dsim-engine`.
///
/// Partition and remote failures pass through unchanged.
/// [`step`][crate::ProcessRuntime::step] reports its first error only after
/// the whole step has run.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("partition error: {0}")]
    Partition(#[from] PartitionError),

    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),

    #[error("location {0} is outside every partition")]
    OutsideDomain(Double2D),

    #[error("{0} owns no region in the current layout")]
    UnknownProcessor(ProcessorId),
}

pub type EngineResult<T> = Result<T, EngineError>;
