//! Partition-subsystem error type.

use thiserror::Error;

use dsim_core::{Double2D, Int2D, IntRect2D, NodeId, ProcessorId};

/// Errors produced by `dsim-partition`.
///
/// `OutOfBounds`, `NoParent` and the child-count variants are caller bugs.
/// `PointNotContained` from [`child_node`][crate::PartitionTree::child_node]
/// on a point inside the parent means the tiling invariant is broken.
#[derive(Debug, Error)]
pub enum PartitionError {
    #[error("origin {point} is outside the region {shape}")]
    OutOfBounds { point: Int2D, shape: IntRect2D },

    #[error("point {point} is not contained in {node}")]
    PointNotContained { point: Double2D, node: NodeId },

    #[error("{0} is the root and has no parent")]
    NoParent(NodeId),

    #[error("{0} is a leaf and has no origin")]
    NoOrigin(NodeId),

    #[error("a node splits into 2, 3 or 4 children, not {0}")]
    InvalidChildCount(usize),

    #[error("child index {index} out of range for {count} children")]
    InvalidChildIndex { index: usize, count: usize },

    #[error("dimension {0} out of range for a 2-D domain")]
    InvalidDimension(usize),

    #[error("{0} not found in the partition tree")]
    NodeNotFound(NodeId),

    #[error("{0} does not own a partition")]
    UnknownProcessor(ProcessorId),

    #[error("{processor} already owns {leaf}")]
    ProcessorBusy { processor: ProcessorId, leaf: NodeId },

    #[error("{0} is a leaf; there is nothing to merge")]
    NothingToMerge(NodeId),

    #[error("leaves do not tile the domain: {0}")]
    TilingViolated(String),

    #[error("partition configuration error: {0}")]
    Config(String),
}

pub type PartitionResult<T> = Result<T, PartitionError>;
