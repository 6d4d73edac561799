//! `dsim-partition` — spatial partitioning of the simulation domain.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`tree`]      | `PartitionTree` (arena quad tree), `PartitionNode`, `RemovedNode` |
//! | [`directory`] | `PartitionDirectory` — owner lookup, neighbors, split/merge with processor bookkeeping |
//! | [`layout`]    | `PartitionLayout` — immutable, serializable region snapshot |
//! | [`error`]     | `PartitionError`, `PartitionResult<T>`                     |
//!
//! The tree is exclusively owned by one process's step loop.  Changes that
//! other processes must see travel as [`PartitionLayout`] values.

pub mod directory;
pub mod error;
pub mod layout;
pub mod tree;

#[cfg(test)]
mod tests;

pub use directory::PartitionDirectory;
pub use error::{PartitionError, PartitionResult};
pub use layout::PartitionLayout;
pub use tree::{PartitionNode, PartitionTree, RemovedNode, DEFAULT_CHILDREN};
