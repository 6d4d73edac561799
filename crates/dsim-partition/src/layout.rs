//! `PartitionLayout` — immutable snapshot of who owns which region.
//!
//! Processes never share a mutable tree.  When the load-balancing authority
//! re-partitions, it publishes a fresh layout and every process swaps it in
//! whole.  Lookups are a linear scan: layouts hold one region per process,
//! and process counts are small next to agent counts.

use serde::{Deserialize, Serialize};

use dsim_core::{Double2D, IntRect2D, ProcessorId};

/// The leaf regions of a partition tree and their owners.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PartitionLayout {
    domain:  IntRect2D,
    regions: Vec<(ProcessorId, IntRect2D)>,
}

impl PartitionLayout {
    pub fn new(domain: IntRect2D, regions: Vec<(ProcessorId, IntRect2D)>) -> Self {
        Self { domain, regions }
    }

    /// The whole domain.
    #[inline]
    pub fn domain(&self) -> IntRect2D {
        self.domain
    }

    #[inline]
    pub fn regions(&self) -> &[(ProcessorId, IntRect2D)] {
        &self.regions
    }

    /// The process whose region contains `point`, or `None` outside the domain.
    pub fn owner_of(&self, point: impl Into<Double2D>) -> Option<ProcessorId> {
        let point = point.into();
        self.regions
            .iter()
            .find(|(_, shape)| shape.contains(point))
            .map(|&(p, _)| p)
    }

    /// The region owned by `processor`, if any.
    pub fn bounds_of(&self, processor: ProcessorId) -> Option<IntRect2D> {
        self.regions
            .iter()
            .find(|&&(p, _)| p == processor)
            .map(|&(_, shape)| shape)
    }

    /// Every process that owns a region, ascending and deduplicated.
    pub fn processors(&self) -> Vec<ProcessorId> {
        let mut out: Vec<ProcessorId> = self.regions.iter().map(|&(p, _)| p).collect();
        out.sort_unstable();
        out.dedup();
        out
    }
}
