//! `PartitionDirectory` — processor-level view of the partition tree.
//!
//! The tree answers geometric questions about nodes; the directory answers
//! the questions the messaging layer asks: which process owns a point, what
//! a process's bounds are, and which processes border it.  Split and merge
//! go through the directory so processor assignments stay consistent with
//! the tree.

use dsim_core::{Double2D, Int2D, IntRect2D, NodeId, ProcessorId};

use crate::{PartitionError, PartitionLayout, PartitionResult, PartitionTree, RemovedNode};

/// Partition tree plus processor bookkeeping for one process's view.
#[derive(Clone, Debug)]
pub struct PartitionDirectory {
    tree: PartitionTree,
    aoi:  i32,
}

impl PartitionDirectory {
    /// One region covering `domain`, owned by processor 0.
    ///
    /// `aoi` is the neighbor halo in cells and must be at least 1.
    pub fn new(domain: IntRect2D, aoi: i32) -> PartitionResult<Self> {
        if domain.is_empty() {
            return Err(PartitionError::Config(format!("empty domain {domain}")));
        }
        if aoi < 1 {
            return Err(PartitionError::Config(format!(
                "area of interest must be at least one cell, got {aoi}"
            )));
        }
        Ok(Self { tree: PartitionTree::new(domain), aoi })
    }

    #[inline]
    pub fn tree(&self) -> &PartitionTree {
        &self.tree
    }

    #[inline]
    pub fn aoi(&self) -> i32 {
        self.aoi
    }

    /// The process owning the region that contains `point`.
    pub fn owner_of(&self, point: impl Into<Double2D>) -> PartitionResult<ProcessorId> {
        let leaf = self.tree.leaf_node(self.tree.root(), point)?;
        Ok(self.tree.node(leaf)?.processor())
    }

    /// The leaf mapped to `processor`.
    pub fn leaf_of(&self, processor: ProcessorId) -> PartitionResult<NodeId> {
        for leaf in self.tree.all_leaves() {
            if self.tree.node(leaf)?.processor() == processor {
                return Ok(leaf);
            }
        }
        Err(PartitionError::UnknownProcessor(processor))
    }

    /// The region owned by `processor`.
    pub fn bounds_of(&self, processor: ProcessorId) -> PartitionResult<IntRect2D> {
        Ok(self.tree.node(self.leaf_of(processor)?)?.shape())
    }

    /// Split `node` around `origin`.
    ///
    /// On a leaf, creates one child per entry of `processors` (2, 3 or 4) and
    /// maps child `i` to `processors[i]`.  Each listed processor must be
    /// distinct and own no region other than `node`, or the split fails with
    /// `ProcessorBusy`.  On an already-split node, moves the origin, keeps
    /// existing assignments, and ignores `processors`.
    pub fn split(
        &mut self,
        node:       NodeId,
        origin:     Int2D,
        processors: &[ProcessorId],
    ) -> PartitionResult<Vec<NodeId>> {
        if !self.tree.node(node)?.is_leaf() {
            return self.tree.split(node, origin);
        }
        for (i, &p) in processors.iter().enumerate() {
            if processors[..i].contains(&p) {
                return Err(PartitionError::ProcessorBusy { processor: p, leaf: node });
            }
            self.ensure_free(p, node)?;
        }
        let created = self.tree.split_into(node, origin, processors.len())?;
        for (&child, &p) in created.iter().zip(processors) {
            self.tree.set_processor(child, p)?;
        }
        Ok(created)
    }

    /// Merge `node`'s subtree into one region owned by `processor`.
    ///
    /// Fails with `NothingToMerge` on a leaf, and with `ProcessorBusy` if
    /// `processor` owns a region outside the subtree.  Returns the processors
    /// that no longer own any region, ascending.
    pub fn merge(
        &mut self,
        node:      NodeId,
        processor: ProcessorId,
    ) -> PartitionResult<Vec<ProcessorId>> {
        if self.tree.node(node)?.is_leaf() {
            return Err(PartitionError::NothingToMerge(node));
        }
        self.ensure_free(processor, node)?;

        let removed: Vec<RemovedNode> = self.tree.merge(node)?;
        self.tree.set_processor(node, processor)?;

        let mut still_owning = Vec::new();
        for leaf in self.tree.all_leaves() {
            still_owning.push(self.tree.node(leaf)?.processor());
        }

        let mut released: Vec<ProcessorId> = removed
            .iter()
            .map(|r| r.processor)
            .filter(|p| !still_owning.contains(p))
            .collect();
        released.sort_unstable();
        released.dedup();
        Ok(released)
    }

    /// `ProcessorBusy` if `processor` owns a leaf that is neither `within`
    /// nor one of its descendants.
    fn ensure_free(&self, processor: ProcessorId, within: NodeId) -> PartitionResult<()> {
        for leaf in self.tree.all_leaves() {
            if leaf == within || self.tree.node(leaf)?.processor() != processor {
                continue;
            }
            if !self.tree.is_ancestor_of(within, leaf)? {
                return Err(PartitionError::ProcessorBusy { processor, leaf });
            }
        }
        Ok(())
    }

    /// Processes whose regions overlap `processor`'s region grown by the
    /// area of interest.  Ascending, excluding `processor` itself.
    pub fn neighbors(&self, processor: ProcessorId) -> PartitionResult<Vec<ProcessorId>> {
        let halo = self.bounds_of(processor)?.expand(self.aoi);
        let mut out = Vec::new();
        for leaf in self.tree.all_leaves() {
            let node = self.tree.node(leaf)?;
            if node.processor() != processor && node.shape().intersects(&halo) {
                out.push(node.processor());
            }
        }
        out.sort_unstable();
        out.dedup();
        Ok(out)
    }

    /// Immutable snapshot of the current leaf regions, in leaf order.
    pub fn layout(&self) -> PartitionLayout {
        let regions = self
            .tree
            .all_leaves()
            .into_iter()
            .filter_map(|leaf| self.tree.node(leaf).ok())
            .map(|n| (n.processor(), n.shape()))
            .collect();
        PartitionLayout::new(self.tree.domain(), regions)
    }

    /// Verify that the leaves tile the domain: each lies inside it, no two
    /// overlap, and together they cover its whole area.
    pub fn check_tiling(&self) -> PartitionResult<()> {
        let domain = self.tree.domain();
        let mut shapes = Vec::new();
        for leaf in self.tree.all_leaves() {
            shapes.push(self.tree.node(leaf)?.shape());
        }

        for s in &shapes {
            if !domain.contains_rect(s) {
                return Err(PartitionError::TilingViolated(format!("{s} leaves {domain}")));
            }
        }
        for (i, a) in shapes.iter().enumerate() {
            if let Some(b) = shapes[i + 1..].iter().find(|b| a.intersects(b)) {
                return Err(PartitionError::TilingViolated(format!("{a} overlaps {b}")));
            }
        }
        let covered: i64 = shapes.iter().map(IntRect2D::area).sum();
        if covered != domain.area() {
            return Err(PartitionError::TilingViolated(format!(
                "leaves cover {covered} cells of {}",
                domain.area()
            )));
        }
        Ok(())
    }
}
