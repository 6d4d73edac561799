//! `PartitionTree` — the spatial quad tree that tiles the domain.
//!
//! # Layout
//!
//! The tree is an arena.  `PartitionTree` owns every [`PartitionNode`]; a
//! node holds its children as an ordered list of [`NodeId`] handles and its
//! parent as an `Option<NodeId>` that is only ever followed upward (sibling
//! and ancestor queries).  Handles are never reused, so a `NodeId` also
//! serves as the node's unique id for the lifetime of the tree.
//!
//! ```text
//!            root [0,100)x[0,100)  origin (50,50)
//!        ┌──────────┬──────┴─────┬──────────────┐
//!   [0,50)x[0,50) [0,50)x[50,100) [50,100)x[0,50) [50,100)x[50,100)
//! ```
//!
//! # Invariants
//!
//! - `level(root) == 0`, `level(child) == level(parent) + 1`.
//! - A non-leaf node has an origin inside its shape, and its children's
//!   shapes exactly tile its own.
//! - The leaves tile the root's shape after every `split`, `merge` and
//!   `reshape`.

use std::collections::VecDeque;
use std::fmt;

use dsim_core::geo::{floor_center, split_rect};
use dsim_core::{Double2D, Int2D, IntRect2D, NodeId, ProcessorId};

use crate::{PartitionError, PartitionResult};

/// Number of children a leaf gets from [`PartitionTree::split`].
pub const DEFAULT_CHILDREN: usize = 4;

// ── PartitionNode ─────────────────────────────────────────────────────────────

/// One node of the partition tree.  Read-only outside the tree; all mutation
/// goes through [`PartitionTree`] so the tiling invariant is kept.
#[derive(Clone, Debug, PartialEq)]
pub struct PartitionNode {
    id:        NodeId,
    level:     u32,
    processor: ProcessorId,
    shape:     IntRect2D,
    origin:    Option<Int2D>,
    parent:    Option<NodeId>,
    children:  Vec<NodeId>,
}

impl PartitionNode {
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[inline]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// The process this region is mapped to.
    #[inline]
    pub fn processor(&self) -> ProcessorId {
        self.processor
    }

    #[inline]
    pub fn shape(&self) -> IntRect2D {
        self.shape
    }

    /// The split centroid.  `Some` exactly when the node has children.
    #[inline]
    pub fn origin(&self) -> Option<Int2D> {
        self.origin
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

impl fmt::Display for PartitionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID {:2} PID {:2} L{} {}",
            self.id.0, self.processor.0, self.level, self.shape
        )?;
        if let Some(o) = self.origin {
            write!(f, " Origin {o}")?;
        }
        Ok(())
    }
}

/// A node discarded by [`PartitionTree::merge`].  The caller uses these to
/// release processor assignments and update the cross-process directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemovedNode {
    pub id:        NodeId,
    pub level:     u32,
    pub processor: ProcessorId,
    pub shape:     IntRect2D,
}

// ── PartitionTree ─────────────────────────────────────────────────────────────

/// Arena-backed partition tree over a rectangular domain.
#[derive(Clone, Debug)]
pub struct PartitionTree {
    /// Slot `i` holds the node with `NodeId(i)`; `None` once merged away.
    nodes: Vec<Option<PartitionNode>>,
    root:  NodeId,
    live:  usize,
}

impl PartitionTree {
    /// A single-leaf tree covering `shape`, mapped to processor 0.
    pub fn new(shape: IntRect2D) -> Self {
        let root = PartitionNode {
            id:        NodeId(0),
            level:     0,
            processor: ProcessorId(0),
            shape,
            origin:    None,
            parent:    None,
            children:  Vec::new(),
        };
        Self { nodes: vec![Some(root)], root: NodeId(0), live: 1 }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The domain: the root's shape.
    #[inline]
    pub fn domain(&self) -> IntRect2D {
        self.nodes[self.root.index()]
            .as_ref()
            .map(|n| n.shape)
            .unwrap_or(IntRect2D::from_size(0, 0))
    }

    /// Number of live nodes (root included).
    #[inline]
    pub fn node_count(&self) -> usize {
        self.live
    }

    pub fn node(&self, id: NodeId) -> PartitionResult<&PartitionNode> {
        self.nodes
            .get(id.index())
            .and_then(Option::as_ref)
            .ok_or(PartitionError::NodeNotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> PartitionResult<&mut PartitionNode> {
        self.nodes
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(PartitionError::NodeNotFound(id))
    }

    /// All live nodes in id order.
    pub fn iter(&self) -> impl Iterator<Item = &PartitionNode> {
        self.nodes.iter().filter_map(Option::as_ref)
    }

    /// Map `id`'s region to `processor`.
    pub fn set_processor(&mut self, id: NodeId, processor: ProcessorId) -> PartitionResult<()> {
        self.node_mut(id)?.processor = processor;
        Ok(())
    }

    fn alloc(&mut self, parent: &PartitionNode, shape: IntRect2D) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Some(PartitionNode {
            id,
            level:     parent.level + 1,
            processor: parent.processor,
            shape,
            origin:    None,
            parent:    Some(parent.id),
            children:  Vec::new(),
        }));
        self.live += 1;
        id
    }

    // ── Split / merge ─────────────────────────────────────────────────────

    /// Split `id` into four quadrants around `origin`, or move the origin of
    /// an already-split node.
    ///
    /// Returns the newly created children (empty on a re-split).
    pub fn split(&mut self, id: NodeId, origin: Int2D) -> PartitionResult<Vec<NodeId>> {
        self.split_into(id, origin, DEFAULT_CHILDREN)
    }

    /// Like [`split`][Self::split], with the child count of a first split
    /// chosen by the caller (2, 3 or 4).  A re-split keeps the existing
    /// child count and ignores `num_children`.
    pub fn split_into(
        &mut self,
        id:           NodeId,
        origin:       Int2D,
        num_children: usize,
    ) -> PartitionResult<Vec<NodeId>> {
        let node = self.node(id)?;
        if !node.shape.contains(origin) {
            return Err(PartitionError::OutOfBounds { point: origin, shape: node.shape });
        }

        if node.is_leaf() {
            if !(2..=4).contains(&num_children) {
                return Err(PartitionError::InvalidChildCount(num_children));
            }
            let mut parent = node.clone();
            parent.origin = Some(origin);

            let mut created = Vec::with_capacity(num_children);
            for i in 0..num_children {
                let shape = child_rect(&parent, origin, i, num_children)?;
                created.push(self.alloc(&parent, shape));
            }
            let node = self.node_mut(id)?;
            node.origin = Some(origin);
            node.children = created.clone();
            Ok(created)
        } else {
            let node = self.node_mut(id)?;
            node.origin = Some(origin);
            let shape = node.shape;
            let children = node.children.clone();
            self.reshape_children(shape, origin, &children)?;
            Ok(Vec::new())
        }
    }

    /// Collapse the subtree under `id`, making it a leaf again.
    ///
    /// Descendants are merged first, so the returned list is ordered
    /// leaves-up: each child's own removed descendants, then the child.
    /// Merging a leaf is a no-op returning an empty list.
    pub fn merge(&mut self, id: NodeId) -> PartitionResult<Vec<RemovedNode>> {
        let node = self.node_mut(id)?;
        let children = std::mem::take(&mut node.children);
        node.origin = None;

        let mut removed = Vec::new();
        for child in children {
            removed.extend(self.merge(child)?);
            let gone = self.nodes[child.index()]
                .take()
                .ok_or(PartitionError::NodeNotFound(child))?;
            self.live -= 1;
            removed.push(RemovedNode {
                id:        gone.id,
                level:     gone.level,
                processor: gone.processor,
                shape:     gone.shape,
            });
        }
        Ok(removed)
    }

    /// Give `id` a new shape and re-tile its subtree to match.
    ///
    /// If the node is split and its origin falls outside `new_shape`, the
    /// origin moves to the floor-rounded center of `new_shape`.
    pub fn reshape(&mut self, id: NodeId, new_shape: IntRect2D) -> PartitionResult<()> {
        let node = self.node_mut(id)?;
        node.shape = new_shape;

        let Some(mut origin) = node.origin else {
            return Ok(());
        };
        if !new_shape.contains(origin) {
            origin = floor_center(&new_shape);
            node.origin = Some(origin);
        }
        let children = node.children.clone();
        self.reshape_children(new_shape, origin, &children)
    }

    fn reshape_children(
        &mut self,
        shape:    IntRect2D,
        origin:   Int2D,
        children: &[NodeId],
    ) -> PartitionResult<()> {
        let n = children.len();
        for (i, &child) in children.iter().enumerate() {
            let child_shape = split_rect(&shape, origin, i, n)
                .ok_or(PartitionError::InvalidChildCount(n))?;
            self.reshape(child, child_shape)?;
        }
        Ok(())
    }

    /// Rectangle child `child_index` of `id` would occupy if `id` were split
    /// into `num_children` around its current origin.  No side effects.
    pub fn child_shape(
        &self,
        id:           NodeId,
        child_index:  usize,
        num_children: usize,
    ) -> PartitionResult<IntRect2D> {
        let node = self.node(id)?;
        let origin = node.origin.ok_or(PartitionError::NoOrigin(id))?;
        child_rect(node, origin, child_index, num_children)
    }

    // ── Point queries ─────────────────────────────────────────────────────

    /// The immediate child of `id` whose shape contains `point`.
    pub fn child_node(&self, id: NodeId, point: impl Into<Double2D>) -> PartitionResult<NodeId> {
        let point = point.into();
        let node = self.node(id)?;
        if !node.shape.contains(point) {
            return Err(PartitionError::PointNotContained { point, node: id });
        }
        for &child in &node.children {
            if self.node(child)?.shape.contains(point) {
                return Ok(child);
            }
        }
        Err(PartitionError::PointNotContained { point, node: id })
    }

    /// The leaf under `id` whose shape contains `point`.
    pub fn leaf_node(&self, id: NodeId, point: impl Into<Double2D>) -> PartitionResult<NodeId> {
        let point = point.into();
        let node = self.node(id)?;
        if !node.shape.contains(point) {
            return Err(PartitionError::PointNotContained { point, node: id });
        }
        let mut curr = id;
        while !self.node(curr)?.is_leaf() {
            curr = self.child_node(curr, point)?;
        }
        Ok(curr)
    }

    /// All leaf descendants of `id`, breadth-first.  Empty when `id` is
    /// itself a leaf.
    pub fn leaves(&self, id: NodeId) -> PartitionResult<Vec<NodeId>> {
        let mut out = Vec::new();
        let mut queue: VecDeque<NodeId> = self.node(id)?.children.iter().copied().collect();
        while let Some(curr) = queue.pop_front() {
            let node = self.node(curr)?;
            if node.is_leaf() {
                out.push(curr);
            } else {
                queue.extend(node.children.iter().copied());
            }
        }
        Ok(out)
    }

    /// Every leaf of the tree: the root alone while it is unsplit.
    pub fn all_leaves(&self) -> Vec<NodeId> {
        match self.leaves(self.root) {
            Ok(leaves) if !leaves.is_empty() => leaves,
            _ => vec![self.root],
        }
    }

    // ── Relatives ─────────────────────────────────────────────────────────

    /// `true` if `ancestor` is a strict ancestor of `node`.
    pub fn is_ancestor_of(&self, ancestor: NodeId, node: NodeId) -> PartitionResult<bool> {
        let mut curr = self.node(node)?.parent;
        while let Some(p) = curr {
            if p == ancestor {
                return Ok(true);
            }
            curr = self.node(p)?.parent;
        }
        Ok(false)
    }

    /// The other children of `id`'s parent.  Empty for the root.
    pub fn siblings(&self, id: NodeId) -> PartitionResult<Vec<NodeId>> {
        let Some(parent) = self.node(id)?.parent else {
            return Ok(Vec::new());
        };
        Ok(self
            .node(parent)?
            .children
            .iter()
            .copied()
            .filter(|&c| c != id)
            .collect())
    }

    fn index_in_siblings(&self, id: NodeId) -> PartitionResult<usize> {
        let parent = self.node(id)?.parent.ok_or(PartitionError::NoParent(id))?;
        self.node(parent)?
            .children
            .iter()
            .position(|&c| c == id)
            .ok_or(PartitionError::NodeNotFound(id))
    }

    /// Which half of its parent's split `id` occupies along `dim`
    /// (`false` = lower, `true` = upper), derived from its sibling index.
    pub fn dir(&self, id: NodeId, dim: usize) -> PartitionResult<bool> {
        if dim > 1 {
            return Err(PartitionError::InvalidDimension(dim));
        }
        let idx = self.index_in_siblings(id)?;
        Ok((idx >> (1 - dim)) & 1 == 1)
    }

    fn fmt_subtree(
        &self,
        f:       &mut fmt::Formatter<'_>,
        id:      NodeId,
        prefix:  &str,
        is_tail: bool,
    ) -> fmt::Result {
        let Ok(node) = self.node(id) else {
            return Ok(());
        };
        writeln!(f, "{prefix}{}{node}", if is_tail { "└── " } else { "├── " })?;
        let child_prefix = format!("{prefix}{}", if is_tail { "    " } else { "│   " });
        let n = node.children.len();
        for (i, &child) in node.children.iter().enumerate() {
            self.fmt_subtree(f, child, &child_prefix, i + 1 == n)?;
        }
        Ok(())
    }
}

impl fmt::Display for PartitionTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Quad Tree")?;
        self.fmt_subtree(f, self.root, "", true)
    }
}

fn child_rect(
    node:         &PartitionNode,
    origin:       Int2D,
    child_index:  usize,
    num_children: usize,
) -> PartitionResult<IntRect2D> {
    if !(2..=4).contains(&num_children) {
        return Err(PartitionError::InvalidChildCount(num_children));
    }
    split_rect(&node.shape, origin, child_index, num_children).ok_or(
        PartitionError::InvalidChildIndex { index: child_index, count: num_children },
    )
}
