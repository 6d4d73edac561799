//! Unit tests for dsim-partition.
//!
//! All tests build trees over small integer domains so every expected shape
//! can be written out by hand.

#[cfg(test)]
mod helpers {
    use dsim_core::{Int2D, IntRect2D};

    use crate::PartitionTree;

    pub fn rect(x0: i32, y0: i32, x1: i32, y1: i32) -> IntRect2D {
        IntRect2D::new(Int2D::new(x0, y0), Int2D::new(x1, y1))
    }

    pub fn shapes(tree: &PartitionTree, ids: &[dsim_core::NodeId]) -> Vec<IntRect2D> {
        ids.iter().map(|&id| tree.node(id).unwrap().shape()).collect()
    }

    /// Assert that `parts` exactly tile `whole`: inside it, pairwise
    /// disjoint, and covering its full area.
    pub fn assert_tiles(whole: IntRect2D, parts: &[IntRect2D]) {
        for p in parts {
            assert!(whole.contains_rect(p), "{p} escapes {whole}");
        }
        for (i, a) in parts.iter().enumerate() {
            for b in &parts[i + 1..] {
                assert!(!a.intersects(b), "{a} overlaps {b}");
            }
        }
        let covered: i64 = parts.iter().map(|p| p.area()).sum();
        assert_eq!(covered, whole.area(), "gap in tiling of {whole}: {parts:?}");
    }

    /// Assert every split node in the tree is tiled by its children.
    pub fn assert_tree_tiles(tree: &PartitionTree) {
        for node in tree.iter() {
            if !node.is_leaf() {
                assert!(node.shape().contains(node.origin().unwrap()) || node.shape().is_empty());
                assert_tiles(node.shape(), &shapes(tree, node.children()));
            } else {
                assert!(node.origin().is_none());
            }
        }
        assert_tiles(tree.domain(), &shapes(tree, &tree.all_leaves()));
    }
}

// ── Split ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod split {
    use dsim_core::{Double2D, Int2D, IntRect2D};

    use super::helpers::{assert_tiles, assert_tree_tiles, rect, shapes};
    use crate::{PartitionError, PartitionTree};

    #[test]
    fn quadrants_at_center() {
        let mut tree = PartitionTree::new(IntRect2D::from_size(100, 100));
        let root = tree.root();
        let kids = tree.split(root, Int2D::new(50, 50)).unwrap();

        assert_eq!(kids.len(), 4);
        assert_eq!(
            shapes(&tree, &kids),
            vec![
                rect(0, 0, 50, 50),
                rect(0, 50, 50, 100),
                rect(50, 0, 100, 50),
                rect(50, 50, 100, 100),
            ]
        );
        assert_eq!(tree.node(root).unwrap().origin(), Some(Int2D::new(50, 50)));
        assert_eq!(tree.leaf_node(root, Int2D::new(70, 20)).unwrap(), kids[2]);
        assert_eq!(tree.leaf_node(root, Double2D::new(70.5, 20.25)).unwrap(), kids[2]);
    }

    #[test]
    fn children_levels_and_parents() {
        let mut tree = PartitionTree::new(IntRect2D::from_size(100, 100));
        let root = tree.root();
        let kids = tree.split(root, Int2D::new(50, 50)).unwrap();
        let grandkids = tree.split(kids[0], Int2D::new(25, 25)).unwrap();

        assert_eq!(tree.node(root).unwrap().level(), 0);
        for &k in &kids {
            assert_eq!(tree.node(k).unwrap().level(), 1);
            assert_eq!(tree.node(k).unwrap().parent(), Some(root));
        }
        for &g in &grandkids {
            assert_eq!(tree.node(g).unwrap().level(), 2);
            assert_eq!(tree.node(g).unwrap().parent(), Some(kids[0]));
        }
        assert_eq!(tree.node_count(), 9);
    }

    #[test]
    fn resplit_moves_origin_without_creating() {
        let mut tree = PartitionTree::new(IntRect2D::from_size(100, 100));
        let root = tree.root();
        let kids = tree.split(root, Int2D::new(50, 50)).unwrap();

        let created = tree.split(root, Int2D::new(30, 60)).unwrap();
        assert!(created.is_empty());
        assert_eq!(tree.node(root).unwrap().children(), kids.as_slice());
        assert_eq!(
            shapes(&tree, &kids),
            vec![
                rect(0, 0, 30, 60),
                rect(0, 60, 30, 100),
                rect(30, 0, 100, 60),
                rect(30, 60, 100, 100),
            ]
        );
        assert_tree_tiles(&tree);
    }

    #[test]
    fn resplit_recenters_stranded_descendant_origin() {
        let mut tree = PartitionTree::new(IntRect2D::from_size(100, 100));
        let root = tree.root();
        let kids = tree.split(root, Int2D::new(50, 50)).unwrap();
        tree.split(kids[0], Int2D::new(40, 40)).unwrap();

        tree.split(root, Int2D::new(20, 20)).unwrap();
        let child = tree.node(kids[0]).unwrap();
        assert_eq!(child.shape(), rect(0, 0, 20, 20));
        assert_eq!(child.origin(), Some(Int2D::new(10, 10)));
        assert_tree_tiles(&tree);
    }

    #[test]
    fn origin_outside_shape_is_rejected() {
        let mut tree = PartitionTree::new(IntRect2D::from_size(100, 100));
        let root = tree.root();
        let err = tree.split(root, Int2D::new(100, 50)).unwrap_err();
        assert!(matches!(err, PartitionError::OutOfBounds { .. }));
        assert!(tree.node(root).unwrap().is_leaf());
        assert_eq!(tree.node(root).unwrap().origin(), None);
    }

    #[test]
    fn two_way_split() {
        let mut tree = PartitionTree::new(IntRect2D::from_size(100, 80));
        let root = tree.root();
        let kids = tree.split_into(root, Int2D::new(30, 20), 2).unwrap();
        assert_eq!(shapes(&tree, &kids), vec![rect(0, 0, 30, 80), rect(30, 0, 100, 80)]);
        assert_tree_tiles(&tree);
    }

    #[test]
    fn three_way_split_is_l_shaped() {
        let mut tree = PartitionTree::new(IntRect2D::from_size(100, 80));
        let root = tree.root();
        let kids = tree.split_into(root, Int2D::new(30, 20), 3).unwrap();
        assert_eq!(
            shapes(&tree, &kids),
            vec![rect(0, 0, 30, 80), rect(30, 0, 100, 20), rect(30, 20, 100, 80)]
        );

        // Re-splitting keeps three children.
        assert!(tree.split(root, Int2D::new(60, 40)).unwrap().is_empty());
        assert_eq!(
            shapes(&tree, &kids),
            vec![rect(0, 0, 60, 80), rect(60, 0, 100, 40), rect(60, 40, 100, 80)]
        );
        assert_tree_tiles(&tree);
    }

    #[test]
    fn bad_child_count() {
        let mut tree = PartitionTree::new(IntRect2D::from_size(10, 10));
        let root = tree.root();
        for n in [0, 1, 5] {
            let err = tree.split_into(root, Int2D::new(5, 5), n).unwrap_err();
            assert!(matches!(err, PartitionError::InvalidChildCount(c) if c == n));
        }
        assert!(tree.node(root).unwrap().is_leaf());
    }

    #[test]
    fn child_shape_tiles_for_center_corner_and_edge() {
        for origin in [Int2D::new(50, 50), Int2D::new(0, 0), Int2D::new(0, 37), Int2D::new(99, 99)] {
            let mut tree = PartitionTree::new(IntRect2D::from_size(100, 100));
            let root = tree.root();
            let kids = tree.split(root, origin).unwrap();

            let computed: Vec<IntRect2D> =
                (0..4).map(|i| tree.child_shape(root, i, 4).unwrap()).collect();
            assert_eq!(computed, shapes(&tree, &kids), "origin {origin}");
            assert_tiles(IntRect2D::from_size(100, 100), &computed);
        }
    }

    #[test]
    fn corner_origin_yields_empty_children() {
        let mut tree = PartitionTree::new(IntRect2D::from_size(100, 100));
        let root = tree.root();
        let kids = tree.split(root, Int2D::new(0, 0)).unwrap();
        let s = shapes(&tree, &kids);
        assert!(s[0].is_empty() && s[1].is_empty() && s[2].is_empty());
        assert_eq!(s[3], rect(0, 0, 100, 100));
        assert_eq!(tree.leaf_node(root, Int2D::new(0, 0)).unwrap(), kids[3]);
    }

    #[test]
    fn child_shape_errors() {
        let mut tree = PartitionTree::new(IntRect2D::from_size(10, 10));
        let root = tree.root();
        assert!(matches!(tree.child_shape(root, 0, 4), Err(PartitionError::NoOrigin(_))));

        tree.split(root, Int2D::new(5, 5)).unwrap();
        assert!(matches!(tree.child_shape(root, 0, 6), Err(PartitionError::InvalidChildCount(6))));
        assert!(matches!(
            tree.child_shape(root, 4, 4),
            Err(PartitionError::InvalidChildIndex { index: 4, count: 4 })
        ));
    }
}

// ── Merge ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod merge {
    use dsim_core::{Int2D, IntRect2D, NodeId, ProcessorId};

    use super::helpers::assert_tree_tiles;
    use crate::PartitionTree;

    #[test]
    fn split_then_merge_restores_leaf() {
        let mut tree = PartitionTree::new(IntRect2D::from_size(100, 100));
        let root = tree.root();
        tree.split(root, Int2D::new(50, 50)).unwrap();

        let removed = tree.merge(root).unwrap();
        assert_eq!(removed.len(), 4);
        let node = tree.node(root).unwrap();
        assert!(node.is_leaf());
        assert_eq!(node.origin(), None);
        assert_eq!(node.shape(), IntRect2D::from_size(100, 100));
        assert_eq!(tree.node_count(), 1);
        assert_tree_tiles(&tree);
    }

    #[test]
    fn removal_order_is_leaves_up() {
        let mut tree = PartitionTree::new(IntRect2D::from_size(100, 100));
        let root = tree.root();
        let kids = tree.split(root, Int2D::new(50, 50)).unwrap();
        let grandkids = tree.split(kids[0], Int2D::new(25, 25)).unwrap();

        let removed: Vec<NodeId> = tree.merge(root).unwrap().iter().map(|r| r.id).collect();
        let mut expected = grandkids.clone();
        expected.extend(&kids);
        assert_eq!(removed, expected);

        for id in expected {
            assert!(tree.node(id).is_err(), "{id} should be gone");
        }
    }

    #[test]
    fn merge_reports_processors_and_shapes() {
        let mut tree = PartitionTree::new(IntRect2D::from_size(100, 100));
        let root = tree.root();
        let kids = tree.split(root, Int2D::new(50, 50)).unwrap();
        for (i, &k) in kids.iter().enumerate() {
            tree.set_processor(k, ProcessorId(i as u32)).unwrap();
        }

        let removed = tree.merge(root).unwrap();
        let procs: Vec<u32> = removed.iter().map(|r| r.processor.0).collect();
        assert_eq!(procs, vec![0, 1, 2, 3]);
        assert!(removed.iter().all(|r| r.level == 1));
        assert_eq!(removed[3].shape, IntRect2D::new(Int2D::new(50, 50), Int2D::new(100, 100)));
    }

    #[test]
    fn merging_a_leaf_is_a_noop() {
        let mut tree = PartitionTree::new(IntRect2D::from_size(10, 10));
        let root = tree.root();
        assert!(tree.merge(root).unwrap().is_empty());
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn ids_are_not_reused_after_merge() {
        let mut tree = PartitionTree::new(IntRect2D::from_size(100, 100));
        let root = tree.root();
        let first = tree.split(root, Int2D::new(50, 50)).unwrap();
        tree.merge(root).unwrap();
        let second = tree.split(root, Int2D::new(50, 50)).unwrap();
        assert!(first.iter().all(|id| !second.contains(id)));
    }
}

// ── Reshape ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod reshape {
    use dsim_core::{Int2D, IntRect2D};

    use super::helpers::{assert_tree_tiles, rect, shapes};
    use crate::PartitionTree;

    #[test]
    fn reshape_keeps_contained_origin() {
        let mut tree = PartitionTree::new(IntRect2D::from_size(100, 100));
        let root = tree.root();
        let kids = tree.split(root, Int2D::new(50, 50)).unwrap();

        tree.reshape(root, rect(0, 0, 80, 60)).unwrap();
        assert_eq!(tree.node(root).unwrap().origin(), Some(Int2D::new(50, 50)));
        assert_eq!(shapes(&tree, &kids)[3], rect(50, 50, 80, 60));
        assert_tree_tiles(&tree);
    }

    #[test]
    fn reshape_recenters_origin_outside_new_shape() {
        let mut tree = PartitionTree::new(IntRect2D::from_size(100, 100));
        let root = tree.root();
        let kids = tree.split(root, Int2D::new(10, 10)).unwrap();

        tree.reshape(root, rect(50, 50, 101, 100)).unwrap();
        assert_eq!(tree.node(root).unwrap().origin(), Some(Int2D::new(75, 75)));
        assert_eq!(shapes(&tree, &kids)[0], rect(50, 50, 75, 75));
        assert_tree_tiles(&tree);
    }

    #[test]
    fn reshape_leaf_only_changes_shape() {
        let mut tree = PartitionTree::new(IntRect2D::from_size(10, 10));
        let root = tree.root();
        tree.reshape(root, rect(0, 0, 5, 5)).unwrap();
        assert_eq!(tree.node(root).unwrap().shape(), rect(0, 0, 5, 5));
        assert_eq!(tree.node(root).unwrap().origin(), None);
    }
}

// ── Queries ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod queries {
    use dsim_core::{Int2D, IntRect2D};

    use crate::{PartitionError, PartitionTree};

    #[test]
    fn leaf_node_outside_domain_fails() {
        let tree = PartitionTree::new(IntRect2D::from_size(100, 100));
        let err = tree.leaf_node(tree.root(), Int2D::new(100, 0)).unwrap_err();
        assert!(matches!(err, PartitionError::PointNotContained { .. }));
    }

    #[test]
    fn leaf_node_of_unsplit_root_is_root() {
        let tree = PartitionTree::new(IntRect2D::from_size(100, 100));
        assert_eq!(tree.leaf_node(tree.root(), Int2D::new(3, 4)).unwrap(), tree.root());
    }

    #[test]
    fn child_node_of_leaf_fails() {
        let tree = PartitionTree::new(IntRect2D::from_size(100, 100));
        let err = tree.child_node(tree.root(), Int2D::new(3, 4)).unwrap_err();
        assert!(matches!(err, PartitionError::PointNotContained { .. }));
    }

    #[test]
    fn leaves_breadth_first() {
        let mut tree = PartitionTree::new(IntRect2D::from_size(100, 100));
        let root = tree.root();
        assert!(tree.leaves(root).unwrap().is_empty());
        assert_eq!(tree.all_leaves(), vec![root]);

        let kids = tree.split(root, Int2D::new(50, 50)).unwrap();
        let grandkids = tree.split(kids[1], Int2D::new(25, 75)).unwrap();

        let mut expected = vec![kids[0], kids[2], kids[3]];
        expected.extend(&grandkids);
        assert_eq!(tree.leaves(root).unwrap(), expected);
        assert_eq!(tree.leaves(kids[1]).unwrap(), grandkids);
    }

    #[test]
    fn ancestry_and_siblings() {
        let mut tree = PartitionTree::new(IntRect2D::from_size(100, 100));
        let root = tree.root();
        let kids = tree.split(root, Int2D::new(50, 50)).unwrap();
        let grandkids = tree.split(kids[0], Int2D::new(25, 25)).unwrap();

        assert!(tree.is_ancestor_of(root, grandkids[2]).unwrap());
        assert!(tree.is_ancestor_of(kids[0], grandkids[2]).unwrap());
        assert!(!tree.is_ancestor_of(kids[1], grandkids[2]).unwrap());
        assert!(!tree.is_ancestor_of(root, root).unwrap());

        assert!(tree.siblings(root).unwrap().is_empty());
        assert_eq!(tree.siblings(kids[0]).unwrap(), vec![kids[1], kids[2], kids[3]]);
    }

    #[test]
    fn dir_follows_sibling_index_bits() {
        let mut tree = PartitionTree::new(IntRect2D::from_size(100, 100));
        let root = tree.root();
        let kids = tree.split(root, Int2D::new(50, 50)).unwrap();

        let dirs: Vec<(bool, bool)> = kids
            .iter()
            .map(|&k| (tree.dir(k, 0).unwrap(), tree.dir(k, 1).unwrap()))
            .collect();
        assert_eq!(dirs, vec![(false, false), (false, true), (true, false), (true, true)]);

        assert!(matches!(tree.dir(root, 0), Err(PartitionError::NoParent(_))));
        assert!(matches!(tree.dir(kids[0], 2), Err(PartitionError::InvalidDimension(2))));
    }

    #[test]
    fn display_renders_tree() {
        let mut tree = PartitionTree::new(IntRect2D::from_size(100, 100));
        tree.split(tree.root(), Int2D::new(50, 50)).unwrap();
        let text = tree.to_string();
        assert!(text.starts_with("Quad Tree\n"));
        assert!(text.contains("└── ID  0 PID  0 L0 [0,100)x[0,100) Origin (50, 50)"));
        assert!(text.contains("├── ID  1 PID  0 L1 [0,50)x[0,50)"));
        assert_eq!(text.lines().count(), 6);
    }
}

// ── Randomized tiling ─────────────────────────────────────────────────────────

#[cfg(test)]
mod randomized {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use dsim_core::{Int2D, IntRect2D, NodeId};

    use super::helpers::assert_tree_tiles;
    use crate::PartitionTree;

    fn random_point_in(rng: &mut SmallRng, r: IntRect2D) -> Int2D {
        Int2D::new(rng.gen_range(r.ul.x..r.br.x), rng.gen_range(r.ul.y..r.br.y))
    }

    #[test]
    fn random_split_merge_sequences_keep_tiling() {
        let domain = IntRect2D::from_size(128, 96);

        for seed in 0..20u64 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let mut tree = PartitionTree::new(domain);

            for _ in 0..40 {
                let ids: Vec<NodeId> = tree.iter().map(|n| n.id()).collect();
                let id = ids[rng.gen_range(0..ids.len())];
                let node = tree.node(id).unwrap().clone();

                match rng.gen_range(0..10) {
                    0 => {
                        tree.merge(id).unwrap();
                    }
                    _ if node.shape().is_empty() => {}
                    _ => {
                        let origin = random_point_in(&mut rng, node.shape());
                        let n = rng.gen_range(2..=4);
                        tree.split_into(id, origin, n).unwrap();
                    }
                }
                assert_tree_tiles(&tree);
            }

            let leaves = tree.all_leaves();
            for _ in 0..200 {
                let p = random_point_in(&mut rng, domain);
                let found = tree.leaf_node(tree.root(), p).unwrap();
                assert!(tree.node(found).unwrap().is_leaf());
                let holders: Vec<NodeId> = leaves
                    .iter()
                    .copied()
                    .filter(|&l| tree.node(l).unwrap().shape().contains(p))
                    .collect();
                assert_eq!(holders, vec![found], "seed {seed} point {p}");
            }
        }
    }
}

// ── Directory & layout ────────────────────────────────────────────────────────

#[cfg(test)]
mod directory {
    use dsim_core::{Double2D, Int2D, IntRect2D, NodeId, ProcessorId};

    use super::helpers::rect;
    use crate::{PartitionDirectory, PartitionError};

    fn pids(v: &[u32]) -> Vec<ProcessorId> {
        v.iter().map(|&p| ProcessorId(p)).collect()
    }

    fn quadrants() -> PartitionDirectory {
        let mut dir = PartitionDirectory::new(IntRect2D::from_size(100, 100), 1).unwrap();
        let root = dir.tree().root();
        dir.split(root, Int2D::new(50, 50), &pids(&[0, 1, 2, 3])).unwrap();
        dir
    }

    fn quadrant_nodes(dir: &PartitionDirectory) -> Vec<NodeId> {
        dir.tree().node(dir.tree().root()).unwrap().children().to_vec()
    }

    #[test]
    fn rejects_bad_construction() {
        assert!(matches!(
            PartitionDirectory::new(IntRect2D::from_size(100, 100), 0),
            Err(PartitionError::Config(_))
        ));
        assert!(matches!(
            PartitionDirectory::new(IntRect2D::from_size(0, 100), 1),
            Err(PartitionError::Config(_))
        ));
    }

    #[test]
    fn owner_lookup() {
        let dir = quadrants();
        assert_eq!(dir.owner_of(Int2D::new(70, 20)).unwrap(), ProcessorId(2));
        assert_eq!(dir.owner_of(Double2D::new(10.0, 60.5)).unwrap(), ProcessorId(1));
        assert_eq!(dir.bounds_of(ProcessorId(3)).unwrap(), rect(50, 50, 100, 100));
        assert!(matches!(
            dir.owner_of(Int2D::new(-1, 0)),
            Err(PartitionError::PointNotContained { .. })
        ));
        assert!(matches!(
            dir.leaf_of(ProcessorId(9)),
            Err(PartitionError::UnknownProcessor(ProcessorId(9)))
        ));
        dir.check_tiling().unwrap();
    }

    #[test]
    fn quadrant_neighbors_include_diagonal() {
        let dir = quadrants();
        assert_eq!(dir.neighbors(ProcessorId(0)).unwrap(), pids(&[1, 2, 3]));
    }

    #[test]
    fn strip_neighbors() {
        let mut dir = PartitionDirectory::new(IntRect2D::from_size(100, 100), 1).unwrap();
        let root = dir.tree().root();
        let halves = dir.split(root, Int2D::new(25, 0), &pids(&[0, 1])).unwrap();
        dir.split(halves[1], Int2D::new(50, 0), &pids(&[1, 2])).unwrap();

        assert_eq!(dir.bounds_of(ProcessorId(1)).unwrap(), rect(25, 0, 50, 100));
        assert_eq!(dir.neighbors(ProcessorId(0)).unwrap(), pids(&[1]));
        assert_eq!(dir.neighbors(ProcessorId(1)).unwrap(), pids(&[0, 2]));
        assert_eq!(dir.neighbors(ProcessorId(2)).unwrap(), pids(&[1]));
        dir.check_tiling().unwrap();
    }

    #[test]
    fn resplit_keeps_assignments() {
        let mut dir = quadrants();
        let root = dir.tree().root();
        assert!(dir.split(root, Int2D::new(20, 80), &[]).unwrap().is_empty());
        assert_eq!(dir.bounds_of(ProcessorId(2)).unwrap(), rect(20, 0, 100, 80));
        assert_eq!(dir.owner_of(Int2D::new(19, 79)).unwrap(), ProcessorId(0));
        dir.check_tiling().unwrap();
    }

    #[test]
    fn merge_releases_processors() {
        let mut dir = quadrants();
        let root = dir.tree().root();
        let released = dir.merge(root, ProcessorId(1)).unwrap();
        assert_eq!(released, pids(&[0, 2, 3]));
        assert_eq!(dir.owner_of(Int2D::new(99, 99)).unwrap(), ProcessorId(1));
        assert_eq!(dir.layout().regions(), &[(ProcessorId(1), IntRect2D::from_size(100, 100))]);
    }

    #[test]
    fn merging_a_leaf_is_rejected() {
        let mut dir = quadrants();
        let kids = quadrant_nodes(&dir);
        let err = dir.merge(kids[1], ProcessorId(0)).unwrap_err();
        assert!(matches!(err, PartitionError::NothingToMerge(id) if id == kids[1]));
        assert_eq!(dir.owner_of(Int2D::new(10, 60)).unwrap(), ProcessorId(1));
        assert_eq!(dir.bounds_of(ProcessorId(1)).unwrap(), rect(0, 50, 50, 100));
    }

    #[test]
    fn merge_into_processor_owning_another_region_fails() {
        let mut dir = quadrants();
        let kids = quadrant_nodes(&dir);
        dir.split(kids[3], Int2D::new(75, 75), &pids(&[3, 4])).unwrap();

        let err = dir.merge(kids[3], ProcessorId(0)).unwrap_err();
        assert!(matches!(
            err,
            PartitionError::ProcessorBusy { processor: ProcessorId(0), leaf } if leaf == kids[0]
        ));
        assert_eq!(dir.bounds_of(ProcessorId(4)).unwrap(), rect(75, 50, 100, 100));

        assert_eq!(dir.merge(kids[3], ProcessorId(4)).unwrap(), pids(&[3]));
        assert_eq!(dir.bounds_of(ProcessorId(4)).unwrap(), rect(50, 50, 100, 100));
        dir.check_tiling().unwrap();
    }

    #[test]
    fn split_keeps_one_region_per_processor() {
        let mut dir = quadrants();
        let kids = quadrant_nodes(&dir);

        let err = dir.split(kids[0], Int2D::new(25, 25), &pids(&[0, 2])).unwrap_err();
        assert!(matches!(
            err,
            PartitionError::ProcessorBusy { processor: ProcessorId(2), leaf } if leaf == kids[2]
        ));
        let err = dir.split(kids[0], Int2D::new(25, 25), &pids(&[5, 5])).unwrap_err();
        assert!(matches!(err, PartitionError::ProcessorBusy { processor: ProcessorId(5), .. }));
        assert!(dir.tree().node(kids[0]).unwrap().is_leaf());
    }

    #[test]
    fn layout_snapshot_answers_lookups() {
        let dir = quadrants();
        let layout = dir.layout();
        assert_eq!(layout.domain(), IntRect2D::from_size(100, 100));
        assert_eq!(layout.regions().len(), 4);
        assert_eq!(layout.owner_of(Int2D::new(70, 20)), Some(ProcessorId(2)));
        assert_eq!(layout.owner_of(Int2D::new(100, 20)), None);
        assert_eq!(layout.bounds_of(ProcessorId(1)), Some(rect(0, 50, 50, 100)));
        assert_eq!(layout.processors(), pids(&[0, 1, 2, 3]));
    }

    #[test]
    fn split_with_wrong_processor_count_fails() {
        let mut dir = PartitionDirectory::new(IntRect2D::from_size(100, 100), 1).unwrap();
        let root = dir.tree().root();
        let err = dir.split(root, Int2D::new(50, 50), &pids(&[0])).unwrap_err();
        assert!(matches!(err, PartitionError::InvalidChildCount(1)));
    }
}
