//! Shared helpers for render tree integration tests.

#![allow(dead_code)]

use std::collections::HashSet;

use kryon_dom::{NodeId, RenderTree};

/// Assert the structural invariants of a finalized tree: every node that is
/// neither a root nor an orphan has exactly one parent which lists it once,
/// and no node is its own ancestor.
#[track_caller]
pub fn assert_tree_invariants(tree: &RenderTree) {
    let roots: HashSet<NodeId> = tree.roots().iter().copied().collect();
    let orphans: HashSet<NodeId> = tree.orphans().iter().copied().collect();

    for (id, node) in tree.iter() {
        match node.parent {
            None => assert!(
                roots.contains(&id) || orphans.contains(&id),
                "{id:?} ({}) has no parent but is neither a root nor an orphan",
                node.name
            ),
            Some(parent) => {
                assert!(!roots.contains(&id), "{id:?} is a root with a parent");
                let listed = tree.children(parent).iter().filter(|c| **c == id).count();
                assert_eq!(listed, 1, "{id:?} listed {listed} times under {parent:?}");
            }
        }

        let mut seen = HashSet::new();
        for child in tree.children(id) {
            assert!(seen.insert(*child), "{id:?} lists {child:?} twice");
            assert_eq!(tree.parent(*child), Some(id));
        }

        assert!(
            tree.ancestors(id).all(|a| a != id),
            "{id:?} is its own ancestor"
        );
    }
}

/// Ids of the children of `id` whose element id matches.
pub fn child_named(tree: &RenderTree, id: NodeId, element_id: &str) -> Option<NodeId> {
    tree.children(id)
        .iter()
        .copied()
        .find(|c| tree[*c].element_id.as_deref() == Some(element_id))
}

/// Route library logs to the test harness; `RUST_LOG` selects the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
