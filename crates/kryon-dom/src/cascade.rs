//! Tree-wide style passes: per-node resolution, inheritance and targeted
//! re-resolution after a style change.

use kryon_krb::Document;
use kryon_style::{resolve, InheritedValues, ResolveDefaults};
use tracing::{debug, info};

use crate::diagnostics::Diagnostic;
use crate::tree::RenderTree;
use crate::{DomError, NodeId};

/// Resolve every node's visual state and content from its style and direct
/// properties. Inheritance is a separate pass.
pub fn resolve_tree(tree: &mut RenderTree, doc: &Document, defaults: &ResolveDefaults) {
    let ids: Vec<NodeId> = tree.ids().collect();
    for id in ids {
        let node = &tree[id];
        let style_id = node.header.style_id;
        let (visual, content) = resolve(
            node.header.element_type,
            style_id,
            &node.properties,
            doc,
            defaults,
        );
        let node = &mut tree[id];
        node.visual = visual;
        node.content = content;
        if style_id != 0 && doc.style(style_id).is_none() {
            tree.record(Diagnostic::UnresolvedStyle { node: id, style_id });
        }
    }
    debug!(nodes = tree.len(), "Resolved node styles");
}

/// Push `values` into `start` and all of its descendants.
fn propagate_from(tree: &mut RenderTree, start: NodeId, values: InheritedValues) {
    let mut stack = vec![(start, values)];
    while let Some((id, inherited)) = stack.pop() {
        let node = &mut tree[id];
        let element_type = node.header.element_type;
        let passed = inherited.apply(&mut node.visual, element_type);
        stack.extend(node.children.iter().rev().map(|child| (*child, passed)));
    }
}

/// Top-down inheritance from every root (and every orphaned subtree).
pub fn propagate_inheritance(tree: &mut RenderTree, defaults: &ResolveDefaults) {
    let starts: Vec<NodeId> = tree
        .roots()
        .iter()
        .chain(tree.orphans())
        .copied()
        .collect();
    let root_values = InheritedValues::root(defaults);
    for start in starts {
        propagate_from(tree, start, root_values);
    }
}

/// Re-resolve one node after its style id changed, then re-propagate
/// inherited values into its subtree. Structure is untouched.
pub fn re_resolve(
    tree: &mut RenderTree,
    doc: &Document,
    id: NodeId,
    defaults: &ResolveDefaults,
) -> Result<(), DomError> {
    let node = tree.node(id).ok_or(DomError::NodeNotFound(id))?;
    let style_id = node.header.style_id;
    let (visual, content) = resolve(
        node.header.element_type,
        style_id,
        &node.properties,
        doc,
        defaults,
    );
    let node = &mut tree[id];
    node.visual = visual;
    node.content = content;
    if style_id != 0 && doc.style(style_id).is_none() {
        tree.record(Diagnostic::UnresolvedStyle { node: id, style_id });
    }

    let inherited =
        InheritedValues::from_ancestors(tree.ancestors(id).map(|a| &tree[a].visual), defaults);
    propagate_from(tree, id, inherited);

    info!(node = %tree[id].name, style_id, "Re-resolved node visuals");
    Ok(())
}
