//! Tree construction: one node per document element, structural linking,
//! then component expansion.

use std::collections::HashMap;

use kryon_krb::{Document, ElementRecord};
use tracing::debug;

use crate::diagnostics::Diagnostic;
use crate::expand::Expander;
use crate::node::{EventBinding, NodeSource, RenderNode};
use crate::tree::RenderTree;
use crate::NodeId;

/// Chooses a named style for a component instance's template root.
pub trait StyleSelector {
    /// Style id for the root of `component`'s expansion under `instance`,
    /// or `None` to fall through to the instance's and the template's own.
    fn instance_style(&self, component: &str, instance: &RenderNode, doc: &Document)
        -> Option<u8>;
}

/// Selector that never picks a style.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoStyleSelector;

impl StyleSelector for NoStyleSelector {
    fn instance_style(&self, _: &str, _: &RenderNode, _: &Document) -> Option<u8> {
        None
    }
}

/// Create and register a node for `record`.
pub(crate) fn instantiate(
    tree: &mut RenderTree,
    doc: &Document,
    record: &ElementRecord,
    source: NodeSource,
) -> NodeId {
    let mut node = RenderNode::new(record.header, source);
    node.properties = record.properties.clone();
    node.custom_properties = record.custom_properties.clone();
    node.component = doc
        .component_name_of(&record.custom_properties)
        .map(str::to_string);
    let id = tree.push(node);

    if record.header.id != 0 {
        match doc.string(record.header.id) {
            Some(element_id) => tree[id].element_id = Some(element_id.to_string()),
            None => tree.record(Diagnostic::UnresolvedString {
                node: id,
                index: record.header.id,
            }),
        }
    }

    for event in &record.events {
        match doc.string(event.handler_index) {
            Some(handler) => tree[id].events.push(EventBinding {
                event_type: event.event_type,
                handler: handler.to_string(),
            }),
            None => tree.record(Diagnostic::UnresolvedString {
                node: id,
                index: event.handler_index,
            }),
        }
    }

    let node = &tree[id];
    let name = node
        .component
        .clone()
        .or_else(|| node.element_id.clone())
        .unwrap_or_else(|| {
            format!(
                "Type{:#04X}_Idx{}",
                node.header.element_type.to_u8(),
                id.index()
            )
        });
    tree[id].name = name;
    id
}

/// Build the render tree for `doc`: nodes for every element, document
/// links, then expansion of every component placeholder.
pub fn build_tree(doc: &Document, selector: &dyn StyleSelector) -> RenderTree {
    let mut tree = RenderTree::new();

    for (index, record) in doc.elements().iter().enumerate() {
        instantiate(&mut tree, doc, record, NodeSource::Document { index });
    }

    // Placeholders keep their declared children aside for slot insertion.
    let mut usage: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
    for (index, record) in doc.elements().iter().enumerate() {
        if record.child_offsets.is_empty() {
            continue;
        }
        let parent = NodeId(index);
        let mut children = Vec::with_capacity(record.child_offsets.len());
        for offset in record.child_positions() {
            match doc.element_index_at(offset) {
                Some(child) => children.push(NodeId(child)),
                None => tree.record(Diagnostic::UnresolvedChild { parent, offset }),
            }
        }
        if tree[parent].is_placeholder() {
            usage.insert(parent, children);
        } else {
            for child in children {
                tree.link_or_record(parent, child);
            }
        }
    }

    let expander = Expander::new(doc, selector);
    for index in 0..doc.elements().len() {
        let placeholder = NodeId(index);
        if let Some(component) = tree[placeholder].component.clone() {
            let children = usage.remove(&placeholder).unwrap_or_default();
            expander.expand(&mut tree, placeholder, &component, children, 0);
        }
    }

    tree.finalize_roots();
    debug!(
        nodes = tree.len(),
        document_elements = doc.elements().len(),
        roots = tree.roots().len(),
        orphans = tree.orphans().len(),
        diagnostics = tree.diagnostics().len(),
        "Built render tree"
    );
    tree
}
