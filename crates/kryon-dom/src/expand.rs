//! Component expansion.
//!
//! A placeholder names a component definition. Expansion decodes the
//! definition's template, appends one node per template record to the arena,
//! links the template's internal structure, hands the placeholder's identity
//! to the template root, expands nested components, and finally inserts the
//! placeholder's usage children into the `children_host` slot.

use std::collections::HashMap;

use kryon_krb::{decode_template, Document, ElementRecord, CHILDREN_SLOT_ID, COMPONENT_NAME_KEY};
use tracing::debug;

use crate::builder::{instantiate, StyleSelector};
use crate::diagnostics::Diagnostic;
use crate::node::NodeSource;
use crate::tree::RenderTree;
use crate::NodeId;

/// Maximum nesting of component expansions.
pub const MAX_EXPANSION_DEPTH: usize = 16;

pub(crate) struct Expander<'a> {
    doc: &'a Document,
    selector: &'a dyn StyleSelector,
}

impl<'a> Expander<'a> {
    pub(crate) fn new(doc: &'a Document, selector: &'a dyn StyleSelector) -> Self {
        Self { doc, selector }
    }

    /// Expand `placeholder` as an instance of `component`.
    pub(crate) fn expand(
        &self,
        tree: &mut RenderTree,
        placeholder: NodeId,
        component: &str,
        usage: Vec<NodeId>,
        depth: usize,
    ) {
        if depth >= MAX_EXPANSION_DEPTH {
            tree.record(Diagnostic::ExpansionDepth {
                node: placeholder,
                component: component.to_string(),
            });
            self.keep_usage(tree, placeholder, usage);
            return;
        }

        let Some(definition) = self.doc.component(component) else {
            tree.record(Diagnostic::UnknownComponent {
                node: placeholder,
                name: component.to_string(),
            });
            self.keep_usage(tree, placeholder, usage);
            return;
        };

        let records = match decode_template(&definition.template) {
            Ok(records) => records,
            Err(error) => {
                tree.record(Diagnostic::TemplateDecode {
                    node: placeholder,
                    component: component.to_string(),
                    error,
                });
                self.keep_usage(tree, placeholder, usage);
                return;
            }
        };

        let Some(root_record) = records.first() else {
            tree.record(Diagnostic::EmptyTemplate {
                node: placeholder,
                component: component.to_string(),
            });
            if tree[placeholder].header.element_type.is_container_like() {
                self.keep_usage(tree, placeholder, usage);
            } else {
                self.orphan(tree, placeholder, component, usage);
            }
            return;
        };

        tree[placeholder].expanded = true;
        let root_style = self.root_style(tree, placeholder, component, root_record);

        let mut created = Vec::with_capacity(records.len());
        let mut by_offset = HashMap::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            let id = instantiate(
                tree,
                self.doc,
                record,
                NodeSource::Template {
                    component: component.to_string(),
                    record: index,
                },
            );
            by_offset.insert(record.offset, id);
            created.push(id);
        }

        let root = created[0];
        self.adopt_identity(tree, root, placeholder, root_style);
        tree.link_or_record(placeholder, root);
        self.link_template(tree, &records, &created, &by_offset, component);

        for &id in &created {
            if let Some(nested) = tree[id].component.clone() {
                self.expand(tree, id, &nested, Vec::new(), depth + 1);
            }
        }

        self.insert_usage(tree, placeholder, root, component, usage);
        debug!(
            component,
            placeholder = placeholder.index(),
            root = root.index(),
            nodes = created.len(),
            depth,
            "Expanded component"
        );
    }

    /// Style precedence for the template root: the component's named style,
    /// then the instance's style, then the template root's own.
    fn root_style(
        &self,
        tree: &RenderTree,
        placeholder: NodeId,
        component: &str,
        root_record: &ElementRecord,
    ) -> u8 {
        let instance = &tree[placeholder];
        if let Some(style_id) = self
            .selector
            .instance_style(component, instance, self.doc)
            .filter(|id| self.doc.style(*id).is_some())
        {
            return style_id;
        }
        if instance.header.style_id != 0 {
            return instance.header.style_id;
        }
        root_record.header.style_id
    }

    /// Give the template root the placeholder's identity and properties.
    fn adopt_identity(&self, tree: &mut RenderTree, root: NodeId, placeholder: NodeId, style_id: u8) {
        let instance = &tree[placeholder];
        let header = instance.header;
        let name = instance.name.clone();
        let element_id = instance.element_id.clone();
        let properties = instance.properties.clone();
        let custom: Vec<_> = instance
            .custom_properties
            .iter()
            .filter(|p| self.doc.string(p.key_index) != Some(COMPONENT_NAME_KEY))
            .cloned()
            .collect();

        let node = &mut tree[root];
        node.header.id = header.id;
        node.header.pos_x = header.pos_x;
        node.header.pos_y = header.pos_y;
        node.header.width = header.width;
        node.header.height = header.height;
        node.header.layout = header.layout;
        node.header.style_id = style_id;
        node.name = name;
        node.element_id = element_id;
        // Instance properties come last so they win.
        node.properties.extend(properties);
        node.custom_properties.extend(custom);
    }

    /// Link the template's internal child references, scoped to this
    /// expansion. Nested placeholders do not take declared children.
    fn link_template(
        &self,
        tree: &mut RenderTree,
        records: &[ElementRecord],
        created: &[NodeId],
        by_offset: &HashMap<u32, NodeId>,
        component: &str,
    ) {
        for (record, &parent) in records.iter().zip(created) {
            let mut children = Vec::with_capacity(record.child_offsets.len());
            for offset in record.child_positions() {
                match by_offset.get(&offset) {
                    Some(child) => children.push(*child),
                    None => tree.record(Diagnostic::UnresolvedChild { parent, offset }),
                }
            }
            if children.is_empty() {
                continue;
            }
            if tree[parent].is_placeholder() {
                tree.record(Diagnostic::NestedChildrenIgnored {
                    node: parent,
                    component: component.to_string(),
                    count: children.len(),
                });
                tree.mark_orphans(&children);
                continue;
            }
            for child in children {
                tree.link_or_record(parent, child);
            }
        }
    }

    /// Insert usage children at the slot, else under a container-like root.
    fn insert_usage(
        &self,
        tree: &mut RenderTree,
        placeholder: NodeId,
        root: NodeId,
        component: &str,
        usage: Vec<NodeId>,
    ) {
        if usage.is_empty() {
            return;
        }
        let slot = tree.find_breadth_first(root, |n| {
            n.element_id.as_deref() == Some(CHILDREN_SLOT_ID)
        });
        let target = match slot {
            Some(slot) => Some(slot),
            None if tree[root].header.element_type.is_container_like() => Some(root),
            None => None,
        };
        match target {
            Some(target) => {
                debug!(
                    component,
                    target = target.index(),
                    count = usage.len(),
                    "Inserted usage children"
                );
                for child in usage {
                    tree.link_or_record(target, child);
                }
            }
            None => self.orphan(tree, placeholder, component, usage),
        }
    }

    fn keep_usage(&self, tree: &mut RenderTree, placeholder: NodeId, usage: Vec<NodeId>) {
        for child in usage {
            tree.link_or_record(placeholder, child);
        }
    }

    fn orphan(&self, tree: &mut RenderTree, placeholder: NodeId, component: &str, usage: Vec<NodeId>) {
        if usage.is_empty() {
            return;
        }
        tree.mark_orphans(&usage);
        tree.record(Diagnostic::MissingSlot {
            instance: placeholder,
            component: component.to_string(),
            orphaned: usage,
        });
    }
}
