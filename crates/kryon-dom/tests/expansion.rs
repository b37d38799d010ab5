//! Component expansion and slot insertion.

mod support;

use kryon_dom::{
    build_tree, propagate_inheritance, resolve_tree, Diagnostic, NoStyleSelector, NodeId,
    RenderNode, StyleSelector, MAX_EXPANSION_DEPTH,
};
use kryon_krb::{
    Document, DocumentBuilder, ElementBuilder, ElementType, Property, PropertyId, TemplateBuilder,
};
use kryon_style::{Color, ResolveDefaults};
use support::{assert_tree_invariants, init_tracing};

/// Card: Container root with a header label and a `children_host` slot.
fn card_template() -> TemplateBuilder {
    let mut t = TemplateBuilder::new();
    let root = t.element(ElementBuilder::new(ElementType::Container).id("frame"));
    let header = t.element(ElementBuilder::new(ElementType::Text).text("Header"));
    let slot = t.element(ElementBuilder::new(ElementType::Container).id("children_host"));
    t.add_child(root, header);
    t.add_child(root, slot);
    t
}

fn instance_with_children(
    template: TemplateBuilder,
    placeholder_type: ElementType,
    children: usize,
) -> Document {
    let mut b = DocumentBuilder::new();
    b.component("Widget", template);
    let app = b.element(ElementBuilder::new(ElementType::App).size(400, 300));
    let widget = b.element(
        ElementBuilder::new(placeholder_type)
            .component("Widget")
            .id("widget1"),
    );
    b.add_child(app, widget);
    for i in 0..children {
        let child = b.element(ElementBuilder::new(ElementType::Text).text(&format!("item {i}")));
        b.add_child(widget, child);
    }
    b.build().unwrap()
}

#[test]
fn test_usage_children_land_in_slot() {
    let doc = instance_with_children(card_template(), ElementType::Container, 3);
    let tree = build_tree(&doc, &NoStyleSelector);
    assert_tree_invariants(&tree);

    let placeholder = NodeId(1);
    assert!(tree[placeholder].expanded);
    assert_eq!(tree.children(placeholder).len(), 1);
    let root = tree.children(placeholder)[0];
    assert_eq!(tree[root].element_id.as_deref(), Some("widget1"));

    let slot = tree.find_by_element_id("children_host").unwrap();
    assert_eq!(tree.children(slot), &[NodeId(2), NodeId(3), NodeId(4)]);
    for usage in [NodeId(2), NodeId(3), NodeId(4)] {
        assert!(!tree.children(root).contains(&usage));
    }
    assert_eq!(tree.children(root).len(), 2);
    assert_eq!(tree.roots(), &[NodeId(0)]);
    assert!(tree.diagnostics().is_empty());
}

#[test]
fn test_container_root_without_slot_takes_children() {
    let mut t = TemplateBuilder::new();
    let root = t.element(ElementBuilder::new(ElementType::Container));
    let label = t.element(ElementBuilder::new(ElementType::Text).text("label"));
    t.add_child(root, label);

    let doc = instance_with_children(t, ElementType::Container, 2);
    let tree = build_tree(&doc, &NoStyleSelector);
    assert_tree_invariants(&tree);

    let root = tree.children(NodeId(1))[0];
    let children = tree.children(root);
    assert_eq!(children.len(), 3);
    assert_eq!(&children[1..], &[NodeId(2), NodeId(3)]);
    assert!(tree.orphans().is_empty());
}

#[test]
fn test_leaf_root_without_slot_orphans_children() {
    let mut t = TemplateBuilder::new();
    t.element(ElementBuilder::new(ElementType::Button).text("press"));

    let doc = instance_with_children(t, ElementType::Container, 2);
    let tree = build_tree(&doc, &NoStyleSelector);
    assert_tree_invariants(&tree);

    assert_eq!(tree.parent(NodeId(2)), None);
    assert_eq!(tree.parent(NodeId(3)), None);
    assert_eq!(tree.orphans(), &[NodeId(2), NodeId(3)]);
    assert_eq!(tree.roots(), &[NodeId(0)]);
    assert!(tree.diagnostics().iter().any(|d| matches!(
        d,
        Diagnostic::MissingSlot { instance, orphaned, .. }
            if *instance == NodeId(1) && orphaned.len() == 2
    )));
}

#[test]
fn test_unknown_component_keeps_children() {
    let mut b = DocumentBuilder::new();
    let app = b.element(ElementBuilder::new(ElementType::App));
    let ghost = b.element(ElementBuilder::new(ElementType::Container).component("Ghost"));
    let child = b.element(ElementBuilder::new(ElementType::Text));
    b.add_child(app, ghost);
    b.add_child(ghost, child);
    let doc = b.build().unwrap();

    let tree = build_tree(&doc, &NoStyleSelector);
    assert_tree_invariants(&tree);
    assert!(!tree[NodeId(1)].expanded);
    assert_eq!(tree.children(NodeId(1)), &[NodeId(2)]);
    assert!(matches!(
        tree.diagnostics(),
        [Diagnostic::UnknownComponent { name, .. }] if name == "Ghost"
    ));
}

#[test]
fn test_nested_component_expands_under_its_placeholder() {
    let mut b = DocumentBuilder::new();

    let mut inner = TemplateBuilder::new();
    inner.element(ElementBuilder::new(ElementType::Button).text("inner"));
    b.component("Inner", inner);

    let mut outer = TemplateBuilder::new();
    let root = outer.element(ElementBuilder::new(ElementType::Container));
    let nested = outer.element(
        ElementBuilder::new(ElementType::Container)
            .component("Inner")
            .id("nested"),
    );
    let slot = outer.element(ElementBuilder::new(ElementType::Container).id("children_host"));
    outer.add_child(root, nested);
    outer.add_child(root, slot);
    b.component("Outer", outer);

    let app = b.element(ElementBuilder::new(ElementType::App));
    let instance = b.element(ElementBuilder::new(ElementType::Container).component("Outer"));
    let usage = b.element(ElementBuilder::new(ElementType::Text).text("usage"));
    b.add_child(app, instance);
    b.add_child(instance, usage);
    let doc = b.build().unwrap();

    let tree = build_tree(&doc, &NoStyleSelector);
    assert_tree_invariants(&tree);

    let nested = tree.find_by_element_id("nested").unwrap();
    assert!(tree[nested].expanded);
    let nested_children = tree.children(nested);
    assert_eq!(nested_children.len(), 1);
    let inner_root = nested_children[0];
    assert_eq!(tree[inner_root].header.element_type, ElementType::Button);
    assert_eq!(tree.parent(inner_root), Some(nested));

    let slot = tree.find_by_element_id("children_host").unwrap();
    assert_eq!(tree.children(slot), &[NodeId(usage)]);
    assert!(tree.diagnostics().is_empty());
}

#[test]
fn test_self_recursive_component_stops() {
    init_tracing();
    let mut b = DocumentBuilder::new();
    let mut t = TemplateBuilder::new();
    let root = t.element(ElementBuilder::new(ElementType::Container));
    let again = t.element(ElementBuilder::new(ElementType::Container).component("Loop"));
    t.add_child(root, again);
    b.component("Loop", t);
    b.element(ElementBuilder::new(ElementType::Container).component("Loop"));
    let doc = b.build().unwrap();

    let tree = build_tree(&doc, &NoStyleSelector);
    assert_tree_invariants(&tree);
    assert_eq!(tree.len(), 1 + 2 * MAX_EXPANSION_DEPTH);
    assert!(tree
        .diagnostics()
        .iter()
        .any(|d| matches!(d, Diagnostic::ExpansionDepth { .. })));
}

struct VariantSelector;

impl StyleSelector for VariantSelector {
    fn instance_style(&self, component: &str, instance: &RenderNode, doc: &Document) -> Option<u8> {
        let variant = doc.custom_string(&instance.custom_properties, "variant")?;
        doc.style_id_by_name(&format!("{component}_{variant}"))
    }
}

#[test]
fn test_template_root_style_precedence() {
    let mut b = DocumentBuilder::new();
    let template_style = b.style("tpl", vec![]);
    let instance_style = b.style("inst", vec![]);
    let named_style = b.style("Widget_primary", vec![]);

    let mut t = TemplateBuilder::new();
    t.element(ElementBuilder::new(ElementType::Container).style(template_style));
    b.component("Widget", t);

    let app = b.element(ElementBuilder::new(ElementType::App));
    let named = b.element(
        ElementBuilder::new(ElementType::Container)
            .component("Widget")
            .style(instance_style)
            .custom_string("variant", "primary"),
    );
    let styled = b.element(
        ElementBuilder::new(ElementType::Container)
            .component("Widget")
            .style(instance_style),
    );
    let plain = b.element(ElementBuilder::new(ElementType::Container).component("Widget"));
    let unknown_variant = b.element(
        ElementBuilder::new(ElementType::Container)
            .component("Widget")
            .custom_string("variant", "missing"),
    );
    for child in [named, styled, plain, unknown_variant] {
        b.add_child(app, child);
    }
    let doc = b.build().unwrap();

    let tree = build_tree(&doc, &VariantSelector);
    let root_style = |placeholder: usize| {
        let root = tree.children(NodeId(placeholder))[0];
        tree[root].header.style_id
    };
    assert_eq!(root_style(named), named_style);
    assert_eq!(root_style(styled), instance_style);
    assert_eq!(root_style(plain), template_style);
    assert_eq!(root_style(unknown_variant), template_style);
}

#[test]
fn test_instance_properties_override_template_root() {
    let mut b = DocumentBuilder::new();
    let mut t = TemplateBuilder::new();
    t.element(
        ElementBuilder::new(ElementType::Container)
            .property(Property::color(PropertyId::BG_COLOR, [255, 0, 0, 255]))
            .property(Property::edge_insets(PropertyId::PADDING, 2, 2, 2, 2)),
    );
    b.component("Panel", t);
    b.element(
        ElementBuilder::new(ElementType::Container)
            .component("Panel")
            .size(120, 40)
            .property(Property::color(PropertyId::BG_COLOR, [0, 0, 255, 255])),
    );
    let doc = b.build().unwrap();

    let mut tree = build_tree(&doc, &NoStyleSelector);
    let defaults = ResolveDefaults::default();
    resolve_tree(&mut tree, &doc, &defaults);
    propagate_inheritance(&mut tree, &defaults);

    let root = tree.children(NodeId(0))[0];
    let node = &tree[root];
    assert_eq!(node.header.width, 120);
    assert_eq!(node.header.height, 40);
    assert_eq!(node.visual.background, Color::new(0, 0, 255, 255));
    assert_eq!(node.visual.padding.top, 2);
    assert!(node.component.is_none());
}
