//! Render context: painting, events, re-resolution and resources.

mod support;

use kryon_dom::{Diagnostic, NodeId, Rect, RenderTree, TextureSize};
use kryon_engine::{
    ComponentBehavior, ComponentRegistry, DisplayCommand, DisplayList, EngineError, PaintMode,
    Painter, RenderContext,
};
use kryon_krb::{
    Document, DocumentBuilder, ElementBuilder, ElementType, EventType, Property, PropertyId,
    ResourceType, TemplateBuilder,
};
use kryon_style::Color;
use support::{node_by_id, prepared, prepared_with, InlineOnlyLoader};

const RED: [u8; 4] = [255, 0, 0, 255];
const BLUE: [u8; 4] = [0, 0, 255, 255];

fn fills(list: &DisplayList, color: Color) -> usize {
    list.iter()
        .filter(|c| matches!(c, DisplayCommand::SolidColor(fill, _) if *fill == color))
        .count()
}

#[test]
fn test_display_list_order() {
    let mut b = DocumentBuilder::new();
    let app = b.element(
        ElementBuilder::new(ElementType::App)
            .size(200, 100)
            .property(Property::color(PropertyId::BG_COLOR, [10, 10, 10, 255])),
    );
    let label = b.element(
        ElementBuilder::new(ElementType::Text)
            .id("label")
            .text("Hi")
            .size(100, 40)
            .property(Property::byte(PropertyId::BORDER_WIDTH, 2))
            .property(Property::color(PropertyId::BORDER_COLOR, RED)),
    );
    b.add_child(app, label);
    let mut ctx = prepared(b);

    let list = ctx.display_list();
    assert_eq!(
        list.commands,
        vec![
            DisplayCommand::SolidColor(
                Color::from_rgb(10, 10, 10),
                Rect::new(0.0, 0.0, 200.0, 100.0)
            ),
            DisplayCommand::Border {
                color: Color::from_rgb(255, 0, 0),
                rect: Rect::new(0.0, 0.0, 100.0, 40.0),
                top: 2.0,
                right: 2.0,
                bottom: 2.0,
                left: 2.0,
            },
            DisplayCommand::Text {
                text: "Hi".to_string(),
                x: 2.0,
                y: 11.0,
                color: Color::RAY_WHITE,
                font_size: 18.0,
            },
        ]
    );

    let label = node_by_id(&ctx, "label");
    ctx.set_visible(label, false).unwrap();
    assert_eq!(ctx.display_list().len(), 1);
}

#[test]
fn test_centered_text_alignment() {
    let mut b = DocumentBuilder::new();
    let app = b.element(ElementBuilder::new(ElementType::App).size(200, 100));
    let label = b.element(
        ElementBuilder::new(ElementType::Text)
            .text("abcd")
            .size(100, 18)
            .property(Property::byte(PropertyId::TEXT_ALIGNMENT, 1)),
    );
    b.add_child(app, label);
    let ctx = prepared(b);

    let text = ctx
        .display_list()
        .commands
        .into_iter()
        .find_map(|c| match c {
            DisplayCommand::Text { x, y, .. } => Some((x, y)),
            _ => None,
        });
    // 4 chars at 9px in a 100px box.
    assert_eq!(text, Some((32.0, 0.0)));
}

struct Badge;

impl ComponentBehavior for Badge {
    fn paint(&self, painter: &Painter<'_>, node: NodeId, list: &mut DisplayList) -> PaintMode {
        list.push(DisplayCommand::SolidColor(Color::WHITE, painter.tree()[node].rect));
        PaintMode::Replaced
    }
}

#[test]
fn test_behavior_replaces_standard_paint() {
    let mut b = DocumentBuilder::new();
    let mut template = TemplateBuilder::new();
    template.element(ElementBuilder::new(ElementType::Container));
    b.component("Badge", template);
    let app = b.element(ElementBuilder::new(ElementType::App).size(200, 100));
    let badge = b.element(
        ElementBuilder::new(ElementType::Container)
            .component("Badge")
            .size(40, 20)
            .property(Property::color(PropertyId::BG_COLOR, BLUE)),
    );
    b.add_child(app, badge);

    let mut registry = ComponentRegistry::new();
    registry.register("Badge", Badge);
    let ctx = prepared_with(b, registry);

    let list = ctx.display_list();
    assert_eq!(
        list.commands.first(),
        Some(&DisplayCommand::SolidColor(
            Color::WHITE,
            Rect::new(0.0, 0.0, 40.0, 20.0)
        ))
    );
    // Only the template root paints the instance background.
    assert_eq!(fills(&list, Color::from_rgb(0, 0, 255)), 1);
}

struct Toggle;

impl ComponentBehavior for Toggle {
    fn handle_event(
        &self,
        tree: &mut RenderTree,
        node: NodeId,
        event: EventType,
        _doc: &Document,
    ) -> bool {
        if event != EventType::CLICK {
            return false;
        }
        let visual = &mut tree[node].visual;
        visual.visible = !visual.visible;
        true
    }
}

#[test]
fn test_dispatch_event() {
    let mut b = DocumentBuilder::new();
    let mut template = TemplateBuilder::new();
    template.element(ElementBuilder::new(ElementType::Container));
    b.component("Toggle", template);
    let app = b.element(ElementBuilder::new(ElementType::App));
    let button = b.element(
        ElementBuilder::new(ElementType::Button)
            .id("save")
            .text("Save")
            .on(EventType::CLICK, "on_save")
            .on(EventType::HOVER, "on_hover")
            .on(EventType::CLICK, "log_click"),
    );
    let toggle = b.element(
        ElementBuilder::new(ElementType::Container)
            .id("toggle")
            .component("Toggle")
            .on(EventType::CLICK, "unreachable")
            .on(EventType::HOVER, "on_toggle_hover"),
    );
    b.add_child(app, button);
    b.add_child(app, toggle);

    let mut registry = ComponentRegistry::with_builtins();
    registry.register("Toggle", Toggle);
    let mut ctx = prepared_with(b, registry);

    let save = node_by_id(&ctx, "save");
    assert_eq!(
        ctx.dispatch_event(save, EventType::CLICK).unwrap(),
        vec!["on_save".to_string(), "log_click".to_string()]
    );
    assert!(ctx.dispatch_event(save, EventType::BLUR).unwrap().is_empty());

    let toggle = node_by_id(&ctx, "toggle");
    assert!(ctx.dispatch_event(toggle, EventType::CLICK).unwrap().is_empty());
    assert!(!ctx.tree()[toggle].visual.visible);
    assert_eq!(
        ctx.dispatch_event(toggle, EventType::HOVER).unwrap(),
        vec!["on_toggle_hover".to_string()]
    );

    assert!(matches!(
        ctx.dispatch_event(NodeId(99), EventType::CLICK),
        Err(EngineError::NodeNotFound(NodeId(99)))
    ));
}

#[test]
fn test_set_style_re_resolves() {
    let mut b = DocumentBuilder::new();
    let base = b.style(
        "tab_item_style_base",
        vec![Property::color(PropertyId::FG_COLOR, RED)],
    );
    let active = b.style(
        "tab_item_style_active_base",
        vec![Property::color(PropertyId::FG_COLOR, BLUE)],
    );
    let app = b.element(ElementBuilder::new(ElementType::App));
    let tab = b.element(
        ElementBuilder::new(ElementType::Button)
            .id("tab_home")
            .text("Home")
            .style(base),
    );
    b.add_child(app, tab);
    let mut ctx = prepared(b);

    let tab = node_by_id(&ctx, "tab_home");
    assert_eq!(ctx.tree()[tab].visual.foreground, Some(Color::from_rgb(255, 0, 0)));
    ctx.set_style(tab, active).unwrap();
    assert_eq!(ctx.tree()[tab].header.style_id, active);
    assert_eq!(ctx.tree()[tab].visual.foreground, Some(Color::from_rgb(0, 0, 255)));
    assert_eq!(ctx.tree()[tab].content.text, "Home");

    assert!(matches!(
        ctx.set_style(NodeId(42), base),
        Err(EngineError::NodeNotFound(_))
    ));
}

#[test]
fn test_textures_drive_image_size_and_paint() {
    let mut b = DocumentBuilder::new();
    let inline = b.inline_resource(ResourceType::IMAGE, "dot", vec![1, 2, 3]);
    let missing = b.external_resource(ResourceType::IMAGE, "logo", "logo.png");
    let app = b.element(ElementBuilder::new(ElementType::App).size(300, 100));
    let icon = b.element(
        ElementBuilder::new(ElementType::Image)
            .id("icon")
            .property(Property::resource(PropertyId::IMAGE_SOURCE, inline)),
    );
    let logo = b.element(
        ElementBuilder::new(ElementType::Image)
            .id("logo")
            .size(10, 10)
            .property(Property::resource(PropertyId::IMAGE_SOURCE, missing)),
    );
    b.add_child(app, icon);
    b.add_child(app, logo);

    let doc = b.build().unwrap();
    let mut ctx = RenderContext::new(doc, ComponentRegistry::with_builtins())
        .with_base_dir("/nonexistent");
    let loader = InlineOnlyLoader {
        size: TextureSize {
            width: 32,
            height: 16,
        },
    };
    assert_eq!(ctx.load_textures(&loader), 1);
    ctx.relayout();

    let icon = node_by_id(&ctx, "icon");
    assert_eq!(ctx.tree()[icon].rect, Rect::new(0.0, 0.0, 32.0, 16.0));
    assert!(ctx
        .diagnostics()
        .iter()
        .any(|d| matches!(d, Diagnostic::TextureLoad { resource, .. } if *resource == missing)));

    let images: Vec<_> = ctx
        .display_list()
        .commands
        .into_iter()
        .filter(|c| matches!(c, DisplayCommand::Image { .. }))
        .collect();
    assert_eq!(
        images,
        vec![DisplayCommand::Image {
            resource: inline,
            rect: Rect::new(0.0, 0.0, 32.0, 16.0),
        }]
    );
}

#[test]
fn test_resize_respects_resizable() {
    let mut b = DocumentBuilder::new();
    b.element(ElementBuilder::new(ElementType::App));
    let mut ctx = prepared(b);
    assert_eq!(ctx.tree()[NodeId(0)].rect, Rect::new(0.0, 0.0, 800.0, 600.0));
    assert!(ctx.resize(1024, 768));
    assert_eq!(ctx.tree()[NodeId(0)].rect, Rect::new(0.0, 0.0, 1024.0, 768.0));
    assert!(!ctx.resize(1024, 768));

    let mut b = DocumentBuilder::new();
    b.element(
        ElementBuilder::new(ElementType::App).property(Property::byte(PropertyId::RESIZABLE, 0)),
    );
    let mut fixed = prepared(b);
    assert!(!fixed.resize(1024, 768));
    assert_eq!(fixed.config().width, 800);
}

#[test]
fn test_from_bytes() {
    let mut b = DocumentBuilder::new();
    let title = b.string("Bytes");
    b.element(
        ElementBuilder::new(ElementType::App)
            .property(Property::string(PropertyId::WINDOW_TITLE, title))
            .property(Property::short(PropertyId::WINDOW_WIDTH, 320)),
    );
    let bytes = b.to_bytes().unwrap();

    let ctx = RenderContext::from_bytes(&bytes).unwrap();
    assert_eq!(ctx.config().title, "Bytes");
    assert_eq!(ctx.config().width, 320);
    assert!(ctx.diagnostics().is_empty());

    assert!(matches!(
        RenderContext::from_bytes(&bytes[..10]),
        Err(EngineError::Document(_))
    ));
}

#[test]
fn test_layout_children_of_unknown_node() {
    let mut b = DocumentBuilder::new();
    b.element(ElementBuilder::new(ElementType::App));
    let mut ctx = prepared(b);
    assert!(matches!(
        ctx.layout_children_of(NodeId(7), Rect::zero()),
        Err(EngineError::Layout(_))
    ));
    assert_eq!(
        ctx.content_box_of(NodeId(0)),
        Some(Rect::new(0.0, 0.0, 800.0, 600.0))
    );
}
