//! Display list generation.
//!
//! Walks the laid-out tree in child order and emits backend-neutral drawing
//! commands. Each node contributes, in order: background fill, borders,
//! then text or image inside its content box. A component behavior may
//! replace a node's own commands; its children are still painted.

use kryon_dom::{NodeId, Rect, RenderTree};
use kryon_krb::{Document, ElementType};
use kryon_layout::{EdgeSizes, TextMeasurer};
use kryon_style::{Color, TextAlign};
use tracing::{debug, trace};

use crate::components::{ComponentRegistry, PaintMode};
use crate::config::WindowConfig;

/// A display command.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayCommand {
    /// Fill a rectangle with a solid color.
    SolidColor(Color, Rect),

    /// Draw a border; widths are already clamped to the rectangle.
    Border {
        color: Color,
        rect: Rect,
        top: f32,
        right: f32,
        bottom: f32,
        left: f32,
    },

    /// Draw one line of text with its top-left corner at `x`, `y`.
    Text {
        text: String,
        x: f32,
        y: f32,
        color: Color,
        font_size: f32,
    },

    /// Draw a loaded image resource stretched into `rect`.
    Image { resource: u8, rect: Rect },
}

/// A list of display commands in paint order.
#[derive(Debug, Default, Clone)]
pub struct DisplayList {
    pub commands: Vec<DisplayCommand>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: DisplayCommand) {
        self.commands.push(command);
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DisplayCommand> {
        self.commands.iter()
    }
}

/// Shrink two opposing border widths proportionally so they fit in `total`.
pub fn clamp_opposing_borders(first: f32, second: f32, total: f32) -> (f32, f32) {
    if total <= 0.0 {
        return (0.0, 0.0);
    }
    let sum = first + second;
    if sum <= total {
        return (first, second);
    }
    let first = first / sum * total;
    (first, total - first)
}

/// Builds a [`DisplayList`] from a laid-out tree.
pub struct Painter<'a> {
    tree: &'a RenderTree,
    doc: &'a Document,
    registry: &'a ComponentRegistry,
    measurer: &'a dyn TextMeasurer,
    config: &'a WindowConfig,
}

impl<'a> Painter<'a> {
    pub fn new(
        tree: &'a RenderTree,
        doc: &'a Document,
        registry: &'a ComponentRegistry,
        measurer: &'a dyn TextMeasurer,
        config: &'a WindowConfig,
    ) -> Self {
        Self {
            tree,
            doc,
            registry,
            measurer,
            config,
        }
    }

    pub fn tree(&self) -> &'a RenderTree {
        self.tree
    }

    pub fn document(&self) -> &'a Document {
        self.doc
    }

    pub fn scale(&self) -> f32 {
        self.config.scale()
    }

    /// Paint every root in order.
    pub fn paint(&self) -> DisplayList {
        let mut list = DisplayList::new();
        for &root in self.tree.roots() {
            self.paint_node(root, &mut list);
        }
        debug!(commands = list.len(), "Built display list");
        list
    }

    /// Paint `id` and its subtree. Hidden nodes hide their subtree.
    pub fn paint_node(&self, id: NodeId, list: &mut DisplayList) {
        let Some(node) = self.tree.node(id) else {
            return;
        };
        if !node.visual.visible {
            return;
        }

        let mode = match self.registry.behavior_for(node) {
            Some(behavior) => behavior.paint(self, id, list),
            None => PaintMode::Standard,
        };
        if mode == PaintMode::Standard {
            self.paint_standard(id, list);
        }

        for &child in self.tree.children(id) {
            self.paint_node(child, list);
        }
    }

    /// Commands for the node itself: background, borders, content.
    pub fn paint_standard(&self, id: NodeId, list: &mut DisplayList) {
        let Some(node) = self.tree.node(id) else {
            return;
        };
        let rect = node.rect;
        if rect.width <= 0.0 || rect.height <= 0.0 {
            return;
        }
        let scale = self.scale();
        let visual = &node.visual;

        if !visual.background.is_transparent() {
            list.push(DisplayCommand::SolidColor(visual.background, rect));
        }

        let border = EdgeSizes::from_insets(visual.border_widths, scale);
        let (top, bottom) = clamp_opposing_borders(border.top, border.bottom, rect.height);
        let (left, right) = clamp_opposing_borders(border.left, border.right, rect.width);
        if let Some(color) = visual.border_color.filter(|c| !c.is_transparent()) {
            if top + right + bottom + left > 0.0 {
                list.push(DisplayCommand::Border {
                    color,
                    rect,
                    top,
                    right,
                    bottom,
                    left,
                });
            }
        }

        let clamped = EdgeSizes {
            top,
            right,
            bottom,
            left,
        };
        let content = EdgeSizes::from_insets(visual.padding, scale).shrink(clamped.shrink(rect));
        if content.width <= 0.0 || content.height <= 0.0 {
            return;
        }

        let element_type = node.header.element_type;
        if matches!(element_type, ElementType::Text | ElementType::Button)
            && !node.content.text.is_empty()
        {
            let font_size = (visual.font_size.unwrap_or(self.config.font_size) * scale).max(1.0);
            let metrics = self.measurer.measure(&node.content.text, font_size);
            let x = match visual.text_align.unwrap_or_default() {
                TextAlign::Start => content.x,
                TextAlign::Center => content.x + (content.width - metrics.width) / 2.0,
                TextAlign::End => content.right() - metrics.width,
            };
            let y = content.y + (content.height - font_size) / 2.0;
            list.push(DisplayCommand::Text {
                text: node.content.text.clone(),
                x,
                y,
                color: visual.foreground.unwrap_or(self.config.foreground),
                font_size,
            });
        }

        if matches!(element_type, ElementType::Image | ElementType::Button) {
            if let (Some(resource), Some(_)) = (node.content.resource, node.texture) {
                list.push(DisplayCommand::Image {
                    resource,
                    rect: content,
                });
            }
        }

        trace!(node = %node.name, commands = list.len(), "Painted node");
    }
}
