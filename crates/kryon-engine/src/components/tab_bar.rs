//! Tab bar: docks against an edge of its parent and shrinks the main
//! content sibling to make room.

use kryon_dom::{NodeId, Rect, RenderNode, RenderTree};
use kryon_krb::Document;
use kryon_layout::content_box;
use tracing::{debug, warn};

use super::{AdjustContext, ComponentBehavior};
use crate::EngineError;

/// Edge of the parent a tab bar docks against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DockPosition {
    Top,
    #[default]
    Bottom,
    Left,
    Right,
}

impl DockPosition {
    /// Parse a position name, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "top" => Some(DockPosition::Top),
            "bottom" => Some(DockPosition::Bottom),
            "left" => Some(DockPosition::Left),
            "right" => Some(DockPosition::Right),
            _ => None,
        }
    }
}

/// Axis the tabs are laid out along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Row,
    Column,
}

impl Orientation {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "row" => Some(Orientation::Row),
            "column" => Some(Orientation::Column),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Orientation::Row => "row",
            Orientation::Column => "column",
        }
    }
}

/// Behavior of the `TabBar` component.
///
/// Custom properties (instance first, then the component's declared
/// defaults):
/// - `position`: `top`, `bottom`, `left` or `right`; default `bottom`
/// - `orientation`: `row` or `column`; default `row`
#[derive(Debug, Clone, Copy, Default)]
pub struct TabBar;

impl TabBar {
    /// Custom property `key` of an instance, falling back to the component
    /// definition's default.
    fn property<'d>(node: &RenderNode, doc: &'d Document, key: &str) -> Option<&'d str> {
        doc.custom_string(&node.custom_properties, key).or_else(|| {
            let definition = doc.component(node.component.as_deref()?)?;
            let default = definition.property_default(doc, key)?;
            doc.value_string(default.value_type, &default.default_value)
        })
    }

    fn orientation(node: &RenderNode, doc: &Document) -> Orientation {
        match Self::property(node, doc, "orientation") {
            Some(value) => Orientation::parse(value).unwrap_or_else(|| {
                warn!(node = %node.name, value, "Unknown tab bar orientation, using row");
                Orientation::Row
            }),
            None => Orientation::Row,
        }
    }

    fn position(node: &RenderNode, doc: &Document) -> DockPosition {
        match Self::property(node, doc, "position") {
            Some(value) => DockPosition::parse(value).unwrap_or_else(|| {
                warn!(node = %node.name, value, "Unknown tab bar position, using bottom");
                DockPosition::Bottom
            }),
            None => DockPosition::Bottom,
        }
    }

    /// Frame of the bar once docked inside `parent`.
    fn dock(rect: Rect, parent: Rect, position: DockPosition, orientation: Orientation) -> Rect {
        let mut docked = rect;
        let row = orientation == Orientation::Row;
        let column = orientation == Orientation::Column;
        match position {
            DockPosition::Top => {
                docked.x = parent.x;
                docked.y = parent.y;
                if row {
                    docked.width = parent.width;
                }
            }
            DockPosition::Bottom => {
                docked.x = parent.x;
                docked.y = (parent.bottom() - rect.height).max(parent.y);
                if row {
                    docked.width = parent.width;
                }
            }
            DockPosition::Left => {
                docked.x = parent.x;
                docked.y = parent.y;
                if column {
                    docked.height = parent.height;
                }
            }
            DockPosition::Right => {
                docked.x = (parent.right() - rect.width).max(parent.x);
                docked.y = parent.y;
                if column {
                    docked.height = parent.height;
                }
            }
        }
        docked.width = docked.width.max(1.0);
        docked.height = docked.height.max(1.0);
        docked
    }

    /// Shrink the main content sibling away from the docked bar.
    fn make_room(sibling: Rect, bar: Rect, position: DockPosition) -> Rect {
        let mut shrunk = sibling;
        match position {
            DockPosition::Bottom => {
                shrunk.height = (bar.y - sibling.y).max(1.0);
            }
            DockPosition::Top => {
                shrunk.y = bar.bottom();
                shrunk.height = (sibling.bottom() - shrunk.y).max(1.0);
            }
            DockPosition::Left => {
                shrunk.x = bar.right();
                shrunk.width = (sibling.right() - shrunk.x).max(1.0);
            }
            DockPosition::Right => {
                shrunk.width = (bar.x - sibling.x).max(1.0);
            }
        }
        shrunk
    }
}

impl ComponentBehavior for TabBar {
    fn instance_style(&self, instance: &RenderNode, doc: &Document) -> Option<u8> {
        let name = format!("tab_bar_style_base_{}", Self::orientation(instance, doc).name());
        doc.style_id_by_name(&name)
    }

    fn adjust_layout(
        &self,
        tree: &mut RenderTree,
        node: NodeId,
        ctx: &AdjustContext<'_>,
    ) -> Result<(), EngineError> {
        let bar = tree.node(node).ok_or(EngineError::NodeNotFound(node))?;
        let Some(parent) = bar.parent else {
            warn!(node = %bar.name, "Tab bar has no parent to dock against");
            return Ok(());
        };
        let position = Self::position(bar, ctx.doc);
        let orientation = Self::orientation(bar, ctx.doc);

        let docked = Self::dock(bar.rect, tree[parent].rect, position, orientation);
        tree[node].rect = docked;
        debug!(
            node = %tree[node].name,
            ?position,
            ?orientation,
            x = docked.x,
            y = docked.y,
            width = docked.width,
            height = docked.height,
            "Docked tab bar"
        );

        let sibling = tree
            .children(parent)
            .iter()
            .copied()
            .find(|&child| child != node);
        if let Some(sibling) = sibling {
            let shrunk = Self::make_room(tree[sibling].rect, docked, position);
            debug!(
                sibling = %tree[sibling].name,
                width = shrunk.width,
                height = shrunk.height,
                "Shrunk content next to tab bar"
            );
            tree[sibling].rect = shrunk;
        }

        let inner = content_box(&tree[node].visual, docked, ctx.scale);
        ctx.layout.layout_children(tree, node, inner)?;
        Ok(())
    }
}
