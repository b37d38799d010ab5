//! # Kryon Layout
//!
//! Box layout for the Kryon render core.
//!
//! ## Design Goals
//!
//! 1. **Explicit before intrinsic**: Declared sizes win; text and image
//!    nodes otherwise measure their content, containers fill their parent
//! 2. **Single-line flow**: Children stack along one axis with gaps, equal
//!    growth shares, main/cross alignment and reversed directions
//! 3. **Content hugging**: Containers without a declared height shrink or
//!    grow to their children
//! 4. **Absolute positioning**: Absolute nodes skip flow and sit at their
//!    parent's origin plus their declared offset
//! 5. **Pluggable measurement**: Text extent comes from a [`TextMeasurer`]

pub mod engine;
pub mod flex;
pub mod text;

pub use engine::LayoutEngine;
pub use flex::{cross_offset, grow_share, main_offsets, Axis};
pub use kryon_dom::Rect;
pub use text::{measure_text_simple, SimpleTextMeasurer, TextMeasurer, TextMetrics};

use kryon_dom::NodeId;
use kryon_style::{EdgeInsets, VisualState};
use thiserror::Error;

/// Errors that can occur in layout.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),
}

/// Scale and fallback values for a layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Multiplier for every declared pixel value; at least 1.
    pub scale: f32,
    /// Unscaled font size for nodes without a resolved one.
    pub default_font_size: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            default_font_size: 18.0,
        }
    }
}

impl LayoutConfig {
    /// Smallest extent given to a visible node that collapsed on one axis.
    pub fn min_visible_extent(&self) -> f32 {
        (self.default_font_size * self.scale).max(self.scale)
    }
}

/// Edge sizes for borders and padding, in device pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EdgeSizes {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl EdgeSizes {
    pub fn from_insets(insets: EdgeInsets, scale: f32) -> Self {
        Self {
            top: f32::from(insets.top) * scale,
            right: f32::from(insets.right) * scale,
            bottom: f32::from(insets.bottom) * scale,
            left: f32::from(insets.left) * scale,
        }
    }

    /// Border plus padding of a node.
    pub fn frame(visual: &VisualState, scale: f32) -> Self {
        let border = Self::from_insets(visual.border_widths, scale);
        let padding = Self::from_insets(visual.padding, scale);
        Self {
            top: border.top + padding.top,
            right: border.right + padding.right,
            bottom: border.bottom + padding.bottom,
            left: border.left + padding.left,
        }
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }

    /// Shrink `rect` by these edges; sizes never go negative.
    pub fn shrink(&self, rect: Rect) -> Rect {
        Rect::new(
            rect.x + self.left,
            rect.y + self.top,
            (rect.width - self.horizontal()).max(0.0),
            (rect.height - self.vertical()).max(0.0),
        )
    }
}

/// The box a node's children are laid out in: its rect minus border and
/// padding.
pub fn content_box(visual: &VisualState, rect: Rect, scale: f32) -> Rect {
    EdgeSizes::frame(visual, scale).shrink(rect)
}
