//! Resolved per-node visual state.

use bitflags::bitflags;
use kryon_krb::ElementType;

use crate::values::EdgeInsets;
use crate::Color;

/// Horizontal text alignment within the content box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Start,
    Center,
    End,
}

impl TextAlign {
    /// Decode an alignment byte; unknown bytes and the unset marker read as
    /// `None`.
    pub fn from_u8(b: u8) -> Option<Self> {
        match b {
            0 => Some(TextAlign::Start),
            1 => Some(TextAlign::Center),
            2 => Some(TextAlign::End),
            _ => None,
        }
    }
}

bitflags! {
    /// Fields whose current value came from inheritance rather than a
    /// declaration. Re-resolution overwrites these in descendants.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct InheritedFields: u8 {
        const FOREGROUND = 0x01;
        const FONT_SIZE = 0x02;
        const TEXT_ALIGN = 0x04;
    }
}

/// Visual fields of a render node.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualState {
    pub background: Color,
    /// `None` means inherit.
    pub foreground: Option<Color>,
    /// `None` means no border color declared.
    pub border_color: Option<Color>,
    pub border_widths: EdgeInsets,
    pub padding: EdgeInsets,
    /// Unscaled font size; `None` means inherit.
    pub font_size: Option<f32>,
    /// `None` means inherit.
    pub text_align: Option<TextAlign>,
    pub visible: bool,
    pub interactive: bool,
    pub inherited: InheritedFields,
}

impl VisualState {
    /// Initial state for a node of the given type.
    pub fn initial(element_type: ElementType) -> Self {
        Self {
            background: Color::TRANSPARENT,
            foreground: None,
            border_color: None,
            border_widths: EdgeInsets::ZERO,
            padding: EdgeInsets::ZERO,
            font_size: None,
            text_align: None,
            visible: true,
            interactive: element_type.is_interactive(),
            inherited: InheritedFields::empty(),
        }
    }

    pub fn has_border(&self) -> bool {
        !self.border_widths.is_zero()
    }
}

/// Resolved content of a render node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Content {
    pub text: String,
    pub resource: Option<u8>,
}
