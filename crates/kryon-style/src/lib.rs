//! # Kryon Style
//!
//! Visual property resolution for the Kryon render core.
//!
//! ## Design Goals
//!
//! 1. **Ordered cascade**: Style properties, then direct properties, then
//!    contextual defaults, then content fallback
//! 2. **Inheritance**: Foreground color, font size and text alignment flow
//!    down the tree into unset fields
//! 3. **Explicit sentinels**: "Unset, inherit me" is `None`, never a magic
//!    byte or a zero alpha
//! 4. **Lenient values**: A malformed value is skipped with a warning; it
//!    never aborts resolution

pub mod cascade;
pub mod inherit;
pub mod values;
pub mod visual;

pub use cascade::{
    apply_content_fallback, apply_contextual_defaults, apply_properties, resolve,
    PropertyOrigin, ResolveDefaults,
};
pub use inherit::InheritedValues;
pub use values::{EdgeInsets, Length};
pub use visual::{Content, InheritedFields, TextAlign, VisualState};

use thiserror::Error;

/// Errors that can occur while decoding property values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StyleError {
    #[error("Invalid value for property {property:#04x}: {reason}")]
    InvalidValue { property: u8, reason: &'static str },
}

/// An RGBA color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::new(0, 0, 0, 0);
    pub const BLACK: Color = Color::new(0, 0, 0, 255);
    pub const WHITE: Color = Color::new(255, 255, 255, 255);
    pub const RAY_WHITE: Color = Color::new(245, 245, 245, 255);
    pub const GRAY: Color = Color::new(130, 130, 130, 255);
    pub const DARK_BACKGROUND: Color = Color::new(30, 30, 30, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Convert to [f32; 4] for rendering.
    pub fn to_f32_array(&self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }
}
