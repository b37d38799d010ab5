//! Typed decoding of raw property values.

use kryon_krb::{HeaderFlags, Property, ValueType};

use crate::{Color, StyleError};

/// Sixteen-entry palette for single-byte colors.
const PALETTE: [Color; 16] = [
    Color::from_rgb(0, 0, 0),
    Color::from_rgb(128, 0, 0),
    Color::from_rgb(0, 128, 0),
    Color::from_rgb(128, 128, 0),
    Color::from_rgb(0, 0, 128),
    Color::from_rgb(128, 0, 128),
    Color::from_rgb(0, 128, 128),
    Color::from_rgb(192, 192, 192),
    Color::from_rgb(128, 128, 128),
    Color::from_rgb(255, 0, 0),
    Color::from_rgb(0, 255, 0),
    Color::from_rgb(255, 255, 0),
    Color::from_rgb(0, 0, 255),
    Color::from_rgb(255, 0, 255),
    Color::from_rgb(0, 255, 255),
    Color::from_rgb(255, 255, 255),
];

/// Four-sided insets in unscaled pixels, in top, right, bottom, left order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EdgeInsets {
    pub top: u8,
    pub right: u8,
    pub bottom: u8,
    pub left: u8,
}

impl EdgeInsets {
    pub const ZERO: EdgeInsets = EdgeInsets::uniform(0);

    pub const fn new(top: u8, right: u8, bottom: u8, left: u8) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub const fn uniform(value: u8) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    pub fn horizontal(&self) -> u16 {
        u16::from(self.left) + u16::from(self.right)
    }

    pub fn vertical(&self) -> u16 {
        u16::from(self.top) + u16::from(self.bottom)
    }
}

/// A declared length: absolute pixels or a fraction of the parent's
/// content size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    Pixels(f32),
    Fraction(f32),
}

impl Length {
    /// Resolve against the parent content extent; pixels are scaled.
    pub fn resolve(self, parent_extent: f32, scale: f32) -> f32 {
        match self {
            Length::Pixels(px) => px * scale,
            Length::Fraction(f) => f * parent_extent,
        }
    }
}

fn invalid(property: &Property, reason: &'static str) -> StyleError {
    StyleError::InvalidValue {
        property: property.id.0,
        reason,
    }
}

/// Decode a color value: four RGBA bytes, or a palette index when the
/// document does not use extended colors.
pub fn color(property: &Property, flags: HeaderFlags) -> Result<Color, StyleError> {
    match property.value.as_slice() {
        [r, g, b, a] => Ok(Color::new(*r, *g, *b, *a)),
        [index] if !flags.contains(HeaderFlags::EXTENDED_COLOR) => PALETTE
            .get(*index as usize)
            .copied()
            .ok_or_else(|| invalid(property, "palette index out of range")),
        _ => Err(invalid(property, "expected 4-byte RGBA color")),
    }
}

pub fn byte(property: &Property) -> Result<u8, StyleError> {
    property
        .as_u8()
        .ok_or_else(|| invalid(property, "expected a byte"))
}

pub fn short(property: &Property) -> Result<u16, StyleError> {
    match property.value_type {
        ValueType::BYTE => byte(property).map(u16::from),
        _ => property
            .as_u16()
            .ok_or_else(|| invalid(property, "expected a short")),
    }
}

pub fn edge_insets(property: &Property) -> Result<EdgeInsets, StyleError> {
    match property.value.as_slice() {
        [top, right, bottom, left] => Ok(EdgeInsets::new(*top, *right, *bottom, *left)),
        _ => Err(invalid(property, "expected 4-byte edge insets")),
    }
}

/// Border widths: a single byte applies to all sides.
pub fn border_widths(property: &Property) -> Result<EdgeInsets, StyleError> {
    match property.value.as_slice() {
        [width] => Ok(EdgeInsets::uniform(*width)),
        _ => edge_insets(property),
    }
}

/// A positive font size in unscaled pixels.
pub fn font_size(property: &Property) -> Result<f32, StyleError> {
    match short(property)? {
        0 => Err(invalid(property, "font size must be positive")),
        size => Ok(f32::from(size)),
    }
}

/// A length: percentage (8.8 fixed point, 256 = 100%) or pixels.
pub fn length(property: &Property) -> Result<Length, StyleError> {
    match property.value_type {
        ValueType::PERCENTAGE => property
            .as_u16()
            .map(|raw| Length::Fraction(f32::from(raw) / 256.0))
            .ok_or_else(|| invalid(property, "expected 8.8 fixed-point percentage")),
        _ => short(property).map(|px| Length::Pixels(f32::from(px))),
    }
}
