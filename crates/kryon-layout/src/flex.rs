//! Flow distribution helpers.
//!
//! A container lays its flow children out along one axis:
//! 1. Size every child against the container's content box
//! 2. Hand the leftover main-axis space to growing children in equal parts
//! 3. Stretch children on the cross axis when asked to
//! 4. Compute the start offset and spacing from the main alignment
//! 5. Place children (reversed directions walk them backwards)

use kryon_krb::{CrossAlignment, Direction, MainAlignment};
use kryon_dom::Rect;

/// Represents the main and cross axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// Main axis of a flow direction.
    pub fn of(direction: Direction) -> Self {
        if direction.is_horizontal() {
            Axis::Horizontal
        } else {
            Axis::Vertical
        }
    }

    /// Get the perpendicular axis.
    pub fn cross(self) -> Self {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }

    /// Extent of `rect` along this axis.
    pub fn extent(self, rect: &Rect) -> f32 {
        match self {
            Axis::Horizontal => rect.width,
            Axis::Vertical => rect.height,
        }
    }

    pub fn set_extent(self, rect: &mut Rect, value: f32) {
        match self {
            Axis::Horizontal => rect.width = value,
            Axis::Vertical => rect.height = value,
        }
    }
}

/// Start offset and spacing between consecutive children for a main-axis
/// alignment. `used` includes the gaps; the returned spacing does too.
pub fn main_offsets(
    alignment: MainAlignment,
    reversed: bool,
    available: f32,
    used: f32,
    count: usize,
    gap: f32,
) -> (f32, f32) {
    let free = (available - used).max(0.0);
    let alignment = match (alignment, reversed) {
        (MainAlignment::Start, true) => MainAlignment::End,
        (MainAlignment::End, true) => MainAlignment::Start,
        (alignment, _) => alignment,
    };
    match alignment {
        MainAlignment::Start => (0.0, gap),
        MainAlignment::End => (free, gap),
        MainAlignment::Center => (free / 2.0, gap),
        MainAlignment::SpaceBetween if count > 1 => (0.0, gap + free / (count - 1) as f32),
        MainAlignment::SpaceBetween => (0.0, gap),
    }
}

/// Offset of a child of size `size` inside `available` cross space.
pub fn cross_offset(alignment: CrossAlignment, available: f32, size: f32) -> f32 {
    match alignment {
        CrossAlignment::Start | CrossAlignment::Stretch => 0.0,
        CrossAlignment::Center => (available - size) / 2.0,
        CrossAlignment::End => available - size,
    }
}

/// Equal share of the leftover main-axis space for each growing child.
pub fn grow_share(available: f32, gaps: f32, fixed: f32, growing: usize) -> f32 {
    let leftover = (available - gaps - fixed).max(0.0);
    if growing == 0 || leftover <= 0.0 {
        return 0.0;
    }
    leftover / growing as f32
}
