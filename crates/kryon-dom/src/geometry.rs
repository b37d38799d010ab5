//! Pixel rectangles.

use kryon_style::EdgeInsets;

/// A rectangle in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Shrink by scaled insets; sizes never go negative.
    pub fn inset(&self, insets: EdgeInsets, scale: f32) -> Rect {
        let left = f32::from(insets.left) * scale;
        let top = f32::from(insets.top) * scale;
        Rect {
            x: self.x + left,
            y: self.y + top,
            width: (self.width - left - f32::from(insets.right) * scale).max(0.0),
            height: (self.height - top - f32::from(insets.bottom) * scale).max(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inset_clamps() {
        let r = Rect::new(10.0, 10.0, 20.0, 8.0);
        let inner = r.inset(EdgeInsets::new(2, 3, 2, 1), 2.0);
        assert_eq!(inner, Rect::new(12.0, 14.0, 12.0, 0.0));
        assert!(r.contains(10.0, 17.9));
        assert!(!r.contains(30.0, 12.0));
    }
}
