//! Text measurement seam.

/// Measured extent of a single line of text.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextMetrics {
    pub width: f32,
    pub height: f32,
}

impl TextMetrics {
    pub fn with_font_size(font_size: f32) -> Self {
        Self {
            width: 0.0,
            height: font_size,
        }
    }
}

/// Measures text for intrinsic sizing and alignment.
///
/// Implemented by the host's graphics backend; `font_size` is already
/// scaled to device pixels.
pub trait TextMeasurer {
    fn measure(&self, text: &str, font_size: f32) -> TextMetrics;
}

/// Approximate metrics without a font: every character advances half an em.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleTextMeasurer;

impl TextMeasurer for SimpleTextMeasurer {
    fn measure(&self, text: &str, font_size: f32) -> TextMetrics {
        measure_text_simple(text, font_size)
    }
}

/// Measure text using the average character width approximation.
pub fn measure_text_simple(text: &str, font_size: f32) -> TextMetrics {
    // Typical Latin font has ~0.5em average character width
    let avg_char_width = font_size * 0.5;
    let width = text.chars().count() as f32 * avg_char_width;

    TextMetrics {
        width,
        ..TextMetrics::with_font_size(font_size)
    }
}
