//! Window configuration read from the document's App element.

use kryon_krb::{Document, ElementType, HeaderFlags, Property, PropertyId};
use kryon_layout::LayoutConfig;
use kryon_style::{values, Color, ResolveDefaults, StyleError, TextAlign};
use tracing::{debug, warn};

/// Window and fallback rendering values.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub resizable: bool,
    /// Declared scale factor; see [`WindowConfig::scale`].
    pub scale_factor: f32,
    pub background: Color,
    pub foreground: Color,
    pub border_color: Color,
    /// Unscaled default font size.
    pub font_size: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "Kryon Application".to_string(),
            resizable: true,
            scale_factor: 1.0,
            background: Color::DARK_BACKGROUND,
            foreground: Color::RAY_WHITE,
            border_color: Color::GRAY,
            font_size: 18.0,
        }
    }
}

/// Which property groups a source may set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Style,
    Direct,
}

impl WindowConfig {
    /// Defaults overridden by the App element's style, then its direct
    /// properties. Documents without an App root keep the defaults.
    pub fn from_document(doc: &Document) -> Self {
        let mut config = Self::default();
        if !doc.flags().contains(HeaderFlags::HAS_APP) {
            return config;
        }
        let Some(app) = doc
            .elements()
            .first()
            .filter(|e| e.header.element_type == ElementType::App)
        else {
            warn!("Document flags an App element but element 0 is not one");
            return config;
        };

        if let Some(style) = doc.style(app.header.style_id) {
            config.apply_all(&style.properties, doc, Source::Style);
        }
        config.apply_all(&app.properties, doc, Source::Direct);

        debug!(
            width = config.width,
            height = config.height,
            title = %config.title,
            resizable = config.resizable,
            scale_factor = config.scale_factor,
            "Window config from App element"
        );
        config
    }

    fn apply_all(&mut self, properties: &[Property], doc: &Document, source: Source) {
        for property in properties {
            if let Err(err) = self.apply(property, doc, source) {
                warn!(error = %err, ?source, "Skipping malformed App property");
            }
        }
    }

    fn apply(&mut self, property: &Property, doc: &Document, source: Source) -> Result<(), StyleError> {
        let flags = doc.flags();
        match property.id {
            PropertyId::BG_COLOR => self.background = values::color(property, flags)?,
            PropertyId::FG_COLOR => self.foreground = values::color(property, flags)?,
            PropertyId::BORDER_COLOR => self.border_color = values::color(property, flags)?,
            PropertyId::FONT_SIZE => self.font_size = values::font_size(property)?,
            _ if source == Source::Style => {}
            PropertyId::WINDOW_WIDTH => {
                let width = values::short(property)?;
                if width > 0 {
                    self.width = u32::from(width);
                }
            }
            PropertyId::WINDOW_HEIGHT => {
                let height = values::short(property)?;
                if height > 0 {
                    self.height = u32::from(height);
                }
            }
            PropertyId::WINDOW_TITLE => {
                let index = values::byte(property)?;
                match doc.string(index) {
                    Some(title) => self.title = title.to_string(),
                    None => warn!(index, "Window title string index out of range"),
                }
            }
            PropertyId::RESIZABLE => self.resizable = values::byte(property)? != 0,
            PropertyId::SCALE_FACTOR => {
                let factor = f32::from(values::short(property)?) / 256.0;
                if factor > 0.0 {
                    self.scale_factor = factor;
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Effective scale applied to every declared pixel value.
    pub fn scale(&self) -> f32 {
        self.scale_factor.max(1.0)
    }

    pub fn resolve_defaults(&self) -> ResolveDefaults {
        ResolveDefaults {
            foreground: self.foreground,
            border_color: self.border_color,
            font_size: self.font_size,
            text_align: TextAlign::Start,
        }
    }

    pub fn layout_config(&self) -> LayoutConfig {
        LayoutConfig {
            scale: self.scale(),
            default_font_size: self.font_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kryon_krb::{DocumentBuilder, ElementBuilder};

    #[test]
    fn test_defaults_without_app() {
        let mut b = DocumentBuilder::new();
        b.element(ElementBuilder::new(ElementType::Container));
        let doc = b.build().unwrap();
        assert_eq!(WindowConfig::from_document(&doc), WindowConfig::default());
    }

    #[test]
    fn test_direct_properties_override_style() {
        let mut b = DocumentBuilder::new();
        let style = b.style(
            "app_style",
            vec![
                Property::color(PropertyId::BG_COLOR, [10, 20, 30, 255]),
                Property::short(PropertyId::FONT_SIZE, 14),
                // Window geometry is only read from the element itself.
                Property::short(PropertyId::WINDOW_WIDTH, 1024),
            ],
        );
        let title = b.string("Demo");
        b.element(
            ElementBuilder::new(ElementType::App)
                .style(style)
                .property(Property::short(PropertyId::WINDOW_HEIGHT, 480))
                .property(Property::string(PropertyId::WINDOW_TITLE, title))
                .property(Property::byte(PropertyId::RESIZABLE, 0))
                .property(Property::short(PropertyId::SCALE_FACTOR, 512))
                .property(Property::short(PropertyId::FONT_SIZE, 20)),
        );
        let doc = b.build().unwrap();

        let config = WindowConfig::from_document(&doc);
        assert_eq!(config.width, 800);
        assert_eq!(config.height, 480);
        assert_eq!(config.title, "Demo");
        assert!(!config.resizable);
        assert_eq!(config.scale(), 2.0);
        assert_eq!(config.background, Color::from_rgb(10, 20, 30));
        assert_eq!(config.font_size, 20.0);
        assert_eq!(config.layout_config().default_font_size, 20.0);
    }

    #[test]
    fn test_scale_never_below_one() {
        let config = WindowConfig {
            scale_factor: 0.5,
            ..WindowConfig::default()
        };
        assert_eq!(config.scale(), 1.0);
        assert_eq!(config.layout_config().scale, 1.0);
    }
}
