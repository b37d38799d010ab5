//! Per-node cascade: style properties, direct properties, contextual
//! defaults and content fallback.

use kryon_krb::{Document, ElementType, Property, PropertyId, Style, NO_RESOURCE};
use tracing::{trace, warn};

use crate::values::{self, EdgeInsets};
use crate::visual::{Content, TextAlign, VisualState};
use crate::{Color, StyleError};

/// Values used where nothing is declared or inherited.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolveDefaults {
    pub foreground: Color,
    pub border_color: Color,
    pub font_size: f32,
    pub text_align: TextAlign,
}

impl Default for ResolveDefaults {
    fn default() -> Self {
        Self {
            foreground: Color::RAY_WHITE,
            border_color: Color::GRAY,
            font_size: 18.0,
            text_align: TextAlign::Start,
        }
    }
}

/// Where a property list comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyOrigin {
    Style,
    /// Properties declared on the element itself; these also carry text
    /// content and image source.
    Direct,
}

/// Apply a property list in order; later entries win.
pub fn apply_properties(
    visual: &mut VisualState,
    content: &mut Content,
    properties: &[Property],
    doc: &Document,
    origin: PropertyOrigin,
) {
    for property in properties {
        if let Err(err) = apply_property(visual, content, property, doc, origin) {
            warn!(error = %err, ?origin, "Skipping malformed property");
        }
    }
}

fn apply_property(
    visual: &mut VisualState,
    content: &mut Content,
    property: &Property,
    doc: &Document,
    origin: PropertyOrigin,
) -> Result<(), StyleError> {
    let flags = doc.flags();
    match property.id {
        PropertyId::BG_COLOR => visual.background = values::color(property, flags)?,
        PropertyId::FG_COLOR => {
            // A fully transparent foreground reads as unset.
            let color = values::color(property, flags)?;
            visual.foreground = (!color.is_transparent()).then_some(color);
        }
        PropertyId::BORDER_COLOR => {
            let color = values::color(property, flags)?;
            visual.border_color = (!color.is_transparent()).then_some(color);
        }
        PropertyId::BORDER_WIDTH => visual.border_widths = values::border_widths(property)?,
        PropertyId::PADDING => visual.padding = values::edge_insets(property)?,
        PropertyId::TEXT_ALIGNMENT => {
            visual.text_align = TextAlign::from_u8(values::byte(property)?)
        }
        PropertyId::VISIBILITY => visual.visible = values::byte(property)? != 0,
        PropertyId::FONT_SIZE => visual.font_size = Some(values::font_size(property)?),
        PropertyId::TEXT_CONTENT if origin == PropertyOrigin::Direct => {
            let index = values::byte(property)?;
            match doc.string(index) {
                Some(text) => content.text = text.to_string(),
                None => warn!(index, "Text content string index out of range"),
            }
        }
        PropertyId::IMAGE_SOURCE if origin == PropertyOrigin::Direct => {
            content.resource = resource_index(values::byte(property)?, doc);
        }
        _ => {}
    }
    Ok(())
}

fn resource_index(index: u8, doc: &Document) -> Option<u8> {
    if index == NO_RESOURCE {
        return None;
    }
    if doc.resource(index).is_none() {
        warn!(index, "Image source resource index out of range");
        return None;
    }
    Some(index)
}

/// Border color without width gets width 1; width without color gets the
/// default border color.
pub fn apply_contextual_defaults(visual: &mut VisualState, defaults: &ResolveDefaults) {
    match (visual.border_color.is_some(), visual.has_border()) {
        (true, false) => visual.border_widths = EdgeInsets::uniform(1),
        (false, true) => visual.border_color = Some(defaults.border_color),
        _ => {}
    }
}

/// Text and image source fall back to the resolved style's declarations.
pub fn apply_content_fallback(
    content: &mut Content,
    element_type: ElementType,
    style: Option<&Style>,
    doc: &Document,
) {
    let Some(style) = style else {
        return;
    };
    let wants_text = matches!(element_type, ElementType::Text | ElementType::Button);
    if wants_text && content.text.is_empty() {
        if let Some(text) = style
            .property(PropertyId::TEXT_CONTENT)
            .and_then(Property::as_u8)
            .and_then(|index| doc.string(index))
        {
            content.text = text.to_string();
        }
    }
    let wants_image = matches!(element_type, ElementType::Image | ElementType::Button);
    if wants_image && content.resource.is_none() {
        if let Some(index) = style.property(PropertyId::IMAGE_SOURCE).and_then(Property::as_u8) {
            content.resource = resource_index(index, doc);
        }
    }
}

/// Run the whole per-node cascade for a node of `element_type` with the
/// given style id and direct properties.
pub fn resolve(
    element_type: ElementType,
    style_id: u8,
    properties: &[Property],
    doc: &Document,
    defaults: &ResolveDefaults,
) -> (VisualState, Content) {
    let mut visual = VisualState::initial(element_type);
    let mut content = Content::default();

    let style = doc.style(style_id);
    match style {
        Some(style) => apply_properties(
            &mut visual,
            &mut content,
            &style.properties,
            doc,
            PropertyOrigin::Style,
        ),
        None if style_id != 0 => warn!(style_id, "Style id not found; using defaults"),
        None => {}
    }

    apply_properties(
        &mut visual,
        &mut content,
        properties,
        doc,
        PropertyOrigin::Direct,
    );
    apply_contextual_defaults(&mut visual, defaults);
    apply_content_fallback(&mut content, element_type, style, doc);

    trace!(
        ?element_type,
        style_id,
        visible = visual.visible,
        text = %content.text,
        "Resolved node visuals"
    );
    (visual, content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kryon_krb::{DocumentBuilder, ElementBuilder, ResourceType};

    fn doc_with_style(properties: Vec<Property>) -> (Document, u8) {
        let mut b = DocumentBuilder::new();
        let id = b.style("base", properties);
        b.element(ElementBuilder::new(ElementType::Container));
        (b.build().unwrap(), id)
    }

    #[test]
    fn test_direct_overrides_style() {
        let (doc, style) = doc_with_style(vec![
            Property::color(PropertyId::BG_COLOR, [255, 0, 0, 255]),
            Property::edge_insets(PropertyId::PADDING, 1, 1, 1, 1),
        ]);
        let direct = vec![Property::color(PropertyId::BG_COLOR, [0, 0, 255, 255])];
        let (visual, _) = resolve(
            ElementType::Container,
            style,
            &direct,
            &doc,
            &ResolveDefaults::default(),
        );
        assert_eq!(visual.background, Color::new(0, 0, 255, 255));
        assert_eq!(visual.padding, EdgeInsets::uniform(1));
    }

    #[test]
    fn test_contextual_border_defaults() {
        let (doc, _) = doc_with_style(vec![]);
        let defaults = ResolveDefaults::default();

        let color_only = vec![Property::color(PropertyId::BORDER_COLOR, [9, 9, 9, 255])];
        let (visual, _) = resolve(ElementType::Container, 0, &color_only, &doc, &defaults);
        assert_eq!(visual.border_widths, EdgeInsets::uniform(1));

        let width_only = vec![Property::byte(PropertyId::BORDER_WIDTH, 3)];
        let (visual, _) = resolve(ElementType::Container, 0, &width_only, &doc, &defaults);
        assert_eq!(visual.border_color, Some(defaults.border_color));
        assert_eq!(visual.border_widths, EdgeInsets::uniform(3));
    }

    #[test]
    fn test_unknown_style_falls_back() {
        let (doc, _) = doc_with_style(vec![]);
        let (visual, content) = resolve(
            ElementType::Button,
            42,
            &[],
            &doc,
            &ResolveDefaults::default(),
        );
        assert_eq!(visual, VisualState::initial(ElementType::Button));
        assert!(visual.interactive);
        assert_eq!(content, Content::default());
    }

    #[test]
    fn test_content_fallback_from_style() {
        let mut b = DocumentBuilder::new();
        let label = b.string("Fallback");
        let icon = b.external_resource(ResourceType::IMAGE, "icon", "icon.png");
        let style = b.style(
            "labelled",
            vec![
                Property::string(PropertyId::TEXT_CONTENT, label),
                Property::resource(PropertyId::IMAGE_SOURCE, icon),
            ],
        );
        b.element(ElementBuilder::new(ElementType::Button));
        let doc = b.build().unwrap();

        let (_, content) = resolve(
            ElementType::Button,
            style,
            &[],
            &doc,
            &ResolveDefaults::default(),
        );
        assert_eq!(content.text, "Fallback");
        assert_eq!(content.resource, Some(icon));

        // Containers carry no content even when their style declares some.
        let (_, content) = resolve(
            ElementType::Container,
            style,
            &[],
            &doc,
            &ResolveDefaults::default(),
        );
        assert!(content.text.is_empty());
        assert_eq!(content.resource, None);
    }

    #[test]
    fn test_transparent_foreground_is_unset() {
        let (doc, _) = doc_with_style(vec![]);
        let direct = vec![Property::color(PropertyId::FG_COLOR, [10, 10, 10, 0])];
        let (visual, _) = resolve(
            ElementType::Text,
            0,
            &direct,
            &doc,
            &ResolveDefaults::default(),
        );
        assert_eq!(visual.foreground, None);
    }

    #[test]
    fn test_out_of_range_resource_dropped() {
        let (doc, _) = doc_with_style(vec![]);
        let direct = vec![Property::resource(PropertyId::IMAGE_SOURCE, 7)];
        let (_, content) = resolve(
            ElementType::Image,
            0,
            &direct,
            &doc,
            &ResolveDefaults::default(),
        );
        assert_eq!(content.resource, None);
    }
}
