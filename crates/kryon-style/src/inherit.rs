//! Inheritance of foreground color, font size and text alignment.

use kryon_krb::ElementType;

use crate::cascade::ResolveDefaults;
use crate::visual::{InheritedFields, TextAlign, VisualState};
use crate::Color;

/// Values a node passes to its children.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InheritedValues {
    pub foreground: Color,
    pub font_size: f32,
    pub text_align: TextAlign,
}

impl InheritedValues {
    /// Values received by a root node.
    pub fn root(defaults: &ResolveDefaults) -> Self {
        Self {
            foreground: defaults.foreground,
            font_size: defaults.font_size,
            text_align: defaults.text_align,
        }
    }

    /// Values received by a node whose ancestors are given nearest first.
    /// Each value comes from the closest ancestor that has it set.
    pub fn from_ancestors<'a, I>(ancestors: I, defaults: &ResolveDefaults) -> Self
    where
        I: IntoIterator<Item = &'a VisualState>,
    {
        let mut foreground = None;
        let mut font_size = None;
        let mut text_align = None;
        for visual in ancestors {
            foreground = foreground.or(visual.foreground);
            font_size = font_size.or(visual.font_size);
            text_align = text_align.or(visual.text_align);
            if foreground.is_some() && font_size.is_some() && text_align.is_some() {
                break;
            }
        }
        Self {
            foreground: foreground.unwrap_or(defaults.foreground),
            font_size: font_size.unwrap_or(defaults.font_size),
            text_align: text_align.unwrap_or(defaults.text_align),
        }
    }

    /// Fill `visual`'s unset (or previously inherited) fields and return the
    /// values its children receive.
    ///
    /// Foreground is only adopted by text-bearing nodes; font size and text
    /// alignment are adopted by every node.
    pub fn apply(&self, visual: &mut VisualState, element_type: ElementType) -> InheritedValues {
        if element_type.is_text_bearing()
            && (visual.foreground.is_none() || visual.inherited.contains(InheritedFields::FOREGROUND))
        {
            visual.foreground = Some(self.foreground);
            visual.inherited.insert(InheritedFields::FOREGROUND);
        }
        if visual.font_size.is_none() || visual.inherited.contains(InheritedFields::FONT_SIZE) {
            visual.font_size = Some(self.font_size);
            visual.inherited.insert(InheritedFields::FONT_SIZE);
        }
        if visual.text_align.is_none() || visual.inherited.contains(InheritedFields::TEXT_ALIGN) {
            visual.text_align = Some(self.text_align);
            visual.inherited.insert(InheritedFields::TEXT_ALIGN);
        }

        InheritedValues {
            foreground: visual.foreground.unwrap_or(self.foreground),
            font_size: visual.font_size.unwrap_or(self.font_size),
            text_align: visual.text_align.unwrap_or(self.text_align),
        }
    }
}
