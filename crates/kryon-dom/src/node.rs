//! Render nodes.

use kryon_krb::{CustomProperty, ElementHeader, EventType, Property, PropertyId};
use kryon_style::{Content, VisualState};
use smallvec::SmallVec;

use crate::geometry::Rect;
use crate::NodeId;

/// Where a node was declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeSource {
    /// Element `index` of the document's element section.
    Document { index: usize },
    /// Record `record` of the named component's template.
    Template { component: String, record: usize },
}

/// An event binding with its handler name resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventBinding {
    pub event_type: EventType,
    pub handler: String,
}

/// Native pixel size of a loaded texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureSize {
    pub width: u32,
    pub height: u32,
}

/// Which dimensions the last layout pass found explicitly declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExplicitSize {
    pub width: bool,
    pub height: bool,
}

/// A node of the render tree.
#[derive(Debug, Clone)]
pub struct RenderNode {
    pub header: ElementHeader,
    pub source: NodeSource,
    /// Display name used in logs.
    pub name: String,
    /// Resolved element id string.
    pub element_id: Option<String>,
    /// Component this node is a placeholder for.
    pub component: Option<String>,
    /// Set once a placeholder's template has been instantiated.
    pub expanded: bool,
    pub properties: Vec<Property>,
    pub custom_properties: Vec<CustomProperty>,
    pub events: Vec<EventBinding>,
    pub visual: VisualState,
    pub content: Content,
    pub texture: Option<TextureSize>,
    /// Computed geometry in device pixels.
    pub rect: Rect,
    pub explicit: ExplicitSize,
    pub parent: Option<NodeId>,
    pub children: SmallVec<[NodeId; 4]>,
}

impl RenderNode {
    pub fn new(header: ElementHeader, source: NodeSource) -> Self {
        Self {
            header,
            source,
            name: String::new(),
            element_id: None,
            component: None,
            expanded: false,
            properties: Vec::new(),
            custom_properties: Vec::new(),
            events: Vec::new(),
            visual: VisualState::initial(header.element_type),
            content: Content::default(),
            texture: None,
            rect: Rect::zero(),
            explicit: ExplicitSize::default(),
            parent: None,
            children: SmallVec::new(),
        }
    }

    /// Last direct property with the given id.
    pub fn property(&self, id: PropertyId) -> Option<&Property> {
        self.properties.iter().rev().find(|p| p.id == id)
    }

    pub fn is_placeholder(&self) -> bool {
        self.component.is_some()
    }

    /// Handler names bound to `event_type`, in declaration order.
    pub fn handlers(&self, event_type: EventType) -> impl Iterator<Item = &str> {
        self.events
            .iter()
            .filter(move |binding| binding.event_type == event_type)
            .map(|binding| binding.handler.as_str())
    }
}
