//! Component behaviors.
//!
//! A behavior attaches to every node declared as an instance of a named
//! component. Behaviors are looked up by component name in a
//! [`ComponentRegistry`]; every hook has a no-op default.

mod tab_bar;

pub use tab_bar::{DockPosition, Orientation, TabBar};

use std::collections::HashMap;

use kryon_dom::{NodeId, RenderNode, RenderTree, StyleSelector};
use kryon_krb::{Document, EventType};
use kryon_layout::LayoutEngine;
use tracing::{debug, trace};

use crate::paint::{DisplayList, Painter};
use crate::EngineError;

/// Whether a behavior's paint hook replaced the node's standard commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintMode {
    Standard,
    Replaced,
}

/// What a behavior sees during the post-layout adjustment pass.
pub struct AdjustContext<'a> {
    pub doc: &'a Document,
    pub layout: &'a LayoutEngine<'a>,
    pub scale: f32,
}

/// Hooks a named component can implement.
pub trait ComponentBehavior {
    /// Style for the template root of an instance, chosen at expansion.
    fn instance_style(&self, _instance: &RenderNode, _doc: &Document) -> Option<u8> {
        None
    }

    /// Adjust the instance's geometry after the generic layout pass.
    fn adjust_layout(
        &self,
        _tree: &mut RenderTree,
        _node: NodeId,
        _ctx: &AdjustContext<'_>,
    ) -> Result<(), EngineError> {
        Ok(())
    }

    /// Emit custom commands for the instance.
    fn paint(&self, _painter: &Painter<'_>, _node: NodeId, _list: &mut DisplayList) -> PaintMode {
        PaintMode::Standard
    }

    /// Handle an event on the instance. Returns true when consumed.
    fn handle_event(
        &self,
        _tree: &mut RenderTree,
        _node: NodeId,
        _event: EventType,
        _doc: &Document,
    ) -> bool {
        false
    }
}

/// Behaviors keyed by component name.
#[derive(Default)]
pub struct ComponentRegistry {
    behaviors: HashMap<String, Box<dyn ComponentBehavior>>,
}

impl ComponentRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in behaviors.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("TabBar", TabBar);
        registry
    }

    /// Register `behavior` for `name`, replacing any previous one.
    pub fn register(&mut self, name: &str, behavior: impl ComponentBehavior + 'static) {
        if self
            .behaviors
            .insert(name.to_string(), Box::new(behavior))
            .is_some()
        {
            debug!(component = name, "Replaced component behavior");
        }
    }

    pub fn get(&self, name: &str) -> Option<&dyn ComponentBehavior> {
        self.behaviors.get(name).map(|b| b.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.behaviors.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.behaviors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.behaviors.is_empty()
    }

    /// Behavior attached to `node`, if it is a component instance.
    pub fn behavior_for(&self, node: &RenderNode) -> Option<&dyn ComponentBehavior> {
        node.component.as_deref().and_then(|name| self.get(name))
    }
}

impl std::fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.behaviors.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("ComponentRegistry")
            .field("behaviors", &names)
            .finish()
    }
}

impl StyleSelector for ComponentRegistry {
    fn instance_style(&self, component: &str, instance: &RenderNode, doc: &Document) -> Option<u8> {
        let style = self.get(component)?.instance_style(instance, doc);
        trace!(component, ?style, "Behavior style selection");
        style
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kryon_dom::NodeSource;
    use kryon_krb::{DocumentBuilder, ElementBuilder, ElementHeader, ElementType};

    struct Fixed(u8);

    impl ComponentBehavior for Fixed {
        fn instance_style(&self, _: &RenderNode, _: &Document) -> Option<u8> {
            Some(self.0)
        }
    }

    #[test]
    fn test_registry_lookup_and_replace() {
        let mut registry = ComponentRegistry::with_builtins();
        assert!(registry.contains("TabBar"));
        registry.register("Card", Fixed(1));
        registry.register("Card", Fixed(2));
        assert_eq!(registry.len(), 2);

        let mut b = DocumentBuilder::new();
        b.element(ElementBuilder::new(ElementType::App));
        let doc = b.build().unwrap();
        let node = RenderNode::new(
            ElementHeader::new(ElementType::Container),
            NodeSource::Document { index: 0 },
        );
        assert_eq!(registry.instance_style("Card", &node, &doc), Some(2));
        assert_eq!(registry.instance_style("Missing", &node, &doc), None);
        assert!(registry.behavior_for(&node).is_none());
    }
}
