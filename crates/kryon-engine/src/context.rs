//! The render context: owner of the document, tree and configuration.

use std::path::{Path, PathBuf};

use kryon_dom::{
    build_tree, propagate_inheritance, re_resolve, resolve_tree, Diagnostic, NodeId, Rect,
    RenderTree,
};
use kryon_krb::{Document, EventType};
use kryon_layout::{content_box, LayoutEngine, SimpleTextMeasurer, TextMeasurer};
use tracing::{debug, info, warn};

use crate::components::{AdjustContext, ComponentRegistry};
use crate::config::WindowConfig;
use crate::paint::{DisplayList, Painter};
use crate::resources::{self, ImageLoader, TextureCache};
use crate::EngineError;

/// A prepared document ready for layout and painting.
pub struct RenderContext {
    doc: Document,
    tree: RenderTree,
    config: WindowConfig,
    registry: ComponentRegistry,
    measurer: Box<dyn TextMeasurer>,
    textures: TextureCache,
    base_dir: PathBuf,
}

impl RenderContext {
    /// Build, expand, resolve and inherit. Recoverable problems end up in
    /// [`RenderContext::diagnostics`].
    pub fn new(doc: Document, registry: ComponentRegistry) -> Self {
        let config = WindowConfig::from_document(&doc);
        let defaults = config.resolve_defaults();

        let mut tree = build_tree(&doc, &registry);
        resolve_tree(&mut tree, &doc, &defaults);
        propagate_inheritance(&mut tree, &defaults);

        for diagnostic in tree.diagnostics() {
            warn!(%diagnostic, "Render tree diagnostic");
        }
        info!(
            nodes = tree.len(),
            roots = tree.roots().len(),
            diagnostics = tree.diagnostics().len(),
            title = %config.title,
            "Render context prepared"
        );

        Self {
            doc,
            tree,
            config,
            registry,
            measurer: Box::new(SimpleTextMeasurer),
            textures: TextureCache::new(),
            base_dir: PathBuf::from("."),
        }
    }

    /// Parse `bytes` and prepare them with the built-in behaviors.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EngineError> {
        let doc = Document::parse(bytes)?;
        Ok(Self::new(doc, ComponentRegistry::with_builtins()))
    }

    /// Use the backend's text metrics instead of the approximation.
    pub fn with_measurer(mut self, measurer: Box<dyn TextMeasurer>) -> Self {
        self.measurer = measurer;
        self
    }

    /// Directory external resource paths are relative to.
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn tree(&self) -> &RenderTree {
        &self.tree
    }

    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.tree.diagnostics()
    }

    /// Effective scale factor.
    pub fn scale(&self) -> f32 {
        self.config.scale()
    }

    /// Load textures for image-bearing nodes. Returns how many nodes got
    /// one.
    pub fn load_textures(&mut self, loader: &dyn ImageLoader) -> usize {
        resources::load_textures(
            &mut self.tree,
            &self.doc,
            &self.base_dir,
            loader,
            &mut self.textures,
        )
    }

    /// Lay out against the configured window size.
    pub fn relayout(&mut self) {
        let viewport = Rect::new(
            0.0,
            0.0,
            self.config.width as f32,
            self.config.height as f32,
        );
        self.layout_viewport(viewport);
    }

    /// Record a new window size and lay out again. Ignored for
    /// non-resizable windows; returns whether the size changed.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if !self.config.resizable {
            debug!(width, height, "Ignoring resize of fixed-size window");
            return false;
        }
        if (width, height) == (self.config.width, self.config.height) {
            return false;
        }
        self.config.width = width;
        self.config.height = height;
        self.relayout();
        true
    }

    /// Generic layout pass, then component adjustments in tree order.
    pub fn layout_viewport(&mut self, viewport: Rect) {
        let layout_config = self.config.layout_config();
        let engine = LayoutEngine::new(&self.doc, &layout_config, self.measurer.as_ref());
        engine.layout_roots(&mut self.tree, viewport);

        let instances: Vec<NodeId> = self
            .tree
            .iter()
            .filter(|(_, node)| self.registry.behavior_for(node).is_some())
            .map(|(id, _)| id)
            .collect();
        let ctx = AdjustContext {
            doc: &self.doc,
            layout: &engine,
            scale: layout_config.scale,
        };
        for id in instances {
            let Some(behavior) = self.registry.behavior_for(&self.tree[id]) else {
                continue;
            };
            if let Err(err) = behavior.adjust_layout(&mut self.tree, id, &ctx) {
                warn!(node = %self.tree[id].name, error = %err, "Component layout adjustment failed");
            }
        }
    }

    /// Lay out the children of `node` inside `content`.
    pub fn layout_children_of(&mut self, node: NodeId, content: Rect) -> Result<(), EngineError> {
        let layout_config = self.config.layout_config();
        let engine = LayoutEngine::new(&self.doc, &layout_config, self.measurer.as_ref());
        engine.layout_children(&mut self.tree, node, content)?;
        Ok(())
    }

    /// Content box of `node` at the current scale.
    pub fn content_box_of(&self, node: NodeId) -> Option<Rect> {
        let node = self.tree.node(node)?;
        Some(content_box(&node.visual, node.rect, self.scale()))
    }

    /// Re-run style resolution for `node` and re-propagate inheritance
    /// below it.
    pub fn re_resolve_visuals(&mut self, node: NodeId) -> Result<(), EngineError> {
        let defaults = self.config.resolve_defaults();
        re_resolve(&mut self.tree, &self.doc, node, &defaults)?;
        Ok(())
    }

    /// Switch `node` to `style_id` and re-resolve it if the id changed.
    pub fn set_style(&mut self, node: NodeId, style_id: u8) -> Result<(), EngineError> {
        let current = self
            .tree
            .node_mut(node)
            .ok_or(EngineError::NodeNotFound(node))?;
        if current.header.style_id == style_id {
            return Ok(());
        }
        current.header.style_id = style_id;
        self.re_resolve_visuals(node)
    }

    /// Show or hide `node` and its subtree.
    pub fn set_visible(&mut self, node: NodeId, visible: bool) -> Result<(), EngineError> {
        let node = self
            .tree
            .node_mut(node)
            .ok_or(EngineError::NodeNotFound(node))?;
        node.visual.visible = visible;
        Ok(())
    }

    /// First node, in arena order, whose element id is `element_id`.
    pub fn find_by_id(&self, element_id: &str) -> Option<NodeId> {
        self.tree.find_by_element_id(element_id)
    }

    /// Offer `event` to the node's component behavior. When it is not
    /// consumed, return the handler names the host should invoke.
    pub fn dispatch_event(
        &mut self,
        node: NodeId,
        event: EventType,
    ) -> Result<Vec<String>, EngineError> {
        let target = self.tree.node(node).ok_or(EngineError::NodeNotFound(node))?;
        if let Some(behavior) = self.registry.behavior_for(target) {
            if behavior.handle_event(&mut self.tree, node, event, &self.doc) {
                debug!(node = %self.tree[node].name, ?event, "Event consumed by component");
                return Ok(Vec::new());
            }
        }
        let handlers = self.tree[node]
            .handlers(event)
            .map(str::to_string)
            .collect();
        Ok(handlers)
    }

    /// Paint the laid-out tree.
    pub fn display_list(&self) -> DisplayList {
        Painter::new(
            &self.tree,
            &self.doc,
            &self.registry,
            self.measurer.as_ref(),
            &self.config,
        )
        .paint()
    }
}

impl std::fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderContext")
            .field("nodes", &self.tree.len())
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("base_dir", &self.base_dir)
            .finish()
    }
}
