//! # Kryon Engine
//!
//! Ties the Kryon render core together behind one context object.
//!
//! ## Design Goals
//!
//! 1. **One owner**: [`RenderContext`] owns the document, the render tree,
//!    the window configuration and the component registry; no globals
//! 2. **Ordered passes**: Build, expand, resolve and inherit once; load
//!    textures once; lay out every frame; re-resolve on demand
//! 3. **Component behaviors**: Named components can pick their style, adjust
//!    their geometry, paint themselves and consume events
//! 4. **Backend agnostic**: Drawing is described as a [`DisplayList`];
//!    images and text metrics come through host-provided traits

pub mod components;
pub mod config;
pub mod context;
pub mod paint;
pub mod resources;

pub use components::{
    AdjustContext, ComponentBehavior, ComponentRegistry, DockPosition, Orientation, PaintMode, TabBar,
};
pub use config::WindowConfig;
pub use context::RenderContext;
pub use paint::{clamp_opposing_borders, DisplayCommand, DisplayList, Painter};
pub use resources::{ImageLoadError, ImageLoader, ImageSource, TextureCache};

use kryon_dom::{DomError, NodeId};
use kryon_krb::KrbError;
use kryon_layout::LayoutError;
use thiserror::Error;

/// Errors that can occur in the engine.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Document error: {0}")]
    Document(#[from] KrbError),

    #[error("Tree error: {0}")]
    Tree(#[from] DomError),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    #[error("Component '{component}' failed: {reason}")]
    Behavior { component: String, reason: String },
}
