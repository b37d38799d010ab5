//! # Kryon DOM
//!
//! Render node tree for the Kryon render core.
//!
//! ## Design Goals
//!
//! 1. **Arena storage**: Nodes live in one append-only vector and refer to
//!    each other by [`NodeId`]; growth never invalidates a reference
//! 2. **Component expansion**: Placeholders are replaced by their template
//!    subtree, with nested components and child-slot insertion
//! 3. **Structural invariants**: One parent per node, no cycles, no shared
//!    children; violations are rejected at link time
//! 4. **Recoverable degradation**: Bad references become [`Diagnostic`]s and
//!    the tree keeps building

pub mod builder;
pub mod cascade;
pub mod diagnostics;
pub mod expand;
pub mod geometry;
pub mod node;
pub mod tree;

pub use builder::{build_tree, NoStyleSelector, StyleSelector};
pub use cascade::{propagate_inheritance, re_resolve, resolve_tree};
pub use diagnostics::Diagnostic;
pub use expand::MAX_EXPANSION_DEPTH;
pub use geometry::Rect;
pub use node::{EventBinding, ExplicitSize, NodeSource, RenderNode, TextureSize};
pub use tree::RenderTree;

use thiserror::Error;

/// Errors that can occur in tree operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    #[error("Node {child:?} already has parent {parent:?}")]
    AlreadyParented { child: NodeId, parent: NodeId },

    #[error("Linking {child:?} under {parent:?} would create a cycle")]
    Cycle { parent: NodeId, child: NodeId },
}

/// Stable identity of a node: its position in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}
