//! Recoverable problems found while building and resolving the tree.

use kryon_krb::KrbError;
use thiserror::Error;

use crate::{DomError, NodeId};

/// A recoverable problem. The affected node falls back to defaults and the
/// pass continues.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Diagnostic {
    #[error("{parent:?}: child offset {offset:#x} does not start an element")]
    UnresolvedChild { parent: NodeId, offset: u32 },

    #[error("link rejected: {0}")]
    RejectedLink(DomError),

    #[error("{node:?}: style id {style_id} not found")]
    UnresolvedStyle { node: NodeId, style_id: u8 },

    #[error("{node:?}: string index {index} out of range")]
    UnresolvedString { node: NodeId, index: u8 },

    #[error("{node:?}: component '{name}' is not defined")]
    UnknownComponent { node: NodeId, name: String },

    #[error("{node:?}: template of '{component}' failed to decode: {error}")]
    TemplateDecode {
        node: NodeId,
        component: String,
        error: KrbError,
    },

    #[error("{node:?}: component '{component}' has an empty template")]
    EmptyTemplate { node: NodeId, component: String },

    #[error("{node:?}: expansion of '{component}' exceeds the nesting limit")]
    ExpansionDepth { node: NodeId, component: String },

    #[error("{node:?}: {count} children declared on nested '{component}' were not linked")]
    NestedChildrenIgnored {
        node: NodeId,
        component: String,
        count: usize,
    },

    #[error("{instance:?}: '{component}' has no slot; {} children left unparented", .orphaned.len())]
    MissingSlot {
        instance: NodeId,
        component: String,
        orphaned: Vec<NodeId>,
    },

    #[error("resource {resource}: {reason}")]
    TextureLoad { resource: u8, reason: String },
}
