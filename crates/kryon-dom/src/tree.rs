//! The node arena and its structural operations.

use std::collections::{HashSet, VecDeque};
use std::ops::{Index, IndexMut};

use tracing::warn;

use crate::diagnostics::Diagnostic;
use crate::node::RenderNode;
use crate::{DomError, NodeId};

/// Append-only arena of render nodes plus root and diagnostic bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct RenderTree {
    nodes: Vec<RenderNode>,
    roots: Vec<NodeId>,
    orphans: Vec<NodeId>,
    diagnostics: Vec<Diagnostic>,
}

impl RenderTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append a node and return its id.
    pub fn push(&mut self, node: RenderNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn node(&self, id: NodeId) -> Option<&RenderNode> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut RenderNode> {
        self.nodes.get_mut(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &RenderNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Root nodes in arena order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Nodes left without a parent because no slot accepted them.
    pub fn orphans(&self) -> &[NodeId] {
        &self.orphans
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Log and keep a recoverable problem.
    pub fn record(&mut self, diagnostic: Diagnostic) {
        warn!(%diagnostic, "Render tree diagnostic");
        self.diagnostics.push(diagnostic);
    }

    pub(crate) fn mark_orphans(&mut self, ids: &[NodeId]) {
        self.orphans.extend_from_slice(ids);
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |current| self.parent(*current))
    }

    /// `id` and all its descendants in pre-order.
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if self.node(current).is_none() {
                continue;
            }
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    /// Link `child` as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let parent_node = self.node(parent).ok_or(DomError::NodeNotFound(parent))?;
        let child_node = self.node(child).ok_or(DomError::NodeNotFound(child))?;
        if let Some(existing) = child_node.parent {
            return Err(DomError::AlreadyParented {
                child,
                parent: existing,
            });
        }
        if parent == child || self.ancestors(parent).any(|a| a == child) {
            return Err(DomError::Cycle { parent, child });
        }
        debug_assert!(!parent_node.children.contains(&child));

        self[child].parent = Some(parent);
        self[parent].children.push(child);
        Ok(())
    }

    /// Link, recording a diagnostic instead of failing.
    pub fn link_or_record(&mut self, parent: NodeId, child: NodeId) -> bool {
        match self.append_child(parent, child) {
            Ok(()) => true,
            Err(err) => {
                self.record(Diagnostic::RejectedLink(err));
                false
            }
        }
    }

    /// First node in breadth-first order under `start` (inclusive) matching
    /// `predicate`.
    pub fn find_breadth_first<F>(&self, start: NodeId, predicate: F) -> Option<NodeId>
    where
        F: Fn(&RenderNode) -> bool,
    {
        let mut queue = VecDeque::from([start]);
        let mut seen = HashSet::new();
        while let Some(current) = queue.pop_front() {
            if !seen.insert(current) {
                continue;
            }
            let node = self.node(current)?;
            if predicate(node) {
                return Some(current);
            }
            queue.extend(node.children.iter().copied());
        }
        None
    }

    /// First node, in arena order, whose element id equals `element_id`.
    pub fn find_by_element_id(&self, element_id: &str) -> Option<NodeId> {
        self.iter()
            .find(|(_, n)| n.element_id.as_deref() == Some(element_id))
            .map(|(id, _)| id)
    }

    /// Recompute roots: every parentless node that is not an orphan.
    pub fn finalize_roots(&mut self) {
        let orphans: HashSet<NodeId> = self.orphans.iter().copied().collect();
        self.roots = self
            .iter()
            .filter(|(id, n)| n.parent.is_none() && !orphans.contains(id))
            .map(|(id, _)| id)
            .collect();
    }
}

impl Index<NodeId> for RenderTree {
    type Output = RenderNode;

    fn index(&self, id: NodeId) -> &RenderNode {
        &self.nodes[id.0]
    }
}

impl IndexMut<NodeId> for RenderTree {
    fn index_mut(&mut self, id: NodeId) -> &mut RenderNode {
        &mut self.nodes[id.0]
    }
}
