//! The sizing and placement pass.

use kryon_krb::{CrossAlignment, Document, ElementType, Property, PropertyId};
use kryon_dom::{ExplicitSize, NodeId, Rect, RenderNode, RenderTree};
use kryon_style::values;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::flex::{cross_offset, grow_share, main_offsets, Axis};
use crate::text::TextMeasurer;
use crate::{content_box, EdgeSizes, LayoutConfig, LayoutError};

/// Lays out a resolved render tree in device pixels.
pub struct LayoutEngine<'a> {
    doc: &'a Document,
    config: &'a LayoutConfig,
    measurer: &'a dyn TextMeasurer,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(doc: &'a Document, config: &'a LayoutConfig, measurer: &'a dyn TextMeasurer) -> Self {
        Self {
            doc,
            config,
            measurer,
        }
    }

    /// Lay out every root against the viewport.
    pub fn layout_roots(&self, tree: &mut RenderTree, viewport: Rect) {
        let roots: Vec<NodeId> = tree.roots().to_vec();
        for &root in &roots {
            self.place(tree, root, viewport);
        }
        debug!(
            roots = roots.len(),
            width = viewport.width,
            height = viewport.height,
            scale = self.config.scale,
            "Laid out render tree"
        );
    }

    /// Size and position `id` inside the parent content box `content`, then
    /// lay out its subtree.
    pub fn layout_node(
        &self,
        tree: &mut RenderTree,
        id: NodeId,
        content: Rect,
    ) -> Result<(), LayoutError> {
        tree.node(id).ok_or(LayoutError::NodeNotFound(id))?;
        self.place(tree, id, content);
        Ok(())
    }

    /// Lay out the children of `id` inside `content`, leaving `id` itself
    /// untouched.
    pub fn layout_children(
        &self,
        tree: &mut RenderTree,
        id: NodeId,
        content: Rect,
    ) -> Result<(), LayoutError> {
        tree.node(id).ok_or(LayoutError::NodeNotFound(id))?;
        self.flow(tree, id, content);
        Ok(())
    }

    fn scale(&self) -> f32 {
        self.config.scale
    }

    fn place(&self, tree: &mut RenderTree, id: NodeId, content: Rect) {
        let scale = self.scale();
        let node = &tree[id];
        let header = node.header;
        let is_root = node.parent.is_none();
        let grow = header.layout.grow();
        let absolute = header.layout.absolute();
        let frame = EdgeSizes::frame(&node.visual, scale);

        let declared_width = match header.width {
            0 => self.declared_extent(node, PropertyId::MAX_WIDTH, content.width),
            w => Some(f32::from(w) * scale),
        };
        let declared_height = match header.height {
            0 => self.declared_extent(node, PropertyId::MAX_HEIGHT, content.height),
            h => Some(f32::from(h) * scale),
        };
        let explicit = ExplicitSize {
            width: declared_width.is_some(),
            height: declared_height.is_some(),
        };

        let intrinsic = if grow || absolute {
            None
        } else {
            self.intrinsic_size(node, &frame, content)
        };
        let mut width = declared_width
            .or(intrinsic.map(|(w, _)| w))
            .unwrap_or(0.0);
        let mut height = declared_height
            .or(intrinsic.map(|(_, h)| h))
            .unwrap_or(0.0);
        if is_root {
            if !explicit.width {
                width = width.max(content.width);
            }
            if !explicit.height {
                height = height.max(content.height);
            }
        }

        let offset_x = f32::from(header.pos_x) * scale;
        let offset_y = f32::from(header.pos_y) * scale;
        let (x, y) = match (absolute, node.parent) {
            (true, Some(parent)) => (tree[parent].rect.x + offset_x, tree[parent].rect.y + offset_y),
            (true, None) => (content.x + offset_x, content.y + offset_y),
            (false, _) => (content.x, content.y),
        };

        let node = &mut tree[id];
        node.rect = Rect::new(x, y, width.max(0.0), height.max(0.0));
        node.explicit = explicit;

        if !tree.children(id).is_empty() {
            let inner = frame.shrink(tree[id].rect);
            self.flow(tree, id, inner);
            if !is_root && !explicit.height && !grow {
                self.hug(tree, id, inner, &frame);
            }
        }

        self.apply_min_constraints(tree, id, content);
        self.apply_visible_fallback(tree, id);

        let node = &tree[id];
        trace!(
            node = %node.name,
            x = node.rect.x,
            y = node.rect.y,
            width = node.rect.width,
            height = node.rect.height,
            explicit_width = explicit.width,
            explicit_height = explicit.height,
            "Placed node"
        );
    }

    /// Direct sized property, then the same property on the node's style.
    /// Percentages resolve against `parent_extent`; zero counts as unset.
    fn declared_extent(&self, node: &RenderNode, id: PropertyId, parent_extent: f32) -> Option<f32> {
        let scale = self.scale();
        let resolve = |property: &Property| {
            values::length(property)
                .ok()
                .map(|length| length.resolve(parent_extent, scale))
                .filter(|extent| *extent > 0.0)
        };
        node.property(id).and_then(resolve).or_else(|| {
            self.doc
                .style(node.header.style_id)
                .and_then(|style| style.property(id))
                .and_then(resolve)
        })
    }

    /// Content-driven size for nodes without a declared one.
    fn intrinsic_size(&self, node: &RenderNode, frame: &EdgeSizes, content: Rect) -> Option<(f32, f32)> {
        let scale = self.scale();
        let element_type = node.header.element_type;
        let has_text = matches!(element_type, ElementType::Text | ElementType::Button)
            && !node.content.text.is_empty();
        if has_text {
            let font_size = (self.font_size(node) * scale).max(1.0);
            let metrics = self.measurer.measure(&node.content.text, font_size);
            return Some((
                metrics.width + frame.horizontal(),
                font_size + frame.vertical(),
            ));
        }
        if matches!(element_type, ElementType::Image | ElementType::Button) {
            if let Some(texture) = node.texture {
                return Some((
                    texture.width as f32 * scale + frame.horizontal(),
                    texture.height as f32 * scale + frame.vertical(),
                ));
            }
        }
        if matches!(element_type, ElementType::App | ElementType::Container) {
            return Some((content.width, content.height));
        }
        None
    }

    fn font_size(&self, node: &RenderNode) -> f32 {
        node.visual
            .font_size
            .unwrap_or(self.config.default_font_size)
    }

    /// Gap between flow children: the style's, overridden by a direct one.
    fn gap(&self, node: &RenderNode) -> f32 {
        let direct = node
            .property(PropertyId::GAP)
            .and_then(|p| values::short(p).ok());
        let styled = || {
            self.doc
                .style(node.header.style_id)
                .and_then(|style| style.property(PropertyId::GAP))
                .and_then(|p| values::short(p).ok())
        };
        direct
            .or_else(styled)
            .map(|gap| f32::from(gap) * self.scale())
            .unwrap_or(0.0)
    }

    fn flow(&self, tree: &mut RenderTree, id: NodeId, content: Rect) {
        let children: SmallVec<[NodeId; 8]> = tree.children(id).iter().copied().collect();
        if children.is_empty() {
            return;
        }
        let (flow, absolute): (SmallVec<[NodeId; 8]>, SmallVec<[NodeId; 8]>) = children
            .into_iter()
            .partition(|child| !tree[*child].header.layout.absolute());

        if !flow.is_empty() {
            self.distribute(tree, id, &flow, content);
        }

        let frame_rect = tree[id].rect;
        for child in absolute {
            self.place(tree, child, frame_rect);
        }
    }

    fn distribute(&self, tree: &mut RenderTree, id: NodeId, flow: &[NodeId], content: Rect) {
        let scale = self.scale();
        let parent = &tree[id];
        let layout = parent.header.layout;
        let direction = layout.direction();
        let main = Axis::of(direction);
        let cross = main.cross();
        let gap = self.gap(parent);
        let total_gap = gap * flow.len().saturating_sub(1) as f32;
        let main_space = main.extent(&content);
        let cross_space = cross.extent(&content);

        for &child in flow {
            self.place(tree, child, content);
        }

        let fixed: f32 = flow
            .iter()
            .filter(|c| !tree[**c].header.layout.grow())
            .map(|c| main.extent(&tree[*c].rect))
            .sum();
        let growing = flow
            .iter()
            .filter(|c| tree[**c].header.layout.grow())
            .count();
        let share = grow_share(main_space, total_gap, fixed, growing);

        let stretch = layout.cross_alignment() == CrossAlignment::Stretch;
        let mut used = total_gap;
        for &child in flow {
            let node = &mut tree[child];
            if node.header.layout.grow() && share > 0.0 {
                main.set_extent(&mut node.rect, share);
            }
            let explicit_cross = match cross {
                Axis::Horizontal => node.explicit.width,
                Axis::Vertical => node.explicit.height,
            };
            if stretch && !explicit_cross && cross.extent(&node.rect) < cross_space {
                cross.set_extent(&mut node.rect, cross_space);
            }
            used += main.extent(&node.rect);
        }

        let (start, spacing) = main_offsets(
            layout.alignment(),
            direction.is_reversed(),
            main_space,
            used,
            flow.len(),
            gap,
        );
        trace!(
            parent = %tree[id].name,
            ?direction,
            gap,
            fixed,
            growing,
            share,
            start,
            spacing,
            "Distributed flow children"
        );

        let order: SmallVec<[NodeId; 8]> = if direction.is_reversed() {
            flow.iter().rev().copied().collect()
        } else {
            flow.iter().copied().collect()
        };
        let mut position = start;
        for (i, &child) in order.iter().enumerate() {
            let node = &mut tree[child];
            let main_size = main.extent(&node.rect);
            let offset = cross_offset(layout.cross_alignment(), cross_space, cross.extent(&node.rect));
            let (x, y) = match main {
                Axis::Horizontal => (content.x + position, content.y + offset),
                Axis::Vertical => (content.x + offset, content.y + position),
            };
            node.rect.x = x + f32::from(node.header.pos_x) * scale;
            node.rect.y = y + f32::from(node.header.pos_y) * scale;

            if !node.children.is_empty() {
                let inner = content_box(&node.visual, node.rect, scale);
                self.flow(tree, child, inner);
            }

            position += main_size;
            if i + 1 < order.len() {
                position += spacing;
            }
        }
    }

    /// Fit a container's height to its flow children.
    fn hug(&self, tree: &mut RenderTree, id: NodeId, inner: Rect, frame: &EdgeSizes) {
        let node = &tree[id];
        let flow: SmallVec<[NodeId; 8]> = node
            .children
            .iter()
            .copied()
            .filter(|c| !tree[*c].header.layout.absolute())
            .collect();
        if flow.is_empty() {
            return;
        }
        let extent = if Axis::of(node.header.layout.direction()) == Axis::Vertical {
            let gaps = self.gap(node) * (flow.len() - 1) as f32;
            flow.iter().map(|c| tree[*c].rect.height).sum::<f32>() + gaps
        } else {
            flow.iter()
                .map(|c| tree[*c].rect.bottom() - inner.y)
                .fold(0.0, f32::max)
        };
        if extent <= 0.0 {
            return;
        }

        let hugged = extent + frame.vertical();
        let current = node.rect.height;
        let shrinks = matches!(
            node.header.element_type,
            ElementType::Container | ElementType::App
        );
        if current == 0.0 || hugged > current || (current > hugged && shrinks) {
            trace!(node = %node.name, from = current, to = hugged, "Hugged content");
            tree[id].rect.height = hugged;
        }
    }

    fn apply_min_constraints(&self, tree: &mut RenderTree, id: NodeId, content: Rect) {
        let node = &tree[id];
        let min_width = self.declared_extent(node, PropertyId::MIN_WIDTH, content.width);
        let min_height = self.declared_extent(node, PropertyId::MIN_HEIGHT, content.height);
        let rect = &mut tree[id].rect;
        if let Some(min) = min_width {
            rect.width = rect.width.max(min);
        }
        if let Some(min) = min_height {
            rect.height = rect.height.max(min);
        }
    }

    /// A visible node that collapsed on exactly one axis gets a minimum
    /// extent on that axis.
    fn apply_visible_fallback(&self, tree: &mut RenderTree, id: NodeId) {
        let node = &tree[id];
        let element_type = node.header.element_type;
        let meaningful = matches!(element_type, ElementType::Container | ElementType::App)
            || !node.visual.background.is_transparent()
            || node.visual.has_border()
            || (matches!(element_type, ElementType::Text | ElementType::Button)
                && !node.content.text.is_empty());
        if !meaningful {
            return;
        }
        let min = self.config.min_visible_extent();
        let rect = &mut tree[id].rect;
        if rect.width > 0.0 && rect.height == 0.0 {
            rect.height = min;
        } else if rect.height > 0.0 && rect.width == 0.0 {
            rect.width = min;
        }
    }
}
