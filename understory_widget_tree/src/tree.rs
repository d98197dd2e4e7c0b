// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: structure, z-order, queries.

use alloc::vec::Vec;
use kurbo::{Point, Rect, Vec2};
use smallvec::SmallVec;

use crate::types::{WidgetFlags, WidgetId, WidgetProps};

/// Arena of widget records.
///
/// Each widget owns its [`WidgetProps`] and an ordered list of children. The tree
/// never owns behavior; callers key their own side tables by [`WidgetId`].
///
/// ## Example
///
/// ```rust
/// use understory_widget_tree::{Tree, WidgetProps};
///
/// let mut tree = Tree::new();
/// let root = tree.insert(None, WidgetProps::new("Root"));
/// let a = tree.insert(Some(root), WidgetProps::new("Frame"));
/// let b = tree.insert(Some(root), WidgetProps::new("Frame"));
///
/// // The last inserted child is topmost; raising `a` reorders the siblings.
/// assert!(tree.is_top_of_z_order(b));
/// assert!(tree.move_to_front(a));
/// assert_eq!(tree.children_of(root), &[b, a]);
/// ```
pub struct Tree {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
}

impl core::fmt::Debug for Tree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Tree")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .finish_non_exhaustive()
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<WidgetId>,
    children: Vec<WidgetId>,
    props: WidgetProps,
}

type Chain = SmallVec<[WidgetId; 16]>;

impl Tree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Insert a new widget as the topmost child of `parent` (or detached if `None`).
    ///
    /// A stale `parent` yields a detached widget.
    pub fn insert(&mut self, parent: Option<WidgetId>, props: WidgetProps) -> WidgetId {
        let node = |generation| Node {
            generation,
            parent: None,
            children: Vec::new(),
            props,
        };
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(node(generation));
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(node(generation)));
            self.generations.push(generation);
            (self.nodes.len() - 1, generation)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "WidgetId uses 32-bit indices by design."
        )]
        let id = WidgetId::new(idx as u32, generation);
        if let Some(p) = parent
            && self.is_alive(p)
        {
            self.link_parent(id, p);
        }
        id
    }

    /// Remove a widget and its whole subtree, invalidating every handle in it.
    pub fn remove(&mut self, id: WidgetId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        for child in self.subtree_post_order(id) {
            self.nodes[child.idx()] = None;
            self.free_list.push(child.idx());
        }
    }

    /// Attach `child` to `parent`, detaching it from any previous parent first.
    ///
    /// Returns `false` when either handle is stale or when the link would create a cycle.
    pub fn add_child(&mut self, parent: WidgetId, child: WidgetId) -> bool {
        if !self.is_alive(parent) || !self.is_alive(child) {
            return false;
        }
        if self.is_in_hierarchy_of(parent, child) {
            return false;
        }
        if self.node(child).parent == Some(parent) {
            return true;
        }
        if let Some(old) = self.node(child).parent {
            self.unlink_parent(child, old);
        }
        self.link_parent(child, parent);
        true
    }

    /// Detach `child` from its parent without destroying it.
    ///
    /// Returns the former parent.
    pub fn remove_child(&mut self, child: WidgetId) -> Option<WidgetId> {
        let parent = self.parent_of(child)?;
        self.unlink_parent(child, parent);
        Some(parent)
    }

    /// Returns true if `id` refers to a live widget.
    pub fn is_alive(&self, id: WidgetId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .map(|n| n.generation == id.1)
            .unwrap_or(false)
    }

    /// Number of live widgets.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// Returns true if the tree holds no live widgets.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the properties of a live widget.
    pub fn props(&self, id: WidgetId) -> Option<&WidgetProps> {
        self.node_opt(id).map(|n| &n.props)
    }

    /// Returns the properties of a live widget for mutation.
    pub fn props_mut(&mut self, id: WidgetId) -> Option<&mut WidgetProps> {
        self.node_opt_mut(id).map(|n| &mut n.props)
    }

    /// Returns the flags of a live widget.
    pub fn flags(&self, id: WidgetId) -> Option<WidgetFlags> {
        self.node_opt(id).map(|n| n.props.flags)
    }

    /// Returns true if the widget is live and has all of `flag` set.
    pub fn has_flag(&self, id: WidgetId, flag: WidgetFlags) -> bool {
        self.flags(id).is_some_and(|f| f.contains(flag))
    }

    /// Set or clear `flag` on a live widget.
    pub fn set_flag(&mut self, id: WidgetId, flag: WidgetFlags, on: bool) {
        if let Some(n) = self.node_opt_mut(id) {
            n.props.flags.set(flag, on);
        }
    }

    /// Returns the parent of a widget if live, or `None` for roots, detached widgets, or stale ids.
    pub fn parent_of(&self, id: WidgetId) -> Option<WidgetId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// Get the children of a widget in back-to-front order, or an empty slice if stale.
    pub fn children_of(&self, id: WidgetId) -> &[WidgetId] {
        self.node_opt(id).map(|n| &n.children[..]).unwrap_or(&[])
    }

    /// Returns the topmost ancestor of `id` (itself when it has no parent).
    pub fn root_of(&self, id: WidgetId) -> Option<WidgetId> {
        if !self.is_alive(id) {
            return None;
        }
        let mut cur = id;
        while let Some(p) = self.parent_of(cur) {
            cur = p;
        }
        Some(cur)
    }

    /// Returns true if `id` is `ancestor` or lies somewhere below it.
    pub fn is_in_hierarchy_of(&self, id: WidgetId, ancestor: WidgetId) -> bool {
        if !self.is_alive(id) || !self.is_alive(ancestor) {
            return false;
        }
        let mut cur = Some(id);
        while let Some(c) = cur {
            if c == ancestor {
                return true;
            }
            cur = self.parent_of(c);
        }
        false
    }

    /// Deepest widget that is an ancestor of (or equal to) both `a` and `b`.
    ///
    /// Returns `None` if either input is `None`, stale, or the two live in disjoint trees.
    pub fn common_ancestor(&self, a: Option<WidgetId>, b: Option<WidgetId>) -> Option<WidgetId> {
        let (a, b) = (a?, b?);
        if !self.is_alive(a) || !self.is_alive(b) {
            return None;
        }
        if a == b {
            return Some(a);
        }
        let chain_a = self.ancestor_chain(a);
        let mut cur = Some(b);
        while let Some(c) = cur {
            if chain_a.contains(&c) {
                return Some(c);
            }
            cur = self.parent_of(c);
        }
        None
    }

    /// Sum of the parent-local origins from the topmost ancestor down to `id`.
    pub fn world_origin(&self, id: WidgetId) -> Option<Point> {
        let mut offset = Vec2::ZERO;
        let mut cur = Some(id);
        let mut any = false;
        while let Some(c) = cur {
            let n = self.node_opt(c)?;
            offset += n.props.rect.origin().to_vec2();
            cur = n.parent;
            any = true;
        }
        any.then(|| offset.to_point())
    }

    /// Bounds of `id` in surface (world) coordinates.
    pub fn world_rect(&self, id: WidgetId) -> Option<Rect> {
        let props = self.props(id)?;
        let origin = self.world_origin(id)?;
        Some(Rect::from_origin_size(origin, props.rect.size()))
    }

    /// Convert a surface point into `id`'s local coordinates.
    pub fn to_local(&self, id: WidgetId, point: Point) -> Option<Point> {
        let origin = self.world_origin(id)?;
        Some(point - origin.to_vec2())
    }

    /// Returns true if the widget and all of its ancestors are visible.
    pub fn is_effectively_visible(&self, id: WidgetId) -> bool {
        self.all_ancestors(id, |f| f.contains(WidgetFlags::VISIBLE))
    }

    /// Returns true if neither the widget nor any ancestor is disabled.
    pub fn is_effectively_enabled(&self, id: WidgetId) -> bool {
        self.all_ancestors(id, |f| !f.contains(WidgetFlags::DISABLED))
    }

    /// Returns true if the widget accepts activation: focusable and not disabled.
    pub fn can_focus(&self, id: WidgetId) -> bool {
        self.has_flag(id, WidgetFlags::CAN_FOCUS) && self.is_effectively_enabled(id)
    }

    /// Tooltip text after inheritance: the widget's own text, or its parent's when the own
    /// text is empty and [`WidgetFlags::INHERITS_TOOLTIP_TEXT`] is set.
    pub fn effective_tooltip_text(&self, id: WidgetId) -> &str {
        let mut cur = Some(id);
        while let Some(c) = cur {
            let Some(n) = self.node_opt(c) else {
                break;
            };
            if !n.props.tooltip_text.is_empty() {
                return &n.props.tooltip_text;
            }
            if !n.props.flags.contains(WidgetFlags::INHERITS_TOOLTIP_TEXT) {
                break;
            }
            cur = n.parent;
        }
        ""
    }

    /// Returns true if no sibling is drawn above `id`.
    pub fn is_top_of_z_order(&self, id: WidgetId) -> bool {
        match self.parent_of(id) {
            Some(p) => self.node(p).children.last() == Some(&id),
            None => self.is_alive(id),
        }
    }

    /// Raise `id` above its siblings (but below always-on-top siblings unless it is one)
    /// and raise each ancestor the same way.
    ///
    /// Returns `true` if any sibling order changed.
    pub fn move_to_front(&mut self, id: WidgetId) -> bool {
        let mut changed = false;
        let mut cur = id;
        while let Some(parent) = self.parent_of(cur) {
            changed |= self.raise_within_parent(cur, parent);
            cur = parent;
        }
        changed
    }

    /// Deepest eligible descendant of `start` under `point` (surface coordinates).
    ///
    /// Children are searched topmost first. Hidden widgets are skipped entirely; disabled
    /// widgets are skipped unless `allow_disabled`; pass-through widgets are never returned
    /// themselves but their children may be. Returns `None` if no descendant matches.
    pub fn child_at_point(
        &self,
        start: WidgetId,
        point: Point,
        allow_disabled: bool,
    ) -> Option<WidgetId> {
        let node = self.node_opt(start)?;
        for &child in node.children.iter().rev() {
            let Some(flags) = self.flags(child) else {
                continue;
            };
            if !flags.contains(WidgetFlags::VISIBLE) || !self.is_hit(child, point, allow_disabled)
            {
                continue;
            }
            if let Some(deeper) = self.child_at_point(child, point, allow_disabled) {
                return Some(deeper);
            }
            if !flags.contains(WidgetFlags::CURSOR_PASS_THROUGH) {
                return Some(child);
            }
        }
        None
    }

    /// Returns true if `point` lies within the widget's hit area.
    ///
    /// The hit area is the world rect, clipped by the parent's hit area when
    /// [`WidgetFlags::CLIPPED_BY_PARENT`] is set.
    pub fn is_hit(&self, id: WidgetId, point: Point, allow_disabled: bool) -> bool {
        if !allow_disabled && !self.is_effectively_enabled(id) {
            return false;
        }
        self.hit_rect(id).is_some_and(|r| r.contains(point))
    }

    /// Widgets of the subtree rooted at `id`, parents before children.
    pub fn subtree_pre_order(&self, id: WidgetId) -> Vec<WidgetId> {
        let mut out = Vec::new();
        if !self.is_alive(id) {
            return out;
        }
        let mut stack = alloc::vec![id];
        while let Some(n) = stack.pop() {
            out.push(n);
            // Reverse so that children are visited in list order.
            stack.extend(self.children_of(n).iter().rev().copied());
        }
        out
    }

    /// Widgets of the subtree rooted at `id`, children before parents.
    pub fn subtree_post_order(&self, id: WidgetId) -> Vec<WidgetId> {
        let mut out = Vec::new();
        if !self.is_alive(id) {
            return out;
        }
        let mut stack = alloc::vec![(id, false)];
        while let Some((n, expanded)) = stack.pop() {
            if expanded {
                out.push(n);
                continue;
            }
            stack.push((n, true));
            stack.extend(self.children_of(n).iter().rev().map(|&c| (c, false)));
        }
        out
    }

    /// Get the next widget in depth-first traversal order.
    ///
    /// Returns `None` if no next widget exists or if `current` is stale.
    /// This does not wrap around.
    pub fn next_depth_first(&self, current: WidgetId) -> Option<WidgetId> {
        if !self.is_alive(current) {
            return None;
        }
        if let Some(&first_child) = self.node(current).children.first() {
            return Some(first_child);
        }
        let mut node = current;
        while let Some(parent) = self.parent_of(node) {
            if let Some(next_sibling) = self.sibling(node, 1) {
                return Some(next_sibling);
            }
            node = parent;
        }
        None
    }

    /// Get the previous widget in reverse depth-first traversal order.
    ///
    /// Returns `None` if no previous widget exists or if `current` is stale.
    pub fn prev_depth_first(&self, current: WidgetId) -> Option<WidgetId> {
        if !self.is_alive(current) {
            return None;
        }
        if let Some(mut node) = self.sibling(current, -1) {
            while let Some(&last) = self.node(node).children.last() {
                node = last;
            }
            return Some(node);
        }
        self.parent_of(current)
    }

    // --- internals ---

    fn node(&self, id: WidgetId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling WidgetId")
    }

    fn node_mut(&mut self, id: WidgetId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling WidgetId")
    }

    fn node_opt(&self, id: WidgetId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_opt_mut(&mut self, id: WidgetId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn ancestor_chain(&self, id: WidgetId) -> Chain {
        let mut out = Chain::new();
        let mut cur = Some(id);
        while let Some(c) = cur {
            out.push(c);
            cur = self.parent_of(c);
        }
        out
    }

    fn all_ancestors(&self, id: WidgetId, pred: impl Fn(WidgetFlags) -> bool) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        let mut cur = Some(id);
        while let Some(c) = cur {
            let n = self.node(c);
            if !pred(n.props.flags) {
                return false;
            }
            cur = n.parent;
        }
        true
    }

    fn hit_rect(&self, id: WidgetId) -> Option<Rect> {
        let rect = self.world_rect(id)?;
        let flags = self.flags(id)?;
        match self.parent_of(id) {
            Some(p) if flags.contains(WidgetFlags::CLIPPED_BY_PARENT) => {
                Some(rect.intersect(self.hit_rect(p)?))
            }
            _ => Some(rect),
        }
    }

    fn sibling(&self, id: WidgetId, step: isize) -> Option<WidgetId> {
        let parent = self.parent_of(id)?;
        let siblings = &self.node(parent).children;
        let pos = siblings.iter().position(|&c| c == id)?;
        let target = pos.checked_add_signed(step)?;
        siblings.get(target).copied()
    }

    /// Index at which a child with `on_top` should be placed to be frontmost in its band.
    fn front_slot(&self, parent: WidgetId, on_top: bool) -> usize {
        let children = &self.node(parent).children;
        if on_top {
            children.len()
        } else {
            children
                .iter()
                .position(|&c| self.has_flag(c, WidgetFlags::ALWAYS_ON_TOP))
                .unwrap_or(children.len())
        }
    }

    fn raise_within_parent(&mut self, id: WidgetId, parent: WidgetId) -> bool {
        let Some(pos) = self.node(parent).children.iter().position(|&c| c == id) else {
            return false;
        };
        self.node_mut(parent).children.remove(pos);
        let on_top = self.has_flag(id, WidgetFlags::ALWAYS_ON_TOP);
        let slot = self.front_slot(parent, on_top);
        self.node_mut(parent).children.insert(slot, id);
        slot != pos
    }

    fn link_parent(&mut self, id: WidgetId, parent: WidgetId) {
        let on_top = self.has_flag(id, WidgetFlags::ALWAYS_ON_TOP);
        let slot = self.front_slot(parent, on_top);
        self.node_mut(parent).children.insert(slot, id);
        self.node_mut(id).parent = Some(parent);
    }

    fn unlink_parent(&mut self, id: WidgetId, parent: WidgetId) {
        self.node_mut(parent).children.retain(|c| *c != id);
        self.node_mut(id).parent = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn boxed(tree: &mut Tree, parent: Option<WidgetId>, rect: Rect) -> WidgetId {
        tree.insert(parent, WidgetProps::new("Frame").with_rect(rect))
    }

    #[test]
    fn liveness_insert_remove_reuse() {
        let mut tree = Tree::new();
        let root = boxed(&mut tree, None, Rect::new(0.0, 0.0, 1.0, 1.0));
        let a = boxed(&mut tree, Some(root), Rect::new(0.0, 0.0, 1.0, 1.0));
        assert!(tree.is_alive(a));

        tree.remove(a);
        assert!(!tree.is_alive(a));
        assert!(tree.children_of(root).is_empty());

        let b = boxed(&mut tree, Some(root), Rect::new(0.0, 0.0, 1.0, 1.0));
        assert!(tree.is_alive(b));
        assert!(!tree.is_alive(a));
        if a.slot() == b.slot() {
            assert!(b.generation() > a.generation(), "generation must increase on reuse");
        }
    }

    #[test]
    fn remove_invalidates_whole_subtree() {
        let mut tree = Tree::new();
        let root = boxed(&mut tree, None, Rect::new(0.0, 0.0, 10.0, 10.0));
        let a = boxed(&mut tree, Some(root), Rect::new(0.0, 0.0, 10.0, 10.0));
        let b = boxed(&mut tree, Some(a), Rect::new(0.0, 0.0, 10.0, 10.0));
        tree.remove(a);
        assert!(tree.is_alive(root));
        assert!(!tree.is_alive(b));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn add_child_refuses_cycles() {
        let mut tree = Tree::new();
        let root = boxed(&mut tree, None, Rect::ZERO);
        let a = boxed(&mut tree, Some(root), Rect::ZERO);
        let b = boxed(&mut tree, Some(a), Rect::ZERO);
        assert!(!tree.add_child(b, root));
        assert!(!tree.add_child(a, a));
        assert_eq!(tree.parent_of(root), None);

        // Reparenting moves the widget out of its old parent.
        assert!(tree.add_child(root, b));
        assert_eq!(tree.parent_of(b), Some(root));
        assert!(tree.children_of(a).is_empty());
    }

    #[test]
    fn hit_test_prefers_topmost_and_deepest() {
        let mut tree = Tree::new();
        let root = boxed(&mut tree, None, Rect::new(0.0, 0.0, 200.0, 200.0));
        let a = boxed(&mut tree, Some(root), Rect::new(10.0, 10.0, 110.0, 110.0));
        let b = boxed(&mut tree, Some(root), Rect::new(50.0, 50.0, 150.0, 150.0));
        let inner = boxed(&mut tree, Some(a), Rect::new(0.0, 0.0, 20.0, 20.0));

        assert_eq!(tree.child_at_point(root, Point::new(60.0, 60.0), false), Some(b));
        assert_eq!(tree.child_at_point(root, Point::new(15.0, 15.0), false), Some(inner));
        assert_eq!(tree.child_at_point(root, Point::new(40.0, 20.0), false), Some(a));
        assert_eq!(tree.child_at_point(root, Point::new(190.0, 190.0), false), None);

        tree.move_to_front(a);
        assert_eq!(tree.child_at_point(root, Point::new(60.0, 60.0), false), Some(a));
    }

    #[test]
    fn hit_test_skips_hidden_disabled_and_pass_through() {
        let mut tree = Tree::new();
        let root = boxed(&mut tree, None, Rect::new(0.0, 0.0, 100.0, 100.0));
        let under = boxed(&mut tree, Some(root), Rect::new(0.0, 0.0, 100.0, 100.0));
        let over = boxed(&mut tree, Some(root), Rect::new(0.0, 0.0, 100.0, 100.0));
        let pt = Point::new(5.0, 5.0);

        tree.set_flag(over, WidgetFlags::CURSOR_PASS_THROUGH, true);
        assert_eq!(tree.child_at_point(root, pt, false), Some(under));

        tree.set_flag(over, WidgetFlags::CURSOR_PASS_THROUGH, false);
        tree.set_flag(over, WidgetFlags::DISABLED, true);
        assert_eq!(tree.child_at_point(root, pt, false), Some(under));
        assert_eq!(tree.child_at_point(root, pt, true), Some(over));

        tree.set_flag(over, WidgetFlags::DISABLED, false);
        tree.set_flag(over, WidgetFlags::VISIBLE, false);
        assert_eq!(tree.child_at_point(root, pt, true), Some(under));
    }

    #[test]
    fn pass_through_container_still_exposes_children() {
        let mut tree = Tree::new();
        let root = boxed(&mut tree, None, Rect::new(0.0, 0.0, 100.0, 100.0));
        let layer = tree.insert(
            Some(root),
            WidgetProps::new("Layer")
                .with_rect(Rect::new(0.0, 0.0, 100.0, 100.0))
                .with_flag(WidgetFlags::CURSOR_PASS_THROUGH, true),
        );
        let button = boxed(&mut tree, Some(layer), Rect::new(10.0, 10.0, 20.0, 20.0));
        assert_eq!(tree.child_at_point(root, Point::new(15.0, 15.0), false), Some(button));
        assert_eq!(tree.child_at_point(root, Point::new(50.0, 50.0), false), None);
    }

    #[test]
    fn clipping_by_parent() {
        let mut tree = Tree::new();
        let root = boxed(&mut tree, None, Rect::new(0.0, 0.0, 100.0, 100.0));
        let frame = boxed(&mut tree, Some(root), Rect::new(0.0, 0.0, 50.0, 50.0));
        let wide = boxed(&mut tree, Some(frame), Rect::new(0.0, 0.0, 90.0, 10.0));
        let pt = Point::new(70.0, 5.0);
        assert_eq!(tree.child_at_point(root, pt, false), None);

        tree.set_flag(wide, WidgetFlags::CLIPPED_BY_PARENT, false);
        tree.set_flag(frame, WidgetFlags::CLIPPED_BY_PARENT, false);
        assert!(tree.is_hit(wide, pt, false));
        // The frame itself does not contain the point, so the search never descends into it.
        assert_eq!(tree.child_at_point(root, pt, false), None);
        assert_eq!(tree.child_at_point(frame, pt, false), Some(wide));
    }

    #[test]
    fn world_rect_accumulates_origins() {
        let mut tree = Tree::new();
        let root = boxed(&mut tree, None, Rect::new(5.0, 5.0, 105.0, 105.0));
        let a = boxed(&mut tree, Some(root), Rect::new(10.0, 20.0, 30.0, 40.0));
        assert_eq!(tree.world_rect(a), Some(Rect::new(15.0, 25.0, 35.0, 45.0)));
        assert_eq!(tree.to_local(a, Point::new(20.0, 30.0)), Some(Point::new(5.0, 5.0)));
    }

    #[test]
    fn move_to_front_respects_always_on_top() {
        let mut tree = Tree::new();
        let root = boxed(&mut tree, None, Rect::ZERO);
        let a = boxed(&mut tree, Some(root), Rect::ZERO);
        let top = tree.insert(
            Some(root),
            WidgetProps::new("Tooltip").with_flag(WidgetFlags::ALWAYS_ON_TOP, true),
        );
        let b = boxed(&mut tree, Some(root), Rect::ZERO);
        // Inserting below the always-on-top band.
        assert_eq!(tree.children_of(root), &[a, b, top]);

        assert!(tree.move_to_front(a));
        assert_eq!(tree.children_of(root), &[b, a, top]);
        assert!(!tree.move_to_front(a), "already frontmost in its band");
        assert!(!tree.move_to_front(top));
    }

    #[test]
    fn move_to_front_raises_ancestors() {
        let mut tree = Tree::new();
        let root = boxed(&mut tree, None, Rect::ZERO);
        let f1 = boxed(&mut tree, Some(root), Rect::ZERO);
        let f2 = boxed(&mut tree, Some(root), Rect::ZERO);
        let leaf = boxed(&mut tree, Some(f1), Rect::ZERO);
        assert!(tree.move_to_front(leaf));
        assert_eq!(tree.children_of(root), &[f2, f1]);
    }

    #[test]
    fn common_ancestor_and_hierarchy() {
        let mut tree = Tree::new();
        let root = boxed(&mut tree, None, Rect::ZERO);
        let a = boxed(&mut tree, Some(root), Rect::ZERO);
        let a1 = boxed(&mut tree, Some(a), Rect::ZERO);
        let b = boxed(&mut tree, Some(root), Rect::ZERO);
        let lone = boxed(&mut tree, None, Rect::ZERO);

        assert_eq!(tree.common_ancestor(Some(a1), Some(b)), Some(root));
        assert_eq!(tree.common_ancestor(Some(a1), Some(a)), Some(a));
        assert_eq!(tree.common_ancestor(Some(a1), None), None);
        assert_eq!(tree.common_ancestor(Some(a1), Some(lone)), None);
        assert!(tree.is_in_hierarchy_of(a1, root));
        assert!(tree.is_in_hierarchy_of(a1, a1));
        assert!(!tree.is_in_hierarchy_of(a, a1));
        assert_eq!(tree.root_of(a1), Some(root));
    }

    #[test]
    fn effective_visibility_and_enablement() {
        let mut tree = Tree::new();
        let root = boxed(&mut tree, None, Rect::ZERO);
        let a = boxed(&mut tree, Some(root), Rect::ZERO);
        assert!(tree.is_effectively_visible(a));
        tree.set_flag(root, WidgetFlags::VISIBLE, false);
        assert!(!tree.is_effectively_visible(a));

        tree.set_flag(root, WidgetFlags::DISABLED, true);
        assert!(!tree.is_effectively_enabled(a));
        assert!(!tree.can_focus(a));
    }

    #[test]
    fn tooltip_text_inheritance() {
        let mut tree = Tree::new();
        let root = tree.insert(None, WidgetProps::new("Frame").with_tooltip("frame tip"));
        let inherits = boxed(&mut tree, Some(root), Rect::ZERO);
        let own = tree.insert(Some(root), WidgetProps::new("Button").with_tooltip("own"));
        let isolated = tree.insert(
            Some(root),
            WidgetProps::new("Button").with_flag(WidgetFlags::INHERITS_TOOLTIP_TEXT, false),
        );
        assert_eq!(tree.effective_tooltip_text(inherits), "frame tip");
        assert_eq!(tree.effective_tooltip_text(own), "own");
        assert_eq!(tree.effective_tooltip_text(isolated), "");
    }

    #[test]
    fn traversal_orders() {
        let mut tree = Tree::new();
        let root = boxed(&mut tree, None, Rect::ZERO);
        let a = boxed(&mut tree, Some(root), Rect::ZERO);
        let a1 = boxed(&mut tree, Some(a), Rect::ZERO);
        let b = boxed(&mut tree, Some(root), Rect::ZERO);

        assert_eq!(tree.subtree_pre_order(root), vec![root, a, a1, b]);
        assert_eq!(tree.subtree_post_order(root), vec![a1, a, b, root]);
        assert_eq!(tree.next_depth_first(root), Some(a));
        assert_eq!(tree.next_depth_first(a1), Some(b));
        assert_eq!(tree.next_depth_first(b), None);
        assert_eq!(tree.prev_depth_first(b), Some(a1));
        assert_eq!(tree.prev_depth_first(a), Some(root));
    }
}
