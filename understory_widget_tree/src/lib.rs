// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Widget Tree: an arena of widget records for one rendering surface.
//!
//! This crate stores the structural and geometric part of a retained widget hierarchy.
//! It knows nothing about event handling; a surface (see `understory_surface`) layers
//! input routing, focus, and capture on top of it.
//!
//! - Widgets live in slots addressed by generational [`WidgetId`] handles. Removing a widget
//!   bumps its slot generation, so stale handles never alias a newer widget.
//! - Parent/child edges are plain handles. A widget has at most one parent and a unique
//!   position in its parent's ordered child list; the last child is the topmost.
//! - Geometry is a parent-local [`Rect`](kurbo::Rect) per widget. World positions are
//!   derived by walking ancestors, which keeps updates O(1) and queries O(depth).
//!
//! ## Example
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use understory_widget_tree::{Tree, WidgetProps};
//!
//! let mut tree = Tree::new();
//! let root = tree.insert(None, WidgetProps::new("Root").with_rect(Rect::new(0.0, 0.0, 200.0, 200.0)));
//! let button = tree.insert(
//!     Some(root),
//!     WidgetProps::new("Button").with_rect(Rect::new(10.0, 10.0, 60.0, 30.0)),
//! );
//!
//! assert_eq!(tree.child_at_point(root, Point::new(20.0, 20.0), false), Some(button));
//! assert_eq!(tree.child_at_point(root, Point::new(150.0, 150.0), false), None);
//! assert_eq!(tree.common_ancestor(Some(root), Some(button)), Some(root));
//! ```
//!
//! ## API overview
//!
//! - Structure: [`Tree::insert`], [`Tree::remove`], [`Tree::add_child`], [`Tree::remove_child`].
//! - Ancestry: [`Tree::parent_of`], [`Tree::is_in_hierarchy_of`], [`Tree::common_ancestor`].
//! - Z-order: [`Tree::move_to_front`], [`Tree::is_top_of_z_order`].
//! - Queries: [`Tree::child_at_point`], [`Tree::world_rect`], [`Tree::is_effectively_visible`],
//!   [`Tree::effective_tooltip_text`].
//! - Traversal: [`Tree::next_depth_first`], [`Tree::prev_depth_first`],
//!   [`Tree::subtree_pre_order`], [`Tree::subtree_post_order`].
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod tree;
mod types;

pub use tree::Tree;
pub use types::{CursorImage, WidgetFlags, WidgetId, WidgetProps};
