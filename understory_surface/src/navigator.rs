// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyboard focus navigation for keys no widget handled.

use alloc::vec::Vec;
use core::cmp::Ordering;

use kurbo::Rect;
use understory_widget_tree::WidgetId;

use crate::event::{Modifiers, ScanCode};
use crate::surface::Surface;

/// Picks a new active widget in response to an unhandled key.
///
/// The surface consults its navigator after a key event bubbled through the input target
/// chain without being handled. Returning `Some` asks the surface to activate that widget;
/// returning `None` leaves focus alone.
pub trait Navigator {
    /// Choose the widget to activate, given the current active widget and the key.
    fn navigate(
        &self,
        surface: &Surface,
        current: Option<WidgetId>,
        key: ScanCode,
        pressed: bool,
        modifiers: Modifiers,
    ) -> Option<WidgetId>;
}

/// Direction of focus navigation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Navigation {
    /// Forward in reading order (Tab).
    Next,
    /// Backward in reading order (Shift+Tab).
    Prev,
    /// Spatially upward.
    Up,
    /// Spatially downward.
    Down,
    /// Spatially left.
    Left,
    /// Spatially right.
    Right,
}

impl Navigation {
    /// The navigation a key press requests, if any.
    pub fn from_key(key: ScanCode, modifiers: Modifiers) -> Option<Self> {
        match key {
            ScanCode::TAB if modifiers.contains(Modifiers::SHIFT) => Some(Self::Prev),
            ScanCode::TAB => Some(Self::Next),
            ScanCode::UP => Some(Self::Up),
            ScanCode::DOWN => Some(Self::Down),
            ScanCode::LEFT => Some(Self::Left),
            ScanCode::RIGHT => Some(Self::Right),
            _ => None,
        }
    }
}

/// Behavior at the ends of the reading order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum WrapMode {
    /// Stop at the first and last candidate.
    Never,
    /// Wrap around within the navigation scope.
    Scope,
}

/// Tab / Shift+Tab and arrow-key navigation over focusable widgets.
///
/// Candidates are the focusable, effectively visible and enabled descendants of the modal
/// widget, or of the root when no modal widget is set. Tab order is reading order of the
/// candidates' surface rectangles (top to bottom, then left to right). Arrow keys pick the
/// nearest candidate in that direction, penalizing off-axis distance, and fall back to
/// reading order when nothing lies that way.
#[derive(Copy, Clone, Debug)]
pub struct FocusNavigator {
    /// Wrap behavior when traversing candidates.
    pub wrap: WrapMode,
}

impl Default for FocusNavigator {
    fn default() -> Self {
        Self {
            wrap: WrapMode::Scope,
        }
    }
}

impl Navigator for FocusNavigator {
    fn navigate(
        &self,
        surface: &Surface,
        current: Option<WidgetId>,
        key: ScanCode,
        pressed: bool,
        modifiers: Modifiers,
    ) -> Option<WidgetId> {
        if !pressed {
            return None;
        }
        let direction = Navigation::from_key(key, modifiers)?;
        let scope = surface.modal_window().or(surface.root())?;
        let tree = surface.tree();
        let candidates: Vec<(WidgetId, Rect)> = tree
            .subtree_pre_order(scope)
            .into_iter()
            .skip(1)
            .filter(|&w| tree.can_focus(w) && tree.is_effectively_visible(w))
            .filter_map(|w| tree.world_rect(w).map(|r| (w, r)))
            .collect();
        next_candidate(current, direction, &candidates, self.wrap)
    }
}

fn next_candidate<K: Copy + Eq>(
    origin: Option<K>,
    direction: Navigation,
    nodes: &[(K, Rect)],
    wrap: WrapMode,
) -> Option<K> {
    match direction {
        Navigation::Next => next_linear(origin, nodes, wrap, Step::Forward),
        Navigation::Prev => next_linear(origin, nodes, wrap, Step::Backward),
        Navigation::Up | Navigation::Down | Navigation::Left | Navigation::Right => origin
            .and_then(|o| next_directional(o, direction, nodes))
            .or_else(|| {
                let step = match direction {
                    Navigation::Up | Navigation::Left => Step::Backward,
                    _ => Step::Forward,
                };
                next_linear(origin, nodes, wrap, step)
            }),
    }
}

#[derive(Copy, Clone)]
enum Step {
    Forward,
    Backward,
}

fn next_linear<K: Copy + Eq>(
    origin: Option<K>,
    nodes: &[(K, Rect)],
    wrap: WrapMode,
    step: Step,
) -> Option<K> {
    if nodes.is_empty() {
        return None;
    }
    let mut order: Vec<usize> = (0..nodes.len()).collect();
    // Stable, so tree order breaks ties.
    order.sort_by(|&a, &b| compare_rect_reading(&nodes[a].1, &nodes[b].1));

    let last = order.len() - 1;
    let pos = origin.and_then(|o| order.iter().position(|&i| nodes[i].0 == o));
    let next = match (step, pos) {
        (Step::Forward, None) => Some(0),
        (Step::Backward, None) => Some(last),
        (Step::Forward, Some(p)) if p < last => Some(p + 1),
        (Step::Backward, Some(p)) if p > 0 => Some(p - 1),
        (Step::Forward, Some(_)) => (wrap == WrapMode::Scope).then_some(0),
        (Step::Backward, Some(_)) => (wrap == WrapMode::Scope).then_some(last),
    };
    next.map(|p| nodes[order[p]].0)
}

fn compare_rect_reading(a: &Rect, b: &Rect) -> Ordering {
    const RELATIVE_EPS: f64 = 1e-6;
    if (a.y0 - b.y0).abs() > f64::max(a.y0.abs(), b.y0.abs()) * RELATIVE_EPS {
        return a.y0.partial_cmp(&b.y0).unwrap_or(Ordering::Equal);
    }
    a.x0.partial_cmp(&b.x0).unwrap_or(Ordering::Equal)
}

fn next_directional<K: Copy + Eq>(
    origin: K,
    direction: Navigation,
    nodes: &[(K, Rect)],
) -> Option<K> {
    let oc = nodes.iter().find(|(id, _)| *id == origin)?.1.center();

    let mut best: Option<K> = None;
    let mut best_score = f64::INFINITY;
    for &(id, rect) in nodes {
        if id == origin {
            continue;
        }
        let cc = rect.center();
        let (dx, dy) = (cc.x - oc.x, cc.y - oc.y);
        let (primary, secondary, sign) = match direction {
            Navigation::Right => (dx, dy, 1.0),
            Navigation::Left => (dx, dy, -1.0),
            Navigation::Down => (dy, dx, 1.0),
            Navigation::Up => (dy, dx, -1.0),
            Navigation::Next | Navigation::Prev => return None,
        };
        if sign * primary <= 0.0 {
            continue;
        }
        let score = primary.abs() + 4.0 * secondary.abs();
        if score.is_finite() && score < best_score {
            best_score = score;
            best = Some(id);
        }
    }
    best
}
