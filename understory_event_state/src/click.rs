// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Multi-click recognition.
//!
//! [`ClickTracker`] follows one press sequence at a time. A button-down continues the
//! sequence when it lands on the same target, with the same button, within the timeout of
//! the previous press and inside a tolerance rectangle centered on the previous press
//! position. Anything else starts a new sequence.
//!
//! A matching button-up yields the click order: `1` for a single click, `2` for a double,
//! `3` for a triple. A fourth click wraps back to `1`.
//!
//! ## Usage
//!
//! ```
//! use kurbo::Point;
//! use understory_event_state::click::ClickTracker;
//!
//! let mut clicks: ClickTracker<u32> = ClickTracker::new();
//! let p = Point::new(10.0, 10.0);
//!
//! clicks.on_down(0, p, 7, 0.0);
//! assert_eq!(clicks.on_up(0, p, &7, 0.05), 1);
//! clicks.on_down(0, p, 7, 0.1);
//! assert_eq!(clicks.on_up(0, p, &7, 0.15), 2);
//!
//! // Too slow: a new sequence starts.
//! clicks.on_down(0, p, 7, 1.0);
//! assert_eq!(clicks.on_up(0, p, &7, 1.05), 1);
//! ```
//!
//! The tracker does not decide who handled the click. Callers that route the button-up
//! through a widget chain call [`ClickTracker::reset`] when a different widget ends up
//! consuming the event, or when nothing does.

use kurbo::{Point, Rect, Size};

/// Default multi-click timeout in seconds.
pub const DEFAULT_TIMEOUT: f64 = 0.333;

/// Default multi-click tolerance, centered on the previous press.
pub const DEFAULT_TOLERANCE: Size = Size::new(12.0, 12.0);

/// Tracks consecutive presses on one target and reports their click order.
#[derive(Clone, Debug)]
pub struct ClickTracker<K> {
    /// Maximum time between presses that still continues a sequence, in seconds.
    pub timeout: f64,
    /// Size of the rectangle, centered on the previous press, that later presses must hit.
    pub tolerance: Size,
    press: Option<Press<K>>,
    count: u8,
    pending: bool,
}

/// The press a sequence is anchored on.
#[derive(Clone, Debug)]
struct Press<K> {
    target: K,
    button: u8,
    area: Rect,
    time: f64,
}

impl<K: PartialEq + Clone> Default for ClickTracker<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: PartialEq + Clone> ClickTracker<K> {
    /// Create a tracker with the default timeout and tolerance.
    pub fn new() -> Self {
        Self::with_thresholds(DEFAULT_TIMEOUT, DEFAULT_TOLERANCE)
    }

    /// Create a tracker with a custom timeout (seconds) and tolerance.
    pub fn with_thresholds(timeout: f64, tolerance: Size) -> Self {
        Self {
            timeout,
            tolerance,
            press: None,
            count: 0,
            pending: false,
        }
    }

    /// Record a button-down on `target` at time `now` (seconds).
    pub fn on_down(&mut self, button: u8, position: Point, target: K, now: f64) {
        let continues = self.press.as_ref().is_some_and(|p| {
            p.target == target
                && p.button == button
                && now - p.time <= self.timeout
                && p.area.contains(position)
        });
        if !continues {
            self.count = 0;
        }
        self.press = Some(Press {
            target,
            button,
            area: Rect::from_center_size(position, self.tolerance),
            time: now,
        });
        self.pending = true;
    }

    /// Record a button-up on `target` and return the click order.
    ///
    /// Returns `0` when the up does not complete a tracked press (different target or button,
    /// or no press pending). Otherwise returns `1`, `2` or `3`.
    pub fn on_up(&mut self, button: u8, _position: Point, target: &K, _now: f64) -> u8 {
        let Some(press) = &self.press else {
            return 0;
        };
        if !self.pending || press.target != *target || press.button != button {
            return 0;
        }
        self.pending = false;
        self.count = self.count % 3 + 1;
        self.count
    }

    /// Forget the current sequence.
    pub fn reset(&mut self) {
        self.press = None;
        self.count = 0;
        self.pending = false;
    }

    /// Target of the current sequence, if any.
    pub fn tracked_target(&self) -> Option<&K> {
        self.press.as_ref().map(|p| &p.target)
    }

    /// Number of clicks recognized in the current sequence so far.
    pub fn count(&self) -> u8 {
        self.count
    }
}
