// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Surface tuning knobs.

use alloc::string::String;

use kurbo::Size;
use understory_event_state::click::{DEFAULT_TIMEOUT, DEFAULT_TOLERANCE};

/// Timing and behavior settings for a [`Surface`](crate::Surface).
///
/// ```
/// use understory_surface::SurfaceConfig;
///
/// let config = SurfaceConfig::default()
///     .with_tooltip_hover_time(0.5)
///     .with_tooltip_display_time(2.0)
///     .with_default_tooltip_type("Tooltip");
/// assert_eq!(config.tooltip_hover_time, 0.5);
/// assert!(config.move_to_front_on_activate);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceConfig {
    /// Seconds the cursor must rest on a widget before its tooltip appears.
    pub tooltip_hover_time: f64,
    /// Seconds a tooltip stays up; `0` keeps it up until the hover changes.
    pub tooltip_display_time: f64,
    /// Whether a visible tooltip follows the cursor.
    pub tooltip_follows_cursor: bool,
    /// Tooltip widget type used when the hovered widget names none.
    pub default_tooltip_type: String,
    /// Maximum seconds between presses of a multi-click.
    pub multi_click_timeout: f64,
    /// Area around the previous press that the next press of a multi-click must hit.
    pub multi_click_tolerance: Size,
    /// Whether activating a widget with the cursor or keyboard may raise it.
    pub move_to_front_on_activate: bool,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            tooltip_hover_time: 0.4,
            tooltip_display_time: 7.5,
            tooltip_follows_cursor: true,
            default_tooltip_type: String::new(),
            multi_click_timeout: DEFAULT_TIMEOUT,
            multi_click_tolerance: DEFAULT_TOLERANCE,
            move_to_front_on_activate: true,
        }
    }
}

impl SurfaceConfig {
    /// Set [`tooltip_hover_time`](Self::tooltip_hover_time).
    pub fn with_tooltip_hover_time(mut self, seconds: f64) -> Self {
        self.tooltip_hover_time = seconds;
        self
    }

    /// Set [`tooltip_display_time`](Self::tooltip_display_time).
    pub fn with_tooltip_display_time(mut self, seconds: f64) -> Self {
        self.tooltip_display_time = seconds;
        self
    }

    /// Set [`tooltip_follows_cursor`](Self::tooltip_follows_cursor).
    pub fn with_tooltip_follows_cursor(mut self, follows: bool) -> Self {
        self.tooltip_follows_cursor = follows;
        self
    }

    /// Set [`default_tooltip_type`](Self::default_tooltip_type).
    pub fn with_default_tooltip_type(mut self, type_name: impl Into<String>) -> Self {
        self.default_tooltip_type = type_name.into();
        self
    }

    /// Set the multi-click timeout and tolerance.
    pub fn with_multi_click(mut self, timeout: f64, tolerance: Size) -> Self {
        self.multi_click_timeout = timeout;
        self.multi_click_tolerance = tolerance;
        self
    }

    /// Set [`move_to_front_on_activate`](Self::move_to_front_on_activate).
    pub fn with_move_to_front_on_activate(mut self, allowed: bool) -> Self {
        self.move_to_front_on_activate = allowed;
        self
    }
}
