// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the widget tree: handles, flags, and per-widget properties.

use alloc::string::String;
use kurbo::{Rect, Size};

/// Identifier for a widget in the tree (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct WidgetId(pub(crate) u32, pub(crate) u32);

impl WidgetId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    /// Slot index of this handle; only meaningful together with the generation.
    pub const fn slot(self) -> u32 {
        self.0
    }

    /// Generation of this handle.
    pub const fn generation(self) -> u32 {
        self.1
    }
}

bitflags::bitflags! {
    /// Per-widget behavior switches consulted by hit testing and input routing.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct WidgetFlags: u16 {
        /// The widget is shown. Effective visibility also requires all ancestors to be shown.
        const VISIBLE = 1 << 0;
        /// The widget ignores input. Disabling an ancestor disables the whole branch.
        const DISABLED = 1 << 1;
        /// The widget may become the active (focused) widget.
        const CAN_FOCUS = 1 << 2;
        /// Cursor input falls through this widget to whatever lies beneath it.
        const CURSOR_PASS_THROUGH = 1 << 3;
        /// Unhandled cursor input bubbles to the parent.
        const PROPAGATE_CURSOR_INPUT = 1 << 4;
        /// While capturing, cursor input is routed to the child under the cursor.
        const DISTRIBUTES_CAPTURED_INPUT = 1 << 5;
        /// Releasing this widget's capture hands it back to the previous holder.
        const RESTORES_OLD_CAPTURE = 1 << 6;
        /// Activating the widget with the cursor raises it to the front.
        const RISE_ON_ACTIVATION = 1 << 7;
        /// The widget stays above its non-topmost siblings.
        const ALWAYS_ON_TOP = 1 << 8;
        /// Hit testing is limited to the parent's hit area.
        const CLIPPED_BY_PARENT = 1 << 9;
        /// Holding a button over the widget re-sends button-down events.
        const CURSOR_AUTO_REPEAT = 1 << 10;
        /// Hovering the widget may show a tooltip.
        const TOOLTIP_ENABLED = 1 << 11;
        /// An empty tooltip text falls back to the parent's tooltip text.
        const INHERITS_TOOLTIP_TEXT = 1 << 12;
    }
}

impl Default for WidgetFlags {
    fn default() -> Self {
        Self::VISIBLE
            | Self::CAN_FOCUS
            | Self::PROPAGATE_CURSOR_INPUT
            | Self::RISE_ON_ACTIVATION
            | Self::CLIPPED_BY_PARENT
            | Self::TOOLTIP_ENABLED
            | Self::INHERITS_TOOLTIP_TEXT
    }
}

/// A cursor image as far as layout is concerned: a name and its rendered size.
#[derive(Clone, Debug, PartialEq)]
pub struct CursorImage {
    /// Name the renderer uses to look the image up.
    pub name: String,
    /// Rendered size in surface pixels.
    pub size: Size,
}

impl CursorImage {
    /// Create a cursor image description.
    pub fn new(name: impl Into<String>, size: Size) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }
}

/// Data stored for each widget.
#[derive(Clone, Debug)]
pub struct WidgetProps {
    /// Factory type name (for example `"Button"` or `"Tooltip"`).
    pub type_name: String,
    /// Display text.
    pub text: String,
    /// Bounds in the parent's coordinate space.
    pub rect: Rect,
    /// Behavior switches.
    pub flags: WidgetFlags,
    /// Own tooltip text; see [`WidgetFlags::INHERITS_TOOLTIP_TEXT`].
    pub tooltip_text: String,
    /// Preferred tooltip widget type; empty means the surface default.
    pub tooltip_type: String,
    /// Cursor image shown while hovering; `None` uses the surface default.
    pub cursor: Option<CursorImage>,
    /// Font name; empty means the surface default font.
    pub font: String,
    /// Seconds before the first repeated button-down.
    pub auto_repeat_delay: f64,
    /// Seconds between repeated button-downs.
    pub auto_repeat_rate: f64,
}

impl WidgetProps {
    /// Create properties with default flags for a widget of the given type.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            text: String::new(),
            rect: Rect::ZERO,
            flags: WidgetFlags::default(),
            tooltip_text: String::new(),
            tooltip_type: String::new(),
            cursor: None,
            font: String::new(),
            auto_repeat_delay: 0.3,
            auto_repeat_rate: 0.06,
        }
    }

    /// Set the parent-local bounds.
    pub fn with_rect(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }

    /// Replace the flags.
    pub fn with_flags(mut self, flags: WidgetFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Set or clear individual flags.
    pub fn with_flag(mut self, flag: WidgetFlags, on: bool) -> Self {
        self.flags.set(flag, on);
        self
    }

    /// Set the display text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set the tooltip text.
    pub fn with_tooltip(mut self, text: impl Into<String>) -> Self {
        self.tooltip_text = text.into();
        self
    }

    /// Set the tooltip widget type.
    pub fn with_tooltip_type(mut self, type_name: impl Into<String>) -> Self {
        self.tooltip_type = type_name.into();
        self
    }

    /// Set the hover cursor image.
    pub fn with_cursor(mut self, cursor: CursorImage) -> Self {
        self.cursor = Some(cursor);
        self
    }

    /// Set the font name.
    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = font.into();
        self
    }

    /// Enable cursor auto-repeat with the given delay and rate (seconds).
    pub fn with_auto_repeat(mut self, delay: f64, rate: f64) -> Self {
        self.flags |= WidgetFlags::CURSOR_AUTO_REPEAT;
        self.auto_repeat_delay = delay;
        self.auto_repeat_rate = rate;
        self
    }
}
