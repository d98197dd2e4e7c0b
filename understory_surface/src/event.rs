// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input vocabulary and the payloads handed to widget callbacks.

use kurbo::{Point, Vec2};
use understory_widget_tree::WidgetId;

/// A pointer button.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button; pressing it also activates the widget under the cursor.
    Left,
    /// Secondary button.
    Right,
    /// Middle button or wheel press.
    Middle,
    /// First extra button.
    X1,
    /// Second extra button.
    X2,
}

impl MouseButton {
    /// Small stable index, used as the click tracker's button key.
    pub const fn index(self) -> u8 {
        match self {
            Self::Left => 0,
            Self::Right => 1,
            Self::Middle => 2,
            Self::X1 => 3,
            Self::X2 => 4,
        }
    }
}

bitflags::bitflags! {
    /// Set of currently pressed pointer buttons.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct MouseButtons: u8 {
        /// [`MouseButton::Left`]
        const LEFT = 1 << 0;
        /// [`MouseButton::Right`]
        const RIGHT = 1 << 1;
        /// [`MouseButton::Middle`]
        const MIDDLE = 1 << 2;
        /// [`MouseButton::X1`]
        const X1 = 1 << 3;
        /// [`MouseButton::X2`]
        const X2 = 1 << 4;
    }
}

impl From<MouseButton> for MouseButtons {
    fn from(button: MouseButton) -> Self {
        match button {
            MouseButton::Left => Self::LEFT,
            MouseButton::Right => Self::RIGHT,
            MouseButton::Middle => Self::MIDDLE,
            MouseButton::X1 => Self::X1,
            MouseButton::X2 => Self::X2,
        }
    }
}

bitflags::bitflags! {
    /// Held modifier keys.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Either shift key.
        const SHIFT = 1 << 0;
        /// Either control key.
        const CONTROL = 1 << 1;
        /// Either alt key.
        const ALT = 1 << 2;
        /// Either system ("Windows") key.
        const SUPER = 1 << 3;
    }
}

impl Modifiers {
    /// The modifier a scan code toggles, or the empty set.
    pub fn from_scan_code(code: ScanCode) -> Self {
        match code {
            ScanCode::LEFT_SHIFT | ScanCode::RIGHT_SHIFT => Self::SHIFT,
            ScanCode::LEFT_CONTROL | ScanCode::RIGHT_CONTROL => Self::CONTROL,
            ScanCode::LEFT_ALT | ScanCode::RIGHT_ALT => Self::ALT,
            ScanCode::LEFT_WINDOWS | ScanCode::RIGHT_WINDOWS => Self::SUPER,
            _ => Self::empty(),
        }
    }
}

/// Hardware-independent keyboard scan code (DirectInput numbering).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ScanCode(pub u32);

#[allow(missing_docs, reason = "Key names are self-describing.")]
impl ScanCode {
    pub const ESCAPE: Self = Self(0x01);
    pub const BACKSPACE: Self = Self(0x0E);
    pub const TAB: Self = Self(0x0F);
    pub const RETURN: Self = Self(0x1C);
    pub const LEFT_CONTROL: Self = Self(0x1D);
    pub const LEFT_SHIFT: Self = Self(0x2A);
    pub const RIGHT_SHIFT: Self = Self(0x36);
    pub const LEFT_ALT: Self = Self(0x38);
    pub const SPACE: Self = Self(0x39);
    pub const RIGHT_CONTROL: Self = Self(0x9D);
    pub const RIGHT_ALT: Self = Self(0xB8);
    pub const HOME: Self = Self(0xC7);
    pub const UP: Self = Self(0xC8);
    pub const PAGE_UP: Self = Self(0xC9);
    pub const LEFT: Self = Self(0xCB);
    pub const RIGHT: Self = Self(0xCD);
    pub const END: Self = Self(0xCF);
    pub const DOWN: Self = Self(0xD0);
    pub const PAGE_DOWN: Self = Self(0xD1);
    pub const DELETE: Self = Self(0xD3);
    pub const LEFT_WINDOWS: Self = Self(0xDB);
    pub const RIGHT_WINDOWS: Self = Self(0xDC);
}

/// Selects which [`Widget`](crate::Widget) method a notification invokes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Callback {
    /// [`Widget::on_cursor_enters`](crate::Widget::on_cursor_enters)
    CursorEnters,
    /// [`Widget::on_cursor_leaves`](crate::Widget::on_cursor_leaves)
    CursorLeaves,
    /// [`Widget::on_cursor_enters_area`](crate::Widget::on_cursor_enters_area)
    CursorEntersArea,
    /// [`Widget::on_cursor_leaves_area`](crate::Widget::on_cursor_leaves_area)
    CursorLeavesArea,
    /// [`Widget::on_cursor_move`](crate::Widget::on_cursor_move)
    CursorMove,
    /// [`Widget::on_mouse_button_down`](crate::Widget::on_mouse_button_down)
    MouseButtonDown,
    /// [`Widget::on_mouse_button_up`](crate::Widget::on_mouse_button_up)
    MouseButtonUp,
    /// [`Widget::on_click`](crate::Widget::on_click)
    Click,
    /// [`Widget::on_double_click`](crate::Widget::on_double_click)
    DoubleClick,
    /// [`Widget::on_triple_click`](crate::Widget::on_triple_click)
    TripleClick,
    /// [`Widget::on_scroll`](crate::Widget::on_scroll)
    Scroll,
    /// [`Widget::on_key_down`](crate::Widget::on_key_down)
    KeyDown,
    /// [`Widget::on_key_up`](crate::Widget::on_key_up)
    KeyUp,
    /// [`Widget::on_character`](crate::Widget::on_character)
    Character,
    /// [`Widget::on_capture_gained`](crate::Widget::on_capture_gained)
    CaptureGained,
    /// [`Widget::on_capture_lost`](crate::Widget::on_capture_lost)
    CaptureLost,
    /// [`Widget::on_activated`](crate::Widget::on_activated)
    Activated,
    /// [`Widget::on_deactivated`](crate::Widget::on_deactivated)
    Deactivated,
    /// [`Widget::on_attached`](crate::Widget::on_attached)
    Attached,
    /// [`Widget::on_detached`](crate::Widget::on_detached)
    Detached,
    /// [`Widget::on_update`](crate::Widget::on_update)
    Update,
    /// [`Widget::on_text_changed`](crate::Widget::on_text_changed)
    TextChanged,
    /// [`Widget::on_shown`](crate::Widget::on_shown)
    Shown,
    /// [`Widget::on_hidden`](crate::Widget::on_hidden)
    Hidden,
    /// [`Widget::on_default_font_changed`](crate::Widget::on_default_font_changed)
    DefaultFontChanged,
    /// [`Widget::on_font_render_size_changed`](crate::Widget::on_font_render_size_changed)
    FontRenderSizeChanged,
    /// [`Widget::on_surface_area_changed`](crate::Widget::on_surface_area_changed)
    SurfaceAreaChanged,
}

/// Cursor enter/leave/move.
#[derive(Clone, Debug, PartialEq)]
pub struct CursorEvent {
    /// Widget the event is currently delivered to.
    pub widget: WidgetId,
    /// Cursor position in surface coordinates.
    pub position: Point,
    /// Cursor position in the widget's local coordinates.
    pub local: Point,
    /// Pressed buttons.
    pub buttons: MouseButtons,
    /// Held modifiers.
    pub modifiers: Modifiers,
    /// Requested movement; zero for enter/leave.
    pub delta: Vec2,
    /// Set by a handler to stop propagation.
    pub handled: bool,
}

/// Button press, release, or synthesized click.
///
/// The synthesized click and the plain button-up that follows it share one instance, so a
/// widget that handles the click has also handled the release.
#[derive(Clone, Debug, PartialEq)]
pub struct ButtonEvent {
    /// Widget the event is currently delivered to.
    pub widget: WidgetId,
    /// Cursor position in surface coordinates.
    pub position: Point,
    /// Cursor position in the widget's local coordinates.
    pub local: Point,
    /// Pressed buttons, after this event was applied.
    pub buttons: MouseButtons,
    /// Held modifiers.
    pub modifiers: Modifiers,
    /// Button that changed.
    pub button: MouseButton,
    /// `1`, `2` or `3` when a click of that order was generated; `0` otherwise.
    pub click_order: u8,
    /// Set by a handler to stop propagation.
    pub handled: bool,
}

/// Wheel movement.
#[derive(Clone, Debug, PartialEq)]
pub struct ScrollEvent {
    /// Widget the event is currently delivered to.
    pub widget: WidgetId,
    /// Cursor position in surface coordinates.
    pub position: Point,
    /// Cursor position in the widget's local coordinates.
    pub local: Point,
    /// Pressed buttons.
    pub buttons: MouseButtons,
    /// Held modifiers.
    pub modifiers: Modifiers,
    /// Wheel delta.
    pub delta: f64,
    /// Set by a handler to stop propagation.
    pub handled: bool,
}

/// Key press or release.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    /// Widget the event is currently delivered to.
    pub widget: WidgetId,
    /// Key that changed.
    pub scan_code: ScanCode,
    /// Held modifiers, after this event was applied.
    pub modifiers: Modifiers,
    /// Set by a handler to stop propagation.
    pub handled: bool,
}

/// Text input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextEvent {
    /// Widget the event is currently delivered to.
    pub widget: WidgetId,
    /// Character produced.
    pub code_point: char,
    /// Set by a handler to stop propagation.
    pub handled: bool,
}

/// Activation change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivationEvent {
    /// Widget being activated or deactivated.
    pub widget: WidgetId,
    /// For deactivation, the newly active widget; for activation, the previously active one.
    pub other: Option<WidgetId>,
    /// Unused by the surface; available to handlers.
    pub handled: bool,
}

/// Notification naming a single widget, such as a capture change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WidgetEvent {
    /// Widget the notification is about.
    pub widget: WidgetId,
    /// Unused by the surface; available to handlers.
    pub handled: bool,
}

impl WidgetEvent {
    pub(crate) fn new(widget: WidgetId) -> Self {
        Self {
            widget,
            handled: false,
        }
    }
}

/// Payload carried to a widget callback.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// See [`CursorEvent`].
    Cursor(CursorEvent),
    /// See [`ButtonEvent`].
    Button(ButtonEvent),
    /// See [`ScrollEvent`].
    Scroll(ScrollEvent),
    /// See [`KeyEvent`].
    Key(KeyEvent),
    /// See [`TextEvent`].
    Text(TextEvent),
    /// See [`ActivationEvent`].
    Activation(ActivationEvent),
    /// See [`WidgetEvent`].
    Widget(WidgetEvent),
    /// Frame time in seconds.
    Update(f64),
    /// Notifications without data.
    Empty,
}

impl Event {
    /// Returns true if a handler marked the event handled.
    pub fn handled(&self) -> bool {
        match self {
            Self::Cursor(e) => e.handled,
            Self::Button(e) => e.handled,
            Self::Scroll(e) => e.handled,
            Self::Key(e) => e.handled,
            Self::Text(e) => e.handled,
            Self::Activation(e) => e.handled,
            Self::Widget(e) => e.handled,
            Self::Update(_) | Self::Empty => false,
        }
    }

    /// Mark the event handled (no-op for payloads without a flag).
    pub fn set_handled(&mut self) {
        match self {
            Self::Cursor(e) => e.handled = true,
            Self::Button(e) => e.handled = true,
            Self::Scroll(e) => e.handled = true,
            Self::Key(e) => e.handled = true,
            Self::Text(e) => e.handled = true,
            Self::Activation(e) => e.handled = true,
            Self::Widget(e) => e.handled = true,
            Self::Update(_) | Self::Empty => {}
        }
    }
}
