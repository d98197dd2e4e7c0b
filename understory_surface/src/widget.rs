// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The widget capability interface.

use understory_widget_tree::{Tree, WidgetId};

use crate::event::{
    ActivationEvent, ButtonEvent, Callback, CursorEvent, Event, KeyEvent, ScrollEvent, TextEvent,
    WidgetEvent,
};
use crate::surface::Surface;

/// Behavior attached to a widget.
///
/// Every method has a no-op default, so a widget only implements the callbacks it cares
/// about. Input callbacks set `handled` on their payload to stop propagation to ancestors.
///
/// Handlers run synchronously and may mutate the surface through [`EventCtx::surface`],
/// including detaching or destroying widgets. While a handler runs it is checked out of the
/// surface; notifications addressed to the same widget in the meantime (for example the
/// capture-gained notification that follows [`EventCtx::capture_input`]) are delivered right
/// after the handler returns.
#[expect(unused_variables, reason = "Default implementations ignore their arguments.")]
pub trait Widget {
    /// The cursor entered this widget.
    fn on_cursor_enters(&mut self, ctx: &mut EventCtx<'_>, event: &mut CursorEvent) {}
    /// The cursor left this widget.
    fn on_cursor_leaves(&mut self, ctx: &mut EventCtx<'_>, event: &mut CursorEvent) {}
    /// The cursor entered this widget or one of its descendants from outside.
    fn on_cursor_enters_area(&mut self, ctx: &mut EventCtx<'_>, event: &mut CursorEvent) {}
    /// The cursor left the area covered by this widget and its descendants.
    fn on_cursor_leaves_area(&mut self, ctx: &mut EventCtx<'_>, event: &mut CursorEvent) {}
    /// The cursor moved over this widget.
    fn on_cursor_move(&mut self, ctx: &mut EventCtx<'_>, event: &mut CursorEvent) {}
    /// A button was pressed over this widget (or auto-repeated).
    fn on_mouse_button_down(&mut self, ctx: &mut EventCtx<'_>, event: &mut ButtonEvent) {}
    /// A button was released over this widget.
    fn on_mouse_button_up(&mut self, ctx: &mut EventCtx<'_>, event: &mut ButtonEvent) {}
    /// A single click completed on this widget.
    fn on_click(&mut self, ctx: &mut EventCtx<'_>, event: &mut ButtonEvent) {}
    /// A double click completed on this widget.
    fn on_double_click(&mut self, ctx: &mut EventCtx<'_>, event: &mut ButtonEvent) {}
    /// A triple click completed on this widget.
    fn on_triple_click(&mut self, ctx: &mut EventCtx<'_>, event: &mut ButtonEvent) {}
    /// The wheel moved.
    fn on_scroll(&mut self, ctx: &mut EventCtx<'_>, event: &mut ScrollEvent) {}
    /// A key was pressed.
    fn on_key_down(&mut self, ctx: &mut EventCtx<'_>, event: &mut KeyEvent) {}
    /// A key was released.
    fn on_key_up(&mut self, ctx: &mut EventCtx<'_>, event: &mut KeyEvent) {}
    /// Text was entered.
    fn on_character(&mut self, ctx: &mut EventCtx<'_>, event: &mut TextEvent) {}
    /// This widget now receives all cursor input.
    fn on_capture_gained(&mut self, ctx: &mut EventCtx<'_>, event: &mut WidgetEvent) {}
    /// This widget no longer holds input capture.
    fn on_capture_lost(&mut self, ctx: &mut EventCtx<'_>, event: &mut WidgetEvent) {}
    /// This widget joined the active branch.
    fn on_activated(&mut self, ctx: &mut EventCtx<'_>, event: &mut ActivationEvent) {}
    /// This widget left the active branch.
    fn on_deactivated(&mut self, ctx: &mut EventCtx<'_>, event: &mut ActivationEvent) {}
    /// This widget became reachable from the surface root.
    fn on_attached(&mut self, ctx: &mut EventCtx<'_>) {}
    /// This widget is about to stop being reachable from the surface root.
    fn on_detached(&mut self, ctx: &mut EventCtx<'_>) {}
    /// Per-frame tick, `dt` in seconds.
    fn on_update(&mut self, ctx: &mut EventCtx<'_>, dt: f64) {}
    /// Display text changed.
    fn on_text_changed(&mut self, ctx: &mut EventCtx<'_>) {}
    /// This widget became visible.
    fn on_shown(&mut self, ctx: &mut EventCtx<'_>) {}
    /// This widget became hidden.
    fn on_hidden(&mut self, ctx: &mut EventCtx<'_>) {}
    /// The surface default font changed.
    fn on_default_font_changed(&mut self, ctx: &mut EventCtx<'_>) {}
    /// The font this widget renders with changed its render size.
    fn on_font_render_size_changed(&mut self, ctx: &mut EventCtx<'_>) {}
    /// The surface was resized.
    fn on_surface_area_changed(&mut self, ctx: &mut EventCtx<'_>) {}
}

/// Access to the surface from inside a widget callback.
pub struct EventCtx<'a> {
    pub(crate) surface: &'a mut Surface,
    pub(crate) widget: WidgetId,
}

impl core::fmt::Debug for EventCtx<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventCtx")
            .field("widget", &self.widget)
            .finish_non_exhaustive()
    }
}

impl EventCtx<'_> {
    /// The widget whose handler is running.
    pub fn widget(&self) -> WidgetId {
        self.widget
    }

    /// The surface, for arbitrary queries and mutation.
    pub fn surface(&mut self) -> &mut Surface {
        self.surface
    }

    /// Read-only view of the widget tree.
    pub fn tree(&self) -> &Tree {
        self.surface.tree()
    }

    /// Capture input for this widget; see [`Surface::capture_input`].
    pub fn capture_input(&mut self) -> bool {
        self.surface.capture_input(self.widget)
    }

    /// Release input capture if this widget holds it.
    pub fn release_input_capture(&mut self) {
        self.surface.release_input_capture(true, Some(self.widget));
    }

    /// Returns true if this widget holds input capture.
    pub fn has_capture(&self) -> bool {
        self.surface.capture_window() == Some(self.widget)
    }

    /// Returns true if this widget is on the active branch.
    pub fn is_active(&self) -> bool {
        self.surface.is_window_active(self.widget)
    }
}

/// Invoke the handler method selected by `callback`.
pub(crate) fn deliver(
    widget: &mut dyn Widget,
    ctx: &mut EventCtx<'_>,
    callback: Callback,
    event: &mut Event,
) {
    match (callback, event) {
        (Callback::CursorEnters, Event::Cursor(e)) => widget.on_cursor_enters(ctx, e),
        (Callback::CursorLeaves, Event::Cursor(e)) => widget.on_cursor_leaves(ctx, e),
        (Callback::CursorEntersArea, Event::Cursor(e)) => widget.on_cursor_enters_area(ctx, e),
        (Callback::CursorLeavesArea, Event::Cursor(e)) => widget.on_cursor_leaves_area(ctx, e),
        (Callback::CursorMove, Event::Cursor(e)) => widget.on_cursor_move(ctx, e),
        (Callback::MouseButtonDown, Event::Button(e)) => widget.on_mouse_button_down(ctx, e),
        (Callback::MouseButtonUp, Event::Button(e)) => widget.on_mouse_button_up(ctx, e),
        (Callback::Click, Event::Button(e)) => widget.on_click(ctx, e),
        (Callback::DoubleClick, Event::Button(e)) => widget.on_double_click(ctx, e),
        (Callback::TripleClick, Event::Button(e)) => widget.on_triple_click(ctx, e),
        (Callback::Scroll, Event::Scroll(e)) => widget.on_scroll(ctx, e),
        (Callback::KeyDown, Event::Key(e)) => widget.on_key_down(ctx, e),
        (Callback::KeyUp, Event::Key(e)) => widget.on_key_up(ctx, e),
        (Callback::Character, Event::Text(e)) => widget.on_character(ctx, e),
        (Callback::CaptureGained, Event::Widget(e)) => widget.on_capture_gained(ctx, e),
        (Callback::CaptureLost, Event::Widget(e)) => widget.on_capture_lost(ctx, e),
        (Callback::Activated, Event::Activation(e)) => widget.on_activated(ctx, e),
        (Callback::Deactivated, Event::Activation(e)) => widget.on_deactivated(ctx, e),
        (Callback::Update, Event::Update(dt)) => widget.on_update(ctx, *dt),
        (Callback::Attached, Event::Empty) => widget.on_attached(ctx),
        (Callback::Detached, Event::Empty) => widget.on_detached(ctx),
        (Callback::TextChanged, Event::Empty) => widget.on_text_changed(ctx),
        (Callback::Shown, Event::Empty) => widget.on_shown(ctx),
        (Callback::Hidden, Event::Empty) => widget.on_hidden(ctx),
        (Callback::DefaultFontChanged, Event::Empty) => widget.on_default_font_changed(ctx),
        (Callback::FontRenderSizeChanged, Event::Empty) => {
            widget.on_font_render_size_changed(ctx);
        }
        (Callback::SurfaceAreaChanged, Event::Empty) => widget.on_surface_area_changed(ctx),
        (callback, event) => {
            debug_assert!(false, "{callback:?} cannot carry {event:?}");
        }
    }
}
