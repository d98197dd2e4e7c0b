// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Device event injection.
//!
//! Every entry point resolves a target widget and walks from it toward the root, stopping at
//! the first widget that handles the event or at the modal widget (which is still notified).
//! Button press and release walks also stop at a widget that does not propagate cursor input
//! to its parent.

use kurbo::{Point, Vec2};
use tracing::{debug, trace, trace_span};
use understory_widget_tree::{WidgetFlags, WidgetId};

use crate::event::{
    ButtonEvent, Callback, Event, KeyEvent, Modifiers, MouseButton, ScanCode, ScrollEvent,
    TextEvent,
};
use crate::surface::Surface;

/// Which boundaries end a walk besides the modal widget.
#[derive(Copy, Clone, PartialEq, Eq)]
enum Walk {
    /// Button press and release: honors `PROPAGATE_CURSOR_INPUT`.
    Button,
    /// Moves, wheel and host-synthesized clicks.
    Pointer,
    /// Keys and text.
    Input,
}

impl Surface {
    /// Advance time by `dt` seconds.
    ///
    /// Refreshes the hovered widget, runs the tooltip timers and cursor auto-repeat, and
    /// delivers [`Widget::on_update`](crate::Widget::on_update) over the root's subtree.
    /// Returns false without a visible root.
    pub fn inject_time_pulse(&mut self, dt: f64) -> bool {
        let _span = trace_span!("inject_time_pulse", dt).entered();
        let Some(root) = self.root.filter(|&r| self.tree.is_effectively_visible(r)) else {
            return false;
        };
        self.clock += dt;
        let _ = self.window_containing_cursor();
        self.update_tooltip_state(dt);
        self.update_auto_repeat(dt);
        self.notify_subtree(root, Callback::Update, |_| Event::Update(dt));
        true
    }

    /// Move the cursor by `delta` surface units.
    ///
    /// Returns false for a zero delta or when no widget handled the move.
    pub fn inject_mouse_move(&mut self, delta: Vec2) -> bool {
        let _span = trace_span!("inject_mouse_move").entered();
        if delta == Vec2::ZERO {
            return false;
        }
        self.cursor.set_position(self.cursor.position() + delta);

        // Delay a pending tooltip; a shown one may follow the cursor.
        if self.tooltip.is_none() {
            self.tooltip_timer = 0.0;
        } else if self.config.tooltip_follows_cursor {
            self.position_tooltip();
        }

        self.hover_up_to_date = false;
        let target = self.window_containing_cursor();
        self.bubble(target, Walk::Pointer, Callback::CursorMove, |s, w| {
            Event::Cursor(s.cursor_event(w, delta))
        })
    }

    /// Move the cursor to `position` (surface coordinates).
    pub fn inject_mouse_position(&mut self, position: Point) -> bool {
        self.inject_mouse_move(position - self.cursor.position())
    }

    /// The cursor left the surface.
    pub fn inject_mouse_leaves(&mut self) -> bool {
        let _span = trace_span!("inject_mouse_leaves").entered();
        self.update_hover(None);
        true
    }

    /// A button was pressed.
    ///
    /// Hides a shown tooltip until the release. A left press activates each widget it is
    /// offered to; a raise counts as handling. The handling widget feeds multi-click
    /// tracking and, if it auto-repeats, captures input and starts repeating the button.
    ///
    /// Multi-click timing reads the surface clock, which only advances in
    /// [`Surface::inject_time_pulse`]. Hosts must pulse between presses; without pulses every
    /// press lands at the same instant and nearby presses keep chaining.
    pub fn inject_mouse_button_down(&mut self, button: MouseButton) -> bool {
        let _span = trace_span!("inject_mouse_button_down", ?button).entered();
        self.buttons |= button.into();

        if let Some(tip) = self.tooltip {
            self.set_visible(tip, false);
        }

        let mut cur = self.cursor_target_window(self.cursor.position(), false);
        while let Some(w) = cur {
            let mut event = Event::Button(self.button_event(w, button, 0));

            if button == MouseButton::Left {
                let rise = self.config.move_to_front_on_activate
                    && self.tree.has_flag(w, WidgetFlags::RISE_ON_ACTIVATION);
                if self.set_active(Some(w), rise) {
                    event.set_handled();
                }
            }

            self.notify(w, Callback::MouseButtonDown, &mut event);

            if !self.tree.has_flag(w, WidgetFlags::CURSOR_PASS_THROUGH) {
                event.set_handled();
            }

            if event.handled() {
                self.clicks
                    .on_down(button.index(), self.cursor.position(), w, self.clock);

                if self.tree.has_flag(w, WidgetFlags::CURSOR_AUTO_REPEAT) {
                    if !self.repeat.is_armed() {
                        let _ = self.capture_input(w);
                    }
                    if self.repeat.button() != Some(button) && self.capture == Some(w) {
                        debug!(widget = ?w, ?button, "auto-repeat armed");
                        self.repeat.arm(button);
                    }
                }
                return true;
            }

            if !self.continues_past(w, Walk::Button) {
                break;
            }
            cur = self.tree.parent_of(w);
        }
        false
    }

    /// A button was released.
    ///
    /// Restores a tooltip hidden by the press and stops auto-repeat. A widget that saw the
    /// matching press gets the synthesized click, double click or triple click first; an
    /// unhandled double or triple click falls back to a plain click. The click and the
    /// release share one payload.
    pub fn inject_mouse_button_up(&mut self, button: MouseButton) -> bool {
        let _span = trace_span!("inject_mouse_button_up", ?button).entered();
        self.buttons.remove(button.into());

        if let Some(tip) = self.tooltip {
            self.set_visible(tip, true);
            self.tooltip_timer = 0.0;
        }

        if self.repeat.is_armed() {
            self.release_input_capture(true, None);
        }

        let position = self.cursor.position();
        let mut cur = self.cursor_target_window(position, false);
        while let Some(w) = cur {
            let mut event = Event::Button(self.button_event(w, button, 0));
            let tracked = self.clicks.tracked_target() == Some(&w);

            if tracked {
                let order = self.clicks.on_up(button.index(), position, &w, self.clock);
                if let Event::Button(e) = &mut event {
                    e.click_order = order;
                }
                match order {
                    1 => self.notify(w, Callback::Click, &mut event),
                    2 | 3 => {
                        let callback = if order == 2 {
                            Callback::DoubleClick
                        } else {
                            Callback::TripleClick
                        };
                        self.notify(w, callback, &mut event);
                        if !event.handled() {
                            self.notify(w, Callback::Click, &mut event);
                        }
                    }
                    _ => {}
                }
            }

            self.notify(w, Callback::MouseButtonUp, &mut event);

            if !self.tree.has_flag(w, WidgetFlags::CURSOR_PASS_THROUGH) {
                event.set_handled();
            }

            if event.handled() {
                if !tracked {
                    self.clicks.reset();
                }
                return true;
            }

            if !self.continues_past(w, Walk::Button) {
                break;
            }
            cur = self.tree.parent_of(w);
        }

        self.clicks.reset();
        false
    }

    /// Deliver a click synthesized by the host.
    pub fn inject_mouse_click(&mut self, button: MouseButton) -> bool {
        self.inject_click(button, 1, Callback::Click)
    }

    /// Deliver a double click synthesized by the host.
    pub fn inject_mouse_double_click(&mut self, button: MouseButton) -> bool {
        self.inject_click(button, 2, Callback::DoubleClick)
    }

    /// Deliver a triple click synthesized by the host.
    pub fn inject_mouse_triple_click(&mut self, button: MouseButton) -> bool {
        self.inject_click(button, 3, Callback::TripleClick)
    }

    /// The wheel moved.
    ///
    /// Goes to the widget under the cursor first; if nobody handles it there and the input
    /// target is a different widget, the input target chain gets a chance.
    pub fn inject_mouse_wheel(&mut self, delta: f64) -> bool {
        let _span = trace_span!("inject_mouse_wheel", delta).entered();
        let cursor_target = self.cursor_target_window(self.cursor.position(), false);
        if self.send_scroll(cursor_target, delta) {
            return true;
        }
        let input_target = self.input_target_window();
        input_target != cursor_target && self.send_scroll(input_target, delta)
    }

    /// A key was pressed.
    ///
    /// Unhandled presses go to the navigator, which may activate another widget.
    pub fn inject_key_down(&mut self, key: ScanCode) -> bool {
        let _span = trace_span!("inject_key_down", ?key).entered();
        self.modifiers |= Modifiers::from_scan_code(key);
        self.send_key(key, true)
    }

    /// A key was released.
    pub fn inject_key_up(&mut self, key: ScanCode) -> bool {
        let _span = trace_span!("inject_key_up", ?key).entered();
        self.modifiers.remove(Modifiers::from_scan_code(key));
        self.send_key(key, false)
    }

    /// Text was entered.
    pub fn inject_char(&mut self, code_point: char) -> bool {
        let _span = trace_span!("inject_char", ?code_point).entered();
        let target = self.input_target_window();
        self.bubble(target, Walk::Input, Callback::Character, |_, w| {
            Event::Text(TextEvent {
                widget: w,
                code_point,
                handled: false,
            })
        })
    }

    // --- internals ---

    fn send_key(&mut self, key: ScanCode, pressed: bool) -> bool {
        let target = self.input_target_window();
        let callback = if pressed {
            Callback::KeyDown
        } else {
            Callback::KeyUp
        };
        let modifiers = self.modifiers;
        let handled = self.bubble(target, Walk::Input, callback, |_, w| {
            Event::Key(KeyEvent {
                widget: w,
                scan_code: key,
                modifiers,
                handled: false,
            })
        });
        handled || self.navigate(key, pressed)
    }

    fn send_scroll(&mut self, target: Option<WidgetId>, delta: f64) -> bool {
        self.bubble(target, Walk::Pointer, Callback::Scroll, |s, w| {
            Event::Scroll(ScrollEvent {
                widget: w,
                position: s.cursor.position(),
                local: s.local_point(w),
                buttons: s.buttons,
                modifiers: s.modifiers,
                delta,
                handled: false,
            })
        })
    }

    fn inject_click(&mut self, button: MouseButton, order: u8, callback: Callback) -> bool {
        let _span = trace_span!("inject_click", ?button, order).entered();
        let target = self.cursor_target_window(self.cursor.position(), false);
        self.bubble(target, Walk::Pointer, callback, |s, w| {
            Event::Button(s.button_event(w, button, order))
        })
    }

    /// Offer an event to `target` and its ancestors until one handles it.
    fn bubble(
        &mut self,
        target: Option<WidgetId>,
        walk: Walk,
        callback: Callback,
        mut make: impl FnMut(&Self, WidgetId) -> Event,
    ) -> bool {
        let mut cur = target;
        while let Some(w) = cur {
            let mut event = make(self, w);
            self.notify(w, callback, &mut event);
            if event.handled() {
                trace!(widget = ?w, ?callback, "handled");
                return true;
            }
            if !self.continues_past(w, walk) {
                break;
            }
            cur = self.tree.parent_of(w);
        }
        false
    }

    fn continues_past(&self, widget: WidgetId, walk: Walk) -> bool {
        if self.modal == Some(widget) || !self.tree.is_alive(widget) {
            return false;
        }
        walk != Walk::Button || self.tree.has_flag(widget, WidgetFlags::PROPAGATE_CURSOR_INPUT)
    }

    fn button_event(&self, widget: WidgetId, button: MouseButton, click_order: u8) -> ButtonEvent {
        ButtonEvent {
            widget,
            position: self.cursor.position(),
            local: self.local_point(widget),
            buttons: self.buttons,
            modifiers: self.modifiers,
            button,
            click_order,
            handled: false,
        }
    }

    /// Re-send button-down to the capture holder while a button is held.
    fn update_auto_repeat(&mut self, dt: f64) {
        let (Some(holder), Some(button)) = (self.capture, self.repeat.button()) else {
            return;
        };
        let (delay, rate) = self
            .tree
            .props(holder)
            .map(|p| (p.auto_repeat_delay, p.auto_repeat_rate))
            .unwrap_or((0.0, 0.0));
        if !self.tree.has_flag(holder, WidgetFlags::CURSOR_AUTO_REPEAT) || rate <= 0.0 {
            debug!(?holder, "auto-repeat no longer wanted");
            self.release_input_capture(true, None);
            return;
        }
        let repeats = self.repeat.advance(dt, delay, rate);
        for _ in 0..repeats {
            // A handler may release capture or destroy itself mid-burst.
            if self.capture != Some(holder) {
                break;
            }
            let mut event = Event::Button(self.button_event(holder, button, 0));
            self.notify(holder, Callback::MouseButtonDown, &mut event);
        }
    }
}
