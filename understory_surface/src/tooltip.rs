// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover-triggered tooltips.

use alloc::string::String;

use kurbo::{Point, Rect, Size};
use tracing::debug;
use understory_widget_tree::{WidgetFlags, WidgetId};

use crate::surface::{Surface, SurfaceEvent};

/// Gap between the cursor and a tooltip flipped to its left or top.
const FLIP_GAP: f64 = 5.0;

/// Where the tooltip controller is in its cycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TooltipState {
    /// No hovered widget wants a tooltip.
    Idle,
    /// A widget wants a tooltip and the hover delay is running.
    Hovering,
    /// A tooltip is displayed.
    Visible,
    /// A displayed tooltip switched content or type since the last time pulse.
    Transitioning,
}

/// Top-left corner of a tooltip in surface coordinates.
///
/// The tooltip sits below and to the right of the cursor image. It flips to the other side
/// of the cursor on an axis where it would overflow the surface by more than it would on the
/// other side, then is clamped into the surface.
pub fn tooltip_origin(
    cursor: Point,
    cursor_image_size: Size,
    tooltip_size: Size,
    surface_size: Size,
) -> Point {
    let mut pos = cursor + cursor_image_size.to_vec2();
    let tip = Rect::from_origin_size(pos, tooltip_size);
    if surface_size.width - tip.x1 < tip.x0 - tip.width() {
        pos.x = cursor.x - tip.width() - FLIP_GAP;
    }
    if surface_size.height - tip.y1 < tip.y0 - tip.height() {
        pos.y = cursor.y - tip.height() - FLIP_GAP;
    }
    Point::new(
        pos.x.min(surface_size.width - tip.width()).max(0.0),
        pos.y.min(surface_size.height - tip.height()).max(0.0),
    )
}

impl Surface {
    /// Current tooltip state.
    pub fn tooltip_state(&self) -> TooltipState {
        match (self.tooltip_source, self.tooltip) {
            (_, Some(_)) if self.tooltip_swapping => TooltipState::Transitioning,
            (_, Some(_)) => TooltipState::Visible,
            (Some(source), None) if self.wants_tooltip(source) => TooltipState::Hovering,
            _ => TooltipState::Idle,
        }
    }

    /// The displayed tooltip widget, if any.
    pub fn tooltip_window(&self) -> Option<WidgetId> {
        self.tooltip
    }

    /// The widget the tooltip describes (the hovered widget, unless the cursor is over the
    /// tooltip itself).
    pub fn tooltip_source(&self) -> Option<WidgetId> {
        self.tooltip_source
    }

    /// The tooltip instance cached for a type, if one was created.
    pub fn tooltip_object(&self, type_name: &str) -> Option<WidgetId> {
        self.tooltips.get(type_name).copied()
    }

    /// Show the tooltip for the current source right away, skipping the hover delay.
    ///
    /// Returns false if there is no source or no tooltip instance could be created.
    pub fn show_tooltip(&mut self) -> bool {
        if self.tooltip.is_some() {
            return true;
        }
        self.tooltip_timer = 0.0;
        self.present_tooltip(false)
    }

    /// Hide the displayed tooltip, queueing [`SurfaceEvent::TooltipInactive`].
    pub fn hide_tooltip(&mut self) -> bool {
        self.dismiss_tooltip(true).is_some()
    }

    pub(crate) fn wants_tooltip(&self, source: WidgetId) -> bool {
        self.tree.has_flag(source, WidgetFlags::TOOLTIP_ENABLED)
            && !self.tree.effective_tooltip_text(source).is_empty()
    }

    fn tooltip_type_for(&self, source: WidgetId) -> String {
        match self.tree.props(source) {
            Some(p) if !p.tooltip_type.is_empty() => p.tooltip_type.clone(),
            _ => self.config.default_tooltip_type.clone(),
        }
    }

    /// Fetch the cached tooltip instance for `type_name`, creating it through the factory.
    ///
    /// Created instances are detached, hidden, unclipped, always on top, and let cursor
    /// input pass through to the widgets beneath them.
    pub(crate) fn tooltip_object_or_create(&mut self, type_name: &str) -> Option<WidgetId> {
        if type_name.is_empty() {
            return None;
        }
        if let Some(&tip) = self.tooltips.get(type_name)
            && self.tree.is_alive(tip)
        {
            return Some(tip);
        }
        if self.factory.is_locked() {
            debug!(type_name, "factory locked; no tooltip");
            return None;
        }
        let made = self.factory.create(type_name)?;
        let flags = made.props.flags
            - WidgetFlags::CLIPPED_BY_PARENT
            - WidgetFlags::VISIBLE
            - WidgetFlags::CAN_FOCUS
            | WidgetFlags::ALWAYS_ON_TOP
            | WidgetFlags::CURSOR_PASS_THROUGH;
        let tip = self.insert_widget(None, made.props.with_flags(flags), Some(made.handler));
        self.tooltips.insert(String::from(type_name), tip);
        debug!(type_name, ?tip, "created tooltip");
        Some(tip)
    }

    /// Attach, fill, place and show the tooltip for the current source.
    fn present_tooltip(&mut self, transition: bool) -> bool {
        let (Some(source), Some(root)) = (self.tooltip_source, self.root) else {
            return false;
        };
        let type_name = self.tooltip_type_for(source);
        let Some(tip) = self.tooltip_object_or_create(&type_name) else {
            // Do not retry every frame for a type the factory cannot make.
            self.tooltip_source = None;
            return false;
        };
        self.tooltip = Some(tip);
        if self.tree.parent_of(tip) != Some(root) && !self.add_child(root, tip) {
            self.tooltip = None;
            return false;
        }
        let text = String::from(self.tree.effective_tooltip_text(source));
        self.set_text(tip, text);
        self.position_tooltip();
        self.set_visible(tip, true);
        debug!(?source, ?tip, transition, "tooltip shown");
        self.events.push(if transition {
            SurfaceEvent::TooltipTransition(tip)
        } else {
            SurfaceEvent::TooltipActive(tip)
        });
        true
    }

    /// Hide and detach the displayed tooltip. Clearing its text makes the next show report
    /// a text change even for identical content.
    pub(crate) fn dismiss_tooltip(&mut self, emit: bool) -> Option<WidgetId> {
        let tip = self.tooltip.take()?;
        self.set_visible(tip, false);
        if self.tree.parent_of(tip).is_some() {
            let _ = self.remove_child(tip);
        }
        self.set_text(tip, String::new());
        debug!(?tip, "tooltip hidden");
        if emit {
            self.events.push(SurfaceEvent::TooltipInactive(tip));
        }
        Some(tip)
    }

    /// Replace the displayed tooltip with one for the current source.
    pub(crate) fn swap_tooltip(&mut self) {
        let wanted = self.tooltip_source.is_some_and(|s| self.wants_tooltip(s));
        let Some(old) = self.dismiss_tooltip(!wanted) else {
            return;
        };
        if !wanted {
            return;
        }
        if self.present_tooltip(true) {
            self.tooltip_swapping = true;
        } else {
            self.events.push(SurfaceEvent::TooltipInactive(old));
        }
    }

    /// Move the displayed tooltip next to the cursor.
    pub(crate) fn position_tooltip(&mut self) {
        let Some(tip) = self.tooltip else {
            return;
        };
        let Some(size) = self.tree.props(tip).map(|p| p.rect.size()) else {
            return;
        };
        let origin = tooltip_origin(
            self.cursor.position(),
            self.cursor.image_size(),
            size,
            self.surface_size,
        );
        let local = self
            .tree
            .parent_of(tip)
            .and_then(|parent| self.tree.to_local(parent, origin))
            .unwrap_or(origin);
        if let Some(props) = self.tree.props_mut(tip) {
            props.rect = Rect::from_origin_size(local, size);
        }
    }

    /// Advance the tooltip timers by `dt` seconds.
    pub(crate) fn update_tooltip_state(&mut self, dt: f64) {
        self.tooltip_swapping = false;
        let Some(source) = self.tooltip_source.filter(|&s| self.wants_tooltip(s)) else {
            let _ = self.dismiss_tooltip(true);
            self.tooltip_source = None;
            return;
        };

        self.tooltip_timer += dt;
        match self.tooltip {
            Some(tip) => {
                // Held down by a pressed button.
                if !self.tree.has_flag(tip, WidgetFlags::VISIBLE) {
                    return;
                }
                let display = self.config.tooltip_display_time;
                if display > 0.0 && self.tooltip_timer >= display {
                    let _ = self.dismiss_tooltip(true);
                    self.tooltip_timer = 0.0;
                    self.tooltip_source = None;
                } else {
                    let wanted = self.tooltip_type_for(source);
                    let shown = self.tree.props(tip).map(|p| p.type_name.as_str());
                    if shown != Some(wanted.as_str()) {
                        self.swap_tooltip();
                    }
                }
            }
            None if self.tooltip_timer >= self.config.tooltip_hover_time => {
                self.tooltip_timer = 0.0;
                let _ = self.present_tooltip(false);
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SurfaceConfig;
    use crate::event::MouseButton;
    use crate::factory::NewWidget;
    use crate::testing::Harness;
    use alloc::boxed::Box;
    use alloc::vec::Vec;
    use kurbo::Vec2;
    use understory_widget_tree::WidgetProps;

    fn with_tip(h: &mut Harness, name: &'static str, rect: Rect, text: &str) -> WidgetId {
        let recorder = h.recorder(name);
        let props = WidgetProps::new(name).with_rect(rect).with_tooltip(text);
        h.add_with(h.root, props, recorder)
    }

    fn tooltip_events(h: &mut Harness) -> Vec<SurfaceEvent> {
        h.surface
            .drain_events()
            .into_iter()
            .filter(|e| {
                matches!(
                    e,
                    SurfaceEvent::TooltipActive(_)
                        | SurfaceEvent::TooltipInactive(_)
                        | SurfaceEvent::TooltipTransition(_)
                )
            })
            .collect()
    }

    fn text_of(h: &Harness, widget: WidgetId) -> &str {
        h.surface.tree().props(widget).map_or("", |p| p.text.as_str())
    }

    #[test]
    fn hover_delay_then_display_time() {
        let mut h = Harness::new();
        h.surface.set_config(
            SurfaceConfig::default()
                .with_default_tooltip_type("Tooltip")
                .with_tooltip_hover_time(0.5)
                .with_tooltip_display_time(2.0),
        );
        let _w = with_tip(&mut h, "w", Rect::new(0.0, 0.0, 50.0, 50.0), "Help");
        h.move_to(10.0, 10.0);

        let _ = h.surface.inject_time_pulse(0.3);
        assert_eq!(h.surface.tooltip_state(), TooltipState::Hovering);
        // Moving restarts the delay.
        let _ = h.surface.inject_mouse_move(Vec2::new(1.0, 1.0));
        let _ = h.surface.inject_time_pulse(0.3);
        assert_eq!(h.surface.tooltip_window(), None, "0.3s since the last move");

        let _ = h.surface.inject_time_pulse(0.3);
        let tip = h.surface.tooltip_window().expect("shown after the delay");
        assert_eq!(h.surface.tooltip_state(), TooltipState::Visible);
        assert_eq!(text_of(&h, tip), "Help");
        assert_eq!(h.surface.tree().parent_of(tip), Some(h.root));
        assert_eq!(
            h.surface.tree().world_rect(tip),
            Some(Rect::new(11.0, 11.0, 71.0, 31.0)),
            "placed at the cursor"
        );
        assert!(matches!(
            tooltip_events(&mut h).as_slice(),
            [SurfaceEvent::TooltipActive(t)] if *t == tip
        ));

        let _ = h.surface.inject_time_pulse(1.0);
        let _ = h.surface.inject_time_pulse(0.9);
        assert_eq!(h.surface.tooltip_window(), Some(tip), "1.9s shown");
        let _ = h.surface.inject_time_pulse(0.2);
        assert_eq!(h.surface.tooltip_window(), None, "display time elapsed");
        assert_eq!(h.surface.tooltip_state(), TooltipState::Idle);
        assert_eq!(h.surface.tree().parent_of(tip), None, "detached when hidden");
        assert_eq!(text_of(&h, tip), "", "text cleared when hidden");
        assert!(matches!(
            tooltip_events(&mut h).as_slice(),
            [SurfaceEvent::TooltipInactive(t)] if *t == tip
        ));
    }

    #[test]
    fn zero_display_time_keeps_the_tooltip_up() {
        let mut h = Harness::new();
        h.surface.set_config(
            SurfaceConfig::default()
                .with_default_tooltip_type("Tooltip")
                .with_tooltip_display_time(0.0),
        );
        let _w = with_tip(&mut h, "w", Rect::new(0.0, 0.0, 50.0, 50.0), "Help");
        h.move_to(10.0, 10.0);
        let _ = h.surface.inject_time_pulse(0.5);
        let tip = h.surface.tooltip_window().expect("shown");
        let _ = tooltip_events(&mut h);

        for _ in 0..20 {
            let _ = h.surface.inject_time_pulse(1.0);
        }
        assert_eq!(h.surface.tooltip_window(), Some(tip), "still shown after 20s");
        assert!(tooltip_events(&mut h).is_empty(), "no TooltipInactive");

        h.move_to(300.0, 200.0);
        assert_eq!(h.surface.tooltip_window(), None, "leaving the widget hides it");
    }

    #[test]
    fn pressed_button_holds_the_tooltip_hidden() {
        let mut h = Harness::new();
        let _w = with_tip(&mut h, "w", Rect::new(0.0, 0.0, 50.0, 50.0), "Help");
        h.move_to(10.0, 10.0);
        let _ = h.surface.inject_time_pulse(0.5);
        let tip = h.surface.tooltip_window().expect("shown");

        let _ = h.surface.inject_mouse_button_down(MouseButton::Left);
        assert!(!h.surface.tree().has_flag(tip, WidgetFlags::VISIBLE), "hidden while held");
        let _ = h.surface.inject_time_pulse(10.0);
        assert_eq!(h.surface.tooltip_window(), Some(tip), "timers pause while hidden");

        let _ = h.surface.inject_mouse_button_up(MouseButton::Left);
        assert!(h.surface.tree().has_flag(tip, WidgetFlags::VISIBLE), "back on release");
        let _ = h.surface.inject_time_pulse(1.0);
        assert_eq!(h.surface.tooltip_window(), Some(tip), "display time restarted");
    }

    #[test]
    fn hovering_another_widget_swaps_content() {
        let mut h = Harness::new();
        let _a = with_tip(&mut h, "a", Rect::new(0.0, 0.0, 50.0, 50.0), "First");
        let _b = with_tip(&mut h, "b", Rect::new(100.0, 0.0, 150.0, 50.0), "Second");
        let _c = h.add(h.root, "c", Rect::new(200.0, 0.0, 250.0, 50.0));
        h.move_to(10.0, 10.0);
        let _ = h.surface.inject_time_pulse(0.5);
        let tip = h.surface.tooltip_window().expect("shown");
        let _ = tooltip_events(&mut h);

        h.move_to(110.0, 10.0);
        assert_eq!(h.surface.tooltip_state(), TooltipState::Transitioning);
        assert_eq!(text_of(&h, tip), "Second");
        assert!(matches!(
            tooltip_events(&mut h).as_slice(),
            [SurfaceEvent::TooltipTransition(t)] if *t == tip
        ));
        let _ = h.surface.inject_time_pulse(0.1);
        assert_eq!(h.surface.tooltip_state(), TooltipState::Visible);

        h.move_to(210.0, 10.0);
        assert_eq!(h.surface.tooltip_window(), None, "c has no tooltip");
        assert_eq!(h.surface.tooltip_state(), TooltipState::Idle);
        assert!(matches!(
            tooltip_events(&mut h).as_slice(),
            [SurfaceEvent::TooltipInactive(t)] if *t == tip
        ));
    }

    #[test]
    fn tooltip_type_change_switches_instances() {
        let mut h = Harness::new();
        let log = h.log.clone();
        h.registry.register("Fancy", move || NewWidget {
            props: WidgetProps::new("Fancy").with_rect(Rect::new(0.0, 0.0, 80.0, 30.0)),
            handler: Box::new(crate::testing::Recorder {
                name: "fancy",
                log: log.clone(),
                ..Default::default()
            }),
        });
        let a = with_tip(&mut h, "a", Rect::new(0.0, 0.0, 50.0, 50.0), "Help");
        h.move_to(10.0, 10.0);
        let _ = h.surface.inject_time_pulse(0.5);
        let plain = h.surface.tooltip_window().expect("shown");
        let _ = tooltip_events(&mut h);

        h.surface.set_tooltip_type(a, "Fancy");
        let _ = h.surface.inject_time_pulse(0.1);
        let fancy = h.surface.tooltip_window().expect("still shown");
        assert_ne!(fancy, plain);
        assert_eq!(h.surface.tooltip_object("Fancy"), Some(fancy));
        assert_eq!(h.surface.tooltip_object("Tooltip"), Some(plain), "instances are cached");
        assert_eq!(h.surface.tree().parent_of(plain), None);
        assert!(matches!(
            tooltip_events(&mut h).as_slice(),
            [SurfaceEvent::TooltipTransition(t)] if *t == fancy
        ));
    }

    #[test]
    fn locked_factory_is_not_an_error() {
        let mut h = Harness::new();
        let _w = with_tip(&mut h, "w", Rect::new(0.0, 0.0, 50.0, 50.0), "Help");
        let registry = h.registry.clone();
        let guard = registry.lock();
        h.move_to(10.0, 10.0);
        let _ = h.surface.inject_time_pulse(0.5);
        assert_eq!(h.surface.tooltip_window(), None);
        assert_eq!(h.surface.tooltip_state(), TooltipState::Idle, "source dropped");
        assert!(tooltip_events(&mut h).is_empty(), "nothing reported");
        drop(guard);
    }

    #[test]
    fn text_edits_reach_the_shown_tooltip() {
        let mut h = Harness::new();
        let w = with_tip(&mut h, "w", Rect::new(0.0, 0.0, 50.0, 50.0), "Help");
        h.move_to(10.0, 10.0);
        assert!(h.surface.show_tooltip(), "shown without waiting");
        let tip = h.surface.tooltip_window().expect("shown");

        h.surface.set_tooltip_text(w, "More help");
        assert_eq!(text_of(&h, tip), "More help");
        assert!(h.surface.hide_tooltip(), "was shown");
        assert!(!h.surface.hide_tooltip(), "already hidden");
    }

    const SURFACE: Size = Size::new(200.0, 100.0);

    #[test]
    fn sits_below_right_of_cursor_image() {
        let p = tooltip_origin(
            Point::new(10.0, 10.0),
            Size::new(8.0, 12.0),
            Size::new(50.0, 20.0),
            SURFACE,
        );
        assert_eq!(p, Point::new(18.0, 22.0), "offset by the cursor image");
    }

    #[test]
    fn flips_near_edges() {
        let p = tooltip_origin(
            Point::new(190.0, 90.0),
            Size::new(8.0, 8.0),
            Size::new(50.0, 20.0),
            SURFACE,
        );
        assert_eq!(p, Point::new(135.0, 65.0), "flipped left and up with a gap");
    }

    #[test]
    fn oversized_tooltip_clamps_to_origin() {
        let p = tooltip_origin(Point::ZERO, Size::ZERO, Size::new(300.0, 20.0), SURFACE);
        assert_eq!(p, Point::new(0.0, 0.0), "never placed at negative coordinates");
    }
}
