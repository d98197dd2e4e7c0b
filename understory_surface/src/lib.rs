// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_surface --heading-base-level=0

//! Understory Surface: input routing and focus management for one rendering surface.
//!
//! ## Overview
//!
//! A [`Surface`] owns a widget tree (from `understory_widget_tree`) together with the
//! behavior attached to each widget, and turns raw device input into widget callbacks.
//! It also owns the state that belongs to no single widget:
//!
//! - the root widget and the active (focused) widget,
//! - a modal widget that confines hit testing and event walks to its subtree,
//! - input capture, with one level of restore for widgets that ask for it,
//! - the widget under the cursor, with enter/leave notifications,
//! - multi-click synthesis and button auto-repeat,
//! - a hover-triggered tooltip.
//!
//! ## Routing
//!
//! Cursor input goes to the capture holder if there is one (refined to the child under the
//! cursor when the holder distributes captured input), otherwise to the deepest widget under
//! the cursor. A modal widget overrides any target outside its subtree. Keyboard and text
//! input goes to the active widget, unless it lies outside the capture holder or the modal
//! widget.
//!
//! From the target, the event walks toward the root until a widget marks it handled. The
//! modal widget is the last widget a walk reaches. Button press and release walks also end
//! at widgets that do not propagate cursor input.
//!
//! ## Widget references stay valid
//!
//! Widget callbacks may mutate the tree while an event is being dispatched. Every removal of
//! a widget from the root's tree passes through one detachment step that clears whichever
//! surface references name it, so the surface never routes to a departed widget.
//!
//! ## Example
//!
//! ```rust
//! use std::rc::Rc;
//!
//! use kurbo::{Point, Rect};
//! use understory_surface::{ButtonEvent, EventCtx, MouseButton, Registry, Surface, Viewport, Widget};
//! use understory_widget_tree::WidgetProps;
//!
//! struct Button;
//!
//! impl Widget for Button {
//!     fn on_click(&mut self, _ctx: &mut EventCtx<'_>, event: &mut ButtonEvent) {
//!         event.handled = true;
//!     }
//! }
//!
//! let target = Rc::new(Viewport::new(Rect::new(0.0, 0.0, 320.0, 240.0)));
//! let mut surface = Surface::new(target, Rc::new(Registry::new()));
//!
//! let root = surface.insert_widget(
//!     None,
//!     WidgetProps::new("Root").with_rect(Rect::new(0.0, 0.0, 320.0, 240.0)),
//!     None,
//! );
//! surface.set_root(Some(root));
//! let ok = surface.insert_widget(
//!     Some(root),
//!     WidgetProps::new("Button").with_rect(Rect::new(10.0, 10.0, 90.0, 40.0)),
//!     Some(Box::new(Button)),
//! );
//!
//! surface.inject_mouse_position(Point::new(20.0, 20.0));
//! assert!(surface.inject_mouse_button_down(MouseButton::Left));
//! assert!(surface.inject_mouse_button_up(MouseButton::Left));
//! assert_eq!(surface.active_window(), Some(ok));
//! ```
//!
//! ## Collaborators
//!
//! - [`WidgetFactory`] creates widgets by type name; the surface uses it for tooltips.
//!   [`Registry`] is a ready-made implementation.
//! - [`RenderTarget`] reports the surface area; [`Viewport`] is a host-resized one.
//! - [`Navigator`] picks a new active widget for unhandled keys; [`FocusNavigator`] does
//!   Tab and arrow-key navigation.
//!
//! Logging goes through `tracing`; install a subscriber in the host to see it.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod cursor;
mod dispatch;
mod event;
mod factory;
mod navigator;
mod surface;
mod target;
mod tooltip;
mod widget;

pub use config::SurfaceConfig;
pub use cursor::Cursor;
pub use event::{
    ActivationEvent, ButtonEvent, Callback, CursorEvent, Event, KeyEvent, Modifiers,
    MouseButton, MouseButtons, ScanCode, ScrollEvent, TextEvent, WidgetEvent,
};
pub use factory::{NewWidget, Registry, RegistryLock, WidgetFactory};
pub use navigator::{FocusNavigator, Navigation, Navigator, WrapMode};
pub use surface::{Surface, SurfaceEvent};
pub use target::{RenderTarget, Viewport};
pub use tooltip::{TooltipState, tooltip_origin};
pub use widget::{EventCtx, Widget};

#[cfg(test)]
mod testing;
