// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared fixtures for the in-crate tests.

use alloc::boxed::Box;
use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;

use kurbo::{Point, Rect};
use understory_widget_tree::{WidgetId, WidgetProps};

use crate::config::SurfaceConfig;
use crate::event::{
    ActivationEvent, ButtonEvent, Callback, CursorEvent, KeyEvent, ScrollEvent, TextEvent,
    WidgetEvent,
};
use crate::factory::{NewWidget, Registry};
use crate::surface::Surface;
use crate::target::Viewport;
use crate::widget::{EventCtx, Widget};

pub(crate) type Log = Rc<RefCell<Vec<String>>>;

/// A widget that logs every callback as `"name:Callback"` and handles what it is told to.
#[derive(Default)]
pub(crate) struct Recorder {
    pub(crate) name: &'static str,
    pub(crate) log: Log,
    pub(crate) handle_down: bool,
    pub(crate) handle_up: bool,
    pub(crate) handle_clicks: bool,
    pub(crate) handle_single_click: bool,
    pub(crate) handle_moves: bool,
    pub(crate) handle_scroll: bool,
    pub(crate) handle_keys: bool,
    pub(crate) capture_on_down: bool,
    pub(crate) destroy_on_down: Option<WidgetId>,
}

impl Recorder {
    fn record(&self, callback: Callback) {
        self.log
            .borrow_mut()
            .push(format!("{}:{callback:?}", self.name));
    }
}

impl Widget for Recorder {
    fn on_cursor_enters(&mut self, _: &mut EventCtx<'_>, _: &mut CursorEvent) {
        self.record(Callback::CursorEnters);
    }
    fn on_cursor_leaves(&mut self, _: &mut EventCtx<'_>, _: &mut CursorEvent) {
        self.record(Callback::CursorLeaves);
    }
    fn on_cursor_enters_area(&mut self, _: &mut EventCtx<'_>, _: &mut CursorEvent) {
        self.record(Callback::CursorEntersArea);
    }
    fn on_cursor_leaves_area(&mut self, _: &mut EventCtx<'_>, _: &mut CursorEvent) {
        self.record(Callback::CursorLeavesArea);
    }
    fn on_cursor_move(&mut self, _: &mut EventCtx<'_>, event: &mut CursorEvent) {
        self.record(Callback::CursorMove);
        event.handled |= self.handle_moves;
    }
    fn on_mouse_button_down(&mut self, ctx: &mut EventCtx<'_>, event: &mut ButtonEvent) {
        self.record(Callback::MouseButtonDown);
        if self.capture_on_down {
            let _ = ctx.capture_input();
        }
        if let Some(victim) = self.destroy_on_down {
            ctx.surface().destroy_widget(victim);
        }
        event.handled |= self.handle_down;
    }
    fn on_mouse_button_up(&mut self, _: &mut EventCtx<'_>, event: &mut ButtonEvent) {
        self.record(Callback::MouseButtonUp);
        event.handled |= self.handle_up;
    }
    fn on_click(&mut self, _: &mut EventCtx<'_>, event: &mut ButtonEvent) {
        self.record(Callback::Click);
        event.handled |= self.handle_clicks || self.handle_single_click;
    }
    fn on_double_click(&mut self, _: &mut EventCtx<'_>, event: &mut ButtonEvent) {
        self.record(Callback::DoubleClick);
        event.handled |= self.handle_clicks;
    }
    fn on_triple_click(&mut self, _: &mut EventCtx<'_>, event: &mut ButtonEvent) {
        self.record(Callback::TripleClick);
        event.handled |= self.handle_clicks;
    }
    fn on_scroll(&mut self, _: &mut EventCtx<'_>, event: &mut ScrollEvent) {
        self.record(Callback::Scroll);
        event.handled |= self.handle_scroll;
    }
    fn on_key_down(&mut self, _: &mut EventCtx<'_>, event: &mut KeyEvent) {
        self.record(Callback::KeyDown);
        event.handled |= self.handle_keys;
    }
    fn on_key_up(&mut self, _: &mut EventCtx<'_>, event: &mut KeyEvent) {
        self.record(Callback::KeyUp);
        event.handled |= self.handle_keys;
    }
    fn on_character(&mut self, _: &mut EventCtx<'_>, event: &mut TextEvent) {
        self.record(Callback::Character);
        event.handled |= self.handle_keys;
    }
    fn on_capture_gained(&mut self, _: &mut EventCtx<'_>, _: &mut WidgetEvent) {
        self.record(Callback::CaptureGained);
    }
    fn on_capture_lost(&mut self, _: &mut EventCtx<'_>, _: &mut WidgetEvent) {
        self.record(Callback::CaptureLost);
    }
    fn on_activated(&mut self, _: &mut EventCtx<'_>, _: &mut ActivationEvent) {
        self.record(Callback::Activated);
    }
    fn on_deactivated(&mut self, _: &mut EventCtx<'_>, _: &mut ActivationEvent) {
        self.record(Callback::Deactivated);
    }
    fn on_attached(&mut self, _: &mut EventCtx<'_>) {
        self.record(Callback::Attached);
    }
    fn on_detached(&mut self, _: &mut EventCtx<'_>) {
        self.record(Callback::Detached);
    }
    fn on_text_changed(&mut self, _: &mut EventCtx<'_>) {
        self.record(Callback::TextChanged);
    }
    fn on_font_render_size_changed(&mut self, _: &mut EventCtx<'_>) {
        self.record(Callback::FontRenderSizeChanged);
    }
    fn on_surface_area_changed(&mut self, _: &mut EventCtx<'_>) {
        self.record(Callback::SurfaceAreaChanged);
    }
}

/// A 400x300 surface with a full-size root and a `"Tooltip"` type in its registry.
pub(crate) struct Harness {
    pub(crate) surface: Surface,
    pub(crate) log: Log,
    pub(crate) registry: Rc<Registry>,
    pub(crate) viewport: Rc<Viewport>,
    pub(crate) root: WidgetId,
}

impl Harness {
    pub(crate) fn new() -> Self {
        let log = Log::default();
        let registry = Rc::new(Registry::new());
        let tip_log = log.clone();
        registry.register("Tooltip", move || NewWidget {
            props: WidgetProps::new("Tooltip").with_rect(Rect::new(0.0, 0.0, 60.0, 20.0)),
            handler: Box::new(Recorder {
                name: "tip",
                log: tip_log.clone(),
                ..Recorder::default()
            }),
        });
        let viewport = Rc::new(Viewport::new(Rect::new(0.0, 0.0, 400.0, 300.0)));
        let mut surface = Surface::new(viewport.clone(), registry.clone())
            .with_config(SurfaceConfig::default().with_default_tooltip_type("Tooltip"));
        let root = surface.insert_widget(
            None,
            WidgetProps::new("Root").with_rect(Rect::new(0.0, 0.0, 400.0, 300.0)),
            Some(Box::new(Recorder {
                name: "root",
                log: log.clone(),
                ..Recorder::default()
            })),
        );
        surface.set_root(Some(root));
        let _ = surface.drain_events();
        log.borrow_mut().clear();
        Self {
            surface,
            log,
            registry,
            viewport,
            root,
        }
    }

    pub(crate) fn recorder(&self, name: &'static str) -> Recorder {
        Recorder {
            name,
            log: self.log.clone(),
            ..Recorder::default()
        }
    }

    /// Add a recording widget with default flags.
    pub(crate) fn add(&mut self, parent: WidgetId, name: &'static str, rect: Rect) -> WidgetId {
        let recorder = self.recorder(name);
        self.add_with(parent, WidgetProps::new(name).with_rect(rect), recorder)
    }

    pub(crate) fn add_with(
        &mut self,
        parent: WidgetId,
        props: WidgetProps,
        recorder: Recorder,
    ) -> WidgetId {
        let id = self
            .surface
            .insert_widget(Some(parent), props, Some(Box::new(recorder)));
        self.log.borrow_mut().clear();
        id
    }

    pub(crate) fn take_log(&self) -> Vec<String> {
        core::mem::take(&mut *self.log.borrow_mut())
    }

    /// Entries of the log that mention `callback`.
    pub(crate) fn take_log_of(&self, callback: Callback) -> Vec<String> {
        let suffix = format!(":{callback:?}");
        self.take_log()
            .into_iter()
            .filter(|e| e.ends_with(&suffix))
            .collect()
    }

    pub(crate) fn move_to(&mut self, x: f64, y: f64) {
        let _ = self.surface.inject_mouse_position(Point::new(x, y));
    }
}
