// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Routing input through a surface: clicks, keyboard focus, auto-repeat and a modal dialog.
//!
//! Run:
//! - `RUST_LOG=understory_surface=debug cargo run -p understory_demos --example surface_routing`

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Point, Rect};
use tracing_subscriber::EnvFilter;
use understory_surface::{
    ActivationEvent, ButtonEvent, EventCtx, KeyEvent, MouseButton, Registry, ScanCode, Surface,
    TextEvent, Viewport, Widget,
};
use understory_widget_tree::{WidgetFlags, WidgetProps};

type Log = Rc<RefCell<Vec<String>>>;

/// A push button that counts clicks of every order.
struct Button {
    label: &'static str,
    log: Log,
}

impl Widget for Button {
    fn on_click(&mut self, _: &mut EventCtx<'_>, event: &mut ButtonEvent) {
        self.log.borrow_mut().push(format!("{} clicked", self.label));
        event.handled = true;
    }

    fn on_double_click(&mut self, _: &mut EventCtx<'_>, event: &mut ButtonEvent) {
        self.log
            .borrow_mut()
            .push(format!("{} double-clicked", self.label));
        event.handled = true;
    }

    fn on_mouse_button_down(&mut self, _: &mut EventCtx<'_>, event: &mut ButtonEvent) {
        // Repeats arrive as presses while the button is held.
        if event.button == MouseButton::Left {
            self.log.borrow_mut().push(format!("{} pressed", self.label));
        }
        event.handled = true;
    }

    fn on_activated(&mut self, _: &mut EventCtx<'_>, _: &mut ActivationEvent) {
        self.log.borrow_mut().push(format!("{} focused", self.label));
    }
}

/// A single-line edit box that keeps the characters typed while it is active.
struct Edit {
    text: String,
    log: Log,
}

impl Widget for Edit {
    fn on_character(&mut self, _: &mut EventCtx<'_>, event: &mut TextEvent) {
        self.text.push(event.code_point);
        event.handled = true;
    }

    fn on_key_down(&mut self, _: &mut EventCtx<'_>, event: &mut KeyEvent) {
        if event.scan_code == ScanCode::RETURN {
            self.log
                .borrow_mut()
                .push(format!("edit submitted {:?}", self.text));
            event.handled = true;
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let log = Log::default();
    let viewport = Rc::new(Viewport::new(Rect::new(0.0, 0.0, 640.0, 480.0)));
    let mut surface = Surface::new(viewport.clone(), Rc::new(Registry::new()));

    let root = surface.insert_widget(
        None,
        WidgetProps::new("Root").with_rect(Rect::new(0.0, 0.0, 640.0, 480.0)),
        None,
    );
    surface.set_root(Some(root));

    let ok = surface.insert_widget(
        Some(root),
        WidgetProps::new("Button").with_rect(Rect::new(20.0, 20.0, 120.0, 50.0)),
        Some(Box::new(Button {
            label: "ok",
            log: log.clone(),
        })),
    );
    let edit = surface.insert_widget(
        Some(root),
        WidgetProps::new("Edit").with_rect(Rect::new(20.0, 70.0, 220.0, 100.0)),
        Some(Box::new(Edit {
            text: String::new(),
            log: log.clone(),
        })),
    );
    let _spin = surface.insert_widget(
        Some(root),
        WidgetProps::new("Button")
            .with_rect(Rect::new(240.0, 70.0, 270.0, 100.0))
            .with_auto_repeat(0.3, 0.1),
        Some(Box::new(Button {
            label: "spin",
            log: log.clone(),
        })),
    );

    // Click twice quickly on "ok".
    surface.inject_mouse_position(Point::new(40.0, 30.0));
    for _ in 0..2 {
        surface.inject_mouse_button_down(MouseButton::Left);
        surface.inject_mouse_button_up(MouseButton::Left);
        surface.inject_time_pulse(0.05);
    }
    assert_eq!(surface.active_window(), Some(ok));

    // Tab moves focus to the edit box, which then receives text.
    surface.inject_key_down(ScanCode::TAB);
    surface.inject_key_up(ScanCode::TAB);
    assert_eq!(surface.active_window(), Some(edit));
    for c in "hello".chars() {
        surface.inject_char(c);
    }
    surface.inject_key_down(ScanCode::RETURN);
    surface.inject_key_up(ScanCode::RETURN);

    // Hold the spin button for one second of simulated time.
    surface.inject_mouse_position(Point::new(250.0, 80.0));
    surface.inject_mouse_button_down(MouseButton::Left);
    for _ in 0..10 {
        surface.inject_time_pulse(0.1);
    }
    surface.inject_mouse_button_up(MouseButton::Left);

    // A modal dialog swallows clicks aimed at widgets behind it.
    let dialog = surface.insert_widget(
        Some(root),
        WidgetProps::new("Dialog")
            .with_rect(Rect::new(200.0, 150.0, 440.0, 330.0))
            .with_flag(WidgetFlags::RISE_ON_ACTIVATION, true),
        Some(Box::new(Button {
            label: "dialog",
            log: log.clone(),
        })),
    );
    surface.set_modal(Some(dialog));
    surface.inject_mouse_position(Point::new(40.0, 30.0));
    surface.inject_mouse_button_down(MouseButton::Left);
    surface.inject_mouse_button_up(MouseButton::Left);
    assert_eq!(surface.active_window(), Some(dialog));

    // Shrinking the host window reaches the cursor constraint.
    viewport.set_area(Rect::new(0.0, 0.0, 320.0, 240.0));
    surface.notify_area_changed();
    surface.inject_mouse_position(Point::new(1000.0, 1000.0));

    for line in log.borrow().iter() {
        println!("{line}");
    }
    println!("cursor clamped to {:?}", surface.cursor().position());
}
