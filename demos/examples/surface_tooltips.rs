// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover tooltips driven by time pulses, printing each state the controller passes through.
//!
//! Run:
//! - `cargo run -p understory_demos --example surface_tooltips`

use std::rc::Rc;

use kurbo::{Point, Rect, Size};
use understory_surface::{
    EventCtx, NewWidget, Registry, Surface, SurfaceConfig, SurfaceEvent, Viewport, Widget,
    tooltip_origin,
};
use understory_widget_tree::{CursorImage, WidgetProps};

/// Prints the text it is asked to display.
struct Balloon;

impl Widget for Balloon {
    fn on_text_changed(&mut self, ctx: &mut EventCtx<'_>) {
        if let Some(props) = ctx.tree().props(ctx.widget())
            && !props.text.is_empty()
        {
            println!("  balloon reads {:?}", props.text);
        }
    }
}

fn report(surface: &mut Surface, step: &str) {
    println!("{step}: {:?}", surface.tooltip_state());
    for event in surface.drain_events() {
        match event {
            SurfaceEvent::TooltipActive(tip)
            | SurfaceEvent::TooltipInactive(tip)
            | SurfaceEvent::TooltipTransition(tip) => {
                let at = surface.tree().world_rect(tip).map(|r| r.origin());
                println!("  {event:?} at {at:?}");
            }
            _ => {}
        }
    }
}

fn main() {
    tracing_subscriber::fmt::init();

    let registry = Rc::new(Registry::new());
    registry.register("Balloon", || NewWidget {
        props: WidgetProps::new("Balloon").with_rect(Rect::new(0.0, 0.0, 120.0, 24.0)),
        handler: Box::new(Balloon),
    });

    let viewport = Rc::new(Viewport::new(Rect::new(0.0, 0.0, 400.0, 300.0)));
    let mut surface = Surface::new(viewport, registry).with_config(
        SurfaceConfig::default()
            .with_default_tooltip_type("Balloon")
            .with_tooltip_hover_time(0.5)
            .with_tooltip_display_time(3.0),
    );
    surface.set_default_cursor_image(Some(CursorImage::new("arrow", Size::new(12.0, 20.0))));

    let root = surface.insert_widget(
        None,
        WidgetProps::new("Root").with_rect(Rect::new(0.0, 0.0, 400.0, 300.0)),
        None,
    );
    surface.set_root(Some(root));
    let toolbar = surface.insert_widget(
        Some(root),
        WidgetProps::new("Toolbar")
            .with_rect(Rect::new(0.0, 0.0, 400.0, 40.0))
            .with_tooltip("Toolbar"),
        None,
    );
    for (i, text) in ["Open", "Save", ""].into_iter().enumerate() {
        let x = 10.0 + 40.0 * i as f64;
        // The empty one inherits the toolbar's text.
        let _ = surface.insert_widget(
            Some(toolbar),
            WidgetProps::new("Icon")
                .with_rect(Rect::new(x, 5.0, x + 30.0, 35.0))
                .with_tooltip(text),
            None,
        );
    }
    let _ = surface.drain_events();

    surface.inject_mouse_position(Point::new(20.0, 20.0));
    report(&mut surface, "over Open");
    surface.inject_time_pulse(0.6);
    report(&mut surface, "after the hover delay");
    surface.inject_mouse_position(Point::new(60.0, 20.0));
    report(&mut surface, "over Save");
    surface.inject_time_pulse(0.1);
    report(&mut surface, "next pulse");
    surface.inject_mouse_position(Point::new(100.0, 20.0));
    report(&mut surface, "over the unlabeled icon");
    surface.inject_time_pulse(3.5);
    report(&mut surface, "after the display time");
    surface.inject_mouse_position(Point::new(200.0, 200.0));
    report(&mut surface, "off the toolbar");

    // Near the bottom-right corner the balloon flips to the other side of the cursor.
    let corner = tooltip_origin(
        Point::new(390.0, 290.0),
        Size::new(12.0, 20.0),
        Size::new(120.0, 24.0),
        Size::new(400.0, 300.0),
    );
    println!("a balloon at the corner would sit at {corner:?}");
}
