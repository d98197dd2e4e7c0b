// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cursor position and image.

use kurbo::{Point, Rect, Size};
use understory_widget_tree::CursorImage;

/// The surface cursor.
///
/// The position is kept inside the constraint area (the surface bounds). The current image
/// is what the renderer draws; the default image is used whenever the hovered widget does
/// not name its own.
#[derive(Clone, Debug)]
pub struct Cursor {
    position: Point,
    constraint: Rect,
    image: Option<CursorImage>,
    default_image: Option<CursorImage>,
}

impl Cursor {
    /// Create a cursor centered in a surface of the given size.
    pub fn new(surface_size: Size) -> Self {
        let constraint = surface_size.to_rect();
        Self {
            position: constraint.center(),
            constraint,
            image: None,
            default_image: None,
        }
    }

    /// Position in surface coordinates.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Move the cursor, clamping into the constraint area.
    pub fn set_position(&mut self, position: Point) {
        self.position = Point::new(
            position.x.clamp(self.constraint.x0, self.constraint.x1.max(self.constraint.x0)),
            position.y.clamp(self.constraint.y0, self.constraint.y1.max(self.constraint.y0)),
        );
    }

    /// Area the cursor is kept in.
    pub fn constraint(&self) -> Rect {
        self.constraint
    }

    /// Follow a surface resize; the position is clamped into the new bounds.
    pub fn notify_target_size_changed(&mut self, size: Size) {
        self.constraint = size.to_rect();
        self.set_position(self.position);
    }

    /// The image currently shown.
    pub fn image(&self) -> Option<&CursorImage> {
        self.image.as_ref()
    }

    /// Rendered size of the current image, or zero when none is shown.
    pub fn image_size(&self) -> Size {
        self.image.as_ref().map(|i| i.size).unwrap_or(Size::ZERO)
    }

    /// The image used when the hovered widget names none.
    pub fn default_image(&self) -> Option<&CursorImage> {
        self.default_image.as_ref()
    }

    /// Replace the default image.
    pub fn set_default_image(&mut self, image: Option<CursorImage>) {
        self.default_image = image;
    }

    /// Replace the current image. Returns true if it changed.
    pub fn set_image(&mut self, image: Option<CursorImage>) -> bool {
        if self.image == image {
            return false;
        }
        self.image = image;
        true
    }
}
