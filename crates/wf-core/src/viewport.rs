//! Pan/zoom state and screen ↔ canvas coordinate transforms.
//!
//! `screen = canvas · scale + offset`, where `offset` is the screen-space
//! position of the canvas origin. Scale is always kept inside
//! [`MIN_SCALE`, `MAX_SCALE`].

use crate::model::{Point, Rect};
use serde::{Deserialize, Serialize};

pub const MIN_SCALE: f32 = 0.2;
pub const MAX_SCALE: f32 = 3.0;

fn is_finite(p: Point) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

/// Host surface dimensions in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: f32,
    pub height: f32,
}

impl Default for ViewportSize {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// The persisted part of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub scale: f32,
    pub offset: Point,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Point::ORIGIN,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewportController {
    scale: f32,
    offset: Point,
    /// Last screen position seen during an active pan gesture.
    pan_anchor: Option<Point>,
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewportController {
    pub fn new() -> Self {
        Self {
            scale: 1.0,
            offset: Point::ORIGIN,
            pan_anchor: None,
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn transform(&self) -> ViewTransform {
        ViewTransform {
            scale: self.scale,
            offset: self.offset,
        }
    }

    /// Restore a persisted transform. The scale is clamped into range.
    pub fn set_transform(&mut self, transform: ViewTransform) {
        if transform.scale.is_finite() {
            self.scale = transform.scale.clamp(MIN_SCALE, MAX_SCALE);
        }
        if transform.offset.x.is_finite() && transform.offset.y.is_finite() {
            self.offset = transform.offset;
        }
    }

    // ─── Zoom ────────────────────────────────────────────────────────────

    /// Additive zoom: `scale ← clamp(scale + delta)`.
    pub fn zoom(&mut self, delta: f32) {
        if !delta.is_finite() {
            return;
        }
        self.scale = (self.scale + delta).clamp(MIN_SCALE, MAX_SCALE);
    }

    /// Zoom while keeping the canvas point under `anchor` fixed on screen.
    /// Ignored when either input is not finite.
    pub fn zoom_at(&mut self, delta: f32, anchor: Point) {
        if !delta.is_finite() || !is_finite(anchor) {
            return;
        }
        let pinned = self.to_canvas_point(anchor);
        self.zoom(delta);
        self.offset = Point::new(
            anchor.x - pinned.x * self.scale,
            anchor.y - pinned.y * self.scale,
        );
    }

    // ─── Pan ─────────────────────────────────────────────────────────────

    /// Start a pan gesture at `screen`. Non-finite points are ignored.
    pub fn begin_pan(&mut self, screen: Point) {
        if is_finite(screen) {
            self.pan_anchor = Some(screen);
        }
    }

    pub fn is_panning(&self) -> bool {
        self.pan_anchor.is_some()
    }

    /// Shift the offset by a screen-space delta. Ignored outside a pan gesture.
    pub fn pan(&mut self, dx: f32, dy: f32) -> bool {
        if self.pan_anchor.is_none() || !dx.is_finite() || !dy.is_finite() {
            return false;
        }
        self.offset.x += dx;
        self.offset.y += dy;
        true
    }

    /// Pan by the distance from the last seen pointer to `screen`.
    ///
    /// Coalescing several moves into one yields the same final offset.
    pub fn pan_to(&mut self, screen: Point) -> bool {
        let Some(last) = self.pan_anchor else {
            return false;
        };
        if !is_finite(screen) {
            return false;
        }
        let moved = self.pan(screen.x - last.x, screen.y - last.y);
        self.pan_anchor = Some(screen);
        moved
    }

    pub fn end_pan(&mut self) {
        self.pan_anchor = None;
    }

    // ─── Coordinate transforms ───────────────────────────────────────────

    pub fn to_canvas_point(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.offset.x) / self.scale,
            (screen.y - self.offset.y) / self.scale,
        )
    }

    pub fn to_screen_point(&self, canvas: Point) -> Point {
        Point::new(
            canvas.x * self.scale + self.offset.x,
            canvas.y * self.scale + self.offset.y,
        )
    }

    pub fn to_screen_rect(&self, canvas: Rect) -> Rect {
        let origin = self.to_screen_point(Point::new(canvas.x, canvas.y));
        Rect {
            x: origin.x,
            y: origin.y,
            width: canvas.width * self.scale,
            height: canvas.height * self.scale,
        }
    }

    // ─── Framing ─────────────────────────────────────────────────────────

    /// Frame every rect inside `size`, never zooming past 100%.
    ///
    /// The content box is the union of `rects` grown by `padding` on each
    /// side. Returns `false` (and changes nothing) for an empty rect set.
    pub fn fit_to_content(
        &mut self,
        rects: impl IntoIterator<Item = Rect>,
        size: ViewportSize,
        padding: f32,
    ) -> bool {
        let Some(bounds) = Rect::union_all(rects) else {
            return false;
        };

        let content_w = bounds.width + 2.0 * padding;
        let content_h = bounds.height + 2.0 * padding;
        let scale = (size.width / content_w)
            .min(size.height / content_h)
            .min(1.0)
            .clamp(MIN_SCALE, MAX_SCALE);

        self.scale = scale;
        self.offset = Point::new(
            (size.width - content_w * scale) / 2.0 - bounds.x * scale,
            (size.height - content_h * scale) / 2.0 - bounds.y * scale,
        );
        log::debug!(
            "fit to content: scale {scale:.3}, offset ({:.1}, {:.1})",
            self.offset.x,
            self.offset.y
        );
        true
    }

    /// Back to 100% with the canvas origin at the screen origin.
    pub fn reset(&mut self) {
        self.scale = 1.0;
        self.offset = Point::ORIGIN;
        self.pan_anchor = None;
    }
}
