//! Pixel-space geometry of the rendered field surface.
//!
//! The presentation layer reports the field's bounding rectangle at gesture
//! commit time. Everything here converts pixels into visual-frame percentages;
//! nothing here knows about orientation.

use serde::{Deserialize, Serialize};

use super::coordinates::{VisualDelta, VisualPos, PERCENT_MAX};

/// A point in client pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn offset(self, delta: PixelDelta) -> Self {
        Self { x: self.x + delta.dx, y: self.y + delta.dy }
    }
}

/// Cumulative pointer travel in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelDelta {
    pub dx: f64,
    pub dy: f64,
}

impl PixelDelta {
    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    #[inline]
    pub fn length(self) -> f64 {
        self.dx.hypot(self.dy)
    }
}

/// Bounding rectangle of the field surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl FieldRect {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// Absolute pointer position → percent of the rectangle.
    ///
    /// A zero-sized rectangle yields non-finite values; the reconciler treats
    /// those as an invalid computation.
    pub fn to_visual_percent(&self, point: PixelPoint) -> VisualPos {
        VisualPos {
            x: (point.x - self.left) / self.width * PERCENT_MAX,
            y: (point.y - self.top) / self.height * PERCENT_MAX,
        }
    }

    /// Pixel delta → percent-of-rectangle delta.
    pub fn delta_to_visual_percent(&self, delta: PixelDelta) -> VisualDelta {
        VisualDelta { dx: delta.dx / self.width * PERCENT_MAX, dy: delta.dy / self.height * PERCENT_MAX }
    }

    /// Visual percent → pixel position, for hosts that place markers absolutely.
    pub fn to_pixels(&self, pos: VisualPos) -> PixelPoint {
        PixelPoint {
            x: self.left + pos.x / PERCENT_MAX * self.width,
            y: self.top + pos.y / PERCENT_MAX * self.height,
        }
    }

    pub fn contains(&self, point: PixelPoint) -> bool {
        point.x >= self.left
            && point.x <= self.left + self.width
            && point.y >= self.top
            && point.y <= self.top + self.height
    }
}
