//! Coordinate contract between the logical pitch and what is on screen.
//!
//! ## Coordinate Systems
//!
//! **Logical** (stored on every roster entry, orientation-independent):
//! - X: 0 = left sideline, 100 = right sideline
//! - Y: 0 = top goal line, 100 = bottom goal line
//!
//! **Visual** (whatever the presentation layer currently renders):
//! - `Vertical`: identical to logical (portrait pitch)
//! - `Horizontal`: the pitch rotated a quarter turn (landscape). Logical Y runs
//!   left to right, logical X runs bottom to top.
//!
//! All conversions go through `to_visual` / `to_logical` / `apply_visual_delta`.
//! Call sites never flip signs on their own.

use serde::{Deserialize, Serialize};

/// Upper bound of both axes in either frame.
pub const PERCENT_MAX: f64 = 100.0;

/// Rendering orientation of the field surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Portrait layout, goals at top and bottom.
    #[default]
    Vertical,
    /// Landscape layout, goals at left and right.
    Horizontal,
}

impl Orientation {
    /// Portrait on narrow screens, landscape from the desktop breakpoint up.
    pub fn for_viewport(is_desktop: bool) -> Self {
        if is_desktop {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "vertical" | "portrait" => Some(Orientation::Vertical),
            "horizontal" | "landscape" => Some(Orientation::Horizontal),
            _ => None,
        }
    }
}

/// Position in the canonical vertical-pitch frame, percent units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LogicalPos {
    pub x: f64,
    pub y: f64,
}

impl LogicalPos {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn distance(self, other: LogicalPos) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Clamp both axes into [0, 100] and round to two decimals.
    pub fn settled(self) -> Self {
        Self { x: round2(clamp_percent(self.x)), y: round2(clamp_percent(self.y)) }
    }
}

/// Position in the currently rendered frame, percent of the field rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VisualPos {
    pub x: f64,
    pub y: f64,
}

impl VisualPos {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Delta in the visual frame, percent of the field rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VisualDelta {
    pub dx: f64,
    pub dy: f64,
}

impl VisualDelta {
    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }
}

/// Logical → visual.
///
/// Horizontal: `(vx, vy) = (ly, 100 - lx)`.
#[inline]
pub fn to_visual(pos: LogicalPos, orientation: Orientation) -> VisualPos {
    match orientation {
        Orientation::Vertical => VisualPos { x: pos.x, y: pos.y },
        Orientation::Horizontal => VisualPos { x: pos.y, y: PERCENT_MAX - pos.x },
    }
}

/// Visual → logical. Exact inverse of [`to_visual`].
///
/// Horizontal: `(lx, ly) = (100 - vy, vx)`.
#[inline]
pub fn to_logical(pos: VisualPos, orientation: Orientation) -> LogicalPos {
    match orientation {
        Orientation::Vertical => LogicalPos { x: pos.x, y: pos.y },
        Orientation::Horizontal => LogicalPos { x: PERCENT_MAX - pos.y, y: pos.x },
    }
}

/// Move a logical position by a delta observed on screen.
///
/// Rotation-consistent with [`to_visual`]: a visual step right is a logical
/// step down the pitch in landscape, a visual step down is a logical step
/// toward the left sideline.
#[inline]
pub fn apply_visual_delta(pos: LogicalPos, delta: VisualDelta, orientation: Orientation) -> LogicalPos {
    match orientation {
        Orientation::Vertical => LogicalPos { x: pos.x + delta.dx, y: pos.y + delta.dy },
        Orientation::Horizontal => LogicalPos { x: pos.x - delta.dy, y: pos.y + delta.dx },
    }
}

/// Clamp a percent value into [0, 100]. NaN passes through unchanged so the
/// caller can still detect it.
#[inline]
pub fn clamp_percent(value: f64) -> f64 {
    value.clamp(0.0, PERCENT_MAX)
}

/// Round to two decimal places.
#[inline]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
