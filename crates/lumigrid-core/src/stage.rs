//! The fixed affine map between logical stage space and surface pixels.
//!
//! Logical space is 480 × 360 units centered on the origin with Y up.
//! Surface space is pixels from the top-left corner with Y down.

use crate::geom::{Point, Rect};

/// Logical stage dimensions and the transforms that go with them.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Stage;

impl Stage {
    pub const LOGICAL_WIDTH: f64 = 480.0;
    pub const LOGICAL_HEIGHT: f64 = 360.0;
    pub const HALF_WIDTH: f64 = Self::LOGICAL_WIDTH / 2.0;
    pub const HALF_HEIGHT: f64 = Self::LOGICAL_HEIGHT / 2.0;

    /// Surface rectangle of a cell at `pos` with side `resolution` pixels on
    /// a `surface_w` × `surface_h` surface.
    ///
    /// The square is centered on the mapped position. Its side is in device
    /// pixels and is not scaled with the surface.
    pub fn to_surface(pos: Point, resolution: i32, surface_w: f64, surface_h: f64) -> Rect {
        let half = resolution as f64 / 2.0;
        let px = (pos.x as f64 + Self::HALF_WIDTH) * (surface_w / Self::LOGICAL_WIDTH) - half;
        let py = (Self::HALF_HEIGHT - pos.y as f64) * (surface_h / Self::LOGICAL_HEIGHT) - half;
        Rect::new(px, py, resolution as f64, resolution as f64)
    }

    /// Logical coordinates of surface pixel (`px`, `py`).
    pub fn to_logical(px: f64, py: f64, surface_w: f64, surface_h: f64) -> (f64, f64) {
        let x = px * (Self::LOGICAL_WIDTH / surface_w) - Self::HALF_WIDTH;
        let y = Self::HALF_HEIGHT - py * (Self::LOGICAL_HEIGHT / surface_h);
        (x, y)
    }

    /// Whether `pos` lies within the visible logical extents (inclusive).
    pub fn contains(pos: Point) -> bool {
        let (x, y) = (pos.x as f64, pos.y as f64);
        (-Self::HALF_WIDTH..=Self::HALF_WIDTH).contains(&x)
            && (-Self::HALF_HEIGHT..=Self::HALF_HEIGHT).contains(&y)
    }
}
