//! The [`Cell`] record and the [`clamp`] used at its single luminance
//! mutation point.

use crate::geom::Point;

/// `max(min, min(max, value))`, evaluated in that order.
///
/// When `min > max` the result is `min`. A NaN `value` yields `min`, so the
/// result is always a usable luminance; [`input::clamp_value`] keeps NaN for
/// hosts that want the arithmetic reading.
///
/// [`input::clamp_value`]: crate::input::clamp_value
#[inline]
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        return min;
    }
    let upper = if value < max { value } else { max };
    if upper > min { upper } else { min }
}

/// A named point light: a square of `resolution` surface pixels centered on
/// a logical position, shaded by its luminance.
///
/// `blocks_light` is stored for hosts that track occluders; nothing in this
/// crate reads it.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub position: Point,
    /// Side length of the rendered square in surface pixels. Callers must
    /// keep it positive; it is drawn as given.
    pub resolution: i32,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "de_luminance"))]
    luminance: f64,
    pub blocks_light: bool,
}

impl Cell {
    /// A dark cell.
    #[inline]
    pub const fn new(position: Point, resolution: i32, blocks_light: bool) -> Self {
        Self {
            position,
            resolution,
            luminance: 0.0,
            blocks_light,
        }
    }

    /// Current luminance, always within [0, 1].
    #[inline]
    pub const fn luminance(&self) -> f64 {
        self.luminance
    }

    /// Clamp `value` into [0, 1] and store it.
    #[inline]
    pub fn set_luminance(&mut self, value: f64) {
        self.luminance = clamp(value, 0.0, 1.0);
    }
}

#[cfg(feature = "serde")]
fn de_luminance<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let v = <f64 as serde::Deserialize>::deserialize(deserializer)?;
    Ok(clamp(v, 0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_basic() {
        assert_eq!(clamp(100.0, 0.0, 255.0), 100.0);
        assert_eq!(clamp(-3.0, 0.0, 1.0), 0.0);
        assert_eq!(clamp(7.5, 0.0, 1.0), 1.0);
    }

    #[test]
    fn clamp_inverted_bounds_yields_min() {
        assert_eq!(clamp(5.0, 3.0, 1.0), 3.0);
        assert_eq!(clamp(-5.0, 3.0, 1.0), 3.0);
    }

    #[test]
    fn clamp_nan_and_infinities() {
        assert_eq!(clamp(f64::NAN, 0.0, 1.0), 0.0);
        assert_eq!(clamp(f64::INFINITY, 0.0, 1.0), 1.0);
        assert_eq!(clamp(f64::NEG_INFINITY, 0.0, 1.0), 0.0);
    }

    #[test]
    fn luminance_is_clamped_on_write() {
        let mut c = Cell::new(Point::ZERO, 10, false);
        assert_eq!(c.luminance(), 0.0);
        for v in [-1.0, 0.25, 2.0, f64::NAN, f64::INFINITY] {
            c.set_luminance(v);
            assert!((0.0..=1.0).contains(&c.luminance()), "{v} -> {}", c.luminance());
        }
        c.set_luminance(0.25);
        assert_eq!(c.luminance(), 0.25);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_clamps_luminance() {
        let json = r#"{"position":{"x":1,"y":2},"resolution":4,"luminance":3.5,"blocks_light":true}"#;
        let c: Cell = serde_json::from_str(json).unwrap();
        assert_eq!(c.luminance(), 1.0);
        assert_eq!(c.position, Point::new(1, 2));
        assert!(c.blocks_light);
    }
}
