//! The [`Surface`] trait: what the renderer needs from a drawing target.

use thiserror::Error;

use crate::color::Rgba;

/// A raster target with a layout size and a minimal 2D context.
///
/// Coordinates are surface pixels with the origin at the top-left corner.
/// Rectangles may be fractional, negative or non-finite; implementations
/// clip and normalize them the way a 2D canvas does.
pub trait Surface {
    /// Current displayed size in layout pixels (width, height).
    fn layout_size(&self) -> (u32, u32);

    /// Resize the backing pixel buffer. Contents are unspecified afterwards.
    fn resize_buffer(&mut self, width: u32, height: u32);

    /// Reset the pixels in the rectangle to fully transparent.
    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64);

    /// Colour used by subsequent [`fill_rect`](Surface::fill_rect) calls.
    fn set_fill_color(&mut self, color: Rgba);

    /// Fill the rectangle with the current fill colour.
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64);
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn layout_size(&self) -> (u32, u32) {
        (**self).layout_size()
    }

    fn resize_buffer(&mut self, width: u32, height: u32) {
        (**self).resize_buffer(width, height)
    }

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        (**self).clear_rect(x, y, w, h)
    }

    fn set_fill_color(&mut self, color: Rgba) {
        (**self).set_fill_color(color)
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        (**self).fill_rect(x, y, w, h)
    }
}

/// Why a surface could not be acquired.
#[derive(Error, Debug)]
pub enum SurfaceError {
    #[error("surface host not found: {0}")]
    HostNotFound(String),
    #[error("failed to get 2d context")]
    ContextUnavailable,
    #[error("failed to cast context")]
    ContextCast,
    #[error("surface backend error: {0}")]
    Backend(String),
}
