//! Repaints a [`CellRegistry`] onto a [`Surface`].
//!
//! Each redraw is a full repaint: the backing buffer is resized to the
//! surface's current layout size, cleared to transparent, and every cell is
//! filled as an opaque gray square in registry order. Later cells cover
//! earlier ones where they overlap.

use log::warn;

use crate::color::Rgba;
use crate::registry::CellRegistry;
use crate::stage::Stage;
use crate::surface::{Surface, SurfaceError};

pub struct Renderer<S: Surface> {
    surface: Option<S>,
}

impl<S: Surface> Renderer<S> {
    /// A renderer drawing into `surface`.
    pub fn new(surface: S) -> Self {
        Self {
            surface: Some(surface),
        }
    }

    /// A renderer without a surface. [`redraw`](Self::redraw) does nothing.
    pub fn detached() -> Self {
        Self { surface: None }
    }

    /// Take the outcome of acquiring a surface. On failure a warning is
    /// logged and the renderer runs detached.
    pub fn attach(acquired: Result<S, SurfaceError>) -> Self {
        match acquired {
            Ok(surface) => Self::new(surface),
            Err(err) => {
                warn!("failed to attach surface, rendering disabled: {err}");
                Self::detached()
            }
        }
    }

    #[inline]
    pub fn is_attached(&self) -> bool {
        self.surface.is_some()
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    /// Give the surface back, e.g. to read the finished pixels.
    pub fn into_surface(self) -> Option<S> {
        self.surface
    }

    /// Repaint every cell of `cells`.
    pub fn redraw(&mut self, cells: &CellRegistry) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };

        let (width, height) = surface.layout_size();
        surface.resize_buffer(width, height);
        let (w, h) = (width as f64, height as f64);
        surface.clear_rect(0.0, 0.0, w, h);

        for cell in cells.cells() {
            surface.set_fill_color(Rgba::from_luminance(cell.luminance()));
            let r = Stage::to_surface(cell.position, cell.resolution, w, h);
            surface.fill_rect(r.x, r.y, r.w, r.h);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Rect;
    use crate::input::CellSpec;
    use crate::pixel::PixelSurface;

    /// Records every call, for checking the exact draw sequence.
    #[derive(Default)]
    struct Recorder {
        layout: (u32, u32),
        ops: Vec<Op>,
    }

    #[derive(Debug, PartialEq)]
    enum Op {
        Resize(u32, u32),
        Clear(Rect),
        Fill(Rgba),
        Rect(Rect),
    }

    impl Surface for Recorder {
        fn layout_size(&self) -> (u32, u32) {
            self.layout
        }
        fn resize_buffer(&mut self, width: u32, height: u32) {
            self.ops.push(Op::Resize(width, height));
        }
        fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
            self.ops.push(Op::Clear(Rect::new(x, y, w, h)));
        }
        fn set_fill_color(&mut self, color: Rgba) {
            self.ops.push(Op::Fill(color));
        }
        fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
            self.ops.push(Op::Rect(Rect::new(x, y, w, h)));
        }
    }

    fn recorder(w: u32, h: u32) -> Recorder {
        Recorder {
            layout: (w, h),
            ..Default::default()
        }
    }

    #[test]
    fn detached_redraw_is_a_no_op() {
        let mut r: Renderer<PixelSurface> = Renderer::detached();
        let mut cells = CellRegistry::new();
        cells.create_cell(CellSpec::new(0, 0, 10, "a", false));
        r.redraw(&cells);
        assert!(!r.is_attached());
        assert!(r.surface().is_none());
    }

    #[test]
    fn attach_failure_degrades() {
        let r: Renderer<PixelSurface> = Renderer::attach(Err(SurfaceError::ContextUnavailable));
        assert!(!r.is_attached());
        let r = Renderer::attach(Ok(PixelSurface::new(4, 4)));
        assert!(r.is_attached());
    }

    #[test]
    fn draw_sequence() {
        let mut cells = CellRegistry::new();
        cells.create_cell(CellSpec::new(0, 0, 0, "origin", false));
        cells.create_cell(CellSpec::new(-240, 180, 4, "corner", true));
        cells.set_luminance("corner", 0.5);

        let mut r = Renderer::new(recorder(480, 360));
        r.redraw(&cells);
        let ops = &r.surface().unwrap().ops;
        assert_eq!(
            ops,
            &[
                Op::Resize(480, 360),
                Op::Clear(Rect::new(0.0, 0.0, 480.0, 360.0)),
                Op::Fill(Rgba::gray(0)),
                Op::Rect(Rect::new(240.0, 180.0, 0.0, 0.0)),
                Op::Fill(Rgba::gray(127)),
                Op::Rect(Rect::new(-2.0, -2.0, 4.0, 4.0)),
            ]
        );
    }

    #[test]
    fn buffer_follows_current_layout() {
        let mut cells = CellRegistry::new();
        cells.create_cell(CellSpec::new(0, 0, 2, "a", false));
        let mut r = Renderer::new(PixelSurface::new(480, 360));
        r.redraw(&cells);
        assert_eq!(r.surface().unwrap().width(), 480);

        r.surface_mut().unwrap().set_layout_size(960, 720);
        r.redraw(&cells);
        let s = r.surface().unwrap();
        assert_eq!((s.width(), s.height()), (960, 720));
        // side stays 2 device pixels, centered on (480, 360)
        let lit: Vec<_> = (0..960)
            .flat_map(|x| (0..720).map(move |y| (x, y)))
            .filter(|&(x, y)| s.pixel(x, y) == Some(Rgba::gray(0)))
            .collect();
        assert_eq!(lit, [(479, 359), (479, 360), (480, 359), (480, 360)]);
    }

    #[test]
    fn full_repaint_forgets_previous_frame() {
        let mut cells = CellRegistry::new();
        cells.create_cell(CellSpec::new(0, 0, 4, "a", false));
        cells.set_luminance("a", 1.0);
        let mut r = Renderer::new(PixelSurface::new(48, 36));
        r.redraw(&cells);
        assert_eq!(r.surface().unwrap().pixel(24, 18), Some(Rgba::gray(255)));

        cells.move_cell("a", 200, 0);
        r.redraw(&cells);
        let s = r.surface().unwrap();
        assert_eq!(s.pixel(24, 18), Some(Rgba::TRANSPARENT));
        assert_eq!(s.pixel(44, 18), Some(Rgba::gray(255)));
    }

    #[test]
    fn later_cells_cover_earlier_ones() {
        let mut cells = CellRegistry::new();
        cells.create_cell(CellSpec::new(0, 0, 4, "under", false));
        cells.create_cell(CellSpec::new(0, 0, 2, "over", false));
        cells.set_luminance("under", 1.0);
        cells.set_luminance("over", 0.2);
        let mut r = Renderer::new(PixelSurface::new(480, 360));
        r.redraw(&cells);
        let s = r.surface().unwrap();
        assert_eq!(s.pixel(240, 180), Some(Rgba::gray(51)));
        assert_eq!(s.pixel(238, 178), Some(Rgba::gray(255)));
    }
}
