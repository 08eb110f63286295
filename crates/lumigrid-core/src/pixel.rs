//! A software [`Surface`] backed by a `Vec<u32>` of ARGB pixels.
//!
//! Native drivers render into a [`PixelSurface`] and then copy it into
//! whatever the windowing layer presents; headless tools read it directly.

use std::io::{self, Write};

use log::debug;

use crate::color::Rgba;
use crate::geom::Rect;
use crate::surface::Surface;

pub struct PixelSurface {
    /// ARGB pixel buffer, `width * height`, row-major.
    pixels: Vec<u32>,
    width: u32,
    height: u32,
    layout: (u32, u32),
    fill: Rgba,
}

impl PixelSurface {
    /// A surface whose layout size is `width` × `height`. The buffer itself
    /// stays empty until the first resize.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: Vec::new(),
            width: 0,
            height: 0,
            layout: (width, height),
            fill: Rgba::BLACK,
        }
    }

    /// Update the displayed size, e.g. after a window resize. Takes effect at
    /// the next redraw.
    pub fn set_layout_size(&mut self, width: u32, height: u32) {
        self.layout = (width, height);
    }

    /// Buffer width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Buffer height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Pixel at (`x`, `y`), or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y as usize * self.width as usize + x as usize;
        self.pixels.get(idx).copied().map(Rgba)
    }

    /// Pixel index span `[start, end)` covered along one axis by `[pos, pos +
    /// len)`, using pixel centers, clipped to `[0, limit)`.
    fn span(pos: f64, len: f64, limit: u32) -> (usize, usize) {
        let limit = limit as f64;
        let start = (pos - 0.5).ceil().clamp(0.0, limit);
        let end = (pos + len - 0.5).ceil().clamp(0.0, limit);
        (start as usize, end as usize)
    }

    fn paint(&mut self, rect: Rect, value: u32) {
        let r = rect.normalized();
        if r.is_empty() {
            return;
        }
        let (x0, x1) = Self::span(r.x, r.w, self.width);
        let (y0, y1) = Self::span(r.y, r.h, self.height);
        if x0 >= x1 {
            return;
        }
        let stride = self.width as usize;
        for y in y0..y1 {
            let row = y * stride;
            self.pixels[row + x0..row + x1].fill(value);
        }
    }

    /// Copy the buffer into `dst` (`dst_width` × `dst_height`, 0x00RRGGBB),
    /// replacing transparent pixels with `background`. Areas of `dst` outside
    /// the buffer are filled with `background` too.
    pub fn composite_into(&self, dst: &mut [u32], dst_width: usize, dst_height: usize, background: Rgba) {
        let bg = background.0 & 0x00FF_FFFF;
        let src_w = self.width as usize;
        let src_h = self.height as usize;
        let copy_w = src_w.min(dst_width);
        let copy_h = src_h.min(dst_height);

        if dst_width > src_w || dst_height > src_h {
            dst.fill(bg);
        }

        for y in 0..copy_h {
            let src = &self.pixels[y * src_w..y * src_w + copy_w];
            let dst_start = y * dst_width;
            let Some(dst_row) = dst.get_mut(dst_start..dst_start + copy_w) else {
                break;
            };
            for (d, &s) in dst_row.iter_mut().zip(src) {
                *d = if Rgba(s).is_transparent() { bg } else { s & 0x00FF_FFFF };
            }
        }
    }

    /// Write the buffer as a binary PPM (P6) image, transparent pixels
    /// replaced with `background`.
    pub fn write_ppm<W: Write>(&self, mut out: W, background: Rgba) -> io::Result<()> {
        write!(out, "P6\n{} {}\n255\n", self.width, self.height)?;
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for &p in &self.pixels {
            let c = if Rgba(p).is_transparent() { background } else { Rgba(p) };
            bytes.extend_from_slice(&[c.r(), c.g(), c.b()]);
        }
        out.write_all(&bytes)
    }
}

impl Surface for PixelSurface {
    fn layout_size(&self) -> (u32, u32) {
        self.layout
    }

    fn resize_buffer(&mut self, width: u32, height: u32) {
        if (width, height) != (self.width, self.height) {
            debug!("pixel surface resized to {width}x{height}");
        }
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width as usize * height as usize, Rgba::TRANSPARENT.0);
    }

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.paint(Rect::new(x, y, w, h), Rgba::TRANSPARENT.0);
    }

    fn set_fill_color(&mut self, color: Rgba) {
        self.fill = color;
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        let fill = self.fill.0;
        self.paint(Rect::new(x, y, w, h), fill);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface(w: u32, h: u32) -> PixelSurface {
        let mut s = PixelSurface::new(w, h);
        s.resize_buffer(w, h);
        s
    }

    fn count(s: &PixelSurface, c: Rgba) -> usize {
        s.pixels().iter().filter(|&&p| p == c.0).count()
    }

    #[test]
    fn resize_clears_to_transparent() {
        let s = surface(4, 3);
        assert_eq!(s.pixels().len(), 12);
        assert_eq!(count(&s, Rgba::TRANSPARENT), 12);
    }

    #[test]
    fn integer_fill() {
        let mut s = surface(8, 8);
        s.set_fill_color(Rgba::gray(200));
        s.fill_rect(2.0, 3.0, 2.0, 2.0);
        assert_eq!(count(&s, Rgba::gray(200)), 4);
        assert_eq!(s.pixel(2, 3), Some(Rgba::gray(200)));
        assert_eq!(s.pixel(3, 4), Some(Rgba::gray(200)));
        assert_eq!(s.pixel(4, 4), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn fractional_fill_uses_pixel_centers() {
        let mut s = surface(8, 8);
        s.set_fill_color(Rgba::gray(9));
        // covers centers 1.5 and 2.5 on x, 0.5 on y
        s.fill_rect(1.2, 0.0, 2.0, 1.0);
        assert_eq!(count(&s, Rgba::gray(9)), 2);
        assert_eq!(s.pixel(1, 0), Some(Rgba::gray(9)));
        assert_eq!(s.pixel(2, 0), Some(Rgba::gray(9)));
    }

    #[test]
    fn fill_clips_and_normalizes() {
        let mut s = surface(4, 4);
        s.set_fill_color(Rgba::gray(1));
        s.fill_rect(-10.0, -10.0, 12.0, 12.0);
        assert_eq!(count(&s, Rgba::gray(1)), 4);
        s.set_fill_color(Rgba::gray(2));
        s.fill_rect(4.0, 4.0, -1.0, -1.0);
        assert_eq!(s.pixel(3, 3), Some(Rgba::gray(2)));
        s.fill_rect(100.0, 100.0, 5.0, 5.0);
        s.fill_rect(f64::NAN, 0.0, 5.0, 5.0);
        assert_eq!(count(&s, Rgba::gray(2)), 1);
    }

    #[test]
    fn clear_rect_resets() {
        let mut s = surface(3, 3);
        s.fill_rect(0.0, 0.0, 3.0, 3.0);
        s.clear_rect(0.0, 0.0, 3.0, 3.0);
        assert_eq!(count(&s, Rgba::TRANSPARENT), 9);
    }

    #[test]
    fn composite_replaces_transparent() {
        let mut s = surface(2, 1);
        s.set_fill_color(Rgba::gray(0x10));
        s.fill_rect(0.0, 0.0, 1.0, 1.0);
        let mut dst = vec![0u32; 3];
        s.composite_into(&mut dst, 3, 1, Rgba::from_rgb(0, 0, 0xFF));
        assert_eq!(dst, [0x0010_1010, 0x0000_00FF, 0x0000_00FF]);
    }

    #[test]
    fn ppm_export() {
        let mut s = surface(2, 1);
        s.set_fill_color(Rgba::gray(255));
        s.fill_rect(1.0, 0.0, 1.0, 1.0);
        let mut out = Vec::new();
        s.write_ppm(&mut out, Rgba::BLACK).unwrap();
        let header = b"P6\n2 1\n255\n";
        assert_eq!(&out[..header.len()], header);
        assert_eq!(&out[header.len()..], &[0, 0, 0, 255, 255, 255]);
    }
}
