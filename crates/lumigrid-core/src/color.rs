//! The [`Rgba`] colour packed the way the pixel surfaces store it.

/// An ARGB colour packed into a `u32` (0xAARRGGBB).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgba(pub u32);

impl Rgba {
    /// Fully transparent black (0).
    pub const TRANSPARENT: Self = Self(0);

    /// Opaque black.
    pub const BLACK: Self = Self(0xFF00_0000);

    /// Construct an opaque colour from RGB components.
    #[inline]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(0xFF00_0000 | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32))
    }

    /// Opaque achromatic gray `(l, l, l)`.
    #[inline]
    pub const fn gray(l: u8) -> Self {
        Self::from_rgb(l, l, l)
    }

    /// Gray matching a luminance in [0, 1]: `floor(luminance * 255)`.
    ///
    /// Values outside [0, 1] saturate; NaN maps to black.
    #[inline]
    pub fn from_luminance(luminance: f64) -> Self {
        // `as u8` saturates and maps NaN to 0.
        Self::gray((luminance * 255.0).floor() as u8)
    }

    #[inline]
    pub const fn a(self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[inline]
    pub const fn r(self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }

    #[inline]
    pub const fn g(self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    #[inline]
    pub const fn b(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    /// Whether the alpha channel is zero.
    #[inline]
    pub const fn is_transparent(self) -> bool {
        self.a() == 0
    }

    /// CSS `rgb(r,g,b)` notation, as accepted by a canvas fill style.
    pub fn to_css(self) -> String {
        format!("rgb({},{},{})", self.r(), self.g(), self.b())
    }
}
