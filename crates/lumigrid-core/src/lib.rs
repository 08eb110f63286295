//! **lumigrid-core** — a sparse overlay of luminance cells on a 2D stage.
//!
//! This crate provides the cell registry, the boundary normalization of
//! loosely typed host input, the fixed logical-to-surface transform, and the
//! renderer that repaints every cell as a gray square on a [`Surface`].
//!
//! The registry is an ordinary owned value: create one, mutate it, and hand
//! a reference to [`Renderer::redraw`] whenever the picture should change.
//! Nothing redraws on its own.

pub mod cell;
pub mod color;
pub mod geom;
pub mod input;
pub mod pixel;
pub mod registry;
pub mod renderer;
pub mod stage;
pub mod surface;

pub use cell::{Cell, clamp};
pub use color::Rgba;
pub use geom::{Point, Rect};
pub use input::{CellRow, CellSpec, Value};
pub use pixel::PixelSurface;
pub use registry::CellRegistry;
pub use renderer::Renderer;
pub use stage::Stage;
pub use surface::{Surface, SurfaceError};
