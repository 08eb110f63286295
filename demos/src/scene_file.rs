//! JSON scene description for headless rendering.
//!
//! ```json
//! {
//!   "cells":  [[0, 0, 12, "lamp", "true"], [20, "0", 12, "floor", false]],
//!   "lights": [["lamp", 1], [20, 0, "0.5"]]
//! }
//! ```
//!
//! `cells` rows are `(x, y, resolution, key, blocks_light)` and are applied
//! in order. `lights` entries are either `[key, luminance]` or
//! `[x, y, luminance]`; anything else is skipped with a warning.

use log::warn;
use serde::Deserialize;

use lumigrid_core::{
    CellRegistry, CellRow, PixelSurface, Renderer, Value,
    input::{luminance_or_zero, query_position, to_key},
};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct SceneFile {
    pub cells: Vec<CellRow>,
    pub lights: Vec<Light>,
}

/// One luminance assignment, kept as the raw JSON array.
#[derive(Clone, Debug, Deserialize)]
#[serde(transparent)]
pub struct Light(pub Vec<Value>);

impl SceneFile {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Build a registry from the scene: cells first, then lights in order.
    pub fn build(&self) -> CellRegistry {
        let mut cells = CellRegistry::new();
        cells.create_cells_from_list(self.cells.iter());
        for light in &self.lights {
            match light.0.as_slice() {
                [key, lum] => cells.set_luminance(&to_key(key), luminance_or_zero(lum)),
                [x, y, lum] => {
                    if let Some(p) = query_position(x, y) {
                        cells.set_luminance_at(p.x, p.y, luminance_or_zero(lum));
                    }
                }
                other => warn!("ignoring light entry with {} values", other.len()),
            }
        }
        cells
    }

    /// Render the scene onto a fresh `width` × `height` pixel surface.
    pub fn render(&self, width: u32, height: u32) -> PixelSurface {
        let cells = self.build();
        let mut renderer = Renderer::new(PixelSurface::new(width, height));
        renderer.redraw(&cells);
        renderer
            .into_surface()
            .unwrap_or_else(|| PixelSurface::new(width, height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumigrid_core::{Point, Rgba};

    const SCENE: &str = r#"{
        "cells": [
            [0, 0, 10, "lamp", "true"],
            ["20", 0, 10, "floor", false],
            [20, 0, 4, "pebble", false],
            [0, 0, 10, "lamp", "false"]
        ],
        "lights": [["lamp", 1], [20, 0, "0.5"], ["ghost", 1], [1]]
    }"#;

    #[test]
    fn build_applies_rows_then_lights() {
        let scene = SceneFile::from_json(SCENE).unwrap();
        let cells = scene.build();
        assert_eq!(cells.len(), 3);
        let lamp = cells.get("lamp").unwrap();
        assert!(!lamp.blocks_light);
        assert_eq!(lamp.luminance(), 1.0);
        assert_eq!(cells.get("floor").unwrap().luminance(), 0.5);
        assert_eq!(cells.get("pebble").unwrap().luminance(), 0.5);
        assert_eq!(cells.get("pebble").unwrap().position, Point::new(20, 0));
        assert!(!cells.contains("ghost"));
    }

    #[test]
    fn render_paints_cells() {
        let scene = SceneFile::from_json(SCENE).unwrap();
        let surface = scene.render(480, 360);
        assert_eq!((surface.width(), surface.height()), (480, 360));
        assert_eq!(surface.pixel(240, 180), Some(Rgba::gray(255)));
        assert_eq!(surface.pixel(260, 180), Some(Rgba::gray(127)));
        assert_eq!(surface.pixel(0, 0), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn unparsable_light_position_lights_nothing() {
        let scene = SceneFile::from_json(
            r#"{
                "cells": [[0, 0, 10, "center", false], [0, 20, 10, "above", false]],
                "lights": [["left", "up", 1], [0, "high", 1], ["0px", "20", 0.5]]
            }"#,
        )
        .unwrap();
        let cells = scene.build();
        assert_eq!(cells.get("center").unwrap().luminance(), 0.0);
        assert_eq!(cells.get("above").unwrap().luminance(), 0.5);
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let scene = SceneFile::from_json("{}").unwrap();
        assert!(scene.build().is_empty());
    }
}
