//! A stage-wide grid of dark cells lit by flickering torches and the pointer.
//!
//! Keys: `c` clear all light, `s` swap the two embers, `t` toggle
//! flicker.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, RngExt, SeedableRng};

use lumigrid_core::{CellRegistry, CellSpec, Point, Stage};
use lumigrid_winit::{Input, Scene};

/// Logical distance between grid cells.
pub const SPACING: i32 = 20;
/// Rendered side of a grid cell, in pixels.
pub const CELL_SIZE: i32 = 18;

const POINTER_RADIUS: f64 = 50.0;

#[derive(Clone, Debug)]
pub struct Torch {
    pub pos: Point,
    pub radius: f64,
    pub strength: f64,
}

/// Key of the grid cell at `p`.
pub fn grid_key(p: Point) -> String {
    format!("cell_{}_{}", p.x, p.y)
}

/// Every grid position inside the visible stage, row by row from the top.
pub fn grid_positions() -> impl Iterator<Item = Point> {
    let hw = Stage::HALF_WIDTH as i32;
    let hh = Stage::HALF_HEIGHT as i32;
    (-hh / SPACING..=hh / SPACING).rev().flat_map(move |row| {
        (-hw / SPACING..=hw / SPACING).map(move |col| Point::new(col * SPACING, row * SPACING))
    })
}

/// Snap a logical coordinate to the nearest grid line.
pub fn snap(v: f64) -> i32 {
    (v / SPACING as f64).round() as i32 * SPACING
}

/// Light falling on each grid position from `sources`, `(center, radius,
/// strength)`; overlapping sources add up. Positions receiving no light are
/// absent.
pub fn light_field(sources: &[(Point, f64, f64)]) -> HashMap<Point, f64> {
    let mut field = HashMap::new();
    for &(center, radius, strength) in sources {
        let reach = (radius / SPACING as f64).ceil() as i32;
        let (cx, cy) = (snap(center.x as f64), snap(center.y as f64));
        for dy in -reach..=reach {
            for dx in -reach..=reach {
                let p = Point::new(cx + dx * SPACING, cy + dy * SPACING);
                let d = (((p.x - center.x) as f64).powi(2) + ((p.y - center.y) as f64).powi(2)).sqrt();
                if d >= radius {
                    continue;
                }
                *field.entry(p).or_insert(0.0) += strength * (1.0 - d / radius);
            }
        }
    }
    field
}

pub struct TorchScene {
    pub torches: Vec<Torch>,
    pointer: Option<Point>,
    flicker: bool,
    rng: StdRng,
}

impl TorchScene {
    pub fn new(seed: u64) -> Self {
        Self {
            torches: vec![
                Torch { pos: Point::new(-160, 80), radius: 90.0, strength: 0.9 },
                Torch { pos: Point::new(140, 100), radius: 70.0, strength: 0.8 },
                Torch { pos: Point::new(0, -120), radius: 110.0, strength: 1.0 },
            ],
            pointer: None,
            flicker: true,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn flicker_factor<R: Rng>(rng: &mut R) -> f64 {
        0.75 + rng.random_range(0..=25) as f64 / 100.0
    }

    /// Recompute every cell's luminance from the torches and the pointer.
    pub fn relight(&mut self, cells: &mut CellRegistry) {
        let mut sources: Vec<(Point, f64, f64)> = Vec::with_capacity(self.torches.len() + 1);
        for t in &self.torches {
            let k = if self.flicker {
                Self::flicker_factor(&mut self.rng)
            } else {
                1.0
            };
            sources.push((t.pos, t.radius, t.strength * k));
        }
        if let Some(p) = self.pointer {
            sources.push((p, POINTER_RADIUS, 1.0));
        }

        cells.clear_all_luminance();
        for (p, v) in light_field(&sources) {
            cells.set_luminance_at(p.x, p.y, v);
        }
        // Embers glow at full strength whatever the field says.
        cells.set_luminance("ember_a", 1.0);
        cells.set_luminance("ember_b", 0.6);
    }
}

impl Scene for TorchScene {
    fn init(&mut self, cells: &mut CellRegistry) {
        cells.create_cells_from_list(
            grid_positions().map(|p| CellSpec::new(p.x, p.y, CELL_SIZE, grid_key(p), false)),
        );
        cells.create_cell(CellSpec::new(-200, -150, 8, "ember_a", true));
        cells.create_cell(CellSpec::new(200, 150, 14, "ember_b", true));
        self.relight(cells);
    }

    fn input(&mut self, cells: &mut CellRegistry, input: Input) -> bool {
        match input {
            Input::PointerMoved { x, y } => {
                self.pointer = Some(Point::new(x.round() as i32, y.round() as i32));
            }
            Input::PointerPressed { x, y } => {
                cells.move_cell("ember_a", x.round() as i32, y.round() as i32);
            }
            Input::Key('c') => {
                cells.clear_all_luminance();
                return true;
            }
            Input::Key('s') => cells.swap_cells("ember_a", "ember_b"),
            Input::Key('t') => self.flicker = !self.flicker,
            _ => return false,
        }
        self.relight(cells);
        true
    }

    fn tick(&mut self, cells: &mut CellRegistry) -> bool {
        if !self.flicker {
            return false;
        }
        self.relight(cells);
        true
    }
}
