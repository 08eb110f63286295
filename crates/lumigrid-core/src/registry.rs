//! The [`CellRegistry`]: key → [`Cell`] in insertion order.
//!
//! Every operation is infallible. Unknown keys are silently ignored, and
//! luminance is clamped inside [`Cell::set_luminance`], which is the only
//! place it is written.

use indexmap::IndexMap;
use log::trace;

use crate::cell::Cell;
use crate::geom::Point;
use crate::input::CellSpec;

/// Owns every cell of the overlay.
///
/// Iteration order (and therefore draw order) is the order in which keys were
/// first inserted. Overwriting a key keeps its slot.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellRegistry {
    cells: IndexMap<String, Cell>,
}

impl CellRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the cell at `spec.key`. The new cell is dark.
    pub fn create_cell(&mut self, spec: CellSpec) {
        trace!("create cell {:?} at {}", spec.key, spec.position);
        let cell = Cell::new(spec.position, spec.resolution, spec.blocks_light);
        self.cells.insert(spec.key, cell);
    }

    /// Apply [`create_cell`](Self::create_cell) to each row in order; later
    /// rows win over earlier ones sharing a key.
    pub fn create_cells_from_list<I>(&mut self, rows: I)
    where
        I: IntoIterator,
        I::Item: Into<CellSpec>,
    {
        for row in rows {
            self.create_cell(row.into());
        }
    }

    /// Move the cell at `key`. No-op if absent.
    pub fn move_cell(&mut self, key: &str, x: i32, y: i32) {
        if let Some(cell) = self.cells.get_mut(key) {
            cell.position = Point::new(x, y);
        }
    }

    /// Exchange whatever is stored under `key1` and `key2`, absence included.
    ///
    /// If only one key holds a cell, that cell moves to the other key and the
    /// first key becomes empty. This is the only way a cell can disappear
    /// from the registry.
    pub fn swap_cells(&mut self, key1: &str, key2: &str) {
        if key1 == key2 {
            return;
        }
        trace!("swap cells {key1:?} <-> {key2:?}");
        match (self.cells.get(key1).copied(), self.cells.get(key2).copied()) {
            (Some(a), Some(b)) => {
                self.cells[key1] = b;
                self.cells[key2] = a;
            }
            (Some(a), None) => {
                self.cells.shift_remove(key1);
                self.cells.insert(key2.to_owned(), a);
            }
            (None, Some(b)) => {
                self.cells.shift_remove(key2);
                self.cells.insert(key1.to_owned(), b);
            }
            (None, None) => {}
        }
    }

    /// Set the luminance of the cell at `key`, clamped to [0, 1]. No-op if
    /// absent.
    pub fn set_luminance(&mut self, key: &str, value: f64) {
        if let Some(cell) = self.cells.get_mut(key) {
            cell.set_luminance(value);
        }
    }

    /// Set the luminance of every cell positioned exactly at (`x`, `y`).
    /// Returns how many cells were updated.
    pub fn set_luminance_at(&mut self, x: i32, y: i32, value: f64) -> usize {
        let target = Point::new(x, y);
        let mut hits = 0;
        for cell in self.cells.values_mut().filter(|c| c.position == target) {
            cell.set_luminance(value);
            hits += 1;
        }
        hits
    }

    /// Darken every cell. Positions, sizes and flags are untouched.
    pub fn clear_all_luminance(&mut self) {
        for cell in self.cells.values_mut() {
            cell.set_luminance(0.0);
        }
    }

    /// The cell stored at `key`.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&Cell> {
        self.cells.get(key)
    }

    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.cells.contains_key(key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// `(key, cell)` pairs in draw order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Cell)> {
        self.cells.iter().map(|(k, c)| (k.as_str(), c))
    }

    /// Cells in draw order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.values()
    }

    /// Keys in draw order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }
}
