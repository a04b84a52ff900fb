//! Diggable terrain owned by the world.

use tunnelman_core::{CellCoord, FIELD_COLUMNS, FIELD_ROWS};

/// Columns of the central shaft that starts without material.
const SHAFT_COLUMNS: std::ops::RangeInclusive<i32> = 30..=33;
/// Lowest row of the central shaft.
const SHAFT_FLOOR: i32 = 4;

/// Dense material grid stored in row-major order (`x + 64·y`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Terrain {
    cells: Vec<bool>,
}

impl Terrain {
    /// Creates a fully covered field with the central shaft carved out.
    pub(crate) fn new() -> Self {
        let capacity = usize::try_from(FIELD_COLUMNS * FIELD_ROWS).unwrap_or(0);
        let mut terrain = Self {
            cells: vec![true; capacity],
        };
        for x in SHAFT_COLUMNS {
            for y in SHAFT_FLOOR..FIELD_ROWS {
                let _ = terrain.remove_material(CellCoord::new(x, y));
            }
        }
        terrain
    }

    /// Reports whether the cell still holds material. Cells outside the grid never do.
    pub(crate) fn has_material(&self, cell: CellCoord) -> bool {
        index(cell)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(false)
    }

    /// Removes the material in the cell, reporting whether any was present.
    pub(crate) fn remove_material(&mut self, cell: CellCoord) -> bool {
        let Some(slot) = index(cell).and_then(|index| self.cells.get_mut(index)) else {
            return false;
        };
        std::mem::replace(slot, false)
    }

    /// Clears every in-grid cell of the 4×4 footprint anchored at `anchor`.
    pub(crate) fn clear_footprint(&mut self, anchor: CellCoord) {
        for cell in anchor.footprint() {
            let _ = self.remove_material(cell);
        }
    }

    /// Number of cells that still hold material.
    pub(crate) fn remaining(&self) -> usize {
        self.cells.iter().filter(|cell| **cell).count()
    }
}

fn index(cell: CellCoord) -> Option<usize> {
    if !cell.is_terrain() {
        return None;
    }
    let column = usize::try_from(cell.x()).ok()?;
    let row = usize::try_from(cell.y()).ok()?;
    let width = usize::try_from(FIELD_COLUMNS).ok()?;
    row.checked_mul(width)?.checked_add(column)
}
