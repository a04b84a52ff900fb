//! Blocking queries combining terrain with boulder footprints.

use tunnelman_core::CellCoord;

use crate::{actors::Entity, terrain::Terrain};

/// Snapshot of everything that obstructs movement at a given moment.
///
/// Built fresh for every decision; each query scans the captured boulder
/// anchors directly.
#[derive(Debug)]
pub(crate) struct GridView<'a> {
    terrain: &'a Terrain,
    boulders: Vec<CellCoord>,
}

impl<'a> GridView<'a> {
    /// Captures the terrain together with the anchors of every live boulder.
    pub(crate) fn new<'e, I>(terrain: &'a Terrain, entities: I) -> Self
    where
        I: IntoIterator<Item = &'e Entity>,
    {
        let boulders = entities
            .into_iter()
            .filter(|entity| entity.body.alive && entity.is_boulder())
            .map(|entity| entity.body.cell)
            .collect();
        Self { terrain, boulders }
    }

    pub(crate) fn has_material(&self, cell: CellCoord) -> bool {
        self.terrain.has_material(cell)
    }

    /// Reports whether a boulder is anchored exactly at `cell`.
    pub(crate) fn is_boulder_at(&self, cell: CellCoord) -> bool {
        self.boulders.contains(&cell)
    }

    /// Reports whether any boulder anchor lies within `radius` of `cell`.
    pub(crate) fn is_boulder_within(&self, cell: CellCoord, radius: f64) -> bool {
        self.boulders
            .iter()
            .any(|boulder| boulder.within(cell, radius))
    }

    /// A cell is blocked when it holds material or lies in a boulder footprint.
    pub(crate) fn is_blocked(&self, cell: CellCoord) -> bool {
        self.has_material(cell)
            || self
                .boulders
                .iter()
                .any(|boulder| boulder.footprint_contains(cell))
    }

    /// Reports whether an entity anchored at `cell` may step in `direction`.
    pub(crate) fn can_move(&self, cell: CellCoord, direction: tunnelman_core::Direction) -> bool {
        let next = cell.step(direction);
        next.is_anchor() && !self.is_blocked(next)
    }
}
