//! Breadth-first path finding over the anchor grid.

use std::collections::VecDeque;

use tunnelman_core::{CellCoord, Direction, MAX_ANCHOR};

/// Direction reported when a search cannot reach its root.
pub const FALLBACK_DIRECTION: Direction = Direction::Left;

/// Order in which neighbours are considered when stepping downhill.
const STEP_ORDER: [Direction; 4] = [
    Direction::Left,
    Direction::Right,
    Direction::Down,
    Direction::Up,
];

/// Result of asking the path finder for the next step toward a root cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    /// The querying cell already is the root.
    Arrived,
    /// Step one cell in the provided direction.
    Step(Direction),
    /// No unblocked path exists, or none within the step budget.
    Unreachable,
}

impl Route {
    /// Direction to move in, falling back to [`FALLBACK_DIRECTION`] when the
    /// root is unreachable or already reached.
    #[must_use]
    pub const fn direction_or_fallback(self) -> Direction {
        match self {
            Self::Step(direction) => direction,
            Self::Arrived | Self::Unreachable => FALLBACK_DIRECTION,
        }
    }
}

/// Dense distance field over every anchor, reused between searches.
///
/// Distances default to `u16::MAX` for cells the last search never labelled.
#[derive(Clone, Debug, Default)]
pub struct PathFinder {
    distances: Vec<u16>,
}

impl PathFinder {
    /// Creates a path finder with an empty distance buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the first step on a shortest path from `from` to `root`.
    ///
    /// The search floods outward from `root` through cells for which
    /// `is_blocked` reports false and stops as soon as `from` is labelled.
    /// `from` itself is never treated as blocked. With a `budget`, cells
    /// farther than that many steps from the root are not expanded.
    pub fn route<F>(
        &mut self,
        root: CellCoord,
        from: CellCoord,
        budget: Option<u32>,
        is_blocked: F,
    ) -> Route
    where
        F: Fn(CellCoord) -> bool,
    {
        if from == root {
            return Route::Arrived;
        }
        if !root.is_anchor() || !from.is_anchor() {
            return Route::Unreachable;
        }
        if !self.flood(root, from, budget, is_blocked) {
            return Route::Unreachable;
        }
        self.downhill(from).map_or(Route::Unreachable, Route::Step)
    }

    /// Distance recorded for `cell` by the last search, if it was labelled.
    #[must_use]
    pub fn distance(&self, cell: CellCoord) -> Option<u16> {
        index(cell)
            .and_then(|offset| self.distances.get(offset).copied())
            .filter(|distance| *distance != u16::MAX)
    }

    fn flood<F>(
        &mut self,
        root: CellCoord,
        goal: CellCoord,
        budget: Option<u32>,
        is_blocked: F,
    ) -> bool
    where
        F: Fn(CellCoord) -> bool,
    {
        let cell_count = index(CellCoord::new(MAX_ANCHOR, MAX_ANCHOR)).map_or(0, |last| last + 1);
        if self.distances.len() != cell_count {
            self.distances = vec![u16::MAX; cell_count];
        } else {
            self.distances.fill(u16::MAX);
        }

        let Some(root_index) = index(root) else {
            return false;
        };
        self.distances[root_index] = 0;

        let mut queue = VecDeque::new();
        queue.push_back(root);

        while let Some(cell) = queue.pop_front() {
            if cell == goal {
                return true;
            }
            let Some(current_index) = index(cell) else {
                continue;
            };
            let current_distance = self.distances[current_index];
            if let Some(budget) = budget {
                if u32::from(current_distance) >= budget {
                    continue;
                }
            }
            if current_distance >= u16::MAX.saturating_sub(1) {
                continue;
            }
            let next_distance = current_distance + 1;

            for direction in STEP_ORDER {
                let neighbor = cell.step(direction);
                let Some(neighbor_index) = index(neighbor) else {
                    continue;
                };
                if self.distances[neighbor_index] <= next_distance {
                    continue;
                }
                if neighbor != goal && is_blocked(neighbor) {
                    continue;
                }
                self.distances[neighbor_index] = next_distance;
                queue.push_back(neighbor);
            }
        }

        false
    }

    fn downhill(&self, from: CellCoord) -> Option<Direction> {
        let current = self.distance(from)?;
        let target = current.checked_sub(1)?;
        STEP_ORDER
            .into_iter()
            .find(|direction| self.distance(from.step(*direction)) == Some(target))
    }
}

fn index(cell: CellCoord) -> Option<usize> {
    if !cell.is_anchor() {
        return None;
    }
    let width = usize::try_from(MAX_ANCHOR + 1).ok()?;
    let column = usize::try_from(cell.x()).ok()?;
    let row = usize::try_from(cell.y()).ok()?;
    row.checked_mul(width)?.checked_add(column)
}
