#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system that plans level layouts, protester arrivals
//! and bonus pickups.
//!
//! The system never owns randomness. Every decision draws from the generator
//! handed in by the caller, in a fixed order, so a world seeded identically
//! replays identically.

use std::ops::RangeInclusive;

use rand::Rng;
use tracing::{debug, warn};
use tunnelman_core::{CellCoord, Level, ProtesterKind, MAX_ANCHOR, SONAR_KIT_CELL};

/// Columns reserved for the central shaft; no object may be anchored here.
const SHAFT_BAND: RangeInclusive<i32> = 27..=33;
/// Objects must be strictly farther apart than this.
const MIN_SEPARATION: f64 = 6.0;
/// Rows boulders may be anchored on.
const BOULDER_ROWS: RangeInclusive<i32> = 20..=56;
/// Rows buried gold and oil may be anchored on.
const BURIED_ROWS: RangeInclusive<i32> = 0..=56;
/// Columns any seeded object may be anchored on.
const OBJECT_COLUMNS: RangeInclusive<i32> = 0..=MAX_ANCHOR;
/// Draws allowed per object before the object is skipped.
const MAX_PLACEMENT_ATTEMPTS: u32 = 10_000;
/// Draws allowed when searching for a water pool site.
const WATER_POOL_ATTEMPTS: u32 = 100;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    level: Level,
}

impl Config {
    /// Creates a new configuration for the provided level.
    #[must_use]
    pub const fn new(level: Level) -> Self {
        Self { level }
    }
}

/// Anchors chosen for the objects seeded at level start.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct LevelLayout {
    /// Boulder anchors; the terrain under each 4×4 footprint must be cleared.
    pub boulders: Vec<CellCoord>,
    /// Permanent gold anchors.
    pub gold: Vec<CellCoord>,
    /// Oil deposit anchors.
    pub barrels: Vec<CellCoord>,
}

impl LevelLayout {
    /// Iterates every placed anchor, boulders first.
    pub fn anchors(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.boulders
            .iter()
            .chain(self.gold.iter())
            .chain(self.barrels.iter())
            .copied()
    }
}

/// Bonus pickup chosen after a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BonusSpawn {
    /// A sonar kit at the fixed sonar cell.
    SonarKit(CellCoord),
    /// A water pool on a terrain-free footprint.
    WaterPool(CellCoord),
}

/// Pure system that decides what appears in the field and where.
#[derive(Debug)]
pub struct Spawning {
    level: Level,
    ticks_since_protester: u32,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    ///
    /// The protester cooldown starts elapsed so the first tick may spawn.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            level: config.level,
            ticks_since_protester: config.level.spawn_cooldown(),
        }
    }

    /// Chooses anchors for boulders, permanent gold and oil deposits.
    ///
    /// `has_material` reports terrain before any boulder footprint has been
    /// cleared; the planner accounts for the footprints it clears itself.
    pub fn plan_level<R, F>(&self, rng: &mut R, has_material: F) -> LevelLayout
    where
        R: Rng + ?Sized,
        F: Fn(CellCoord) -> bool,
    {
        let mut layout = LevelLayout::default();
        let mut placed: Vec<CellCoord> = Vec::new();

        for _ in 0..self.level.boulder_count() {
            if let Some(anchor) = sample_anchor(rng, BOULDER_ROWS, &placed, |_| true) {
                placed.push(anchor);
                layout.boulders.push(anchor);
            } else {
                warn!(level = self.level.get(), "boulder placement exhausted");
            }
        }

        let covered = |anchor: CellCoord| {
            footprint_covered(anchor, |cell| {
                has_material(cell)
                    && !layout
                        .boulders
                        .iter()
                        .any(|boulder| boulder.footprint_contains(cell))
            })
        };

        let mut gold = Vec::new();
        for _ in 0..self.level.gold_count() {
            if let Some(anchor) = sample_anchor(rng, BURIED_ROWS, &placed, covered) {
                placed.push(anchor);
                gold.push(anchor);
            } else {
                warn!(level = self.level.get(), "gold placement exhausted");
            }
        }

        let mut barrels = Vec::new();
        for _ in 0..self.level.oil_count() {
            if let Some(anchor) = sample_anchor(rng, BURIED_ROWS, &placed, covered) {
                placed.push(anchor);
                barrels.push(anchor);
            } else {
                warn!(level = self.level.get(), "oil placement exhausted");
            }
        }

        layout.gold = gold;
        layout.barrels = barrels;
        debug!(
            level = self.level.get(),
            boulders = layout.boulders.len(),
            gold = layout.gold.len(),
            barrels = layout.barrels.len(),
            "level layout planned"
        );
        layout
    }

    /// Restarts the protester cooldown as if one had just entered the field.
    pub fn restart_cooldown(&mut self) {
        self.ticks_since_protester = 0;
    }

    /// Advances the protester cooldown by one tick and decides whether a
    /// protester enters the field.
    ///
    /// Draws once from `rng`, and only when a protester actually spawns.
    pub fn protester_due<R>(&mut self, live_protesters: u32, rng: &mut R) -> Option<ProtesterKind>
    where
        R: Rng + ?Sized,
    {
        self.ticks_since_protester = self.ticks_since_protester.saturating_add(1);

        if self.ticks_since_protester < self.level.spawn_cooldown()
            || live_protesters >= self.level.protester_cap()
        {
            return None;
        }

        let roll = rng.gen_range(0..100);
        self.ticks_since_protester = 0;
        if roll < self.level.hardcore_chance_percent() {
            Some(ProtesterKind::Hardcore)
        } else {
            Some(ProtesterKind::Regular)
        }
    }

    /// Rolls for a bonus pickup at the end of a tick.
    ///
    /// A water pool needs a footprint free of terrain; if none turns up within
    /// the attempt budget nothing spawns.
    pub fn roll_bonus<R, F>(&self, rng: &mut R, has_material: F) -> Option<BonusSpawn>
    where
        R: Rng + ?Sized,
        F: Fn(CellCoord) -> bool,
    {
        if rng.gen_range(0..self.level.bonus_odds()) != 0 {
            return None;
        }

        if rng.gen_range(0..5) == 0 {
            return Some(BonusSpawn::SonarKit(SONAR_KIT_CELL));
        }

        for _ in 0..WATER_POOL_ATTEMPTS {
            let x = rng.gen_range(0..=MAX_ANCHOR);
            let y = rng.gen_range(0..=MAX_ANCHOR);
            let anchor = CellCoord::new(x, y);
            if anchor
                .footprint()
                .filter(CellCoord::is_terrain)
                .all(|cell| !has_material(cell))
            {
                return Some(BonusSpawn::WaterPool(anchor));
            }
        }

        None
    }
}

fn sample_anchor<R, F>(
    rng: &mut R,
    rows: RangeInclusive<i32>,
    placed: &[CellCoord],
    acceptable: F,
) -> Option<CellCoord>
where
    R: Rng + ?Sized,
    F: Fn(CellCoord) -> bool,
{
    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let x = rng.gen_range(OBJECT_COLUMNS);
        let y = rng.gen_range(rows.clone());
        let anchor = CellCoord::new(x, y);

        if SHAFT_BAND.contains(&x) {
            continue;
        }
        if !acceptable(anchor) {
            continue;
        }
        if placed
            .iter()
            .any(|other| other.within(anchor, MIN_SEPARATION))
        {
            continue;
        }
        return Some(anchor);
    }
    None
}

fn footprint_covered<F>(anchor: CellCoord, has_material: F) -> bool
where
    F: Fn(CellCoord) -> bool,
{
    anchor
        .footprint()
        .filter(CellCoord::is_terrain)
        .all(has_material)
}
