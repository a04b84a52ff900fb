#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative simulation state for Tunnelman.
//!
//! A [`World`] owns the terrain, the entity registry and the random generator
//! of one level. [`tick`] advances it by one discrete step, consulting the
//! [`Host`] for input and reporting audio, score and status through it. Read
//! access goes through the [`query`] module.

mod actors;
mod grid;
mod navigation;
mod registry;
mod status;
mod terrain;
#[cfg(test)]
mod testkit;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};
use tunnelman_core::{CellCoord, Direction, Event, Host, Level, TickOutcome, EXIT_CELL};
use tunnelman_system_spawning::{BonusSpawn, LevelLayout, Spawning};

use crate::{
    actors::{player, Actor, Boulder, Gold, Goodie, Neighbours, Protester, TickContext},
    registry::Registry,
    terrain::Terrain,
};

pub use navigation::{PathFinder, Route, FALLBACK_DIRECTION};

/// Parameters required to build a world for one level attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Config {
    level: Level,
    rng_seed: u64,
}

impl Config {
    /// Creates a configuration for `level` whose randomness derives from `rng_seed`.
    #[must_use]
    pub const fn new(level: Level, rng_seed: u64) -> Self {
        Self { level, rng_seed }
    }

    /// Level the world plays.
    #[must_use]
    pub const fn level(&self) -> Level {
        self.level
    }

    /// Seed of the world's random generator.
    #[must_use]
    pub const fn rng_seed(&self) -> u64 {
        self.rng_seed
    }
}

/// Represents the authoritative Tunnelman world state for one level.
#[derive(Debug)]
pub struct World {
    level: Level,
    terrain: Terrain,
    registry: Registry,
    spawning: Spawning,
    rng: ChaCha8Rng,
    path_finder: PathFinder,
    barrels_left: u32,
    tick_index: u64,
    outcome: Option<TickOutcome>,
}

impl World {
    /// Creates a world with a freshly planned layout for the configured level.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(config.rng_seed);
        let spawning = Spawning::new(tunnelman_system_spawning::Config::new(config.level));
        let terrain = Terrain::new();
        let layout = spawning.plan_level(&mut rng, |cell| terrain.has_material(cell));
        Self::assemble(config.level, terrain, spawning, rng, &layout)
    }

    /// Creates a world from a layout chosen by the caller.
    ///
    /// The terrain under every boulder footprint is cleared; gold and oil
    /// start buried and invisible.
    #[must_use]
    pub fn from_layout(config: Config, layout: &LevelLayout) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.rng_seed);
        let spawning = Spawning::new(tunnelman_system_spawning::Config::new(config.level));
        Self::assemble(config.level, Terrain::new(), spawning, rng, layout)
    }

    fn assemble(
        level: Level,
        mut terrain: Terrain,
        spawning: Spawning,
        rng: ChaCha8Rng,
        layout: &LevelLayout,
    ) -> Self {
        let mut registry = Registry::new();
        for &anchor in &layout.boulders {
            terrain.clear_footprint(anchor);
            let boulder = Actor::Boulder(Boulder::Stable);
            let _ = registry.insert(anchor, Direction::Down, true, boulder);
        }
        for &anchor in &layout.gold {
            let _ = registry.insert(anchor, Direction::Right, false, Actor::Gold(Gold::buried()));
        }
        for &anchor in &layout.barrels {
            let _ = registry.insert(anchor, Direction::Right, false, Actor::Barrel);
        }
        let barrels_left = u32::try_from(layout.barrels.len()).unwrap_or(u32::MAX);

        debug!(
            level = level.get(),
            boulders = layout.boulders.len(),
            gold = layout.gold.len(),
            barrels = barrels_left,
            "world assembled"
        );

        Self {
            level,
            terrain,
            registry,
            spawning,
            rng,
            path_finder: PathFinder::new(),
            barrels_left,
            tick_index: 0,
            outcome: None,
        }
    }

    fn terminal_condition(&self) -> Option<TickOutcome> {
        if !self.registry.player.body.alive {
            Some(TickOutcome::PlayerDied)
        } else if self.barrels_left == 0 {
            Some(TickOutcome::LevelFinished)
        } else {
            None
        }
    }

    fn finish(&mut self, host: &mut dyn Host, outcome: TickOutcome) -> TickOutcome {
        self.outcome = Some(outcome);
        match outcome {
            TickOutcome::PlayerDied => host.decrement_lives(),
            TickOutcome::LevelFinished => host.play_sound(tunnelman_core::Sound::FinishedLevel),
            TickOutcome::Continue => {}
        }
        debug!(tick = self.tick_index, ?outcome, "world finished");
        outcome
    }

    fn spawn_bonus(&mut self, out_events: &mut Vec<Event>) {
        let terrain = &self.terrain;
        let Some(bonus) = self
            .spawning
            .roll_bonus(&mut self.rng, |cell| terrain.has_material(cell))
        else {
            return;
        };
        let lifetime = Goodie::new(self.level.goodie_lifetime());
        let (cell, actor) = match bonus {
            BonusSpawn::SonarKit(cell) => (cell, Actor::SonarKit(lifetime)),
            BonusSpawn::WaterPool(cell) => (cell, Actor::WaterPool(lifetime)),
        };
        let item = self.registry.insert(cell, Direction::Right, true, actor);
        debug!(item = item.get(), kind = ?actor.kind(), "bonus spawned");
        out_events.push(Event::BonusSpawned {
            item,
            kind: actor.kind(),
            cell,
        });
    }
}

/// Advances the world by one tick.
///
/// Once a tick has reported [`TickOutcome::PlayerDied`] or
/// [`TickOutcome::LevelFinished`] the world is spent and every later call
/// returns the same outcome without touching any state.
pub fn tick(world: &mut World, host: &mut dyn Host, out_events: &mut Vec<Event>) -> TickOutcome {
    if let Some(outcome) = world.outcome {
        return outcome;
    }
    world.tick_index = world.tick_index.saturating_add(1);

    let live = world.registry.live_protesters();
    let due = world.spawning.protester_due(live, &mut world.rng);
    if let Some(kind) = due {
        let actor = Actor::Protester(Protester::new(kind, world.level, &mut world.rng));
        let id = world
            .registry
            .insert(EXIT_CELL, Direction::Left, true, actor);
        debug!(protester = id.get(), ?kind, "protester spawned");
        out_events.push(Event::ProtesterSpawned {
            protester: id,
            kind,
            cell: EXIT_CELL,
        });
    }

    let status = status::status_line(
        world.level,
        host.lives(),
        &world.registry.player.stats,
        world.barrels_left,
        host.score(),
    );
    host.set_status_text(&status);

    let mut spawns = Vec::new();
    {
        let mut ctx = TickContext {
            level: world.level,
            terrain: &mut world.terrain,
            others: Neighbours::all(&mut world.registry.entities),
            host: &mut *host,
            rng: &mut world.rng,
            path_finder: &mut world.path_finder,
            barrels_left: &mut world.barrels_left,
            events: &mut *out_events,
        };
        player::update(&mut world.registry.player, &mut ctx, &mut spawns);
    }
    world.registry.admit(spawns, out_events);
    if !world.registry.player.body.alive {
        return world.finish(host, TickOutcome::PlayerDied);
    }

    let mut index = 0;
    while let Some((entity, others)) = Neighbours::split(&mut world.registry.entities, index) {
        index += 1;
        if !entity.body.alive {
            continue;
        }
        let mut ctx = TickContext {
            level: world.level,
            terrain: &mut world.terrain,
            others,
            host: &mut *host,
            rng: &mut world.rng,
            path_finder: &mut world.path_finder,
            barrels_left: &mut world.barrels_left,
            events: &mut *out_events,
        };
        actors::update(entity, &mut world.registry.player, &mut ctx);
        if let Some(outcome) = world.terminal_condition() {
            return world.finish(host, outcome);
        }
    }

    world.spawn_bonus(out_events);
    world.registry.sweep(out_events);

    if let Some(outcome) = world.terminal_condition() {
        return world.finish(host, outcome);
    }
    trace!(
        tick = world.tick_index,
        entities = world.registry.entities.len(),
        "tick complete"
    );
    TickOutcome::Continue
}

/// Removes the material in `cell`, reporting whether any was present.
///
/// Cells outside the 64×60 grid hold nothing; removing them is a no-op.
pub fn remove_material(world: &mut World, cell: CellCoord) -> bool {
    world.terrain.remove_material(cell)
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use tunnelman_core::{CellCoord, EntityView, Level, PlayerStats, TickOutcome, EXIT_CELL};

    use super::World;
    use crate::{grid::GridView, navigation::PathFinder, Route};

    /// Level the world plays.
    #[must_use]
    pub fn level(world: &World) -> Level {
        world.level
    }

    /// Number of ticks advanced so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Oil deposits still buried.
    #[must_use]
    pub fn barrels_left(world: &World) -> u32 {
        world.barrels_left
    }

    /// Terminal outcome the world reported, if it is spent.
    #[must_use]
    pub fn outcome(world: &World) -> Option<TickOutcome> {
        world.outcome
    }

    /// Resources currently carried by the player.
    #[must_use]
    pub fn player_stats(world: &World) -> PlayerStats {
        world.registry.player.stats
    }

    /// Anchor currently occupied by the player.
    #[must_use]
    pub fn player_cell(world: &World) -> CellCoord {
        world.registry.player.body.cell
    }

    /// Captures a read-only view of the player and every live entity.
    #[must_use]
    pub fn entity_view(world: &World) -> EntityView {
        world.registry.view()
    }

    /// Reports whether the cell still holds material; out-of-range cells never do.
    #[must_use]
    pub fn has_material(world: &World, cell: CellCoord) -> bool {
        world.terrain.has_material(cell)
    }

    /// Number of terrain cells still holding material.
    #[must_use]
    pub fn remaining_material(world: &World) -> usize {
        world.terrain.remaining()
    }

    /// Reports whether a live boulder is anchored exactly at `cell`.
    #[must_use]
    pub fn is_boulder_at(world: &World, cell: CellCoord) -> bool {
        grid(world).is_boulder_at(cell)
    }

    /// Reports whether `cell` holds material or lies within a boulder footprint.
    #[must_use]
    pub fn is_blocked(world: &World, cell: CellCoord) -> bool {
        grid(world).is_blocked(cell)
    }

    /// Reports whether any live boulder is anchored within `radius` of `cell`.
    #[must_use]
    pub fn is_boulder_within(world: &World, cell: CellCoord, radius: f64) -> bool {
        grid(world).is_boulder_within(cell, radius)
    }

    /// First step a leaving protester at `from` would take toward the exit.
    #[must_use]
    pub fn route_to_exit(world: &World, from: CellCoord) -> Route {
        let grid = grid(world);
        PathFinder::new().route(EXIT_CELL, from, None, |cell| grid.is_blocked(cell))
    }

    fn grid(world: &World) -> GridView<'_> {
        GridView::new(&world.terrain, world.registry.entities.iter())
    }
}
