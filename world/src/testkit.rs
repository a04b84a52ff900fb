//! Hand-built scenarios and a scripted host for the unit tests.

use std::collections::VecDeque;

use tunnelman_core::{CellCoord, ControlKey, Direction, EntityId, Host, Level, ProtesterKind, Sound};
use tunnelman_system_spawning::LevelLayout;

use crate::{
    actors::{Actor, Boulder, Entity, Player, Protester},
    Config, World,
};

/// Host that replays queued keys and records everything the world reports.
#[derive(Debug)]
pub(crate) struct ScriptedHost {
    pub(crate) keys: VecDeque<ControlKey>,
    pub(crate) sounds: Vec<Sound>,
    pub(crate) score: u32,
    pub(crate) lives: u32,
    pub(crate) status: String,
}

impl ScriptedHost {
    pub(crate) fn new() -> Self {
        Self {
            keys: VecDeque::new(),
            sounds: Vec::new(),
            score: 0,
            lives: 3,
            status: String::new(),
        }
    }

    pub(crate) fn press(&mut self, key: ControlKey) {
        self.keys.push_back(key);
    }

    pub(crate) fn played(&self, sound: Sound) -> usize {
        self.sounds
            .iter()
            .filter(|played| **played == sound)
            .count()
    }
}

impl Host for ScriptedHost {
    fn pending_key(&mut self) -> Option<ControlKey> {
        self.keys.pop_front()
    }

    fn play_sound(&mut self, sound: Sound) {
        self.sounds.push(sound);
    }

    fn increase_score(&mut self, points: u32) {
        self.score += points;
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn lives(&self) -> u32 {
        self.lives
    }

    fn decrement_lives(&mut self) {
        self.lives = self.lives.saturating_sub(1);
    }

    fn set_status_text(&mut self, text: &str) {
        self.status = text.to_owned();
    }
}

impl World {
    /// A world with untouched terrain, no seeded objects, one notional oil
    /// deposit left and the protester cooldown just restarted.
    pub(crate) fn scenario(level: u32) -> Self {
        let config = Config::new(Level::new(level), 7);
        let mut world = Self::from_layout(config, &LevelLayout::default());
        world.barrels_left = 1;
        world.spawning.restart_cooldown();
        world
    }

    pub(crate) fn player(&self) -> &Player {
        &self.registry.player
    }

    pub(crate) fn player_mut(&mut self) -> &mut Player {
        &mut self.registry.player
    }

    pub(crate) fn place_player(&mut self, cell: CellCoord, facing: Direction) {
        self.registry.player.body.cell = cell;
        self.registry.player.body.facing = facing;
    }

    /// Clears every cell in the inclusive rectangle.
    pub(crate) fn dig(&mut self, from: CellCoord, to: CellCoord) {
        for x in from.x()..=to.x() {
            for y in from.y()..=to.y() {
                let _ = self.terrain.remove_material(CellCoord::new(x, y));
            }
        }
    }

    pub(crate) fn add(
        &mut self,
        cell: CellCoord,
        facing: Direction,
        visible: bool,
        actor: Actor,
    ) -> EntityId {
        self.registry.insert(cell, facing, visible, actor)
    }

    /// Places a stable boulder, clearing the terrain under its footprint.
    pub(crate) fn add_boulder(&mut self, cell: CellCoord, state: Boulder) -> EntityId {
        self.terrain.clear_footprint(cell);
        self.add(cell, Direction::Down, true, Actor::Boulder(state))
    }

    /// Places a protester ready to act on the next tick.
    pub(crate) fn add_protester(
        &mut self,
        kind: ProtesterKind,
        cell: CellCoord,
        facing: Direction,
    ) -> EntityId {
        let mut protester = Protester::new(kind, self.level, &mut self.rng);
        protester.resting_ticks = 0;
        protester.squares_to_move = 30;
        self.add(cell, facing, true, Actor::Protester(protester))
    }

    pub(crate) fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.registry
            .entities
            .iter()
            .find(|entity| entity.body.id == id)
    }

    pub(crate) fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.registry
            .entities
            .iter_mut()
            .find(|entity| entity.body.id == id)
    }

    pub(crate) fn protester(&self, id: EntityId) -> Option<&Protester> {
        match &self.entity(id)?.actor {
            Actor::Protester(protester) => Some(protester),
            _ => None,
        }
    }

    pub(crate) fn protester_mut(&mut self, id: EntityId) -> Option<&mut Protester> {
        match &mut self.entity_mut(id)?.actor {
            Actor::Protester(protester) => Some(protester),
            _ => None,
        }
    }
}
