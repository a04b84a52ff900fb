//! Closed set of actors living in the field and their per-tick behaviour.
//!
//! Every non-player entity is an [`Entity`]: a shared [`Body`] plus an
//! [`Actor`] variant carrying the state machine specific to its kind. The
//! clock hands each live entity a [`TickContext`] whose `others` view covers
//! every other entity of the registry, so actors can inspect and annoy their
//! neighbours without ever holding a reference back to the world.

pub(crate) mod boulder;
pub(crate) mod pickups;
pub(crate) mod player;
pub(crate) mod protester;
pub(crate) mod squirt;

use rand_chacha::ChaCha8Rng;
use tunnelman_core::{
    CellCoord, Direction, EntityId, EntityKind, EntitySnapshot, Event, Host, Level,
};

use crate::{grid::GridView, navigation::PathFinder, terrain::Terrain};

pub(crate) use self::{
    boulder::Boulder,
    pickups::{Gold, Goodie},
    player::Player,
    protester::Protester,
    squirt::Squirt,
};

/// Radius within which buried items reveal themselves to the player.
pub(crate) const REVEAL_RADIUS: f64 = 4.0;
/// Radius within which items are collected and projectiles connect.
pub(crate) const CONTACT_RADIUS: f64 = 3.0;

/// State shared by every entity regardless of its kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Body {
    pub(crate) id: EntityId,
    pub(crate) cell: CellCoord,
    pub(crate) facing: Direction,
    pub(crate) alive: bool,
    pub(crate) visible: bool,
}

impl Body {
    pub(crate) const fn new(
        id: EntityId,
        cell: CellCoord,
        facing: Direction,
        visible: bool,
    ) -> Self {
        Self {
            id,
            cell,
            facing,
            alive: true,
            visible,
        }
    }
}

/// Behaviour carried by a non-player entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Actor {
    Boulder(Boulder),
    Gold(Gold),
    Barrel,
    SonarKit(Goodie),
    WaterPool(Goodie),
    Squirt(Squirt),
    Protester(Protester),
}

impl Actor {
    pub(crate) const fn kind(&self) -> EntityKind {
        match self {
            Self::Boulder(_) => EntityKind::Boulder,
            Self::Gold(_) => EntityKind::Gold,
            Self::Barrel => EntityKind::Barrel,
            Self::SonarKit(_) => EntityKind::SonarKit,
            Self::WaterPool(_) => EntityKind::WaterPool,
            Self::Squirt(_) => EntityKind::Squirt,
            Self::Protester(protester) => protester.kind.entity_kind(),
        }
    }
}

/// Registry entry for every simulation entity except the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Entity {
    pub(crate) body: Body,
    pub(crate) actor: Actor,
}

impl Entity {
    pub(crate) const fn kind(&self) -> EntityKind {
        self.actor.kind()
    }

    pub(crate) const fn is_boulder(&self) -> bool {
        matches!(self.actor, Actor::Boulder(_))
    }

    /// Splits a live protester into its body and state machine.
    pub(crate) fn as_live_protester_mut(&mut self) -> Option<(&mut Body, &mut Protester)> {
        match &mut self.actor {
            Actor::Protester(protester) if self.body.alive => Some((&mut self.body, protester)),
            _ => None,
        }
    }

    pub(crate) fn snapshot(&self) -> EntitySnapshot {
        let kind = self.kind();
        EntitySnapshot {
            id: self.body.id,
            kind,
            cell: self.body.cell,
            facing: self.body.facing,
            visible: self.body.visible,
            depth: kind.depth(),
        }
    }
}

/// Mutable view over every entity except the one being updated.
#[derive(Debug)]
pub(crate) struct Neighbours<'a> {
    before: &'a mut [Entity],
    after: &'a mut [Entity],
}

impl<'a> Neighbours<'a> {
    /// View covering the whole registry, used while the player updates.
    pub(crate) fn all(entities: &'a mut [Entity]) -> Self {
        Self {
            before: &mut [],
            after: entities,
        }
    }

    /// Splits the entity at `index` away from its neighbours.
    pub(crate) fn split(
        entities: &'a mut [Entity],
        index: usize,
    ) -> Option<(&'a mut Entity, Self)> {
        if index >= entities.len() {
            return None;
        }
        let (before, rest) = entities.split_at_mut(index);
        let (current, after) = rest.split_first_mut()?;
        Some((current, Self { before, after }))
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.before.iter().chain(self.after.iter())
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.before.iter_mut().chain(self.after.iter_mut())
    }
}

/// Everything an actor may touch while it updates.
pub(crate) struct TickContext<'a> {
    pub(crate) level: Level,
    pub(crate) terrain: &'a mut Terrain,
    pub(crate) others: Neighbours<'a>,
    pub(crate) host: &'a mut dyn Host,
    pub(crate) rng: &'a mut ChaCha8Rng,
    pub(crate) path_finder: &'a mut PathFinder,
    pub(crate) barrels_left: &'a mut u32,
    pub(crate) events: &'a mut Vec<Event>,
}

impl TickContext<'_> {
    /// Captures the current blocking state of the field.
    pub(crate) fn grid(&self) -> GridView<'_> {
        GridView::new(&*self.terrain, self.others.iter())
    }

    /// Annoys every live protester within `radius` of `cell`, reporting
    /// whether any was in range.
    pub(crate) fn annoy_protesters_near(
        &mut self,
        cell: CellCoord,
        radius: f64,
        amount: i32,
    ) -> bool {
        let mut hit = false;
        for entity in self.others.iter_mut() {
            let Some((body, protester)) = entity.as_live_protester_mut() else {
                continue;
            };
            if !body.cell.within(cell, radius) {
                continue;
            }
            hit = true;
            protester::annoy(
                body,
                protester,
                amount,
                self.level,
                &mut *self.host,
                &mut *self.events,
            );
        }
        hit
    }
}

/// Advances one live entity by a tick.
pub(crate) fn update(entity: &mut Entity, player: &mut Player, ctx: &mut TickContext<'_>) {
    let Entity { body, actor } = entity;
    match actor {
        Actor::Boulder(state) => boulder::update(body, state, player, ctx),
        Actor::Gold(gold) => pickups::update_gold(body, gold, player, ctx),
        Actor::Barrel => pickups::update_barrel(body, player, ctx),
        Actor::SonarKit(goodie) => pickups::update_sonar_kit(body, goodie, player, ctx),
        Actor::WaterPool(goodie) => pickups::update_water_pool(body, goodie, player, ctx),
        Actor::Squirt(squirt) => squirt::update(body, squirt, ctx),
        Actor::Protester(protester) => protester::update(body, protester, player, ctx),
    }
}

/// Entity requested by the player during its update, admitted afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Spawn {
    pub(crate) cell: CellCoord,
    pub(crate) facing: Direction,
    pub(crate) visible: bool,
    pub(crate) actor: Actor,
}
