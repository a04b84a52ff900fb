//! Arena owning the player and every other entity in insertion order.

use tracing::trace;
use tunnelman_core::{CellCoord, Direction, EntityId, EntityKind, EntitySnapshot, EntityView, Event};

use crate::actors::{Actor, Body, Entity, Player, Spawn};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Registry {
    pub(crate) player: Player,
    pub(crate) entities: Vec<Entity>,
    next_id: u32,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self {
            player: Player::new(EntityId::new(0)),
            entities: Vec::new(),
            next_id: 1,
        }
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    /// Appends a new entity, returning its identifier.
    pub(crate) fn insert(
        &mut self,
        cell: CellCoord,
        facing: Direction,
        visible: bool,
        actor: Actor,
    ) -> EntityId {
        let id = self.allocate_id();
        self.entities.push(Entity {
            body: Body::new(id, cell, facing, visible),
            actor,
        });
        id
    }

    /// Admits the entities the player requested during its update.
    pub(crate) fn admit(&mut self, spawns: Vec<Spawn>, out_events: &mut Vec<Event>) {
        for spawn in spawns {
            let kind = spawn.actor.kind();
            let id = self.insert(spawn.cell, spawn.facing, spawn.visible, spawn.actor);
            match kind {
                EntityKind::Squirt => out_events.push(Event::SquirtFired {
                    squirt: id,
                    cell: spawn.cell,
                    direction: spawn.facing,
                }),
                EntityKind::Gold => out_events.push(Event::GoldDropped {
                    gold: id,
                    cell: spawn.cell,
                }),
                _ => {}
            }
        }
    }

    pub(crate) fn live_protesters(&self) -> u32 {
        let count = self
            .entities
            .iter()
            .filter(|entity| entity.body.alive && entity.kind().is_protester())
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// Removes every dead entity, reporting each removal.
    pub(crate) fn sweep(&mut self, out_events: &mut Vec<Event>) {
        for entity in self.entities.iter().filter(|entity| !entity.body.alive) {
            trace!(entity = entity.body.id.get(), kind = ?entity.kind(), "entity removed");
            out_events.push(Event::EntityRemoved {
                entity: entity.body.id,
                kind: entity.kind(),
            });
        }
        self.entities.retain(|entity| entity.body.alive);
    }

    /// Snapshot of the player followed by every live entity.
    pub(crate) fn view(&self) -> EntityView {
        let player = &self.player.body;
        let mut snapshots = Vec::with_capacity(self.entities.len() + 1);
        snapshots.push(EntitySnapshot {
            id: player.id,
            kind: EntityKind::Player,
            cell: player.cell,
            facing: player.facing,
            visible: player.visible,
            depth: EntityKind::Player.depth(),
        });
        snapshots.extend(
            self.entities
                .iter()
                .filter(|entity| entity.body.alive)
                .map(Entity::snapshot),
        );
        EntityView::from_snapshots(snapshots)
    }
}
