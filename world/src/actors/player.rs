//! The Tunnelman: digging, movement and the resources it spends.

use tracing::trace;
use tunnelman_core::{
    ControlKey, Direction, EntityId, Event, Host, PlayerStats, Sound, PLAYER_START,
};

use super::{Actor, Body, Gold, Spawn, Squirt, TickContext, CONTACT_RADIUS};

/// Radius of the sonar sweep.
const SONAR_RADIUS: f64 = 12.0;
/// Distance in front of the player at which a squirt appears.
const SQUIRT_OFFSET: i32 = 4;

/// Player-controlled digger, owned separately from the other entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Player {
    pub(crate) body: Body,
    pub(crate) stats: PlayerStats,
}

impl Player {
    /// Places a fresh player at the start cell, facing right.
    pub(crate) fn new(id: EntityId) -> Self {
        Self {
            body: Body::new(id, PLAYER_START, Direction::Right, true),
            stats: PlayerStats::default(),
        }
    }

    /// Removes `amount` hit points; the player dies once none remain.
    pub(crate) fn annoy(&mut self, amount: i32, host: &mut dyn Host) {
        if !self.body.alive {
            return;
        }
        self.stats.hit_points = self.stats.hit_points.saturating_sub(amount);
        if self.stats.hit_points <= 0 {
            self.body.alive = false;
            host.play_sound(Sound::PlayerGaveUp);
        }
    }
}

/// Digs under the player and resolves the pending control key.
///
/// Entities the player creates are pushed to `spawns`; the clock admits them
/// once the player's update is over.
pub(crate) fn update(player: &mut Player, ctx: &mut TickContext<'_>, spawns: &mut Vec<Spawn>) {
    if !player.body.alive {
        return;
    }

    let mut dug = false;
    for cell in player.body.cell.footprint() {
        dug |= ctx.terrain.remove_material(cell);
    }
    if dug {
        ctx.host.play_sound(Sound::Dig);
    }

    let Some(key) = ctx.host.pending_key() else {
        return;
    };
    trace!(?key, "player key");

    match key {
        ControlKey::Quit => {
            player.body.alive = false;
            ctx.host.play_sound(Sound::PlayerGaveUp);
        }
        ControlKey::Fire => fire(player, ctx, spawns),
        ControlKey::UseSonar => use_sonar(player, ctx),
        ControlKey::DropGold => {
            if player.stats.gold == 0 {
                return;
            }
            player.stats.gold -= 1;
            spawns.push(Spawn {
                cell: player.body.cell,
                facing: Direction::Right,
                visible: true,
                actor: Actor::Gold(Gold::bribe()),
            });
        }
        ControlKey::Move(direction) => {
            if player.body.facing != direction {
                player.body.facing = direction;
                return;
            }
            let next = player.body.cell.step(direction);
            if next.is_anchor() && !ctx.grid().is_boulder_at(next) {
                player.body.cell = next;
            }
        }
    }
}

fn fire(player: &mut Player, ctx: &mut TickContext<'_>, spawns: &mut Vec<Spawn>) {
    if player.stats.water == 0 {
        return;
    }
    player.stats.water -= 1;
    ctx.host.play_sound(Sound::PlayerSquirt);

    let facing = player.body.facing;
    let target = player.body.cell.offset(facing, SQUIRT_OFFSET);
    let grid = ctx.grid();
    if target.is_anchor()
        && !grid.has_material(target)
        && !grid.is_boulder_within(target, CONTACT_RADIUS)
    {
        spawns.push(Spawn {
            cell: target,
            facing,
            visible: true,
            actor: Actor::Squirt(Squirt::new()),
        });
    }
}

fn use_sonar(player: &mut Player, ctx: &mut TickContext<'_>) {
    if player.stats.sonar == 0 {
        return;
    }
    player.stats.sonar -= 1;
    ctx.host.play_sound(Sound::Sonar);

    let origin = player.body.cell;
    for entity in ctx.others.iter_mut() {
        if !entity.body.alive || entity.body.visible {
            continue;
        }
        if !entity.body.cell.within(origin, SONAR_RADIUS) {
            continue;
        }
        entity.body.visible = true;
        ctx.events.push(Event::ItemRevealed {
            item: entity.body.id,
            kind: entity.kind(),
        });
    }
}
