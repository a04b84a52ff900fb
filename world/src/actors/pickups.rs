//! Gold nuggets, oil deposits and the temporary goodies.

use tunnelman_core::{EntityKind, Event, PlayerStats, Sound};

use super::{protester, Body, Player, TickContext, CONTACT_RADIUS, REVEAL_RADIUS};

/// Ticks a dropped nugget lies around before protesters lose interest.
const BRIBE_LIFETIME: u32 = 100;
const GOLD_POINTS: u32 = 10;
const OIL_POINTS: u32 = 1000;
const SONAR_KIT_POINTS: u32 = 75;
const WATER_POOL_POINTS: u32 = 100;
const WATER_PER_POOL: u32 = 5;

/// Gold nugget state.
///
/// Buried nuggets are collected by the player; dropped ones are claimable by
/// protesters and vanish after [`BRIBE_LIFETIME`] ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Gold {
    pub(crate) claimable: bool,
    pub(crate) permanent: bool,
    pub(crate) lifetime: u32,
}

impl Gold {
    pub(crate) const fn buried() -> Self {
        Self {
            claimable: false,
            permanent: true,
            lifetime: 0,
        }
    }

    pub(crate) const fn bribe() -> Self {
        Self {
            claimable: true,
            permanent: false,
            lifetime: BRIBE_LIFETIME,
        }
    }
}

/// Remaining lifetime of a sonar kit or water pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Goodie {
    pub(crate) lifetime: u32,
}

impl Goodie {
    pub(crate) const fn new(lifetime: u32) -> Self {
        Self { lifetime }
    }
}

pub(crate) fn update_gold(
    body: &mut Body,
    gold: &mut Gold,
    player: &mut Player,
    ctx: &mut TickContext<'_>,
) {
    if reveal_near_player(body, EntityKind::Gold, player, ctx) {
        return;
    }

    if !gold.claimable {
        if body.cell.within(player.body.cell, CONTACT_RADIUS) {
            body.alive = false;
            ctx.host.play_sound(Sound::GotGoodie);
            ctx.host.increase_score(GOLD_POINTS);
            player.stats.gold = player.stats.gold.saturating_add(1);
        }
        return;
    }

    let cell = body.cell;
    let claimant = ctx.others.iter_mut().find_map(|entity| {
        entity
            .as_live_protester_mut()
            .filter(|(target, _)| target.cell.within(cell, CONTACT_RADIUS))
    });
    if let Some((target, state)) = claimant {
        protester::bribe(target, state, ctx.level, &mut *ctx.host, &mut *ctx.events);
        body.alive = false;
        return;
    }

    if !gold.permanent {
        gold.lifetime = gold.lifetime.saturating_sub(1);
        if gold.lifetime == 0 {
            body.alive = false;
        }
    }
}

pub(crate) fn update_barrel(body: &mut Body, player: &mut Player, ctx: &mut TickContext<'_>) {
    if reveal_near_player(body, EntityKind::Barrel, player, ctx) {
        return;
    }
    if !body.cell.within(player.body.cell, CONTACT_RADIUS) {
        return;
    }

    body.alive = false;
    ctx.host.play_sound(Sound::FoundOil);
    ctx.host.increase_score(OIL_POINTS);
    *ctx.barrels_left = ctx.barrels_left.saturating_sub(1);
    ctx.events.push(Event::OilFound {
        barrel: body.id,
        remaining: *ctx.barrels_left,
    });
}

pub(crate) fn update_sonar_kit(
    body: &mut Body,
    goodie: &mut Goodie,
    player: &mut Player,
    ctx: &mut TickContext<'_>,
) {
    update_goodie(body, goodie, player, ctx, SONAR_KIT_POINTS, |stats| {
        stats.sonar = stats.sonar.saturating_add(1);
    });
}

pub(crate) fn update_water_pool(
    body: &mut Body,
    goodie: &mut Goodie,
    player: &mut Player,
    ctx: &mut TickContext<'_>,
) {
    update_goodie(body, goodie, player, ctx, WATER_POOL_POINTS, |stats| {
        stats.water = stats.water.saturating_add(WATER_PER_POOL);
    });
}

fn update_goodie<F>(
    body: &mut Body,
    goodie: &mut Goodie,
    player: &mut Player,
    ctx: &mut TickContext<'_>,
    points: u32,
    reward: F,
) where
    F: FnOnce(&mut PlayerStats),
{
    if body.cell.within(player.body.cell, CONTACT_RADIUS) {
        body.alive = false;
        ctx.host.play_sound(Sound::GotGoodie);
        ctx.host.increase_score(points);
        reward(&mut player.stats);
        return;
    }

    goodie.lifetime = goodie.lifetime.saturating_sub(1);
    if goodie.lifetime == 0 {
        body.alive = false;
    }
}

/// Makes a hidden item visible once the player comes close, reporting whether
/// it happened this tick.
fn reveal_near_player(
    body: &mut Body,
    kind: EntityKind,
    player: &Player,
    ctx: &mut TickContext<'_>,
) -> bool {
    if body.visible || !body.cell.within(player.body.cell, REVEAL_RADIUS) {
        return false;
    }
    body.visible = true;
    ctx.events.push(Event::ItemRevealed {
        item: body.id,
        kind,
    });
    true
}
