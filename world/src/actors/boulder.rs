//! Unstable rock physics.

use tracing::debug;
use tunnelman_core::{CellCoord, Direction, Event, Sound, FOOTPRINT};

use super::{protester, Body, Player, TickContext, CONTACT_RADIUS};

/// Ticks a loosened boulder wobbles before it falls.
pub(crate) const WAIT_TICKS: u32 = 30;
/// Damage dealt by a falling boulder; lethal to anything it lands on.
pub(crate) const IMPACT_DAMAGE: i32 = 100;

/// Lifecycle of a boulder. It never returns to `Stable` once loosened.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub(crate) enum Boulder {
    #[default]
    Stable,
    Waiting {
        ticks_left: u32,
    },
    Falling,
}

pub(crate) fn update(
    body: &mut Body,
    state: &mut Boulder,
    player: &mut Player,
    ctx: &mut TickContext<'_>,
) {
    match *state {
        Boulder::Stable => {
            let grid = ctx.grid();
            let supported = row_below(body.cell).any(|cell| grid.has_material(cell));
            if !supported {
                *state = Boulder::Waiting {
                    ticks_left: WAIT_TICKS,
                };
                ctx.events.push(Event::BoulderLoosened { boulder: body.id });
            }
        }
        Boulder::Waiting { ticks_left } => {
            let ticks_left = ticks_left.saturating_sub(1);
            if ticks_left == 0 {
                *state = Boulder::Falling;
                ctx.host.play_sound(Sound::FallingRock);
            } else {
                *state = Boulder::Waiting { ticks_left };
            }
        }
        Boulder::Falling => fall(body, player, ctx),
    }
}

fn fall(body: &mut Body, player: &mut Player, ctx: &mut TickContext<'_>) {
    let destination = body.cell.step(Direction::Down);
    let blocked = destination.y() < 0 || {
        let grid = ctx.grid();
        row_below(body.cell).any(|cell| grid.is_blocked(cell))
    };
    if blocked {
        body.alive = false;
        debug!(
            boulder = body.id.get(),
            x = body.cell.x(),
            y = body.cell.y(),
            "boulder shattered"
        );
        ctx.events.push(Event::BoulderShattered {
            boulder: body.id,
            cell: body.cell,
        });
        return;
    }

    if player.body.cell.within(destination, CONTACT_RADIUS) {
        player.annoy(IMPACT_DAMAGE, &mut *ctx.host);
    }
    for entity in ctx.others.iter_mut() {
        let Some((target, state)) = entity.as_live_protester_mut() else {
            continue;
        };
        if target.cell.within(destination, CONTACT_RADIUS) {
            protester::annoy(
                target,
                state,
                IMPACT_DAMAGE,
                ctx.level,
                &mut *ctx.host,
                &mut *ctx.events,
            );
        }
    }

    ctx.events.push(Event::BoulderFell {
        boulder: body.id,
        from: body.cell,
        to: destination,
    });
    body.cell = destination;
}

/// Cells directly beneath the 4-wide footprint anchored at `anchor`.
fn row_below(anchor: CellCoord) -> impl Iterator<Item = CellCoord> {
    (0..FOOTPRINT).map(move |dx| CellCoord::new(anchor.x() + dx, anchor.y() - 1))
}
