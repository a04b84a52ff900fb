//! Water squirt fired by the player.

use super::{Body, TickContext, CONTACT_RADIUS};

/// Cells a squirt travels before evaporating.
const TRAVEL_DISTANCE: u32 = 4;
/// Annoyance a squirt deals to each protester it reaches.
const SQUIRT_DAMAGE: i32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Squirt {
    pub(crate) travel_left: u32,
}

impl Squirt {
    pub(crate) const fn new() -> Self {
        Self {
            travel_left: TRAVEL_DISTANCE,
        }
    }
}

pub(crate) fn update(body: &mut Body, squirt: &mut Squirt, ctx: &mut TickContext<'_>) {
    if ctx.annoy_protesters_near(body.cell, CONTACT_RADIUS, SQUIRT_DAMAGE) {
        body.alive = false;
        return;
    }
    if squirt.travel_left == 0 {
        body.alive = false;
        return;
    }

    let next = body.cell.step(body.facing);
    if !next.is_anchor() || ctx.grid().is_blocked(next) {
        body.alive = false;
        return;
    }
    body.cell = next;
    squirt.travel_left -= 1;
}
