//! Protester state machine shared by the regular and hardcore variants.
//!
//! Each tick a protester that is not resting (or, for the hardcore variant,
//! staring at a bribe) performs exactly one of the following, in priority
//! order: walk toward the exit while leaving, shout at a player it faces,
//! pursue the player through the tunnels (hardcore only), approach a player
//! in plain sight, or wander.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;
use tunnelman_core::{CellCoord, Direction, Event, Host, Level, ProtesterKind, Sound, EXIT_CELL};

use crate::{grid::GridView, navigation::Route};

use super::{Body, Player, TickContext};

/// Reach of a shout, and the distance beyond which a protester gives chase.
const SHOUT_RANGE: f64 = 4.0;
/// Ticks that must pass between two shouts.
const SHOUT_COOLDOWN: u32 = 15;
const SHOUT_DAMAGE: i32 = 2;
/// Ticks after which a wandering protester considers a perpendicular turn.
const TURN_INTERVAL: u32 = 200;
/// Sideways slack tolerated when deciding whether a protester faces the player.
const FACING_SLACK: i32 = 4;
/// Annoyance at or above which giving up is worth the bigger reward.
const LETHAL_ANNOYANCE: i32 = 100;
const GIVE_UP_POINTS: u32 = 100;
const LETHAL_GIVE_UP_POINTS: u32 = 500;
const REGULAR_BRIBE_POINTS: u32 = 25;
const HARDCORE_BRIBE_POINTS: u32 = 50;
const WANDER_SQUARES_MIN: i32 = 8;
const WANDER_SQUARES_MAX: i32 = 60;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Protester {
    pub(crate) kind: ProtesterKind,
    pub(crate) hit_points: i32,
    pub(crate) resting_ticks: u32,
    pub(crate) stare_ticks: u32,
    pub(crate) squares_to_move: i32,
    pub(crate) ticks_since_shout: u32,
    pub(crate) ticks_since_turn: u32,
    pub(crate) leaving: bool,
}

impl Protester {
    /// Creates a protester that rests for one post-action period before acting.
    pub(crate) fn new(kind: ProtesterKind, level: Level, rng: &mut ChaCha8Rng) -> Self {
        Self {
            kind,
            hit_points: kind.initial_hit_points(),
            resting_ticks: level.rest_ticks(),
            stare_ticks: 0,
            squares_to_move: draw_squares(rng),
            ticks_since_shout: 0,
            ticks_since_turn: 0,
            leaving: false,
        }
    }
}

pub(crate) fn update(
    body: &mut Body,
    protester: &mut Protester,
    player: &mut Player,
    ctx: &mut TickContext<'_>,
) {
    if protester.resting_ticks > 0 {
        protester.resting_ticks -= 1;
        return;
    }
    if protester.stare_ticks > 0 {
        protester.stare_ticks -= 1;
        return;
    }

    protester.ticks_since_shout = protester.ticks_since_shout.saturating_add(1);
    protester.ticks_since_turn = protester.ticks_since_turn.saturating_add(1);
    let rest = ctx.level.rest_ticks();

    if protester.leaving {
        if body.cell == EXIT_CELL {
            body.alive = false;
            debug!(protester = body.id.get(), "protester left the field");
            let exited = Event::ProtesterExited { protester: body.id };
            ctx.events.push(exited);
            return;
        }
        let grid = GridView::new(&*ctx.terrain, ctx.others.iter());
        let direction = ctx
            .path_finder
            .route(EXIT_CELL, body.cell, None, |cell| grid.is_blocked(cell))
            .direction_or_fallback();
        body.facing = direction;
        step_forward(body, protester, &grid);
        protester.resting_ticks = rest;
        return;
    }

    let target = player.body.cell;
    let near = body.cell.within(target, SHOUT_RANGE);

    if near && faces(body, target) && protester.ticks_since_shout >= SHOUT_COOLDOWN {
        ctx.host.play_sound(Sound::ProtesterYell);
        player.annoy(SHOUT_DAMAGE, &mut *ctx.host);
        protester.ticks_since_shout = 0;
        protester.resting_ticks = rest;
        return;
    }

    let grid = GridView::new(&*ctx.terrain, ctx.others.iter());

    if !near && protester.kind == ProtesterKind::Hardcore {
        let budget = Some(ctx.level.pursuit_budget());
        let route = ctx
            .path_finder
            .route(target, body.cell, budget, |cell| grid.is_blocked(cell));
        if let Route::Step(direction) = route {
            body.facing = direction;
            step_forward(body, protester, &grid);
            protester.resting_ticks = rest;
            return;
        }
    }

    if !near && in_line_of_sight(body.cell, target, &grid) {
        let direction = direction_toward(body.cell, target);
        if grid.can_move(body.cell, direction) {
            body.facing = direction;
            body.cell = body.cell.step(direction);
            protester.squares_to_move = 0;
            protester.resting_ticks = rest;
            return;
        }
    }

    protester.squares_to_move -= 1;
    if protester.squares_to_move <= 0 {
        choose_direction(body, protester, &grid, ctx.rng);
    } else if protester.ticks_since_turn >= TURN_INTERVAL
        && turn_perpendicular(body, protester, &grid, ctx.rng)
    {
        protester.squares_to_move = draw_squares(ctx.rng);
    }
    step_forward(body, protester, &grid);
    protester.resting_ticks = rest;
}

/// Applies `amount` of annoyance; a protester already leaving ignores it.
pub(crate) fn annoy(
    body: &mut Body,
    protester: &mut Protester,
    amount: i32,
    level: Level,
    host: &mut dyn Host,
    events: &mut Vec<Event>,
) {
    if protester.leaving {
        return;
    }
    protester.hit_points = protester.hit_points.saturating_sub(amount);
    if protester.hit_points > 0 {
        host.play_sound(Sound::ProtesterAnnoyed);
        protester.resting_ticks = level.stun_ticks();
        return;
    }

    host.play_sound(Sound::ProtesterGaveUp);
    let points = if amount >= LETHAL_ANNOYANCE {
        LETHAL_GIVE_UP_POINTS
    } else {
        GIVE_UP_POINTS
    };
    host.increase_score(points);
    start_leaving(body, protester, events);
}

/// Hands a dropped nugget to the protester.
pub(crate) fn bribe(
    body: &mut Body,
    protester: &mut Protester,
    level: Level,
    host: &mut dyn Host,
    events: &mut Vec<Event>,
) {
    host.play_sound(Sound::ProtesterFoundGold);
    match protester.kind {
        ProtesterKind::Regular => {
            host.increase_score(REGULAR_BRIBE_POINTS);
            if protester.leaving {
                protester.resting_ticks = 0;
            } else {
                start_leaving(body, protester, events);
            }
        }
        ProtesterKind::Hardcore => {
            host.increase_score(HARDCORE_BRIBE_POINTS);
            protester.stare_ticks = level.stun_ticks();
        }
    }
}

fn start_leaving(body: &Body, protester: &mut Protester, events: &mut Vec<Event>) {
    protester.leaving = true;
    protester.resting_ticks = 0;
    debug!(protester = body.id.get(), "protester leaving");
    events.push(Event::ProtesterLeaving { protester: body.id });
}

/// Steps along the facing direction; a blocked step forces a new direction
/// choice on the next wander.
fn step_forward(body: &mut Body, protester: &mut Protester, grid: &GridView<'_>) {
    if grid.can_move(body.cell, body.facing) {
        body.cell = body.cell.step(body.facing);
    } else {
        protester.squares_to_move = 0;
    }
}

fn choose_direction(
    body: &mut Body,
    protester: &mut Protester,
    grid: &GridView<'_>,
    rng: &mut ChaCha8Rng,
) {
    let open: Vec<Direction> = Direction::ALL
        .into_iter()
        .filter(|direction| grid.can_move(body.cell, *direction))
        .collect();
    if open.is_empty() {
        return;
    }
    body.facing = open[rng.gen_range(0..open.len())];
    protester.squares_to_move = draw_squares(rng);
}

fn turn_perpendicular(
    body: &mut Body,
    protester: &mut Protester,
    grid: &GridView<'_>,
    rng: &mut ChaCha8Rng,
) -> bool {
    let open: Vec<Direction> = body
        .facing
        .perpendicular()
        .into_iter()
        .filter(|direction| grid.can_move(body.cell, *direction))
        .collect();
    if open.is_empty() {
        return false;
    }
    body.facing = open[rng.gen_range(0..open.len())];
    protester.ticks_since_turn = 0;
    true
}

fn draw_squares(rng: &mut ChaCha8Rng) -> i32 {
    rng.gen_range(WANDER_SQUARES_MIN..=WANDER_SQUARES_MAX)
}

/// The player lies ahead along the facing axis, within the sideways slack.
fn faces(body: &Body, target: CellCoord) -> bool {
    let dx = target.x() - body.cell.x();
    let dy = target.y() - body.cell.y();
    match body.facing {
        Direction::Left => dx < 0 && dy.abs() <= FACING_SLACK,
        Direction::Right => dx > 0 && dy.abs() <= FACING_SLACK,
        Direction::Up => dy > 0 && dx.abs() <= FACING_SLACK,
        Direction::Down => dy < 0 && dx.abs() <= FACING_SLACK,
    }
}

/// Same row or column with nothing blocking the cells strictly between.
fn in_line_of_sight(from: CellCoord, to: CellCoord, grid: &GridView<'_>) -> bool {
    if from.x() == to.x() {
        let (low, high) = (from.y().min(to.y()), from.y().max(to.y()));
        return (low + 1..high).all(|y| !grid.is_blocked(CellCoord::new(from.x(), y)));
    }
    if from.y() == to.y() {
        let (low, high) = (from.x().min(to.x()), from.x().max(to.x()));
        return (low + 1..high).all(|x| !grid.is_blocked(CellCoord::new(x, from.y())));
    }
    false
}

fn direction_toward(from: CellCoord, to: CellCoord) -> Direction {
    let dx = to.x() - from.x();
    let dy = to.y() - from.y();
    if dx.abs() < dy.abs() {
        if dy > 0 {
            Direction::Up
        } else {
            Direction::Down
        }
    } else if dx > 0 {
        Direction::Right
    } else {
        Direction::Left
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use tunnelman_core::EntityId;

    use super::*;
    use crate::testkit::ScriptedHost;

    fn fresh(kind: ProtesterKind) -> (Body, Protester) {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let cell = CellCoord::new(40, 60);
        let body = Body::new(EntityId::new(4), cell, Direction::Left, true);
        (body, Protester::new(kind, Level::new(1), &mut rng))
    }

    #[test]
    fn new_protesters_draw_a_wander_length_and_rest_first() {
        let (_, protester) = fresh(ProtesterKind::Hardcore);
        assert!((8..=60).contains(&protester.squares_to_move));
        assert_eq!(protester.resting_ticks, 3);
        assert_eq!(protester.hit_points, 20);
    }

    #[test]
    fn incremental_annoyance_that_exhausts_health_awards_a_hundred() {
        let (mut body, mut protester) = fresh(ProtesterKind::Regular);
        protester.hit_points = 2;
        protester.resting_ticks = 7;
        let level = Level::new(1);
        let mut host = ScriptedHost::new();
        let mut events = Vec::new();

        annoy(&mut body, &mut protester, 2, level, &mut host, &mut events);

        assert_eq!(host.score, 100);
        assert!(protester.leaving);
        assert_eq!(protester.resting_ticks, 0);
        assert_eq!(host.played(Sound::ProtesterGaveUp), 1);
        assert_eq!(events, vec![Event::ProtesterLeaving { protester: body.id }]);
    }

    #[test]
    fn lethal_annoyance_awards_five_hundred() {
        let (mut body, mut protester) = fresh(ProtesterKind::Hardcore);
        let level = Level::new(1);
        let mut host = ScriptedHost::new();
        let mut events = Vec::new();

        annoy(
            &mut body,
            &mut protester,
            LETHAL_ANNOYANCE,
            level,
            &mut host,
            &mut events,
        );

        assert_eq!(host.score, 500);
        assert!(protester.leaving);
    }

    #[test]
    fn surviving_annoyance_stuns_and_leaving_ignores_further_hits() {
        let (mut body, mut protester) = fresh(ProtesterKind::Regular);
        let level = Level::new(3);
        let mut host = ScriptedHost::new();
        let mut events = Vec::new();

        annoy(&mut body, &mut protester, 2, level, &mut host, &mut events);
        assert_eq!(protester.hit_points, 3);
        assert_eq!(protester.resting_ticks, 70);
        assert_eq!(host.played(Sound::ProtesterAnnoyed), 1);

        protester.leaving = true;
        annoy(&mut body, &mut protester, 99, level, &mut host, &mut events);
        assert_eq!(protester.hit_points, 3);
        assert_eq!(host.score, 0);
        assert!(events.is_empty());
    }

    #[test]
    fn bribing_a_regular_protester_sends_it_home() {
        let (mut body, mut protester) = fresh(ProtesterKind::Regular);
        let level = Level::new(1);
        let mut host = ScriptedHost::new();
        let mut events = Vec::new();

        bribe(&mut body, &mut protester, level, &mut host, &mut events);

        assert!(protester.leaving);
        assert_eq!(protester.resting_ticks, 0);
        assert_eq!(host.score, 25);
        assert_eq!(host.played(Sound::ProtesterFoundGold), 1);
        assert_eq!(events, vec![Event::ProtesterLeaving { protester: body.id }]);
    }

    #[test]
    fn bribing_a_leaving_regular_protester_clears_its_rest() {
        let (mut body, mut protester) = fresh(ProtesterKind::Regular);
        protester.leaving = true;
        protester.resting_ticks = 40;
        let level = Level::new(1);
        let mut host = ScriptedHost::new();
        let mut events = Vec::new();

        bribe(&mut body, &mut protester, level, &mut host, &mut events);

        assert!(protester.leaving);
        assert_eq!(protester.resting_ticks, 0);
        assert_eq!(host.score, 25);
        assert!(events.is_empty());
    }

    #[test]
    fn bribing_a_hardcore_protester_makes_it_stare() {
        let (mut body, mut protester) = fresh(ProtesterKind::Hardcore);
        let level = Level::new(3);
        let mut host = ScriptedHost::new();
        let mut events = Vec::new();

        bribe(&mut body, &mut protester, level, &mut host, &mut events);

        assert!(!protester.leaving);
        assert_eq!(protester.stare_ticks, 70);
        assert_eq!(host.score, 50);
        assert!(events.is_empty());
    }

    #[test]
    fn facing_tolerates_four_cells_of_sideways_slack() {
        let cell = CellCoord::new(20, 20);
        let body = Body::new(EntityId::new(1), cell, Direction::Up, true);
        assert!(faces(&body, CellCoord::new(24, 22)));
        assert!(!faces(&body, CellCoord::new(25, 22)));
        assert!(!faces(&body, CellCoord::new(20, 18)));
    }

    #[test]
    fn direction_toward_prefers_the_longer_axis() {
        let origin = CellCoord::new(10, 10);
        let toward = |x, y| direction_toward(origin, CellCoord::new(x, y));
        assert_eq!(toward(10, 20), Direction::Up);
        assert_eq!(toward(10, 2), Direction::Down);
        assert_eq!(toward(3, 10), Direction::Left);
        assert_eq!(toward(14, 14), Direction::Right);
    }
}
