//! Level progression loop driving one world after another.

use tracing::{debug, info, trace};
use tunnelman_core::{Host, Level, TickOutcome};
use tunnelman_world::{self as world, query, Config, World};

use crate::{autopilot::Autopilot, config::Settings, seed};

/// Reason a session stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SessionEnd {
    /// The last life was lost.
    OutOfLives,
    /// The tick budget ran out first.
    TickLimit,
}

/// Totals reported once a session stops.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SessionSummary {
    pub(crate) end: SessionEnd,
    pub(crate) final_level: Level,
    pub(crate) levels_cleared: u32,
    pub(crate) score: u32,
    pub(crate) ticks: u64,
    pub(crate) sounds: u64,
}

impl SessionSummary {
    /// One-line report printed when the binary exits.
    pub(crate) fn report(&self) -> String {
        let reason = match self.end {
            SessionEnd::OutOfLives => "out of lives",
            SessionEnd::TickLimit => "tick limit reached",
        };
        format!(
            "{reason}: level {}, {} level(s) cleared, score {:06}, {} ticks, {} sounds",
            self.final_level.get(),
            self.levels_cleared,
            self.score,
            self.ticks,
            self.sounds,
        )
    }
}

/// Plays levels until the lives or the tick budget run out.
pub(crate) fn run(settings: &Settings) -> SessionSummary {
    let mut host = Autopilot::new(
        seed::autopilot_seed(settings.seed),
        settings.autopilot.key_chance_percent,
        settings.lives,
    );
    let mut level = Level::new(settings.starting_level);
    let mut attempt = 0;
    let mut levels_cleared = 0;
    let mut ticks = 0;
    let mut events = Vec::new();

    let end = loop {
        let config = Config::new(level, seed::level_seed(settings.seed, level, attempt));
        let mut world = World::new(config);
        info!(
            level = query::level(&world).get(),
            attempt,
            seed = config.rng_seed(),
            oil = query::barrels_left(&world),
            "level started"
        );

        let mut outcome = TickOutcome::Continue;
        while !outcome.is_terminal() && ticks < settings.max_ticks {
            events.clear();
            outcome = world::tick(&mut world, &mut host, &mut events);
            ticks += 1;
            for event in &events {
                trace!(?event, "world event");
            }
        }

        match outcome {
            TickOutcome::LevelFinished => {
                info!(level = level.get(), score = host.score(), "level cleared");
                levels_cleared += 1;
                level = level.next();
                attempt = 0;
            }
            TickOutcome::PlayerDied => {
                info!(
                    level = level.get(),
                    lives = host.lives(),
                    status = host.status(),
                    "player died"
                );
                if host.lives() == 0 {
                    break SessionEnd::OutOfLives;
                }
                attempt += 1;
            }
            TickOutcome::Continue => {
                debug!(
                    level = config.level().get(),
                    ticks,
                    "tick budget exhausted mid-level"
                );
                break SessionEnd::TickLimit;
            }
        }
        if ticks >= settings.max_ticks {
            break SessionEnd::TickLimit;
        }
    };

    SessionSummary {
        end,
        final_level: level,
        levels_cleared,
        score: host.score(),
        ticks,
        sounds: host.sounds_played(),
    }
}
