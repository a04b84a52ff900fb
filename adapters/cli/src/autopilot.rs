//! Host implementation that presses random keys and keeps the scoreboard.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};
use tunnelman_core::{ControlKey, Direction, Host, Sound};

/// Keys the autopilot chooses between; movement dominates so it keeps digging.
const KEY_CHOICES: [ControlKey; 8] = [
    ControlKey::Move(Direction::Up),
    ControlKey::Move(Direction::Down),
    ControlKey::Move(Direction::Down),
    ControlKey::Move(Direction::Left),
    ControlKey::Move(Direction::Right),
    ControlKey::Fire,
    ControlKey::UseSonar,
    ControlKey::DropGold,
];

/// Scripted player plus audio sink and scoreboard for a headless session.
#[derive(Debug)]
pub(crate) struct Autopilot {
    rng: ChaCha8Rng,
    key_chance_percent: u8,
    held: Option<ControlKey>,
    score: u32,
    lives: u32,
    sounds_played: u64,
    status: String,
}

impl Autopilot {
    pub(crate) fn new(seed: u64, key_chance_percent: u8, lives: u32) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            key_chance_percent: key_chance_percent.min(100),
            held: None,
            score: 0,
            lives,
            sounds_played: 0,
            status: String::new(),
        }
    }

    /// Number of sound cues received so far.
    pub(crate) fn sounds_played(&self) -> u64 {
        self.sounds_played
    }

    /// Most recent status line pushed by the world.
    pub(crate) fn status(&self) -> &str {
        &self.status
    }
}

impl Host for Autopilot {
    fn pending_key(&mut self) -> Option<ControlKey> {
        if self.rng.gen_range(0..100u8) >= self.key_chance_percent {
            return None;
        }
        // Movement keys are repeated once so a turn is followed by a step.
        if let Some(key) = self.held.take() {
            return Some(key);
        }
        let key = KEY_CHOICES[self.rng.gen_range(0..KEY_CHOICES.len())];
        if matches!(key, ControlKey::Move(_)) {
            self.held = Some(key);
        }
        Some(key)
    }

    fn play_sound(&mut self, sound: Sound) {
        self.sounds_played += 1;
        debug!(?sound, "sound");
    }

    fn increase_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
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
        if self.status != text {
            trace!(status = text, "status");
            text.clone_into(&mut self.status);
        }
    }
}
