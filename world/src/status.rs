//! Status line pushed to the host at the start of every tick.

use tunnelman_core::{Level, PlayerStats};

pub(crate) fn status_line(
    level: Level,
    lives: u32,
    stats: &PlayerStats,
    barrels_left: u32,
    score: u32,
) -> String {
    format!(
        "Lvl: {:2}  Lives: {}  Hlth: {:3}%  Wtr: {:2}  Gld: {:2}  Oil Left: {:2}  Sonar: {:2}  Scr: {:06}",
        level.get(),
        lives,
        stats.hit_points.max(0).saturating_mul(10),
        stats.water,
        stats.gold,
        barrels_left,
        stats.sonar,
        score,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_fields_like_the_classic_status_bar() {
        let line = status_line(Level::new(1), 3, &PlayerStats::default(), 3, 1234);
        assert_eq!(
            line,
            "Lvl:  1  Lives: 3  Hlth: 100%  Wtr:  5  Gld:  0  Oil Left:  3  Sonar:  1  Scr: 001234"
        );
    }
}
