#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless command-line driver that plays Tunnelman sessions with an
//! autopilot standing in for the keyboard.

mod autopilot;
mod config;
mod seed;
mod session;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Settings;

/// Command-line arguments accepted by the `tunnelman` binary.
#[derive(Debug, Parser)]
#[command(name = "tunnelman", about = "Runs headless Tunnelman sessions")]
struct CliArgs {
    /// TOML file providing session defaults.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Session seed every level seed is derived from.
    #[arg(long)]
    seed: Option<u64>,
    /// Level the session starts on.
    #[arg(long)]
    level: Option<u32>,
    /// Lives available before the session ends.
    #[arg(long)]
    lives: Option<u32>,
    /// Upper bound on simulated ticks across the whole session.
    #[arg(long)]
    max_ticks: Option<u64>,
}

impl CliArgs {
    fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)
                .with_context(|| format!("failed to load settings from {}", path.display()))?,
            None => Settings::default(),
        };
        if let Some(seed) = self.seed {
            settings.seed = seed;
        }
        if let Some(level) = self.level {
            settings.starting_level = level;
        }
        if let Some(lives) = self.lives {
            settings.lives = lives;
        }
        if let Some(max_ticks) = self.max_ticks {
            settings.max_ticks = max_ticks;
        }
        settings
            .validate()
            .context("command-line overrides produced invalid settings")?;
        Ok(settings)
    }
}

fn main() -> Result<()> {
    install_tracing();

    let args = CliArgs::parse();
    let settings = args.settings()?;
    info!(
        seed = settings.seed,
        level = settings.starting_level,
        lives = settings.lives,
        "session starting"
    );

    let summary = session::run(&settings);
    info!(
        score = summary.score,
        levels_cleared = summary.levels_cleared,
        final_level = summary.final_level.get(),
        ticks = summary.ticks,
        end = ?summary.end,
        "session finished"
    );
    println!("{}", summary.report());
    Ok(())
}

fn install_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
