//! Exotour terminal player entry point.
//!
//! Plays the guided home tour and then the free-navigation tutorial, one
//! Enter press per step (or on a timer with `AUTO_ADVANCE_SECS`). Typing
//! `about` opens the About page; `back` and `home` move through it.

mod adapters;
mod config;
mod error;
mod player;

use std::sync::Arc;

use exotour_catalog::application::loader::load_catalog;
use exotour_content::application::builtin::home_tour;
use exotour_content::application::script_loader::load_script;
use exotour_core::event::SystemClock;
use exotour_storage::json_file_store::JsonFileStore;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing_subscriber::EnvFilter;

use crate::config::PlayerConfig;
use crate::error::PlayerError;
use crate::player::{Command, Phase, Player};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), PlayerError> {
    // Logs go to stderr so the narration on stdout stays readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting Exotour player");

    let config = PlayerConfig::from_env()?;
    let table = match &config.tour_script {
        Some(path) => load_script(path)?,
        None => home_tour()?,
    };
    let catalog = config
        .catalog_path
        .as_deref()
        .map(load_catalog)
        .transpose()?;
    if let Some(catalog) = &catalog {
        tracing::info!(
            records = catalog.len(),
            hosts = catalog.host_count(),
            "catalog loaded"
        );
    }
    let store = JsonFileStore::open_default(&config.state_dir)?;
    tracing::info!(path = %store.path().display(), "state store opened");

    let mut player = Player::new(
        table,
        Arc::new(store),
        Arc::new(SystemClock),
        catalog,
        std::io::stdout(),
    )?;

    run(&config, &mut player).await?;

    tracing::info!("Exotour player finished");
    Ok(())
}

async fn run(config: &PlayerConfig, player: &mut Player<std::io::Stdout>) -> Result<(), PlayerError> {
    let mut frames = tokio::time::interval(config.frame_interval());
    frames.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut auto_advance = config.auto_advance.map(|period| {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval
    });
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let stdin_open = auto_advance.is_none();
    let mut last_frame = Instant::now();

    while player.phase() != Phase::Finished {
        tokio::select! {
            now = frames.tick() => {
                player.on_frame(now - last_frame)?;
                last_frame = now;
            }
            () = next_tick(&mut auto_advance), if auto_advance.is_some() => {
                player.on_input()?;
            }
            line = lines.next_line(), if stdin_open => match line? {
                Some(line) => player.on_command(Command::parse(&line))?,
                None => {
                    tracing::info!("stdin closed, stopping");
                    break;
                }
            },
        }
    }
    Ok(())
}

async fn next_tick(interval: &mut Option<Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}
