//! Headless battle runner.
//!
//! Loads content from `ATB_DATA_DIR`, runs the roster's battle with AI on
//! both sides and prints the outcome. `RUST_LOG` controls the battle log.
mod battle;
mod config;
mod report;

use anyhow::Result;
use config::SimConfig;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let config = SimConfig::from_env();
    tracing::info!(
        data_dir = %config.data_dir.display(),
        seed = config.seed,
        max_ticks = config.max_ticks,
        "starting simulation"
    );

    let summary = battle::run(&config)?;
    summary.print();
    Ok(())
}
