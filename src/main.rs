//! Roulette-Sim - batch runner
//!
//! Usage: cargo run --release
//!
//! Settings come from config/default.*, config/local.* and ROULETTE__*
//! environment variables (see `AppConfig::load`).

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use roulette_sim::config::{AppConfig, LoggingConfig};
use roulette_sim::persistence::{run_stamp, CsvSink, DiscardSink, RecordSink, RunManifest};
use roulette_sim::rng::batch_rng;
use roulette_sim::BatchRunner;

fn main() -> Result<()> {
    let config = AppConfig::load()?;
    init_tracing(&config.logging);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %config,
        "Roulette-Sim starting"
    );

    let runner = BatchRunner::from_app(&config).context("Invalid configuration")?;

    let started_at = Utc::now();
    let stamp = run_stamp(started_at);
    let data_dir = Path::new(&config.persistence.data_dir);

    let mut sink: Box<dyn RecordSink> = if config.persistence.csv_enabled {
        Box::new(CsvSink::create(
            data_dir,
            &stamp,
            config.persistence.write_draws,
        )?)
    } else {
        info!("CSV output disabled");
        Box::new(DiscardSink)
    };

    let mut manifest = RunManifest::start(config.simulation.clone(), started_at);
    let mut rng = batch_rng(config.simulation.seed);

    let report = runner.run(&mut rng, sink.as_mut())?;

    manifest.finish(report);
    if config.persistence.csv_enabled {
        manifest.save(data_dir, &stamp)?;
    }

    info!(run_id = %manifest.run_id, "Done");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    // RUST_LOG wins over logging.level
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    if logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
