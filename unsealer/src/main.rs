//! Unsealer command-line entrypoint.
//! Loads a key-share configuration and unseals the configured vault.

use anyhow::{Context, Result};
use clap::Parser;
use rand::{SeedableRng, rngs::StdRng};
use tracing::debug;
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt};
use unseal_core::{Config, HttpVault, UnsealOutcome, check, unseal};

use crate::cli::Cli;

mod cli;

/// Main entry point for the unsealer.
/// - Loads `.env` so `UNSEAL_CONFIG` and `RUST_LOG` may live there.
/// - Initializes tracing subscriber (EnvFilter + fmt) on stderr.
/// - Reads the configuration, then probes or unseals the vault.
#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.json_logs)?;
    run(cli).await
}

fn init_tracing(json: bool) -> Result<()> {
    let filter_layer = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (text_layer, json_layer) = if json {
        let layer = fmt::layer()
            .json()
            .with_target(false)
            .with_writer(std::io::stderr);
        (None, Some(layer))
    } else {
        let layer = fmt::layer().with_target(false).with_writer(std::io::stderr);
        (Some(layer), None)
    };

    let subscriber = Registry::default()
        .with(filter_layer)
        .with(text_layer)
        .with(json_layer);
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set global tracing subscriber")
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(&cli.config)?;
    let vault = HttpVault::new(&config.endpoint, cli.timeout())?;

    if cli.check {
        check(&vault).await?;
        return Ok(());
    }

    let seed = cli.seed.unwrap_or_else(rand::random);
    debug!(seed, "key selection seed");
    let mut rng = StdRng::seed_from_u64(seed);

    match unseal(&vault, &config, &mut rng)
        .await
        .with_context(|| format!("unseal of {} aborted", config.endpoint))?
    {
        UnsealOutcome::AlreadyUnsealed => debug!("no keys submitted"),
        UnsealOutcome::Unsealed { attempts } => debug!(attempts, "keys submitted"),
    }
    Ok(())
}
