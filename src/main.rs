//! jobwatch — Binary Entrypoint
//! Boots the per-source pollers, wiring config, the seen store, and the
//! notification fan-out.
//!
//! See `README.md` for quickstart.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use jobwatch::poll::scheduler::{spawn_source_poller, SourceTask};
use jobwatch::poll::{config, Pipeline};
use jobwatch::{sources, NotifierMux, SeenStore};

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("jobwatch=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op in prod environments. This is where
    // DISCORD_WEBHOOK_URL / SLACK_WEBHOOK_URL come from outside CI.
    let _ = dotenvy::dotenv();

    init_tracing();

    let cfg = config::load_default()?;
    if cfg.sources.is_empty() {
        bail!("no sources configured; add [[sources]] entries to config/jobwatch.toml");
    }

    if let Err(e) = jobwatch::metrics::init() {
        tracing::warn!(error = ?e, "metrics recorder not installed");
    }

    let notifier = NotifierMux::from_env(cfg.notify_timeout_secs);
    if notifier.is_empty() {
        bail!("no notification backend configured; set DISCORD_WEBHOOK_URL or SLACK_WEBHOOK_URL");
    }

    let pipeline = Arc::new(Pipeline::new(
        SeenStore::new(&cfg.state_dir),
        Arc::new(notifier),
        Duration::from_secs(cfg.fetch_timeout_secs),
    ));

    let mut pollers = Vec::with_capacity(cfg.sources.len());
    for source in &cfg.sources {
        let adapter = sources::build_adapter(source)?;
        pollers.push(spawn_source_poller(
            pipeline.clone(),
            SourceTask {
                name: source.name.clone(),
                adapter,
                interval: Duration::from_secs(source.interval_secs),
                max_concurrent: source.max_concurrent,
            },
        ));
    }

    tracing::info!(sources = cfg.sources.len(), "jobwatch running");

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown requested");
    for poller in pollers {
        poller.abort();
    }
    Ok(())
}
