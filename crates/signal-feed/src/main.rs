use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use signal_lanes::catalog::PRESETS;
use signal_lanes::metrics::FeedMetrics;
use signal_lanes::{FeedConfig, FeedController, FeedEvent, FeedRunner, SystemClock};

mod routes;

use routes::{create_router, AppState};

#[derive(Parser)]
#[command(name = "signal-feed")]
#[command(about = "Lane-scheduled feed of short-lived activity signals")]
struct Args {
    /// Listen address
    #[arg(long, env = "SIGNAL_LISTEN_ADDR", default_value = "0.0.0.0:8080")]
    listen_addr: String,

    /// YAML feed configuration; built-in defaults when omitted
    #[arg(long, env = "SIGNAL_CONFIG")]
    config: Option<PathBuf>,

    /// Fixed RNG seed for reproducible layouts
    #[arg(long, env = "SIGNAL_RNG_SEED")]
    seed: Option<u64>,

    /// Start with an empty feed instead of the preset batch
    #[arg(long)]
    no_preset: bool,

    /// Depth of the request queue in front of the feed runner
    #[arg(long, env = "SIGNAL_QUEUE_DEPTH", default_value = "256")]
    queue_depth: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "signal_feed=info,signal_lanes=info".into()),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => FeedConfig::load(path)
            .with_context(|| format!("failed to load feed config from {}", path.display()))?,
        None => FeedConfig::default(),
    };

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let metrics = Arc::new(FeedMetrics::new());
    let mut controller = FeedController::new(config, Arc::new(SystemClock::new()), rng)?;

    if !args.no_preset {
        let outcome = controller.apply(FeedEvent::SeedBatch(PRESETS.to_vec()))?;
        metrics.observe(&outcome, controller.registry().len());
    }

    let (runner, feed) = FeedRunner::new(controller, metrics.clone(), args.queue_depth);
    let shutdown = runner.shutdown_token();
    let runner_task = tokio::spawn(runner.run());

    let app = create_router(AppState { feed, metrics });

    let listener = tokio::net::TcpListener::bind(&args.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", args.listen_addr))?;

    info!(
        addr = %args.listen_addr,
        seeded = !args.no_preset,
        "signal-feed started"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    shutdown.cancel();
    let controller = runner_task.await.context("feed runner panicked")?;
    info!(messages = controller.registry().len(), "signal-feed stopped");
    Ok(())
}

/// Listen for SIGTERM or ctrl-c.
#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};
    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(sigterm) => sigterm,
        Err(e) => {
            tracing::warn!(error = %e, "failed to listen for SIGTERM, ctrl-c only");
            tokio::signal::ctrl_c().await.ok();
            return;
        }
    };

    tokio::select! {
        _ = sigterm.recv() => info!("SIGTERM received"),
        _ = tokio::signal::ctrl_c() => info!("ctrl-c received"),
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.ok();
    info!("ctrl-c received");
}
