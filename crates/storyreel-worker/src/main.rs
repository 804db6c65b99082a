//! Narration alignment worker binary.
//!
//! Usage: `storyreel-worker <job.json> [output.json]`

use std::path::PathBuf;

use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use storyreel_worker::{AlignmentStage, WorkerConfig};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("storyreel=info"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    if let Err(e) = run().await {
        error!("Alignment failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let mut args = std::env::args_os().skip(1);
    let input = args
        .next()
        .map(PathBuf::from)
        .context("usage: storyreel-worker <job.json> [output.json]")?;
    let output = args.next().map(PathBuf::from);

    let config = WorkerConfig::from_env();
    info!("Worker config: {:?}", config);

    let stage = AlignmentStage::new(config).context("invalid worker configuration")?;
    let written = stage
        .run_file(&input, output.as_deref())
        .await
        .with_context(|| format!("job {}", input.display()))?;

    info!(output = %written.display(), "Alignment written");
    Ok(())
}
