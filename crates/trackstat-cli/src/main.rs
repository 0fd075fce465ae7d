//! Trajectory statistics binary.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use trackstat_cli::{analyze_video, metrics, Args, TrackerConfig};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trackstat=info"));

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

    let args = Args::parse();
    let config = args.apply(TrackerConfig::from_env());
    info!("Tracker config: {:?}", config);

    // Ctrl-C stops the frame feed; the frames seen so far are still reported
    let stop = Arc::new(AtomicBool::new(false));
    let stop_signal = Arc::clone(&stop);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received interrupt, stopping frame feed");
            stop_signal.store(true, Ordering::Relaxed);
        }
    });

    match analyze_video(&args.detections, &args.video, &config, stop).await {
        Ok(output) => {
            let report = &output.report;
            info!(
                frames = output.feed.frames,
                retained = report.movements.len(),
                proportion_closer = report.proportions.closer,
                proportion_further = report.proportions.further,
                average_unique_objects = ?report.average_unique_objects_per_frame,
                "Analysis finished"
            );
        }
        Err(e) => {
            metrics::record_failure();
            error!("Analysis failed: {}", e);
            std::process::exit(1);
        }
    }
}
