mod alerts;
mod collectors;
mod config;
mod error;
mod models;
mod util;

use anyhow::Result;
use clap::Parser;
use config::Settings;
use tracing::{debug, error, info, warn};
use util::webhook::Notifier;

#[derive(Parser, Debug)]
#[command(name = "dfwatch", about = "df-based disk space watchdog", version = "0.1")]
struct Cli {
    /// One-shot check: exit 0 if every monitored filesystem is under its
    /// threshold, 1 otherwise (cron/nagios compatible)
    #[arg(long)]
    check: bool,

    /// Print a one-shot JSON snapshot of usage and breaches, then exit
    #[arg(long)]
    json: bool,

    /// Print the resolved configuration and exit
    #[arg(long)]
    config: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if cli.config {
        return run_print_config();
    }
    if cli.json {
        return run_json_snapshot().await;
    }
    if cli.check {
        return run_check().await;
    }
    run_daemon().await
}

/// Poll forever: sample, evaluate, notify, sleep. The configuration is
/// re-read every tick so threshold and endpoint edits take effect live.
/// Configuration errors are fatal; a failed `df` call is logged and retried
/// on the next tick; webhook failures are swallowed inside the notifier.
async fn run_daemon() -> Result<()> {
    let notifier = Notifier::new();
    info!("dfwatch daemon starting");

    loop {
        let settings = Settings::load()?;
        let thresholds =
            config::parse_thresholds(settings.global_threshold, &settings.file_systems)?;

        let delay = match collectors::df::get_usage().await {
            Ok(records) => {
                let breaches = alerts::evaluate(&records, &thresholds);
                for breach in &breaches {
                    warn!("{}: used {}", breach.filesystem, breach.used);
                    notifier
                        .notify(&settings.api_endpoint, &breach.filesystem, &breach.used)
                        .await;
                }
                debug!(
                    "tick done: {} row(s) sampled, {} breach(es)",
                    records.len(),
                    breaches.len()
                );
                alerts::next_delay(
                    !breaches.is_empty(),
                    settings.trigger_interval,
                    settings.warning_interval,
                )
            }
            Err(e) => {
                error!("usage sampling failed: {e}");
                settings.trigger_interval
            }
        };

        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = shutdown_signal() => {
                info!("shutdown signal received, exiting");
                return Ok(());
            }
        }
    }
}

/// Resolves on SIGINT or SIGTERM so the sleep between ticks aborts promptly.
async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("cannot install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

fn run_print_config() -> Result<()> {
    let settings = Settings::load()?;
    let thresholds = config::parse_thresholds(settings.global_threshold, &settings.file_systems)?;

    let endpoint = if settings.api_endpoint.is_empty() {
        "(not set)"
    } else {
        settings.api_endpoint.as_str()
    };
    println!("API_ENDPOINT      = {}", endpoint);
    println!("GLOBAL_THRESHOLD  = {}%", settings.global_threshold);
    println!("TRIGGER_INTERVAL  = {}s", settings.trigger_interval.as_secs());
    println!("WARNING_INTERVAL  = {}s", settings.warning_interval.as_secs());
    println!();

    let mut monitored: Vec<(&String, &f64)> =
        thresholds.iter().filter(|(fs, _)| !fs.is_empty()).collect();
    monitored.sort_by(|a, b| a.0.cmp(b.0));
    if monitored.is_empty() {
        println!("No filesystems configured (FILE_SYSTEMS is empty).");
    } else {
        println!("Monitored filesystems:");
        for (fs, threshold) in monitored {
            println!("  {} at {}%", fs, threshold);
        }
    }
    Ok(())
}

async fn run_check() -> Result<()> {
    let settings = Settings::load()?;
    let thresholds = config::parse_thresholds(settings.global_threshold, &settings.file_systems)?;
    let records = collectors::df::get_usage().await?;
    let breaches = alerts::evaluate(&records, &thresholds);

    let monitored = thresholds.keys().filter(|fs| !fs.is_empty()).count();
    if breaches.is_empty() {
        println!(
            "OK — {} filesystem(s) sampled, {} monitored, none over threshold",
            records.len(),
            monitored
        );
        return Ok(());
    }

    for breach in &breaches {
        println!("[WARN] {}: used {}", breach.filesystem, breach.used);
    }
    std::process::exit(1);
}

async fn run_json_snapshot() -> Result<()> {
    use serde_json::json;
    use std::collections::BTreeMap;

    let settings = Settings::load()?;
    let thresholds = config::parse_thresholds(settings.global_threshold, &settings.file_systems)?;
    let records = collectors::df::get_usage().await?;
    let breaches = alerts::evaluate(&records, &thresholds);

    // Sorted map so the snapshot is stable across runs.
    let monitored: BTreeMap<&String, &f64> =
        thresholds.iter().filter(|(fs, _)| !fs.is_empty()).collect();

    let snapshot = json!({
        "dfwatch_version":  "0.1",
        "global_threshold": settings.global_threshold,
        "monitored":        monitored,
        "usage":            records,
        "breaches":         breaches,
    });
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
