//! Sticky balancer runner.
//!
//! Builds one client group from configuration and either supervises its
//! health until interrupted, or performs a single routing decision.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use clap::{Parser, Subcommand};

use sticky_balancer::config::{load_config, BalancerConfig};
use sticky_balancer::http::HttpServiceClient;
use sticky_balancer::lifecycle::signals;
use sticky_balancer::observability::{logging, metrics};
use sticky_balancer::{HealthMonitor, Shutdown, StickyBalancer};

#[derive(Parser)]
#[command(name = "sticky-balancer")]
#[command(about = "Sticky, health-aware backend selection", long_about = None)]
struct Cli {
    /// TOML configuration file (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Supervise instance health until interrupted
    Run,
    /// Run one health sweep and print the instance selected for a key
    Select {
        /// Affinity key
        #[arg(short, long, default_value = "")]
        key: String,

        /// Evaluate health as of this many milliseconds ago
        #[arg(long, default_value_t = 0)]
        at_ms_ago: u64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => BalancerConfig::default(),
    };

    logging::init(&config.observability.log_level);
    tracing::info!(group = %config.group, instances = config.instances.len(), "sticky-balancer v0.1.0 starting");

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let timeouts = config.timeouts.clone();
    let balancer = Arc::new(StickyBalancer::from_config(
        config.group.clone(),
        &config.instances,
        &config.health_check,
        |url| HttpServiceClient::new(url, &timeouts),
    )?);

    match cli.command {
        Commands::Run => {
            let shutdown = Shutdown::new();
            let monitor = HealthMonitor::new(balancer.clone(), config.health_check.clone());
            let handle = tokio::spawn(monitor.run(shutdown.subscribe()));

            signals::wait_for_signal().await;
            shutdown.trigger();
            handle.await?;
        }
        Commands::Select { key, at_ms_ago } => {
            balancer.health_check_sweep().await;

            let reference_time = SystemTime::now()
                .checked_sub(Duration::from_millis(at_ms_ago))
                .unwrap_or(UNIX_EPOCH);
            let instance = balancer.select_instance(&key, reference_time);
            println!("{} status={}", instance, instance.status_at(reference_time));
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
