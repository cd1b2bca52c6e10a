use std::path::Path;
use std::time::Duration;
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tokio::{signal, time};
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use synthpool_core::{FixedClock, SystemClock};
use synthpool_keeper::config::create_example_config;
use synthpool_keeper::{KeeperConfig, MonitoringConfig, Monitor, PoolDataSource, StaticSource, SubgraphClient};

#[derive(Parser, Debug)]
#[command(name = "synthpool-keeper")]
#[command(about = "SynthPool lifecycle keeper: market hours, rebalance state and request gates")]
struct Args {
    /// Path to keeper configuration file
    #[arg(short, long, default_value = "keeper.toml", global = true)]
    config: String,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Poll the configured pools until interrupted
    Run {
        /// Override the subgraph endpoint
        #[arg(long)]
        subgraph_url: Option<String>,

        /// Override the polling interval in seconds
        #[arg(short, long)]
        interval: Option<u64>,

        /// Poll once and exit
        #[arg(long)]
        once: bool,
    },

    /// Evaluate the configured pools once and print the reports as JSON
    Status {
        /// Only this pool (name or subgraph id)
        #[arg(long)]
        pool: Option<String>,

        /// Evaluate at this instant (RFC 3339) instead of now
        #[arg(long)]
        at: Option<String>,

        /// Read pool state from a JSON snapshot instead of the subgraph
        #[arg(long)]
        snapshot: Option<String>,
    },

    /// Write an example configuration file
    InitConfig {
        #[arg(short, long, default_value = "keeper.toml")]
        output: String,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Command::InitConfig { output, force } => {
            init_logging(&MonitoringConfig::default(), args.verbose);
            if Path::new(&output).exists() && !force {
                bail!("{} already exists, pass --force to overwrite", output);
            }
            create_example_config(&output)?;
            info!("Created example config at {}", output);
            Ok(())
        }
        Command::Run { subgraph_url, interval, once } => {
            let mut config = load_config(&args.config)?;
            if let Some(url) = subgraph_url {
                config.subgraph_url = url;
            }
            if let Some(secs) = interval {
                config.poll_interval_secs = secs;
            }
            config.validate()?;

            init_logging(&config.monitoring, args.verbose);
            run(config, once).await
        }
        Command::Status { pool, at, snapshot } => {
            let mut config = load_config(&args.config)?;
            init_logging(&config.monitoring, args.verbose);

            if let Some(wanted) = pool {
                config.pools.retain(|p| p.name == wanted || p.pool_id.eq_ignore_ascii_case(&wanted));
                if config.pools.is_empty() {
                    bail!("No pool named '{}' in {}", wanted, args.config);
                }
                config.pools.iter_mut().for_each(|p| p.enabled = true);
            }

            let now = match at {
                Some(s) => DateTime::parse_from_rfc3339(&s)
                    .with_context(|| format!("Invalid --at timestamp '{}'", s))?
                    .with_timezone(&Utc),
                None => Utc::now(),
            };

            match snapshot {
                Some(path) => {
                    let json = std::fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read snapshot {}", path))?;
                    print_status(StaticSource::from_json(&json)?, now, &config).await
                }
                None => print_status(SubgraphClient::from_config(&config)?, now, &config).await,
            }
        }
    }
}

fn load_config(path: &str) -> Result<KeeperConfig> {
    KeeperConfig::load(path).with_context(|| format!("Failed to load configuration from {}", path))
}

async fn run(config: KeeperConfig, once: bool) -> Result<()> {
    info!("Starting SynthPool Keeper");
    info!("Subgraph: {}", config.subgraph_url);
    info!("Update interval: {}s", config.poll_interval_secs);

    let client = SubgraphClient::from_config(&config)?;
    let mut monitor = Monitor::new(client, SystemClock, &config)?;

    info!("Watching {} pools", monitor.pools().len());

    match monitor.health_check().await {
        Ok(block) => info!("Subgraph reachable, indexed block {}", block),
        Err(e) => warn!("Subgraph health check failed: {}", e),
    }

    let mut interval_timer = time::interval(Duration::from_secs(config.poll_interval_secs));
    let mut iteration = 0u64;

    loop {
        tokio::select! {
            _ = signal::ctrl_c() => {
                info!("Received shutdown signal");
                break;
            }
            _ = interval_timer.tick() => {}
        }

        iteration += 1;
        debug!("Starting keeper iteration {}", iteration);

        let reports = monitor.poll_all_pools().await;
        let changed = reports.iter().filter(|r| r.state_changed()).count();
        if changed > 0 {
            info!("Iteration {}: {} of {} pools changed state", iteration, changed, reports.len());
        } else {
            debug!("Iteration {}: {} pools polled, no state changes", iteration, reports.len());
        }

        if once {
            println!("{}", serde_json::to_string_pretty(&reports)?);
            break;
        }

        // Basic health metrics every 100 iterations
        if iteration % 100 == 0 {
            info!("Keeper health check - iteration {}", iteration);
            if let Err(e) = monitor.health_check().await {
                warn!("Health check warning: {}", e);
            }
        }
    }

    info!("Shutting down SynthPool Keeper");
    Ok(())
}

async fn print_status<S: PoolDataSource>(source: S, now: DateTime<Utc>, config: &KeeperConfig) -> Result<()> {
    let mut monitor = Monitor::new(source, FixedClock(now), config)?;
    let reports = monitor.poll_all_pools().await;
    println!("{}", serde_json::to_string_pretty(&reports)?);
    Ok(())
}

fn init_logging(monitoring: &MonitoringConfig, verbose: bool) {
    let log_level = if verbose { "debug" } else { monitoring.log_level.as_str() };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("synthpool_keeper={},synthpool_core={}", log_level, log_level).into()
    });

    if monitoring.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
