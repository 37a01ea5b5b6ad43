//! cuebridge - live sensor readings to show-control cues

use anyhow::{bail, Result};
use clap::Parser;
use cuebridge::config::{self, RangeConfig};
use cuebridge::mapping::CueChannel;
use cuebridge::Bridge;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

mod cli;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Serve { config: config_path } => {
            info!("Starting cuebridge v{}", env!("CARGO_PKG_VERSION"));
            let cfg = config::load_or_default(config_path.as_deref())?;

            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(Bridge::new(cfg).run(shutdown_signal()))?;
        }

        Commands::Check { config: config_path } => {
            println!("Checking configuration at {:?}...", config_path);

            match config::load_config(&config_path) {
                Ok(cfg) => {
                    println!("Configuration is valid!");
                    println!("  HTTP: {}", cfg.http.bind);
                    println!("  OSC listen: {}", cfg.osc.listen);
                    println!("  OSC target: {}", cfg.osc.target);
                    println!(
                        "  Pulse: {} every {} ms (check every {} ms)",
                        cfg.pulse.address, cfg.pulse.default_interval_ms, cfg.pulse.quantum_ms
                    );
                    println!("  Prop: {}", cfg.prop.base_url);
                    println!("  Channels: {}", cfg.channels.len());
                    for channel in &cfg.channels {
                        let range = match channel.range {
                            RangeConfig::Fixed { min, max } => format!("fixed {}..{}", min, max),
                            RangeConfig::Adaptive { default_max, .. } => {
                                format!("adaptive (fallback 0..{})", default_max)
                            }
                        };
                        println!(
                            "    - {} {} -> {}[{}..{}]/start, {}",
                            channel.name,
                            channel.route,
                            channel.prefix,
                            channel.dest_min,
                            channel.dest_max,
                            range
                        );
                    }
                }
                Err(e) => {
                    println!("Configuration is invalid: {:#}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Map {
            config: config_path,
            channel,
            value,
            baseline,
        } => {
            let cfg = config::load_or_default(config_path.as_deref())?;
            let Some(found) = cfg
                .channels
                .iter()
                .find(|c| c.name == channel || c.route == channel)
            else {
                bail!("No channel named '{}'", channel);
            };

            let channel = CueChannel::from_config(found);
            if channel.policy().needs_baseline() && baseline.is_none() {
                println!("(no baseline given, using the fallback range)");
            }
            let range = channel.policy().source_range(baseline);
            let message = channel.trigger(value, baseline);
            println!("Source range: {}..{}", range.min, range.max);
            println!("{} ({:.2})", message.address, value);
        }

        Commands::Init => {
            let example_config = include_str!("../cuebridge.example.yaml");

            let path = "cuebridge.yaml";
            if std::path::Path::new(path).exists() {
                println!("cuebridge.yaml already exists. Not overwriting.");
            } else {
                std::fs::write(path, example_config)?;
                println!("Created cuebridge.yaml with example configuration.");
            }
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "unable to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
