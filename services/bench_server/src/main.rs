//! Fan-out benchmark server entry point

use bench_config::BenchConfig;
use broker_client::BrokerClient;
use clap::Parser;
use fanout_bench_server::BenchServer;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path (TOML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address
    #[arg(long)]
    bind_address: Option<String>,

    /// Port
    #[arg(short, long)]
    port: Option<u16>,

    /// Number of records to generate at startup
    #[arg(long)]
    dataset_size: Option<usize>,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fanout_bench_server=info,broker_client=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    info!("Starting fan-out benchmark server");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Load configuration, command line wins over file and environment
    let mut config = BenchConfig::load(args.config.as_deref())?;
    if let Some(bind_address) = args.bind_address {
        config.server.bind_address = bind_address;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(size) = args.dataset_size {
        config.dataset.size = size;
    }
    config.validate()?;

    if args.print_config {
        println!("{}", config.to_toml()?);
        return Ok(());
    }

    info!("Configuration loaded: {:?}", config.server);

    let started = Instant::now();
    let dataset = Arc::new(types::generate(config.dataset.size)?);
    info!(
        "Generated dataset with {} items in {:?}",
        dataset.len(),
        started.elapsed()
    );

    let broker = Arc::new(BrokerClient::new(&config.broker)?);
    info!(
        "Broker client ready: {} (channel '{}', {} connections max)",
        config.broker.api_url, config.broker.channel, config.broker.max_connections
    );

    let server = BenchServer::new(config, dataset, broker);

    // Handle shutdown gracefully
    let shutdown_signal = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received"),
            Err(e) => {
                error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        result = server.start() => {
            if let Err(e) = result {
                error!("Benchmark server error: {}", e);
                return Err(e.into());
            }
        }
        _ = shutdown_signal => {
            info!("Shutting down benchmark server");
        }
    }

    Ok(())
}
