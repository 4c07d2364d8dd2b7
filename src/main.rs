//! iFlytek ISE signing proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌───────────────────────────────────────────────┐
//!                         │                  ISE PROXY                     │
//!    POST /iflytek/ise    │  ┌──────────┐   ┌──────────┐   ┌───────────┐  │
//!    ─────────────────────┼─▶│   auth   │──▶│ request  │──▶│  signing  │  │
//!                         │  │ (token)  │   │ (parse)  │   │ (md5/b64) │  │
//!                         │  └──────────┘   └──────────┘   └─────┬─────┘  │
//!                         │                                      ▼        │
//!    upstream response    │                               ┌───────────┐  │   iFlytek
//!    ◀────────────────────┼───────────────────────────────│ upstream  │◀─┼── ISE API
//!                         │                               └───────────┘  │
//!                         └───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use ise_proxy::config::{load_config, load_env_file, validation::missing_credentials, ProxyConfig};
use ise_proxy::observability::{logging::init_logging, metrics::init_metrics};
use ise_proxy::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "ise-proxy")]
#[command(about = "Authenticated signing proxy for the iFlytek ISE API", long_about = None)]
struct Args {
    /// Optional TOML config file; environment variables (and `.env`) override it.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let env_file = load_env_file()?;
    let config = load_config(args.config.as_deref())?;

    init_logging(&config.observability.log_level);
    if let Some(path) = env_file {
        tracing::info!(path = %path.display(), "Loaded environment file");
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.server.worker_threads())
        .enable_all()
        .build()?;

    runtime.block_on(serve(config))
}

async fn serve(config: ProxyConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("ise-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    for name in missing_credentials(&config) {
        tracing::warn!(setting = name, "Not configured; requests will fail until it is set");
    }

    tracing::info!(
        bind_address = %config.listener.bind_address(),
        upstream = %config.upstream.url,
        upstream_timeout_secs = config.upstream.timeout_secs,
        max_audio_bytes = config.limits.max_audio_bytes,
        workers = config.server.worker_threads(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(config.listener.bind_address()).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
