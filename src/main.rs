//! User proxy service.
//!
//! Forwards `/users` CRUD requests to an upstream REST API.
//!
//! ```text
//!     Client ──▶ request id ─▶ trace ─▶ body limit ─▶ /users handlers ──▶ UpstreamClient ──▶ upstream
//!            ◀── JSON body / error envelope ◀───────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use user_proxy::config::{read_config, validate_config, ConfigError, ServiceConfig};
use user_proxy::http::HttpServer;
use user_proxy::lifecycle::{signals, Shutdown};
use user_proxy::observability::{logging, metrics};

#[derive(Parser, Debug)]
#[command(name = "user-proxy")]
#[command(about = "HTTP proxy exposing CRUD endpoints for users", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(short, long, env = "USER_PROXY_CONFIG")]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long, env = "USER_PROXY_BIND")]
    bind: Option<String>,

    /// Override upstream.base_url.
    #[arg(short, long, env = "USER_PROXY_UPSTREAM_URL")]
    upstream_url: Option<String>,
}

impl Cli {
    fn resolve_config(&self) -> Result<ServiceConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => ServiceConfig::default(),
        };

        if let Some(bind) = &self.bind {
            config.listener.bind_address = bind.clone();
        }
        if let Some(url) = &self.upstream_url {
            config.upstream.base_url = url.clone();
        }

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    logging::init_logging(&config.observability)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "user-proxy starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        upstream_timeout_secs = config.upstream.timeout_secs,
        config_file = ?cli.config,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        // Address already checked by validate_config.
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_listener(shutdown);

    let server = HttpServer::new(config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
