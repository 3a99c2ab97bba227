//! AMA - ask-me-anything backend with rotating refresh-token sessions

use anyhow::{Context, Result};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;

use ama_api::{AppState, cors_layer, create_router};
use ama_db::{Database, NewUser};
use config::{Config, LoggingConfig};

/// AMA - question/answer service with JWT sessions
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// Bind address
    #[arg(long, env = "AMA_BIND")]
    bind: Option<String>,

    /// Port
    #[arg(short, long, env = "AMA_PORT")]
    port: Option<u16>,

    /// SQLite database file
    #[arg(long, env = "AMA_DATABASE")]
    database: Option<String>,

    /// Token signing secret
    #[arg(long, env = "AMA_JWT_SECRET", hide_env_values = true)]
    jwt_secret: Option<String>,

    /// Token issuer
    #[arg(long)]
    jwt_issuer: Option<String>,

    /// Token audience
    #[arg(long)]
    jwt_audience: Option<String>,

    /// Refresh cookie domain
    #[arg(long)]
    cookie_domain: Option<String>,
}

impl Args {
    /// Command line values take precedence over the file
    fn apply(self, config: &mut Config) {
        if let Some(bind) = self.bind {
            config.server.bind_address = bind;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(database) = self.database {
            config.database.path = database;
        }
        if let Some(secret) = self.jwt_secret {
            config.auth.jwt_secret = secret;
        }
        if let Some(issuer) = self.jwt_issuer {
            config.auth.jwt_issuer = issuer;
        }
        if let Some(audience) = self.jwt_audience {
            config.auth.jwt_audience = audience;
        }
        if let Some(domain) = self.cookie_domain {
            config.auth.cookie_domain = domain;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration
    let mut config = Config::load(&args.config)?;
    args.apply(&mut config);

    // Initialize logging
    init_logging(&config.logging);

    info!("Starting AMA v{}", env!("CARGO_PKG_VERSION"));

    let auth_config = config.to_auth_config().context("Invalid auth configuration")?;
    if config.uses_default_secret() {
        warn!("Using the default JWT secret; set auth.jwt_secret or AMA_JWT_SECRET");
    }
    if !auth_config.ttl_ordering_holds() {
        warn!(
            "Refresh token TTL ({}s) is not longer than access token TTL ({}s)",
            config.auth.refresh_token_ttl_secs, config.auth.access_token_ttl_secs
        );
    }

    // Create data directory
    if let Some(parent) = Path::new(&config.database.path).parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create data directory {:?}", parent))?;
    }

    // Initialize database
    let db = Database::new(&config.database_url(), config.acquire_timeout())
        .await
        .context("Failed to open database")?;

    seed_first_user(&db, &config).await?;

    // Install the Prometheus recorder before any counter is touched
    let metrics_handle = PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    // Create application state
    let state = AppState::from_auth_config(db, &auth_config);

    // Create router
    let app = create_router(state, Some(Arc::new(metrics_handle)))
        .layer(cors_layer(&config.cors.allowed_origins))
        .layer(TraceLayer::new_for_http());

    // Determine bind address
    let addr: SocketAddr = format!("{}:{}", config.server.bind_address, config.server.port)
        .parse()
        .context("Invalid bind address")?;

    info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Create the configured first user if no users exist
async fn seed_first_user(db: &Database, config: &Config) -> Result<()> {
    if db.has_users().await? {
        return Ok(());
    }

    let seed = &config.auth.seed;
    info!("Creating first user {}", seed.email);

    let password_hash = ama_auth::hash_password(&seed.password)?;
    db.insert_user(NewUser {
        email: seed.email.clone(),
        first_name: seed.first_name.clone(),
        last_name: seed.last_name.clone(),
        password_hash,
    })
    .await?;

    if seed.password == "secret" {
        warn!("First user created with the default password; change it before going live");
    }
    Ok(())
}

/// Initialize logging
fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.format == "json" {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!("Failed to install CTRL+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
