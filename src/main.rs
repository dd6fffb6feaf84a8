use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use photoism_server::auth::Jwt;
use photoism_server::config;
use photoism_server::database::{DatabaseManager, Repositories};
use photoism_server::{app, AppState};

#[derive(Debug, Parser)]
#[command(name = "photoism-server", version, about = "Photoism API server")]
struct Args {
    /// Port to listen on (overrides PORT / SERVER_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Interface to bind (overrides SERVER_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Do not apply embedded migrations at startup
    #[arg(long)]
    skip_migrations: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL and JWT_SECRET
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("photoism_server=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();
    let mut config = config::config().clone();
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if args.skip_migrations {
        config.database.run_migrations = false;
    }
    config.validate().context("invalid configuration")?;
    tracing::info!("Starting Photoism API in {:?} mode", config.environment);

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    if config.database.run_migrations {
        DatabaseManager::migrate(&pool)
            .await
            .context("failed to apply migrations")?;
    }

    let state = AppState::new(
        Repositories::postgres(pool),
        Jwt::from_config(&config.security),
        &config,
    );
    let app = app(state, &config);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("Photoism API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
