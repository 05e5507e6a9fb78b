//! Backend entry-point: configuration, storage, and server bootstrap.

use std::path::PathBuf;

use actix_web::cookie::Key;
use actix_web::web;
use clap::Parser;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use backend::server::{ServerConfig, create_server};

/// Command-line and environment configuration.
#[derive(Debug, Parser)]
#[command(name = "kerbside-backend", about = "Vehicle rental booking service")]
struct Cli {
    /// Socket address to bind the HTTP server to.
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    bind: std::net::SocketAddr,

    /// PostgreSQL connection URL; without it the server runs on the
    /// in-memory store with a demo fleet.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// File holding the session cookie key material.
    #[arg(long, env = "SESSION_KEY_FILE")]
    session_key_file: Option<PathBuf>,

    /// Whether session cookies require HTTPS transport.
    #[arg(
        long,
        env = "SESSION_COOKIE_SECURE",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    cookie_secure: bool,
}

fn load_session_key(path: Option<&PathBuf>) -> std::io::Result<Key> {
    match path {
        Some(path) => {
            let bytes = std::fs::read(path).map_err(|err| {
                std::io::Error::other(format!(
                    "failed to read session key at {}: {err}",
                    path.display()
                ))
            })?;
            Ok(Key::derive_from(&bytes))
        }
        None => {
            warn!("no session key file configured; using an ephemeral key (sessions reset on restart)");
            Ok(Key::generate())
        }
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();
    let key = load_session_key(cli.session_key_file.as_ref())?;

    let pool = match cli.database_url {
        Some(url) => {
            let migration_url = url.clone();
            tokio::task::spawn_blocking(move || run_pending_migrations(&migration_url))
                .await
                .map_err(std::io::Error::other)?
                .map_err(std::io::Error::other)?;

            let pool = DbPool::new(PoolConfig::new(url))
                .await
                .map_err(std::io::Error::other)?;
            Some(pool)
        }
        None => None,
    };

    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::new(key, cli.cookie_secure, cli.bind).with_db_pool(pool);

    let server = create_server(health_state, config)?;
    server.await
}
