//! Backend entry-point: loads settings, prepares persistence and serves the
//! booking and messaging endpoints.

mod server;

use std::time::Duration;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use salon_booking::inbound::http::health::HealthState;
use salon_booking::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
#[cfg(feature = "metrics")]
use server::build_prometheus;
use server::{ServerConfig, ServerSettings};

const DB_CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);

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

    let settings = ServerSettings::load()
        .map_err(|err| std::io::Error::other(format!("load settings: {err}")))?;
    let mut config = ServerConfig::from_settings(&settings).map_err(std::io::Error::other)?;

    if let Some(database_url) = settings.database_url() {
        run_pending_migrations(database_url)
            .await
            .map_err(|err| std::io::Error::other(format!("run migrations: {err}")))?;
        let pool = DbPool::new(
            PoolConfig::new(database_url)
                .with_max_size(settings.db_max_connections())
                .with_connection_timeout(DB_CONNECTION_TIMEOUT),
        )
        .await
        .map_err(|err| std::io::Error::other(format!("create database pool: {err}")))?;
        info!("database pool ready");
        config = config.with_db_pool(pool);
    }

    #[cfg(feature = "metrics")]
    {
        config = config.with_metrics(Some(build_prometheus()?));
    }

    let bind_addr = config.bind_addr;
    let health_state = web::Data::new(HealthState::new());
    let server = server::create_server(health_state, config)?;
    info!(%bind_addr, "salon booking server listening");
    server.await
}
