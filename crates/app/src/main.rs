//! Food delivery backend.
//!
//! Entry point: loads configuration, prepares the database and the OTP
//! store, wires repositories and services into the HTTP server and runs it
//! until a shutdown signal arrives.

use std::sync::Arc;

use anyhow::{Context, Result};
use app_config::AppConfig;
use cache::{InMemoryOtpStore, RedisOtpStore};
use deadpool_postgres::Pool;
use repository::{
    PgAdminRepository, PgComboRepository, PgOrderRepository, PgUserRepository, Repositories,
};
use server::{AppState, ListSettings, Metrics, Server};
use service::{AuthService, AuthServiceImpl, ComboServiceImpl, LogSmsSender, OrderServiceImpl};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber; `RUST_LOG` wins over the configured level.
fn init_logger(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn auth_service(config: &AppConfig, pool: &Pool) -> Result<Arc<dyn AuthService>> {
    let users = PgUserRepository::new(pool.clone());
    let admins = PgAdminRepository::new(pool.clone());
    if config.redis_url.is_empty() {
        warn!("redis_url is empty, verification codes are kept in process memory");
        return Ok(Arc::new(AuthServiceImpl::new(
            users,
            admins,
            InMemoryOtpStore::new(),
            LogSmsSender,
            config.otp_ttl,
        )));
    }

    let store = RedisOtpStore::open(&config.redis_url, config.redis_key_prefix.clone())
        .context("Failed to create Redis client")?;
    info!("Using Redis OTP store");
    Ok(Arc::new(AuthServiceImpl::new(
        users,
        admins,
        store,
        LogSmsSender,
        config.otp_ttl,
    )))
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    init_logger(&config.log_level);

    info!("Food delivery backend starting...");

    let pool = match db::init_db_pool(&config).await {
        Ok(pool) => {
            info!("Database initialized successfully");
            pool
        }
        Err(e) => {
            error!("Failed to initialize database: {:#}", e);
            return Err(e);
        }
    };

    let state = AppState {
        orders: Arc::new(OrderServiceImpl::new(PgOrderRepository::new(pool.clone()))),
        combos: Arc::new(ComboServiceImpl::new(PgComboRepository::new(pool.clone()))),
        auth: auth_service(&config, &pool)?,
        repos: Repositories::postgres(pool),
        lists: ListSettings {
            default_limit: config.default_page_limit,
            max_limit: config.max_page_limit,
        },
        metrics: Arc::new(Metrics::new().context("Failed to register metrics")?),
    };

    let http_server = Server::new(config.http_port, state, config.shutdown_timeout);
    if let Err(e) = http_server.start().await {
        error!("HTTP server error: {:#}", e);
        return Err(e);
    }

    info!("Application stopped");
    Ok(())
}
