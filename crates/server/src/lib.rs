//! Server crate provides HTTP server functionality.
//!
//! The REST API lives under `/food/api/v1`; `/health` and `/metrics` are
//! served at the root. Handlers bind and validate input, call a service or
//! repository, and translate failures through [`ApiError`].

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::Router;
use repository::Repositories;
use service::{AuthService, ComboService, OrderService};
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::Notify;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

pub mod error;
pub mod handlers;
pub mod metrics;
pub mod params;

pub use error::{ApiError, AppJson, AppPath, AppQuery};
pub use metrics::Metrics;
pub use params::{ListParams, ListSettings};

use handlers::{auth, catalog, combo, delivery, order, people, place};

/// Application state shared between request handlers.
#[derive(Clone)]
pub struct AppState {
    pub orders: Arc<dyn OrderService>,
    pub combos: Arc<dyn ComboService>,
    pub auth: Arc<dyn AuthService>,
    pub repos: Repositories,
    pub lists: ListSettings,
    pub metrics: Arc<Metrics>,
}

/// Builds the full router: API routes, health, metrics, CORS and the
/// metrics middleware.
pub fn router(state: AppState) -> Router {
    let registry = state.metrics.clone();

    Router::new()
        .nest("/food/api/v1", api_routes())
        .route("/health", get(handle_health))
        .route("/metrics", get(handle_metrics))
        .layer(axum::middleware::from_fn_with_state(registry, metrics::track))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/sendcode", post(auth::send_code))
        .route("/user/byphoneconfirm", post(auth::confirm_login))
        .route("/user/register", post(auth::confirm_register))
        .route("/admin/login", post(auth::confirm_admin_login))
        .route("/orders", post(order::create).get(order::list))
        .route(
            "/orders/{id}",
            get(order::get).put(order::update).delete(order::delete),
        )
        .route("/orders/{id}/status", patch(order::change_status))
        .route("/combos", post(combo::create).get(combo::list))
        .route(
            "/combos/{id}",
            get(combo::get).put(combo::update).delete(combo::delete),
        )
        .route("/users", post(people::create_user).get(people::list_users))
        .route(
            "/users/{id}",
            get(people::get_user)
                .put(people::update_user)
                .delete(people::delete_user),
        )
        .route("/admins", post(people::create_admin).get(people::list_admins))
        .route(
            "/admins/{id}",
            get(people::get_admin)
                .put(people::update_admin)
                .delete(people::delete_admin),
        )
        .route(
            "/categories",
            post(catalog::create_category).get(catalog::list_categories),
        )
        .route(
            "/categories/{id}",
            get(catalog::get_category)
                .put(catalog::update_category)
                .delete(catalog::delete_category),
        )
        .route(
            "/products",
            post(catalog::create_product).get(catalog::list_products),
        )
        .route(
            "/products/{id}",
            get(catalog::get_product)
                .put(catalog::update_product)
                .delete(catalog::delete_product),
        )
        .route(
            "/branches",
            post(place::create_branch).get(place::list_branches),
        )
        .route(
            "/branches/{id}",
            get(place::get_branch)
                .put(place::update_branch)
                .delete(place::delete_branch),
        )
        .route("/banners", post(place::create_banner).get(place::list_banners))
        .route("/banners/{id}", axum::routing::delete(place::delete_banner))
        .route(
            "/payments",
            post(delivery::create_payment).get(delivery::list_payments),
        )
        .route(
            "/payments/{id}",
            get(delivery::get_payment)
                .put(delivery::update_payment)
                .delete(delivery::delete_payment),
        )
        .route(
            "/notifications",
            post(delivery::create_notification).get(delivery::list_notifications),
        )
        .route(
            "/notifications/{id}",
            get(delivery::get_notification)
                .put(delivery::update_notification)
                .delete(delivery::delete_notification),
        )
        .route(
            "/courier-assignments",
            post(delivery::create_assignment).get(delivery::list_assignments),
        )
        .route(
            "/courier-assignments/{id}",
            get(delivery::get_assignment)
                .put(delivery::update_assignment)
                .delete(delivery::delete_assignment),
        )
        .route(
            "/delivery-history",
            post(delivery::create_history).get(delivery::list_history),
        )
        .route(
            "/delivery-history/{id}",
            get(delivery::get_history)
                .put(delivery::update_history)
                .delete(delivery::delete_history),
        )
}

async fn handle_health() -> &'static str {
    "OK"
}

async fn handle_metrics(State(state): State<AppState>) -> Response {
    match state.metrics.render() {
        Ok(text) => (StatusCode::OK, text).into_response(),
        Err(e) => {
            error!("Failed to encode metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to encode metrics").into_response()
        }
    }
}

/// Server represents the HTTP server of the food-delivery API.
pub struct Server {
    state: AppState,
    port: u16,
    shutdown_timeout: Duration,
}

impl Server {
    pub fn new(port: u16, state: AppState, shutdown_timeout: Duration) -> Self {
        info!("Initializing HTTP server on port {}", port);
        Self {
            state,
            port,
            shutdown_timeout,
        }
    }

    /// Serves until Ctrl+C or SIGTERM, then gives in-flight requests
    /// `shutdown_timeout` to finish.
    pub async fn start(&self) -> Result<()> {
        let app = router(self.state.clone());

        let listener = TcpListener::bind(("0.0.0.0", self.port))
            .await
            .with_context(|| format!("Failed to bind to port {}", self.port))?;
        info!("HTTP server listening on port {}", self.port);

        let stopping = Arc::new(Notify::new());
        let trigger = stopping.clone();
        let serve = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown_signal().await;
                trigger.notify_one();
            })
            .into_future();
        let deadline = async {
            stopping.notified().await;
            tokio::time::sleep(self.shutdown_timeout).await;
        };

        tokio::select! {
            res = serve => res.context("Server error")?,
            _ = deadline => {
                warn!(timeout = ?self.shutdown_timeout, "graceful shutdown timed out, dropping connections");
            }
        }

        info!("HTTP server shut down");
        Ok(())
    }
}

/// Waits for Ctrl+C or, on unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
