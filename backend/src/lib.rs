//! Campus portal backend.
//!
//! A JSON API for a role-based campus portal: student attendance, hostel
//! outpass requests and approvals, disciplinary complaints and class
//! timetables. Students, admins, wardens, watchmen and a super-user each
//! reach a different set of operations, gated by the allow-lists in
//! [`services::access`].
//!
//! Configuration is read from the environment (see [`config::Config`]);
//! storage is SQLite through sqlx, with migrations embedded from
//! `migrations/`.

pub mod api;
pub mod auth;
pub mod config;
pub mod database;
pub mod errors;
pub mod extract;
pub mod middleware;
pub mod services;
pub mod state;

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};
use tokio::{net::TcpListener, signal};
use tracing::info;

use config::Config;
use errors::ApiResult;
use state::SharedState;

/// Builds the full application router.
pub fn app(state: SharedState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .nest("/api/auth", auth::auth_router(state.clone()))
        .nest("/api/admin", api::admin::routes::admin_router(state.clone()))
        .nest("/api/students", api::student::routes::student_router(state.clone()))
        .nest("/api/complaints", api::complaint::routes::complaint_router(state.clone()))
        .nest("/api/outpasses", api::outpass::routes::outpass_router(state.clone()))
        .nest("/api/attendance", api::attendance::routes::attendance_router(state.clone()))
        .nest("/api/timetables", api::timetable::routes::timetable_router(state.clone()))
        .layer(middleware::cors(state.config.cors_origin.as_deref()))
        .layer(middleware::trace())
        .with_state(state)
}

/// Connects the database, prepares the bootstrap account and serves until
/// Ctrl+C or SIGTERM.
pub async fn run(config: Config) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    info!("Initializing state...");
    let pool = database::init_pool(&config.database_url, config.database_max_connections).await?;

    if let Some(account) = &config.bootstrap {
        auth::service::ensure_bootstrap_account(&pool, account, config.bcrypt_cost).await?;
    }

    let address = config.address();
    let state = state::State::new(config, pool);

    info!("Binding to {address}");
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn root_handler() -> &'static str {
    "Welcome to the campus portal!"
}

async fn health_handler(State(state): State<SharedState>) -> ApiResult<Json<Value>> {
    database::ping(&state.pool).await?;
    Ok(Json(json!({ "status": "ok" })))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {e}");
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
}
