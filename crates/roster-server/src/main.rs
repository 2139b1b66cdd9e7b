//! Roster Server
//!
//! HTTP server for the user management API.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use roster_api::AppState;
use roster_auth::PasswordService;
use roster_core::config::{AppConfig, DatabaseConfig, LogConfig};
use roster_db::{Database, InMemoryStore, Repositories};
use roster_models::Role;
use roster_services::UserService;

mod health;

use health::{HealthChecker, HealthConfig, Storage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config_path = std::env::var("ROSTER_CONFIG").ok();
    let config = AppConfig::load(config_path.as_deref())?;

    init_tracing(&config.log);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        host = %config.server.host,
        port = config.server.port,
        "Starting Roster"
    );

    let (storage, repos) = open_storage(&config.database).await?;

    let users = UserService::from_repositories(
        repos,
        PasswordService::new(config.auth.password_storage),
        config.pagination,
    );
    let health = Arc::new(HealthChecker::new(HealthConfig::default(), storage.clone()));

    let app = build_router(AppState::new(users), health);

    let addr = config.server_addr();
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Storage::Postgres(db) = storage {
        db.close().await;
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));

    let json_layer = log
        .json
        .then(|| tracing_subscriber::fmt::layer().json().with_current_span(true));
    let plain_layer = (!log.json).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(plain_layer)
        .init();
}

/// Open the configured user store
async fn open_storage(config: &DatabaseConfig) -> anyhow::Result<(Storage, Repositories)> {
    if config.is_memory() {
        let store = Arc::new(InMemoryStore::with_roles(
            config.seed_roles.iter().map(Role::from),
        ));
        info!(roles = config.seed_roles.len(), "Using in-memory store");
        return Ok((Storage::Memory(store.clone()), Repositories::memory(store)));
    }

    let db = Database::connect(config).await?;
    info!("Connected to database");

    if config.run_migrations {
        db.migrate().await?;
    }

    let repos = Repositories::postgres(&db);
    Ok((Storage::Postgres(db), repos))
}

/// Build the application router
fn build_router(state: AppState, health: Arc<HealthChecker>) -> Router {
    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(health);

    Router::new()
        .merge(health_routes)
        .merge(roster_api::router(state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use roster_core::config::MEMORY_DATABASE_URL;
    use tower::ServiceExt;

    async fn test_app() -> Router {
        let config = AppConfig::default();
        let database = DatabaseConfig {
            url: MEMORY_DATABASE_URL.to_string(),
            ..config.database
        };

        let (storage, repos) = open_storage(&database).await.unwrap();
        let users = UserService::from_repositories(
            repos,
            PasswordService::new(config.auth.password_storage),
            config.pagination,
        );
        let health = Arc::new(HealthChecker::new(HealthConfig::default(), storage));

        build_router(AppState::new(users), health)
    }

    async fn status_of(app: &Router, uri: &str) -> StatusCode {
        app.clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let app = test_app().await;

        assert_eq!(status_of(&app, "/health").await, StatusCode::OK);
        assert_eq!(status_of(&app, "/health/live").await, StatusCode::OK);
        assert_eq!(status_of(&app, "/health/ready").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_users_are_mounted_with_seeded_roles() {
        let app = test_app().await;
        let body = serde_json::json!({
            "name": "Ivan",
            "login": "ivan01",
            "password": "Passw0rd",
            "roles": [1, 4],
        });

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/users")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .oneshot(Request::builder().uri("/users").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let users: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(users[0]["login"], "ivan01");
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let app = test_app().await;
        assert_eq!(status_of(&app, "/nope").await, StatusCode::NOT_FOUND);
    }
}
