/*!
 * SalonKit Backend - Multi-tenant Appointment Booking
 *
 * Main application entry point for the Axum-based REST API server.
 *
 * Serves three auth zones: the token-authenticated tenant API used by the
 * conversational front-end, the Basic-auth admin API behind the salon
 * administration UI, and the super-admin tenant lifecycle API.
 */

// Module declarations
mod config;
mod db;
mod handlers;
mod middleware;
mod models;
mod routes;
mod services;
mod utils;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;
use db::create_pool;
use handlers::AppState;
use routes::{create_admin_api_routes, create_api_v1_routes, create_superadmin_routes};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
struct HealthResponse {
    status: String,
    version: String,
    timestamp: String,
    database: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting SalonKit Backend API Server...");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded successfully");
    tracing::info!("Environment: {}", config.server.environment);
    tracing::info!(
        "Slot grid: {} minutes, default timezone: {}",
        config.booking.slot_grid_minutes,
        config.booking.default_timezone.name()
    );

    // Create database connection pool and apply migrations
    let pool = create_pool(&config.database).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    // Create application state
    let app_state = AppState {
        pool: pool.clone(),
        booking: config.booking.clone(),
        super_admin: config.super_admin.clone(),
    };

    // Build application router
    let app = create_app(app_state);

    // Start the server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid server address: {}", e))?;

    tracing::info!("HTTP server listening on http://{}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the Axum application router
fn create_app(state: AppState) -> Router {
    let pool_for_health = state.pool.clone();

    Router::new()
        // Health check endpoint
        .route(
            "/health",
            get(move || health_handler(pool_for_health.clone())),
        )
        // Root endpoint
        .route("/", get(root_handler))
        // Auth zones
        .nest("/api/v1", create_api_v1_routes(state.clone()))
        .nest("/admin/api", create_admin_api_routes(state.clone()))
        .nest("/superadmin", create_superadmin_routes(state))
        // Middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Root handler - API information
async fn root_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": "SalonKit Backend API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Multi-tenant appointment booking backend",
        "status": "operational",
        "endpoints": {
            "health": "/health",
            "api_v1": "/api/v1",
            "admin": "/admin/api",
            "superadmin": "/superadmin"
        }
    }))
}

/// Health check handler
async fn health_handler(pool: sqlx::PgPool) -> impl IntoResponse {
    // Test database connection
    let db_status = match sqlx::query("SELECT 1").execute(&pool).await {
        Ok(_) => "connected",
        Err(e) => {
            tracing::error!("Database health check failed: {:?}", e);
            "disconnected"
        }
    };

    let response = HealthResponse {
        status: if db_status == "connected" {
            "healthy"
        } else {
            "unhealthy"
        }
        .to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        database: db_status.to_string(),
    };

    let status_code = if db_status == "connected" {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
