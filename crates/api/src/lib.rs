//! # Washbay API
//!
//! The API crate provides the web server for the Washbay booking backend.
//! It exposes same-day availability, booking management, business-hours
//! settings and a live booking event stream.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Implement request processing logic
//! - **Middleware**: Caller resolution, capability checks and error mapping
//! - **Events**: Registry of live event stream connections
//! - **Config**: Environment configuration
//!
//! Handlers reach the database only through the store traits of
//! `washbay_db::store`, so the whole router can run against mocks.

/// Configuration module for API settings
pub mod config;
/// Live booking event connections
pub mod events;
/// Request handlers that implement business logic
pub mod handlers;
/// Middleware for authorization and error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::{sync::Arc, time::Duration};

use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use eyre::Result;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;
use washbay_db::{
    store::{BookingStore, PgStore, SettingsStore},
    DbPool,
};

use crate::{events::ConnectionRegistry, middleware::auth::AccessTokens};

/// Shared application state that is accessible to all request handlers
///
/// # Example
///
/// ```no_run
/// # use std::sync::Arc;
/// # use washbay_api::{ApiState, events::ConnectionRegistry, middleware::auth::AccessTokens};
/// # use washbay_db::store::PgStore;
/// # async fn example(pool: washbay_db::DbPool) {
/// let store = Arc::new(PgStore::new(pool));
/// let state = Arc::new(ApiState {
///     bookings: store.clone(),
///     settings: store,
///     access_tokens: AccessTokens::default(),
///     events: ConnectionRegistry::new(),
/// });
/// let app = washbay_api::app(state);
/// # }
/// ```
pub struct ApiState {
    /// Booking persistence
    pub bookings: Arc<dyn BookingStore>,
    /// Key/value settings persistence
    pub settings: Arc<dyn SettingsStore>,
    /// Token hashes unlocking the staff and admin roles
    pub access_tokens: AccessTokens,
    /// Open booking event streams
    pub events: ConnectionRegistry,
}

/// Builds the application router with every route attached to `state`
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Same-day availability
        .merge(routes::availability::routes())
        // Booking management and event stream
        .merge(routes::booking::routes())
        // Business-hours settings
        .merge(routes::settings::routes())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_origin(origins)
        .allow_credentials(true)
}

async fn shutdown_signal(events: ConnectionRegistry) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
    events.close_all();
}

/// Starts the API server with the provided configuration and database connection
///
/// Sets up logging, builds the shared state, applies CORS, tracing and
/// timeout layers and serves until Ctrl-C. Open event streams are closed on
/// shutdown so the server can drain.
pub async fn start_server(config: config::ApiConfig, db_pool: DbPool) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let store = Arc::new(PgStore::new(db_pool));
    let access_tokens = AccessTokens::new(
        config.admin_token_hash.clone(),
        config.staff_token_hash.clone(),
    )?;
    if config.admin_token_hash.is_none() {
        warn!("ADMIN_TOKEN_HASH is not set; settings cannot be changed through the API");
    }

    let events = ConnectionRegistry::new();
    let state = Arc::new(ApiState {
        bookings: store.clone(),
        settings: store,
        access_tokens,
        events: events.clone(),
    });

    let app = app(state);

    // Apply CORS configuration if origins are specified
    let app = match &config.cors_origins {
        Some(origins) => app.layer(cors_layer(origins)),
        None => app,
    };

    // Request tracing and timeout
    let app = app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout))),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(events))
        .await?;

    Ok(())
}
