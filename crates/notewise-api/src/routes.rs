//! Router setup with all API routes and middleware.
//!
//! Configures the axum Router with CORS, tracing, compression, the upload
//! body limit, and all endpoint handlers.

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use notewise_core::config::{NotewiseConfig, ServerConfig};
use notewise_core::error::NotewiseError;

use crate::handlers;
use crate::state::AppState;

/// Create the axum Router with all routes and middleware.
///
/// # Arguments
/// * `state` - The shared application state.
///
/// # Returns
/// A fully configured axum Router ready to serve requests.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server);
    let body_limit = state.config.server.max_upload_bytes();

    let summarizer_routes = Router::new()
        .route("/summarize-text", post(handlers::summarize_text))
        .route("/mindmap", post(handlers::mindmap))
        .route("/upload-document", post(handlers::upload_document));

    let ocr_routes = Router::new()
        .route("/image", post(handlers::ocr_image))
        .route("/pdf", post(handlers::ocr_pdf));

    Router::new()
        .route("/", get(handlers::home))
        .route("/health", get(handlers::health))
        .nest("/api/summarizer", summarizer_routes)
        .nest("/api/ocr", ocr_routes)
        .route("/api/stt/audio", post(handlers::stt_audio))
        .route("/api/upload", post(handlers::upload_file))
        .route("/api/upload/", post(handlers::upload_file))
        .route("/api/upload/types", get(handlers::upload_types))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// CORS for the configured origins. `"*"` anywhere in the list allows any
/// origin; entries that are not valid header values are skipped.
fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let allow_origin = if server.cors_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = server
            .cors_origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}

/// Start the HTTP server on the configured address.
pub async fn start_server(config: &NotewiseConfig, state: AppState) -> Result<(), NotewiseError> {
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let router = create_router(state);

    tracing::info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| NotewiseError::Api(format!("Failed to bind {}: {}", addr, e)))?;

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| NotewiseError::Api(format!("Server error: {}", e)))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
