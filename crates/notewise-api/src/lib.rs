//! Notewise API crate - axum HTTP server and route handlers.
//!
//! Exposes text summarization, concept maps, document upload with text
//! extraction, OCR, speech-to-text, and health checks over JSON and
//! multipart endpoints.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
