//! Polyhedron - Problem Authoring Backend
//!
//! REST backend for writing competitive-programming problems: accounts,
//! problem CRUD, file uploads, package export, and the test data pipeline
//! that runs user generators and solutions to produce test cases.
//!
//! # Architecture
//!
//! The application follows a layered architecture:
//! - **Handlers**: HTTP request handlers (thin layer)
//! - **Services**: Business logic and ownership checks
//! - **Repositories**: Database access
//! - **Models**: Domain models
//! - **Testgen**: toolchain discovery, build step, case generator and output
//!   producer

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
pub mod testgen;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_utils;

use axum::{extract::DefaultBodyLimit, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;

/// Multipart framing on top of the file itself
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Build the application router with all middleware attached
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config().storage.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .nest(constants::API_BASE_PATH, handlers::routes(state.clone()))
        .layer(axum::middleware::from_fn(middleware::logging_middleware))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
