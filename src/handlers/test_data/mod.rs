//! Test generation handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::state::AppState;

/// Test data routes, nested under `/problems`
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/{id}/generate-tests", post(handler::generate_tests))
        .route("/{id}/generate-outputs", post(handler::generate_outputs))
        .route("/{id}/tests", get(handler::list_tests))
        .route("/{id}/tests/{test_id}", delete(handler::delete_test))
}
