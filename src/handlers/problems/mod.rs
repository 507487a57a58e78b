//! Problem management handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{
    routing::{delete, get},
    Router,
};

use crate::state::AppState;

/// Problem routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_problems).post(handler::create_problem))
        .route(
            "/{id}",
            get(handler::get_problem)
                .put(handler::update_problem)
                .delete(handler::delete_problem),
        )
        // Files
        .route("/{id}/files", get(handler::list_files).post(handler::upload_file))
        .route("/{id}/files/{file_id}", delete(handler::delete_file))
        .route("/{id}/export", get(handler::export_problem))
}
