pub mod handler;

use axum::Router;
use axum::routing::{get, post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest(
        "/api/summaries",
        Router::new()
            .route("/{id}/generate", post(handler::generate))
            .route("/{id}/history", get(handler::history))
            .route("/{id}/{date}", get(handler::get_by_date)),
    )
}
