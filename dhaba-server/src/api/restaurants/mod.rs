pub mod handler;

use axum::Router;
use axum::routing::{delete, get, post, put};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest(
        "/api/restaurants",
        Router::new()
            .route("/", post(handler::register))
            .route("/{id}", get(handler::get_by_id))
            .route("/{id}/tables", get(handler::list_tables).post(handler::add_table))
            .route("/{id}/tables/reconcile", post(handler::reconcile_tables))
            .route("/{id}/tables/{label}", delete(handler::remove_table))
            .route("/{id}/menu", put(handler::replace_menu))
            .route("/{id}/expenses", post(handler::add_expense)),
    )
}
