pub mod handler;

use axum::Router;
use axum::routing::{get, post, put};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest(
        "/api/orders",
        Router::new()
            // {id} is a restaurant id on POST, an order id on PUT/DELETE
            .route(
                "/{id}",
                post(handler::create)
                    .put(handler::update)
                    .delete(handler::remove),
            )
            .route("/{id}/status", put(handler::advance_status))
            .route("/{id}/complete", put(handler::complete))
            .route("/restaurant/{id}", get(handler::list_active))
            .route("/restaurant/{id}/takeaway", get(handler::list_takeaway_today))
            .route("/restaurant/{id}/all", get(handler::digest)),
    )
}
