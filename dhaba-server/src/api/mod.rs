//! HTTP API
//!
//! One router module per area, merged under a shared [`ServerState`].

pub mod health;
pub mod orders;
pub mod restaurants;
pub mod summaries;

use axum::Router;

use crate::core::ServerState;

pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(orders::router())
        .merge(restaurants::router())
        .merge(summaries::router())
        .with_state(state)
}
