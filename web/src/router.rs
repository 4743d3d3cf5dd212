use crate::sse::handler::sse_handler;
use axum::{routing::get, Router};
use service::AppState;

/// Path clients open to receive the relayed stream.
pub const EVENTS_PATH: &str = "/events";

pub fn define_routes(app_state: AppState) -> Router {
    Router::new().merge(sse_routes(app_state))
}

fn sse_routes(app_state: AppState) -> Router {
    Router::new()
        .route(EVENTS_PATH, get(sse_handler))
        .with_state(app_state)
}
