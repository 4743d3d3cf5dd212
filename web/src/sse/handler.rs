use async_stream::stream;
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use log::*;
use service::AppState;
use sse::Subscription;
use std::convert::Infallible;

/// SSE handler that streams every published line to one client.
///
/// The client's mailbox lives inside the response stream. When the client
/// disconnects the server drops the stream, which drops the subscription and
/// unregisters the mailbox.
pub(crate) async fn sse_handler(State(app_state): State<AppState>) -> Response {
    let mut subscription = Subscription::new(app_state.sse_manager.clone());
    let connection_id = subscription.id().clone();
    debug!("Event stream started for subscriber {connection_id}");

    let stream = stream! {
        while let Some(line) = subscription.next_line().await {
            yield Ok::<Event, Infallible>(line.to_event());
        }

        // Mailbox closed by the manager (shutdown); the subscription is dropped with the stream.
        debug!("Event stream ended for subscriber {connection_id}");
    };

    let sse = Sse::new(stream);
    match app_state.config.keep_alive() {
        Some(interval) => sse
            .keep_alive(KeepAlive::new().interval(interval))
            .into_response(),
        None => sse.into_response(),
    }
}
