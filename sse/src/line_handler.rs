use crate::Manager;
use async_trait::async_trait;
use events::LineHandler;
use log::*;
use std::sync::Arc;

/// Publishes every payload read from upstream to all SSE subscribers.
///
/// This is the bridge between the `events` input reader and the broadcast
/// manager; the reader knows nothing about mailboxes.
pub struct SseLineHandler {
    sse_manager: Arc<Manager>,
}

impl SseLineHandler {
    pub fn new(sse_manager: Arc<Manager>) -> Self {
        Self { sse_manager }
    }
}

#[async_trait]
impl LineHandler for SseLineHandler {
    async fn handle(&self, payload: &str) {
        let outcome = self.sse_manager.publish(payload);

        debug!(
            "Relayed upstream line to {} subscriber(s) ({} dropped)",
            outcome.delivered, outcome.dropped
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_handle_publishes_to_subscribers() {
        let manager = Arc::new(Manager::default());
        let mut mailbox = manager.subscribe();
        let handler = SseLineHandler::new(Arc::clone(&manager));

        handler.handle("hello").await;

        assert_eq!(mailbox.try_dequeue().map(|l| l.to_string()), Some("hello".into()));
    }
}
