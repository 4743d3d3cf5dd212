use crate::connection::{ConnectionId, ConnectionRegistry};
use crate::mailbox::{self, EnqueueError, Mailbox, DEFAULT_CAPACITY};
use crate::message::Line;
use log::*;
use std::sync::Arc;

/// Characters of a dropped line included in the warning.
const DROP_PREVIEW_CHARS: usize = 50;

/// Result of fanning one line out to the active mailboxes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishOutcome {
    /// Mailboxes that accepted the line.
    pub delivered: usize,
    /// Mailboxes that were full and dropped the line.
    pub dropped: usize,
}

/// Broadcast registry: hands out mailboxes and publishes lines to all of them.
pub struct Manager {
    registry: Arc<ConnectionRegistry>,
    mailbox_capacity: usize,
}

impl Manager {
    pub fn new(mailbox_capacity: usize) -> Self {
        info!("SSE manager initialized with mailbox_capacity={mailbox_capacity}");
        Self {
            registry: Arc::new(ConnectionRegistry::new()),
            mailbox_capacity,
        }
    }

    pub fn mailbox_capacity(&self) -> usize {
        self.mailbox_capacity
    }

    /// Register a new mailbox with the configured capacity.
    pub fn subscribe(&self) -> Mailbox {
        self.subscribe_with_capacity(self.mailbox_capacity)
    }

    /// Register a new mailbox holding at most `capacity` pending lines.
    pub fn subscribe_with_capacity(&self, capacity: usize) -> Mailbox {
        let (sender, mailbox) = mailbox::channel(capacity);
        let total = self.registry.register(sender);
        info!(
            "New subscriber {} added (capacity {}). Total subscribers: {total}",
            mailbox.id(),
            mailbox.capacity()
        );
        mailbox
    }

    /// Unregister a mailbox by ID. Unknown or already removed IDs are ignored.
    pub fn unsubscribe(&self, connection_id: &ConnectionId) -> bool {
        match self.registry.unregister(connection_id) {
            Some(total) => {
                info!("Subscriber {connection_id} removed. Total subscribers: {total}");
                true
            }
            None => {
                warn!("Attempted to remove non-existent subscriber {connection_id}");
                false
            }
        }
    }

    /// Offer `line` to every active mailbox without waiting on any of them.
    ///
    /// Blank lines are ignored. A full mailbox drops the line and the rest
    /// still receive it.
    pub fn publish(&self, line: impl Into<Line>) -> PublishOutcome {
        let line = line.into();
        let mut outcome = PublishOutcome::default();

        if line.is_blank() {
            trace!("Ignoring blank line");
            return outcome;
        }

        for sender in self.registry.snapshot() {
            match sender.try_enqueue(line.clone()) {
                Ok(()) => outcome.delivered += 1,
                Err(EnqueueError::Full(line)) => {
                    outcome.dropped += 1;
                    warn!(
                        "Subscriber queue {} is full, dropping message: '{}...'",
                        sender.id(),
                        line.preview(DROP_PREVIEW_CHARS)
                    );
                }
                Err(EnqueueError::Closed(_)) => {
                    debug!(
                        "Subscriber {} released its mailbox before unsubscribing",
                        sender.id()
                    );
                }
            }
        }

        trace!(
            "Published line to {} subscriber(s), {} dropped",
            outcome.delivered,
            outcome.dropped
        );
        outcome
    }

    /// Number of currently registered mailboxes.
    pub fn active_count(&self) -> usize {
        self.registry.len()
    }

    /// Unregister every mailbox. Sessions drain what is already queued and
    /// then end their streams.
    pub fn close_all(&self) {
        let closed = self.registry.clear();
        info!("Closed {closed} subscriber mailbox(es)");
    }
}

impl Default for Manager {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
