use crate::mailbox::MailboxSender;
use log::*;
use parking_lot::Mutex;
use std::collections::HashMap;

/// Unique identifier for a subscriber mailbox (server-generated)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The set of active mailboxes.
///
/// Every mutation and every snapshot goes through one lock. Publishing copies
/// the senders out under the lock and enqueues after releasing it, so the
/// critical section is a clone per subscriber and never waits on a consumer.
pub struct ConnectionRegistry {
    connections: Mutex<HashMap<ConnectionId, MailboxSender>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(HashMap::new()),
        }
    }

    /// Register a mailbox and return the number of active mailboxes afterwards.
    pub fn register(&self, sender: MailboxSender) -> usize {
        let mut connections = self.connections.lock();
        connections.insert(sender.id().clone(), sender);
        connections.len()
    }

    /// Unregister a mailbox. Returns the remaining count, or `None` if the
    /// id was not registered.
    pub fn unregister(&self, connection_id: &ConnectionId) -> Option<usize> {
        let mut connections = self.connections.lock();
        connections
            .remove(connection_id)
            .map(|_| connections.len())
    }

    /// Copy of the currently registered senders.
    pub fn snapshot(&self) -> Vec<MailboxSender> {
        self.connections.lock().values().cloned().collect()
    }

    /// Unregister everything, returning how many mailboxes were removed.
    pub fn clear(&self) -> usize {
        let drained: Vec<MailboxSender> = {
            let mut connections = self.connections.lock();
            connections.drain().map(|(_, sender)| sender).collect()
        };
        trace!("Cleared {} mailbox(es) from the registry", drained.len());
        drained.len()
    }

    pub fn contains(&self, connection_id: &ConnectionId) -> bool {
        self.connections.lock().contains_key(connection_id)
    }

    pub fn len(&self) -> usize {
        self.connections.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mailbox;
    use crate::message::Line;

    #[test]
    fn test_register_and_unregister_track_count() {
        let registry = ConnectionRegistry::new();
        let (first, _first_mailbox) = mailbox::channel(1);
        let (second, _second_mailbox) = mailbox::channel(1);
        let first_id = first.id().clone();

        assert_eq!(registry.register(first), 1);
        assert_eq!(registry.register(second), 2);
        assert!(registry.contains(&first_id));

        assert_eq!(registry.unregister(&first_id), Some(1));
        assert!(!registry.contains(&first_id));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unregister_unknown_id_is_none() {
        let registry = ConnectionRegistry::new();
        let (sender, _mailbox) = mailbox::channel(1);
        let id = sender.id().clone();
        registry.register(sender);

        assert_eq!(registry.unregister(&id), Some(0));
        assert_eq!(registry.unregister(&id), None);
        assert_eq!(registry.unregister(&ConnectionId::new()), None);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_snapshot_is_unaffected_by_later_unregister() {
        let registry = ConnectionRegistry::new();
        let (sender, mut mailbox) = mailbox::channel(2);
        let id = sender.id().clone();
        registry.register(sender);

        let snapshot = registry.snapshot();
        registry.unregister(&id);

        assert_eq!(snapshot.len(), 1);
        assert!(snapshot[0].try_enqueue(Line::from("in flight")).is_ok());
        assert_eq!(mailbox.try_dequeue(), Some(Line::from("in flight")));
        assert!(registry.snapshot().is_empty());
    }

    #[test]
    fn test_clear_removes_every_mailbox() {
        let registry = ConnectionRegistry::new();
        for _ in 0..3 {
            let (sender, _mailbox) = mailbox::channel(1);
            registry.register(sender);
        }

        assert_eq!(registry.clear(), 3);
        assert!(registry.is_empty());
    }
}
