use crate::connection::ConnectionId;
use crate::mailbox::Mailbox;
use crate::message::Line;
use crate::Manager;
use log::*;
use std::sync::Arc;

/// A client session's registered mailbox.
///
/// Unsubscribes from the manager when dropped, so the mailbox is released on
/// every exit path: the stream finishing, the client disconnecting, or the
/// owning task being cancelled.
pub struct Subscription {
    manager: Arc<Manager>,
    mailbox: Mailbox,
    // Set once the manager has closed the mailbox; it is already unregistered.
    closed: bool,
}

impl Subscription {
    pub fn new(manager: Arc<Manager>) -> Self {
        let mailbox = manager.subscribe();
        Self {
            manager,
            mailbox,
            closed: false,
        }
    }

    pub fn id(&self) -> &ConnectionId {
        self.mailbox.id()
    }

    /// Waits for the next line. `None` once the manager has closed the mailbox.
    pub async fn next_line(&mut self) -> Option<Line> {
        let line = self.mailbox.dequeue().await;
        self.closed = line.is_none();
        line
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if self.closed {
            debug!(
                "Mailbox for subscriber {} was closed by the manager",
                self.mailbox.id()
            );
            return;
        }
        debug!("Releasing mailbox for subscriber {}", self.mailbox.id());
        self.manager.unsubscribe(self.mailbox.id());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_drop_unsubscribes_exactly_once() {
        let manager = Arc::new(Manager::default());
        let _other = Subscription::new(Arc::clone(&manager));
        let subscription = Subscription::new(Arc::clone(&manager));
        assert_eq!(manager.active_count(), 2);

        drop(subscription);

        assert_eq!(manager.active_count(), 1);
        assert_eq!(manager.publish("after").delivered, 1);
    }

    #[tokio::test]
    async fn test_cancelled_session_releases_its_mailbox() {
        let manager = Arc::new(Manager::default());
        let session = {
            let manager = Arc::clone(&manager);
            tokio::spawn(async move {
                let mut subscription = Subscription::new(manager);
                while subscription.next_line().await.is_some() {}
            })
        };

        while manager.active_count() == 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        session.abort();
        assert!(session.await.unwrap_err().is_cancelled());

        assert_eq!(manager.active_count(), 0);
        assert_eq!(manager.publish("nobody").delivered, 0);
    }

    #[tokio::test]
    async fn test_next_line_ends_after_close_all() {
        let manager = Arc::new(Manager::default());
        let mut subscription = Subscription::new(Arc::clone(&manager));
        manager.publish("bye");
        manager.close_all();

        assert_eq!(subscription.next_line().await, Some(Line::from("bye")));
        assert_eq!(subscription.next_line().await, None);
        assert!(subscription.closed);
        drop(subscription);
        assert_eq!(manager.active_count(), 0);
    }

    #[tokio::test]
    async fn test_drop_after_close_all_leaves_other_subscribers_alone() {
        let manager = Arc::new(Manager::default());
        let mut closed = Subscription::new(Arc::clone(&manager));
        manager.close_all();
        assert_eq!(closed.next_line().await, None);

        let _late = Subscription::new(Arc::clone(&manager));
        drop(closed);

        assert_eq!(manager.active_count(), 1);
        assert_eq!(manager.publish("still here").delivered, 1);
    }

    #[tokio::test]
    async fn test_open_subscription_is_not_marked_closed() {
        let manager = Arc::new(Manager::default());
        let mut subscription = Subscription::new(Arc::clone(&manager));
        manager.publish("one");

        assert_eq!(subscription.next_line().await, Some(Line::from("one")));
        assert!(!subscription.closed);
    }
}
