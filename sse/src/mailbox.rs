//! Bounded per-subscriber queues.
//!
//! A mailbox is split in two halves: the [`MailboxSender`] kept by the
//! registry for publishing, and the [`Mailbox`] owned by the one client
//! session that drains it. Enqueueing never waits; when the queue is at
//! capacity the line is handed back to the caller and dropped.

use crate::connection::ConnectionId;
use crate::message::Line;
use tokio::sync::mpsc::{self, error::TryRecvError, error::TrySendError};

/// Default number of lines a subscriber may have pending.
pub const DEFAULT_CAPACITY: usize = 50;

/// Why a line could not be placed in a mailbox. The rejected line is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnqueueError {
    /// The mailbox already holds `capacity` lines.
    Full(Line),
    /// The owning session has already released its mailbox.
    Closed(Line),
}

/// Enqueue half of a mailbox, reachable only through the registry.
#[derive(Debug, Clone)]
pub struct MailboxSender {
    id: ConnectionId,
    sender: mpsc::Sender<Line>,
}

impl MailboxSender {
    pub fn id(&self) -> &ConnectionId {
        &self.id
    }

    /// Appends `line` if there is room, otherwise returns it without blocking.
    pub fn try_enqueue(&self, line: Line) -> Result<(), EnqueueError> {
        self.sender.try_send(line).map_err(|e| match e {
            TrySendError::Full(line) => EnqueueError::Full(line),
            TrySendError::Closed(line) => EnqueueError::Closed(line),
        })
    }
}

/// Dequeue half of a mailbox, owned by a single client session.
#[derive(Debug)]
pub struct Mailbox {
    id: ConnectionId,
    capacity: usize,
    receiver: mpsc::Receiver<Line>,
}

impl Mailbox {
    pub fn id(&self) -> &ConnectionId {
        &self.id
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of lines waiting to be dequeued.
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    /// Waits for the next line in FIFO order.
    ///
    /// Returns `None` once the mailbox has been unsubscribed and every line
    /// already queued has been handed out.
    pub async fn dequeue(&mut self) -> Option<Line> {
        self.receiver.recv().await
    }

    /// Takes the next line if one is already queued.
    pub fn try_dequeue(&mut self) -> Option<Line> {
        match self.receiver.try_recv() {
            Ok(line) => Some(line),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}

/// Creates a mailbox with room for `capacity` pending lines.
///
/// A capacity of zero is raised to one, since a mailbox that can never hold a
/// line would drop everything.
pub fn channel(capacity: usize) -> (MailboxSender, Mailbox) {
    let capacity = capacity.max(1);
    let (sender, receiver) = mpsc::channel(capacity);
    let id = ConnectionId::new();

    (
        MailboxSender {
            id: id.clone(),
            sender,
        },
        Mailbox {
            id,
            capacity,
            receiver,
        },
    )
}
