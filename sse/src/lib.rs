//! Server-Sent Events (SSE) fan-out for the relay.
//!
//! One producer publishes lines; any number of client sessions receive them,
//! each through its own bounded mailbox.
//!
//! # Architecture
//!
//! - **Bounded mailboxes**: every subscriber gets a fixed-capacity queue.
//!   Enqueueing never blocks; a full mailbox drops the line and logs a
//!   warning, so a stalled client cannot hold up the reader or anyone else.
//! - **Snapshot publishing**: the registry copies its set of senders under a
//!   single lock and enqueues after releasing it.
//! - **Ephemeral lines**: nothing is persisted or replayed. A client sees only
//!   what is published after it subscribes.
//! - **Guaranteed release**: a [`Subscription`] unsubscribes when dropped,
//!   whichever way the session ends.
//!
//! # Message Flow
//!
//! 1. The `events` reader parses a `data:` frame from stdin
//! 2. [`SseLineHandler`] hands the payload to [`Manager::publish`]
//! 3. The manager snapshots the registry and calls `try_enqueue` on each mailbox
//! 4. Each client's stream dequeues and writes `data: <payload>\n\n`
//!
//! # Modules
//!
//! - `connection`: ConnectionRegistry and the opaque ConnectionId
//! - `mailbox`: bounded per-subscriber queue halves
//! - `manager`: subscribe, unsubscribe and publish
//! - `message`: the shared `Line` payload and its SSE rendering
//! - `subscription`: drop guard owned by each client session

pub mod connection;
pub mod line_handler;
pub mod mailbox;
pub mod manager;
pub mod message;
pub mod subscription;

pub use line_handler::SseLineHandler;
pub use manager::{Manager, PublishOutcome};
pub use message::Line;
pub use subscription::Subscription;
