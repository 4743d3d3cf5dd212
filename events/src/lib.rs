//! Upstream input for the relay.
//!
//! This crate reads the SSE-framed text arriving on standard input and turns
//! it into a sequence of payloads for whoever consumes them.
//!
//! # Architecture
//!
//! - **FrameParser**: line-at-a-time state machine that assembles frames and
//!   extracts their `data: ` payload
//! - **InputReader**: drives the parser from an async source until EOF
//! - **LineHandler**: trait the reader publishes through
//!
//! This crate has no dependencies on internal crates, so the fan-out side can
//! depend on it without a cycle.

use async_trait::async_trait;

pub mod error;
pub mod frame;
pub mod reader;

pub use error::Error;
pub use frame::FrameParser;
pub use reader::{InputReader, ReaderSummary};

/// Receives each payload parsed from upstream, in arrival order.
#[async_trait]
pub trait LineHandler: Send + Sync {
    async fn handle(&self, payload: &str);
}
