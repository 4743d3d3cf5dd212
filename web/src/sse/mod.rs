//! SSE HTTP handler for the web layer.
//!
//! This module contains only the Axum handler for the event stream endpoint.
//! The fan-out core (Manager, mailboxes, Subscription) lives in the `sse`
//! crate so the upstream reader can publish without depending on axum routing.

pub mod handler;
