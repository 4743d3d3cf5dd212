use config::Config;
use log::info;
use sse::Manager;
use std::sync::Arc;

pub mod config;
pub mod logging;

/// Builds the broadcast manager sized from the configuration.
pub fn init_sse_manager(config: &Config) -> Arc<Manager> {
    info!(
        "SSE config: mailbox_capacity={}, keep_alive_secs={}",
        config.mailbox_capacity, config.keep_alive_secs,
    );
    Arc::new(Manager::new(config.mailbox_capacity))
}

// Service-level state shared with every request handler.
// Needs to implement Clone to be able to be passed into Router as State
#[derive(Clone)]
pub struct AppState {
    pub sse_manager: Arc<Manager>,
    pub config: Config,
}

impl AppState {
    pub fn new(app_config: Config, sse_manager: &Arc<Manager>) -> Self {
        Self {
            sse_manager: Arc::clone(sse_manager),
            config: app_config,
        }
    }
}
