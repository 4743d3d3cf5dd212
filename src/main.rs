use events::InputReader;
use log::{error, info};
use service::{config::Config, logging::Logger, AppState};
use sse::{Manager, SseLineHandler};
use std::sync::Arc;
use tokio::task::JoinHandle;

#[tokio::main]
async fn main() {
    let config = Config::new();
    if let Err(e) = Logger::init_logger(&config) {
        eprintln!("Failed to start logger: {e}");
    }

    info!(
        "Starting stdin SSE relay [{}] on {}",
        config.runtime_env(),
        config.server_address()
    );

    let sse_manager = service::init_sse_manager(&config);
    let _reader = spawn_input_reader(Arc::clone(&sse_manager));

    let app_state = AppState::new(config, &sse_manager);
    if let Err(e) = web::init_server(app_state).await {
        error!("Failed to run HTTP server: {e}");
        std::process::exit(1);
    }

    // A pending stdin read sits on the blocking pool and would hold up runtime shutdown.
    info!("Relay stopped");
    std::process::exit(0);
}

/// Reads SSE frames from stdin and publishes each payload until EOF.
///
/// A read failure stops the reader only; the server keeps serving the
/// clients already connected, who simply receive nothing further.
fn spawn_input_reader(sse_manager: Arc<Manager>) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting SSE stdin reader task");
        let handler = SseLineHandler::new(sse_manager);

        match InputReader::stdin().run(&handler).await {
            Ok(summary) => info!(
                "Upstream input finished: {} line(s) read, {} published",
                summary.lines_read, summary.published
            ),
            Err(e) => error!("Critical error in stdin reader task: {e}"),
        }

        info!("Stdin reader task stopped");
    })
}
