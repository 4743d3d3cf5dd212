//! HTTP surface of the relay: a single `GET /events` stream per client.

use log::*;
use service::AppState;
use std::future::Future;
use tokio::net::TcpListener;

pub mod error;
pub mod router;
mod sse;

pub use error::{Error, Result};

/// Binds the configured address and serves until Ctrl-C.
pub async fn init_server(app_state: AppState) -> Result<()> {
    let server_url = app_state.config.server_address();
    let listener = TcpListener::bind(&server_url)
        .await
        .map_err(|e| Error::bind(&server_url, e))?;

    info!(
        "Server starting... listening for connections on http://{server_url}{}",
        router::EVENTS_PATH
    );

    serve(listener, app_state, shutdown_signal()).await
}

/// Serves the router on `listener` until `shutdown` resolves.
///
/// On shutdown every subscriber mailbox is closed, so open event streams
/// finish and the graceful shutdown does not wait on them forever.
pub async fn serve<F>(listener: TcpListener, app_state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let sse_manager = app_state.sse_manager.clone();
    let router = router::define_routes(app_state);

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            shutdown.await;
            sse_manager.close_all();
        })
        .await
        .map_err(Error::serve)?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received, closing event streams"),
        Err(e) => {
            error!("Failed to listen for the shutdown signal: {e}");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use service::config::Config;
    use ::sse::Manager;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::sync::oneshot;

    async fn wait_until(mut condition: impl FnMut() -> bool) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while !condition() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("condition not reached in time");
    }

    async fn read_until(stream: &mut TcpStream, needle: &str) -> String {
        let mut received = Vec::new();
        let mut buf = [0u8; 1024];
        tokio::time::timeout(Duration::from_secs(5), async {
            while !String::from_utf8_lossy(&received).contains(needle) {
                let n = stream.read(&mut buf).await.expect("read failed");
                assert!(n > 0, "connection closed before {needle:?} arrived");
                received.extend_from_slice(&buf[..n]);
            }
        })
        .await
        .expect("timed out reading from server");
        String::from_utf8_lossy(&received).into_owned()
    }

    #[tokio::test]
    async fn test_relays_over_tcp_and_cleans_up_on_disconnect() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let manager = Arc::new(Manager::default());
        let app_state = AppState::new(Config::default(), &manager);
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let server = tokio::spawn(serve(listener, app_state, async move {
            shutdown_rx.await.ok();
        }));

        let mut client = TcpStream::connect(address).await.unwrap();
        client
            .write_all(b"GET /events HTTP/1.1\r\nHost: localhost\r\n\r\n")
            .await
            .unwrap();

        wait_until(|| manager.active_count() == 1).await;
        manager.publish("hello");

        let received = read_until(&mut client, "data: hello\n\n").await;
        assert!(received.starts_with("HTTP/1.1 200 OK"));
        assert!(received.contains("text/event-stream"));

        drop(client);
        wait_until(|| {
            // Writes to the closed socket are what surface the disconnect.
            manager.publish("ping");
            manager.active_count() == 0
        })
        .await;

        shutdown_tx.send(()).unwrap();
        server.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_closes_open_streams() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let manager = Arc::new(Manager::default());
        let app_state = AppState::new(Config::default(), &manager);
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let server = tokio::spawn(serve(listener, app_state, async move {
            shutdown_rx.await.ok();
        }));

        let mut client = TcpStream::connect(address).await.unwrap();
        client
            .write_all(b"GET /events HTTP/1.1\r\nHost: localhost\r\n\r\n")
            .await
            .unwrap();
        wait_until(|| manager.active_count() == 1).await;

        shutdown_tx.send(()).unwrap();

        tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .expect("server did not shut down")
            .unwrap()
            .unwrap();
        assert_eq!(manager.active_count(), 0);
    }

    #[tokio::test]
    async fn test_bind_failure_is_reported() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = taken.local_addr().unwrap().port();
        let mut config = Config::default();
        config.interface = Some("127.0.0.1".to_string());
        config.port = port;
        let app_state = AppState::new(config, &Arc::new(Manager::default()));

        let err = init_server(app_state).await.unwrap_err();
        assert!(matches!(err.error_kind, error::ServerErrorKind::Bind(_)));
    }
}
