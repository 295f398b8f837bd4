// Server loop module
// Accepts connections until shutdown is requested, then drains

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use super::signal::SignalHandler;
use crate::config::AppState;
use crate::logger;

/// Upper bound on waiting for open connections after shutdown
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);
const DRAIN_POLL: Duration = Duration::from_millis(50);

/// Accept loop for the skill server.
///
/// Must run inside a `LocalSet`. Returns after shutdown has been requested
/// and open connections have finished or the grace period elapsed.
pub async fn run_server(
    listener: TcpListener,
    state: Arc<AppState>,
    signals: Arc<SignalHandler>,
) {
    let active_connections = Arc::new(AtomicUsize::new(0));

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            () = signals.shutdown.notified() => break,
        }
    }

    drop(listener);
    logger::log_shutdown_requested(active_connections.load(Ordering::SeqCst));
    drain_connections(&active_connections, SHUTDOWN_GRACE).await;
}

/// Wait until no connection is active or `grace` has elapsed
async fn drain_connections(active: &AtomicUsize, grace: Duration) {
    let deadline = tokio::time::Instant::now() + grace;
    while active.load(Ordering::SeqCst) > 0 && tokio::time::Instant::now() < deadline {
        tokio::time::sleep(DRAIN_POLL).await;
    }
    logger::log_shutdown_complete(active.load(Ordering::SeqCst));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::create_listener;
    use crate::test_utils::test_state;
    use tempfile::TempDir;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    async fn roundtrip(addr: std::net::SocketAddr, raw_request: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(raw_request.as_bytes()).await.unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    #[tokio::test]
    async fn test_shutdown_requested_before_loop_starts() {
        let tmp = TempDir::new().unwrap();
        let state = Arc::new(test_state(&tmp));
        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let signals = Arc::new(SignalHandler::new());
        signals.request_shutdown();

        let local = tokio::task::LocalSet::new();
        local
            .run_until(run_server(listener, state, signals))
            .await;
    }

    #[tokio::test]
    async fn test_serves_api_over_tcp() {
        let tmp = TempDir::new().unwrap();
        let state = Arc::new(test_state(&tmp));
        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let signals = Arc::new(SignalHandler::new());

        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let server = tokio::task::spawn_local(run_server(
                    listener,
                    Arc::clone(&state),
                    Arc::clone(&signals),
                ));

                let body = r#"{"name":"Tcp Skill","content":"over the wire"}"#;
                let create = format!(
                    "POST /api/skills HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let response = roundtrip(addr, &create).await;
                assert!(response.starts_with("HTTP/1.1 200 OK"), "{response}");
                assert!(response.contains(r#""name":"tcp-skill""#));

                let list = "GET /api/skills HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n";
                let response = roundtrip(addr, list).await;
                assert!(response.contains(r#"[{"name":"tcp-skill"}]"#), "{response}");
                assert!(response.to_ascii_lowercase().contains("access-control-allow-origin: *"));

                signals.request_shutdown();
                server.await.unwrap();
            })
            .await;

        assert_eq!(
            std::fs::read_to_string(tmp.path().join("skills/tcp-skill/SKILL.md")).unwrap(),
            "over the wire"
        );
    }

    #[tokio::test]
    async fn test_drain_returns_once_idle() {
        let active = Arc::new(AtomicUsize::new(1));
        let worker = Arc::clone(&active);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            worker.fetch_sub(1, Ordering::SeqCst);
        });

        tokio::time::timeout(Duration::from_secs(2), drain_connections(&active, SHUTDOWN_GRACE))
            .await
            .unwrap();
        assert_eq!(active.load(Ordering::SeqCst), 0);
    }
}
