//! HttpProber against local servers
//!
//! Each test binds a listener on 127.0.0.1 and points a plain-HTTP prober
//! at it.

use credkit_probe::{HttpProber, ProbeResult, Prober, Scheme, PROBE_USER_AGENT};
use credkit_registry::ProbeTarget;
use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

fn prober() -> HttpProber {
    HttpProber::new().unwrap().with_scheme(Scheme::Http)
}

async fn read_request(stream: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Serve one request with `status_line`, returning the raw request text
async fn serve_once(status_line: &'static str) -> (ProbeTarget, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let request = read_request(&mut stream).await;
        let response = format!("HTTP/1.1 {status_line}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n");
        stream.write_all(response.as_bytes()).await.unwrap();
        let _ = tx.send(request);
    });

    (ProbeTarget::new(addr.to_string(), "/v1/models"), rx)
}

#[tokio::test]
async fn unauthorized_counts_as_reachable() {
    let (target, request) = serve_once("401 Unauthorized").await;

    let result = prober().probe(&target, "secret-token", Duration::from_secs(5)).await;
    assert_eq!(result, ProbeResult::Reachable);

    let request = request.await.unwrap().to_lowercase();
    assert!(request.starts_with("head /v1/models http/1.1"), "{request}");
    assert!(request.contains("authorization: bearer secret-token"));
    assert!(request.contains(&format!("user-agent: {}", PROBE_USER_AGENT.to_lowercase())));
}

#[tokio::test]
async fn success_is_reachable() {
    let (target, _request) = serve_once("200 OK").await;
    let result = prober().probe(&target, "t", Duration::from_secs(5)).await;
    assert!(result.is_reachable());
}

#[tokio::test]
async fn server_error_is_unreachable() {
    let (target, _request) = serve_once("503 Service Unavailable").await;
    let result = prober().probe(&target, "t", Duration::from_secs(5)).await;
    assert_eq!(result, ProbeResult::Unreachable("server error 503".to_string()));
}

#[tokio::test]
async fn silent_server_yields_inconclusive_within_timeout() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        // Accept and hold the connection without ever answering
        let (stream, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;
        drop(stream);
    });

    let started = Instant::now();
    let result = prober()
        .probe(&ProbeTarget::root(addr.to_string()), "t", Duration::from_millis(200))
        .await;

    assert_eq!(result, ProbeResult::timeout());
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn refused_connection_is_unreachable() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };

    let result = prober()
        .probe(&ProbeTarget::root(addr.to_string()), "t", Duration::from_secs(2))
        .await;
    assert!(matches!(result, ProbeResult::Unreachable(_)), "{result}");
}

#[tokio::test]
async fn unusable_credential_is_inconclusive() {
    let (target, _request) = serve_once("200 OK").await;
    let result = prober().probe(&target, "bad\ncredential", Duration::from_secs(2)).await;
    assert!(matches!(result, ProbeResult::Inconclusive(_)), "{result}");
}
