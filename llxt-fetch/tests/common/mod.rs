//! Programmable HTTP backend for integration tests.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use llxt_fetch::{BreakerConfig, ClientConfig};
use reqwest::StatusCode;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// One accepted request.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct Hit {
    /// 1-based connection index.
    pub index: usize,
    /// Request path.
    pub path: String,
}

/// What the backend does with a request.
#[allow(dead_code)]
pub enum Reply {
    /// Write a response.
    Respond {
        status: u16,
        headers: Vec<(&'static str, String)>,
        body: String,
    },
    /// Close the connection without answering.
    Drop,
    /// Keep the connection open without answering.
    Hang,
}

#[allow(dead_code)]
impl Reply {
    pub fn ok(body: impl Into<String>) -> Self {
        Self::status(200).with_body(body)
    }

    pub fn status(status: u16) -> Self {
        Self::Respond {
            status,
            headers: Vec::new(),
            body: String::new(),
        }
    }

    pub fn with_body(self, body: impl Into<String>) -> Self {
        match self {
            Self::Respond {
                status, headers, ..
            } => Self::Respond {
                status,
                headers,
                body: body.into(),
            },
            other => other,
        }
    }

    pub fn with_header(self, name: &'static str, value: impl Into<String>) -> Self {
        match self {
            Self::Respond {
                status,
                mut headers,
                body,
            } => {
                headers.push((name, value.into()));
                Self::Respond {
                    status,
                    headers,
                    body,
                }
            }
            other => other,
        }
    }
}

/// Handle to a running backend.
pub struct MockBackend {
    addr: SocketAddr,
    hits: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl MockBackend {
    /// URL for `path` on this backend.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Number of connections accepted so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Start a backend that answers every request with `handler`.
pub async fn start_backend<F>(handler: F) -> MockBackend
where
    F: Fn(&Hit) -> Reply + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let handler = Arc::new(handler);

    let counter = Arc::clone(&hits);
    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            let index = counter.fetch_add(1, Ordering::SeqCst) + 1;
            let handler = Arc::clone(&handler);
            tokio::spawn(async move {
                serve(socket, index, handler.as_ref()).await;
            });
        }
    });

    MockBackend { addr, hits }
}

/// Start a backend that always answers with `status` and `body`.
#[allow(dead_code)]
pub async fn start_fixed(status: u16, body: &'static str) -> MockBackend {
    start_backend(move |_| Reply::status(status).with_body(body)).await
}

/// An address nothing listens on.
#[allow(dead_code)]
pub async fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/llms.txt")
}

/// Client config with millisecond backoff so retry tests stay fast.
#[allow(dead_code)]
pub fn fast_config(retry_count: u32) -> ClientConfig {
    ClientConfig::default()
        .with_timeout(Duration::from_secs(5))
        .with_retry_count(retry_count)
        .with_retry_wait(Duration::from_millis(1), Duration::from_millis(5))
}

/// Breaker config with the given thresholds and reset timeout.
#[allow(dead_code)]
pub fn breaker(failures: u32, successes: u32, reset: Duration) -> BreakerConfig {
    BreakerConfig {
        failure_threshold: failures,
        success_threshold: successes,
        reset_timeout: reset,
        ..BreakerConfig::default()
    }
}

async fn serve<F>(mut socket: TcpStream, index: usize, handler: &F)
where
    F: Fn(&Hit) -> Reply,
{
    let Some(path) = read_request_path(&mut socket).await else {
        return;
    };

    match handler(&Hit { index, path }) {
        Reply::Respond {
            status,
            headers,
            body,
        } => {
            let reason = StatusCode::from_u16(status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or("Unknown");

            let mut response = format!(
                "HTTP/1.1 {status} {reason}\r\nContent-Length: {}\r\nConnection: close\r\n",
                body.len()
            );
            for (name, value) in headers {
                response.push_str(&format!("{name}: {value}\r\n"));
            }
            response.push_str("\r\n");
            response.push_str(&body);

            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
        Reply::Drop => {
            let _ = socket.shutdown().await;
        }
        Reply::Hang => {
            tokio::time::sleep(Duration::from_secs(60)).await;
        }
    }
}

async fn read_request_path(socket: &mut TcpStream) -> Option<String> {
    let mut buf = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];

    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let head = String::from_utf8_lossy(&buf);
    let request_line = head.lines().next()?;
    request_line.split_whitespace().nth(1).map(str::to_string)
}
