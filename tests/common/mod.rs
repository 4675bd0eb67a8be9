//! Shared utilities for integration tests.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use search_transport::config::{ClientConfig, HostAccept, HostConfig};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

/// A request as seen by a mock backend.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct RecordedRequest {
    pub method: String,
    /// Path including the query string.
    pub target: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

#[allow(dead_code)]
impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn path(&self) -> &str {
        self.target.split('?').next().unwrap_or_default()
    }
}

/// Requests received by a backend, in arrival order.
pub type RequestLog = Arc<Mutex<Vec<RecordedRequest>>>;

/// Start a programmable backend on an ephemeral port.
///
/// Every request is recorded in the returned log and answered with the
/// `(status, body)` produced by `f`.
pub async fn start_programmable_backend<F, Fut>(f: F) -> (SocketAddr, RequestLog)
where
    F: Fn(RecordedRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let log: RequestLog = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);
    let task_log = log.clone();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let f = f.clone();
                    let log = task_log.clone();
                    tokio::spawn(async move {
                        let _ = serve_connection(socket, f, log).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, log)
}

/// Start a backend that always answers 200 with `body`.
#[allow(dead_code)]
pub async fn start_mock_backend(body: &'static str) -> (SocketAddr, RequestLog) {
    start_programmable_backend(move |_| async move { (200, body.to_string()) }).await
}

/// An address nothing listens on; connecting is refused.
#[allow(dead_code)]
pub async fn dead_address() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Client configuration pointing at local hosts, in the given order.
#[allow(dead_code)]
pub fn local_config(addrs: &[SocketAddr]) -> ClientConfig {
    let hosts = addrs
        .iter()
        .map(|a| HostConfig::new(format!("http://{a}"), HostAccept::ReadWrite))
        .collect();
    let mut config = ClientConfig::new("test-app", "test-key").with_hosts(hosts);
    config.timeouts.connect_ms = 500;
    config.timeouts.read_ms = 500;
    config.timeouts.write_ms = 500;
    config.timeouts.max_ms = 2_000;
    config.polling.initial_delay_ms = 100;
    config.polling.max_delay_ms = 1_000;
    config
}

async fn serve_connection<F, Fut>(socket: TcpStream, f: Arc<F>, log: RequestLog) -> std::io::Result<()>
where
    F: Fn(RecordedRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let mut reader = BufReader::new(socket);

    loop {
        let mut request_line = String::new();
        if reader.read_line(&mut request_line).await? == 0 {
            return Ok(());
        }
        let mut parts = request_line.split_whitespace();
        let method = parts.next().unwrap_or_default().to_string();
        let target = parts.next().unwrap_or_default().to_string();

        let mut headers = Vec::new();
        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).await? == 0 {
                return Ok(());
            }
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                let (name, value) = (name.trim().to_string(), value.trim().to_string());
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.parse().unwrap_or(0);
                }
                headers.push((name, value));
            }
        }

        let mut body = vec![0u8; content_length];
        reader.read_exact(&mut body).await?;

        let request = RecordedRequest {
            method,
            target,
            headers,
            body: String::from_utf8_lossy(&body).into_owned(),
        };
        log.lock().unwrap().push(request.clone());

        let (status, body) = f(request).await;
        let status_text = match status {
            200 => "200 OK",
            400 => "400 Bad Request",
            403 => "403 Forbidden",
            404 => "404 Not Found",
            408 => "408 Request Timeout",
            500 => "500 Internal Server Error",
            502 => "502 Bad Gateway",
            503 => "503 Service Unavailable",
            _ => "200 OK",
        };
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
            status_text,
            body.len(),
            body
        );
        reader.get_mut().write_all(response.as_bytes()).await?;
        reader.get_mut().flush().await?;
    }
}
