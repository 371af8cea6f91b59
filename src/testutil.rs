//! In-process stub registry for hermetic verification tests.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Canned behavior for one probed name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StubResponse {
    /// 404 with a JSON error body.
    NotFound,
    /// 200 with an empty JSON body.
    Ok,
    /// 500 with an empty JSON body.
    ServerError,
    /// Accept the request and never answer.
    Hang,
}

/// Minimal HTTP/1.1 server answering registry-style GET probes.
pub(crate) struct StubRegistry {
    addr: SocketAddr,
}

impl StubRegistry {
    /// Start a listener with one canned response per package name.
    ///
    /// Requests for unknown paths answer 500, so a mis-built probe URL
    /// shows up as an Error status instead of a silent pass.
    pub(crate) async fn start(routes: Vec<(&str, StubResponse)>) -> Self {
        let table: HashMap<String, StubResponse> = routes
            .into_iter()
            .map(|(name, response)| (format!("/{}", urlencoding::encode(name)), response))
            .collect();
        let table = Arc::new(table);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            loop {
                let (stream, _) = match listener.accept().await {
                    Ok(conn) => conn,
                    Err(_) => break,
                };
                let table = Arc::clone(&table);
                tokio::spawn(async move {
                    serve_connection(stream, table).await;
                });
            }
        });

        Self { addr }
    }

    pub(crate) fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

async fn serve_connection(mut stream: TcpStream, table: Arc<HashMap<String, StubResponse>>) {
    let path = match read_request_path(&mut stream).await {
        Some(path) => path,
        None => return,
    };

    let response = table
        .get(&path)
        .copied()
        .unwrap_or(StubResponse::ServerError);

    match response {
        StubResponse::Hang => {
            // Hold the connection open until the client gives up
            tokio::time::sleep(Duration::from_secs(60)).await;
        }
        StubResponse::NotFound => {
            write_response(&mut stream, "404 Not Found", "{\"error\":\"Not found\"}").await;
        }
        StubResponse::Ok => {
            write_response(&mut stream, "200 OK", "{}").await;
        }
        StubResponse::ServerError => {
            write_response(&mut stream, "500 Internal Server Error", "{}").await;
        }
    }
}

async fn read_request_path(stream: &mut TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    // Headers end at the blank line; GET probes carry no body
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.len() > 64 * 1024 {
            return None;
        }
    }

    let head = String::from_utf8_lossy(&buf);
    let request_line = head.lines().next()?;
    let mut parts = request_line.split_whitespace();
    let _method = parts.next()?;
    parts.next().map(str::to_string)
}

async fn write_response(stream: &mut TcpStream, status: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.flush().await;
}
