//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

use api_contract::client::{ApiRequest, ApiResponse, Transport, TransportError};
use api_contract::contract::{ContractTree, Method, Route};
use api_contract::JsonKind;

/// Blog API used across the integration tests.
pub fn blog_contract() -> Arc<ContractTree> {
    let comments = ContractTree::builder()
        .route(
            "list",
            Route::query("/posts/:id/comments")
                .unwrap()
                .respond(200, JsonKind::Array),
        )
        .build()
        .unwrap();

    let tree = ContractTree::builder()
        .route(
            "getPosts",
            Route::query("/posts").unwrap().respond(200, JsonKind::Array),
        )
        .route(
            "getPost",
            Route::query("/posts/:id")
                .unwrap()
                .respond(200, JsonKind::Object)
                .respond(404, JsonKind::Object),
        )
        .route(
            "createPost",
            Route::mutation(Method::Post, "/posts")
                .unwrap()
                .with_body(JsonKind::Object)
                .respond(201, JsonKind::Object),
        )
        .route(
            "deletePost",
            Route::mutation(Method::Delete, "/posts/:id")
                .unwrap()
                .respond(204, JsonKind::Null),
        )
        .nest("comments", comments)
        .build()
        .unwrap();

    Arc::new(tree)
}

/// Requests seen by a recording transport.
pub type Calls = Arc<Mutex<Vec<ApiRequest>>>;

/// Transport stub that records every request and answers with a fixed response.
pub fn recording_transport(response: ApiResponse) -> (impl Transport + 'static, Calls) {
    let calls: Calls = Arc::new(Mutex::new(Vec::new()));
    let seen = calls.clone();
    let transport = move |request: ApiRequest| {
        seen.lock().unwrap().push(request);
        let response = response.clone();
        async move { Ok::<_, TransportError>(response) }
    };
    (transport, calls)
}

/// Transport stub that answers with the complete URL it was given.
pub fn echo_transport() -> impl Transport + 'static {
    |request: ApiRequest| async move {
        tokio::time::sleep(Duration::from_millis(5)).await;
        Ok::<_, TransportError>(ApiResponse::new(
            200,
            Value::String(request.path),
        ))
    }
}

/// Raw HTTP request as seen by a mock backend.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub request_line: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Start a mock backend that answers every request with `status` and `body`.
///
/// Each received request is forwarded on the returned channel.
pub async fn start_mock_backend(
    status: u16,
    content_type: &'static str,
    body: &'static str,
) -> (SocketAddr, mpsc::UnboundedReceiver<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        if let Some(captured) = read_request(&mut socket).await {
                            let _ = tx.send(captured);
                        }
                        let status_text = match status {
                            200 => "200 OK",
                            201 => "201 Created",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            content_type,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, rx)
}

/// Start a backend that accepts connections and never answers.
pub async fn start_silent_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    addr
}

/// An address nothing is listening on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

async fn read_request(socket: &mut TcpStream) -> Option<CapturedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let request_line = lines.next()?.to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);

    let body_start = header_end + 4;
    while buf.len() < body_start + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let end = buf.len().min(body_start + content_length);
    let body = String::from_utf8_lossy(&buf[body_start..end]).to_string();

    Some(CapturedRequest {
        request_line,
        headers,
        body,
    })
}
