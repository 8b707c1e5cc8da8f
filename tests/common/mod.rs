//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::http::{HeaderValue, StatusCode};
use futures_util::future::BoxFuture;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use fto_scout_proxy::{Forwarder, OutboundRequest, ProxyError, UpstreamResponse};

/// Forwarder that records every outbound request and answers with a canned response.
#[derive(Clone)]
pub struct RecordingForwarder {
    calls: Arc<Mutex<Vec<OutboundRequest>>>,
    status: StatusCode,
    content_type: Option<&'static str>,
    body: &'static str,
}

impl RecordingForwarder {
    pub fn new(status: StatusCode, content_type: Option<&'static str>, body: &'static str) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            status,
            content_type,
            body,
        }
    }

    pub fn ok(body: &'static str) -> Self {
        Self::new(StatusCode::OK, Some("text/html; charset=utf-8"), body)
    }

    pub fn calls(&self) -> Vec<OutboundRequest> {
        self.calls.lock().unwrap().clone()
    }
}

impl Forwarder for RecordingForwarder {
    fn forward(&self, request: OutboundRequest) -> BoxFuture<'_, Result<UpstreamResponse, ProxyError>> {
        self.calls.lock().unwrap().push(request);
        let response = UpstreamResponse {
            status: self.status,
            content_type: self.content_type.map(HeaderValue::from_static),
            body: Bytes::from_static(self.body.as_bytes()),
        };
        Box::pin(async move { Ok(response) })
    }
}

/// Forwarder whose calls fail with a real connection error.
pub struct RefusingForwarder {
    addr: SocketAddr,
}

impl RefusingForwarder {
    /// Reserve a local port, then release it so connects are refused.
    pub async fn new() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        Self { addr }
    }
}

impl Forwarder for RefusingForwarder {
    fn forward(&self, _request: OutboundRequest) -> BoxFuture<'_, Result<UpstreamResponse, ProxyError>> {
        let url = format!("http://{}/", self.addr);
        Box::pin(async move {
            let client = reqwest::Client::builder().no_proxy().build().unwrap();
            let err = client.get(url).send().await.unwrap_err();
            Err(ProxyError::Upstream(err))
        })
    }
}

/// A raw HTTP/1.1 request as seen by the mock backend.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub head: String,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn request_line(&self) -> &str {
        self.head.lines().next().unwrap_or_default()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.head.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim().eq_ignore_ascii_case(name).then(|| value.trim())
        })
    }
}

/// Start a mock backend that captures each request and answers with a fixed response.
pub async fn start_recording_backend(
    status_line: &'static str,
    content_type: Option<&'static str>,
    response: &'static str,
) -> (SocketAddr, mpsc::UnboundedReceiver<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let tx = tx.clone();
            tokio::spawn(async move {
                let captured = read_request(&mut socket).await;
                let _ = tx.send(captured);

                let content_type = content_type
                    .map(|ct| format!("Content-Type: {ct}\r\n"))
                    .unwrap_or_default();
                let response_str = format!(
                    "HTTP/1.1 {}\r\n{}Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_line,
                    content_type,
                    response.len(),
                    response
                );
                let _ = socket.write_all(response_str.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (addr, rx)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> CapturedRequest {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let head_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break buf.len();
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).into_owned();
    let mut captured = CapturedRequest { head, body: Vec::new() };
    let content_length: usize = captured
        .header("content-length")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);

    let mut body = buf.get(head_end + 4..).map(<[u8]>::to_vec).unwrap_or_default();
    while body.len() < content_length {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }
    captured.body = body;
    captured
}
