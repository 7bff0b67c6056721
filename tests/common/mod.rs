//! In-process stand-in for the metadata service.

#![allow(dead_code)]

use link_preview::{FetcherConfig, MetadataFetcher};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub const METADATA_PATH: &str = "/api/services/website/metadata";

#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub body: Vec<u8>,
    pub delay: Duration,
}

impl MockResponse {
    pub fn json(body: serde_json::Value) -> Self {
        Self {
            status: 200,
            body: body.to_string().into_bytes(),
            delay: Duration::ZERO,
        }
    }

    pub fn raw(status: u16, body: &str) -> Self {
        Self::bytes(status, body.as_bytes())
    }

    pub fn bytes(status: u16, body: &[u8]) -> Self {
        Self {
            status,
            body: body.to_vec(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

pub struct MockServer {
    pub endpoint: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockServer {
    /// Serves `respond(request_target)` to every connection.
    pub async fn start<F>(respond: F) -> Self
    where
        F: Fn(&str) -> MockResponse + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let respond = Arc::new(respond);

        let seen = Arc::clone(&requests);
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                let respond = Arc::clone(&respond);
                let seen = Arc::clone(&seen);

                tokio::spawn(async move {
                    let target = read_request_target(&mut socket).await;
                    seen.lock().unwrap().push(target.clone());

                    let response = respond(&target);
                    tokio::time::sleep(response.delay).await;

                    let head = format!(
                        "HTTP/1.1 {} Mock\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                        response.status,
                        response.body.len()
                    );
                    let _ = socket.write_all(head.as_bytes()).await;
                    let _ = socket.write_all(&response.body).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        Self {
            endpoint: format!("http://{addr}{METADATA_PATH}"),
            requests,
        }
    }

    /// Answers every request with the same response.
    pub async fn fixed(response: MockResponse) -> Self {
        Self::start(move |_| response.clone()).await
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn fetcher(&self) -> MetadataFetcher {
        self.fetcher_with_timeout(Duration::from_secs(5))
    }

    pub fn fetcher_with_timeout(&self, timeout: Duration) -> MetadataFetcher {
        MetadataFetcher::new_with_config(FetcherConfig {
            endpoint: self.endpoint.clone(),
            timeout,
            ..Default::default()
        })
        .unwrap()
    }
}

async fn read_request_target(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }

    String::from_utf8_lossy(&buf)
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or_default()
        .to_string()
}
