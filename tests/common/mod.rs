// File: common/mod.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

#![allow(dead_code)]

use slasher::config::ConfigParameter;
use slasher::getstate::GetState;
use slasher::http::Http;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use wiremock::ResponseTemplate;

/// Short timeouts and backoff so failure paths finish quickly.
pub fn fast_config() -> ConfigParameter {
    let mut config = ConfigParameter::new();
    config.set_timeout(Duration::from_secs(5));
    config.set_header_timeout(Duration::from_secs(5));
    config.set_connect_timeout(Duration::from_secs(2));
    config.set_retry_backoff(Duration::from_millis(10));
    config
}

pub fn http_with(config: ConfigParameter) -> (Arc<GetState>, Http) {
    let state = Arc::new(GetState::new());
    let http = Http::new(Arc::clone(&state), config).expect("client builds");
    (state, http)
}

pub fn sized_response(status: u16, size: usize) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_string("x".repeat(size))
}

pub fn redirect_to(status: u16, location: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).insert_header("location", location)
}

/// A local URL nothing listens on.
pub fn refused_url(path: &str) -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("addr").port();
    drop(listener);
    format!("http://127.0.0.1:{}{}", port, path)
}

/// Bare HTTP/1.1 server that routes on the request-target exactly as it
/// arrives. wiremock parses incoming paths through `Url`, which folds
/// `/admin/.` into `/admin/`, so dot segments need this instead.
pub struct LiteralServer {
    addr: SocketAddr,
    received: Arc<Mutex<Vec<String>>>,
}

impl LiteralServer {
    /// `routes` maps a request-target to `(status, body size)`. Anything
    /// else gets a 404 with a 9 byte body.
    pub async fn start(routes: &[(&str, u16, usize)]) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        let routes: Arc<HashMap<String, (u16, usize)>> = Arc::new(
            routes
                .iter()
                .map(|(target, status, size)| (target.to_string(), (*status, *size)))
                .collect(),
        );
        let received = Arc::new(Mutex::new(Vec::new()));

        let log = Arc::clone(&received);
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let routes = Arc::clone(&routes);
                let log = Arc::clone(&log);
                tokio::spawn(async move { serve_one(stream, &routes, &log).await });
            }
        });

        LiteralServer { addr, received }
    }

    pub fn uri(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Request lines seen so far, as `METHOD target`.
    pub fn received(&self) -> Vec<String> {
        self.received.lock().expect("lock").clone()
    }
}

async fn serve_one(
    mut stream: TcpStream,
    routes: &HashMap<String, (u16, usize)>,
    log: &Mutex<Vec<String>>,
) {
    let mut head = Vec::new();
    let mut chunk = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => head.extend_from_slice(&chunk[..n]),
        }
    }

    let head = String::from_utf8_lossy(&head);
    let mut request_line = head.lines().next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default();
    let target = request_line.next().unwrap_or_default();
    log.lock().expect("lock").push(format!("{} {}", method, target));

    let (status, size) = routes.get(target).copied().unwrap_or((404, 9));
    let response = format!(
        "HTTP/1.1 {} Literal\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
        status,
        size,
        "x".repeat(size)
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}
