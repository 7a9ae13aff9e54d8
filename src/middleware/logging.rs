//! Logging middleware
//!
//! Writes one access-log line per request.

use axum::extract::{ConnectInfo, Request};
use axum::http::{Method, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use log::info;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

/// Log method, path, status and latency of every request
pub async fn log_request(request: Request, next: Next) -> Response {
    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(request).await;

    info!(
        "{}",
        access_line(client, response.status(), &method, &path, started.elapsed())
    );
    response
}

/// Format: `[ip]:port status - METHOD path latency`
pub fn access_line(
    client: Option<SocketAddr>,
    status: StatusCode,
    method: &Method,
    path: &str,
    latency: Duration,
) -> String {
    let (ip, port) = match client {
        Some(addr) => (addr.ip().to_string(), addr.port().to_string()),
        None => ("unknown".to_string(), "-".to_string()),
    };
    format!(
        "[{ip}]:{port} {} - {method} {path} {latency:?}",
        status.as_u16()
    )
}
