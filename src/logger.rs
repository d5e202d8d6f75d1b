//! Logging module
//!
//! Stdout/stderr logging: startup banner, connection lifecycle, warnings
//! and errors, plus per-request access-log lines in Common Log Format.

use crate::config::Config;
use chrono::{DateTime, Local};
use std::net::SocketAddr;

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    println!("======================================");
    println!("Focus+ server started successfully");
    println!("Listening on: http://{addr}");
    println!("Log level: {}", config.logging.level);
    println!("Static directory: {}", config.routes.static_dir);
    if let Some(workers) = config.server.workers {
        println!("Worker threads: {workers}");
    }
    if config.logging.level == "debug" {
        println!("[WARN] Debug diagnostics enabled (development default)");
        println!("       Set logging.level before exposing this server externally");
    }
    println!("Using Tokio runtime for concurrency");
    println!("======================================\n");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    println!("[Connection] Accepted from: {peer_addr}");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    eprintln!("[ERROR] Failed to serve connection: {err:?}");
}

pub fn log_error(message: &str) {
    eprintln!("[ERROR] {message}");
}

pub fn log_warning(message: &str) {
    eprintln!("[WARN] {message}");
}

pub fn log_headers_count(count: usize, show: bool) {
    if show {
        println!("[Headers] Count: {count}");
    }
}

/// Access log entry for one handled request
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    pub remote_addr: String,
    pub time: DateTime<Local>,
    pub method: String,
    pub path: String,
    pub status: u16,
    pub body_bytes: usize,
}

impl AccessLogEntry {
    pub fn new(remote_addr: &SocketAddr, method: &hyper::Method, path: &str) -> Self {
        Self {
            remote_addr: remote_addr.ip().to_string(),
            time: Local::now(),
            method: method.to_string(),
            path: path.to_string(),
            status: 200,
            body_bytes: 0,
        }
    }

    /// Common Log Format (CLF)
    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`
    fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{} {} HTTP/1.1\" {} {}",
            self.remote_addr,
            self.time.format("%d/%b/%Y:%H:%M:%S %z"),
            self.method,
            self.path,
            self.status,
            self.body_bytes,
        )
    }
}

/// Write one access-log line; callers gate on the cached access-log flag.
pub fn log_access(entry: &AccessLogEntry) {
    println!("{}", entry.format_common());
}
