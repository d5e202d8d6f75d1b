//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, path
//! dispatch, and access logging.

use crate::config::{AppContext, AppState};
use crate::handler::{pages, static_files};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response, StatusCode};
use serde::Serialize;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

/// Request context encapsulating what the route handlers need
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
}

/// Health check payload
#[derive(Serialize)]
struct HealthStatus<'a> {
    status: &'static str,
    version: &'a str,
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method();
    let path = req.uri().path();
    let is_head = *method == Method::HEAD;

    let access_log = state
        .cached_access_log
        .load(std::sync::atomic::Ordering::Relaxed);
    let mut entry = AccessLogEntry::new(&peer_addr, method, path);

    // 1. Check HTTP method
    if let Some(resp) = check_http_method(method, state.config.http.enable_cors) {
        finish_access_log(access_log, &mut entry, &resp);
        return Ok(resp);
    }

    // 2. Check body size
    if let Some(resp) = check_body_size(req.headers(), state.config.http.max_body_size) {
        finish_access_log(access_log, &mut entry, &resp);
        return Ok(resp);
    }

    // 3. Log headers if enabled
    logger::log_headers_count(req.headers().len(), state.config.logging.show_headers);

    let ctx = RequestContext {
        path,
        is_head,
        if_none_match: req
            .headers()
            .get("if-none-match")
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string),
    };

    // 4. Dispatch
    let resp = route_request(&ctx, &state).await;
    finish_access_log(access_log, &mut entry, &resp);
    Ok(resp)
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method, enable_cors: bool) -> Option<Response<Full<Bytes>>> {
    match method {
        &Method::GET | &Method::HEAD => None,
        &Method::OPTIONS => Some(http::build_options_response(enable_cors)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(
    headers: &hyper::HeaderMap,
    max_body_size: u64,
) -> Option<Response<Full<Bytes>>> {
    let content_length = headers.get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

/// Route request based on path
///
/// Every handler receives its data explicitly from the shared `AppContext`;
/// nothing is injected into a render behind a handler's back.
async fn route_request(
    ctx: &RequestContext<'_>,
    state: &Arc<AppState>,
) -> Response<Full<Bytes>> {
    let static_dir = &state.config.routes.static_dir;
    match ctx.path {
        "/" => pages::serve_index(ctx, &state.app),
        "/account" => pages::serve_account(ctx, &state.app),
        "/health" => build_health_response(&state.app),
        "/manifest.json" => static_files::serve_manifest(ctx, static_dir).await,
        p if p.starts_with("/static/") => {
            static_files::serve_directory(ctx, static_dir, "/static").await
        }
        _ => http::build_404_response(),
    }
}

/// Build the health check response from the resolved version
fn build_health_response(app: &AppContext) -> Response<Full<Bytes>> {
    http::response::build_json_response(
        StatusCode::OK,
        &HealthStatus {
            status: "ok",
            version: &app.version,
        },
    )
}

/// Fill in response fields and emit the access-log line
fn finish_access_log(enabled: bool, entry: &mut AccessLogEntry, resp: &Response<Full<Bytes>>) {
    if !enabled {
        return;
    }
    entry.status = resp.status().as_u16();
    entry.body_bytes = resp
        .headers()
        .get("content-length")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    logger::log_access(entry);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::app::{DefaultSettings, BASIC_THEMES, THEME_CATALOG};
    use crate::config::{
        Config, HttpConfig, LoggingConfig, PerformanceConfig, RoutesConfig, ServerConfig,
    };
    use hyper::header::{HeaderMap, HeaderValue};

    fn test_context(version: &str) -> AppContext {
        AppContext {
            defaults: DefaultSettings::STANDARD,
            theme_catalog: &THEME_CATALOG,
            basic_themes: &BASIC_THEMES,
            version: version.to_string(),
        }
    }

    fn test_state(static_dir: &str) -> Arc<AppState> {
        let cfg = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 5000,
                workers: None,
            },
            logging: LoggingConfig {
                level: "debug".to_string(),
                access_log: false,
                show_headers: false,
            },
            performance: PerformanceConfig {
                keep_alive_timeout: 75,
                read_timeout: 30,
                write_timeout: 30,
                max_connections: None,
            },
            http: HttpConfig {
                enable_cors: false,
                max_body_size: 10_485_760,
            },
            routes: RoutesConfig {
                static_dir: static_dir.to_string(),
            },
        };
        Arc::new(AppState::new(&cfg, test_context("1.0.0")))
    }

    fn get(path: &str) -> RequestContext<'_> {
        RequestContext {
            path,
            is_head: false,
            if_none_match: None,
        }
    }

    #[test]
    fn test_health_payload_shape() {
        let app = test_context("2.3.0");
        let payload = HealthStatus {
            status: "ok",
            version: &app.version,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], "2.3.0");
    }

    #[test]
    fn test_health_response() {
        let resp = build_health_response(&test_context("1.0.0"));
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Type"], "application/json");
    }

    #[tokio::test]
    async fn test_dispatch_known_routes() {
        let state = test_state("static");
        let resp = route_request(&get("/health"), &state).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Type"], "application/json");

        let resp = route_request(&get("/"), &state).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Type"], "text/html; charset=utf-8");

        let resp = route_request(&get("/account"), &state).await;
        assert_eq!(resp.status(), 200);
    }

    #[tokio::test]
    async fn test_dispatch_unknown_path_is_404() {
        let state = test_state("static");
        assert_eq!(route_request(&get("/no-such-page"), &state).await.status(), 404);
        assert_eq!(route_request(&get("/healthz"), &state).await.status(), 404);
    }

    #[tokio::test]
    async fn test_dispatch_manifest() {
        // Repo static tree has the manifest
        let state = test_state("static");
        let resp = route_request(&get("/manifest.json"), &state).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Type"], "application/json");

        // A static dir without one yields 404
        let state = test_state("src");
        let resp = route_request(&get("/manifest.json"), &state).await;
        assert_eq!(resp.status(), 404);
    }

    #[test]
    fn test_body_size_over_limit() {
        let mut headers = HeaderMap::new();
        headers.insert("content-length", HeaderValue::from_static("2048"));
        let resp = check_body_size(&headers, 1024).unwrap();
        assert_eq!(resp.status(), 413);
    }

    #[test]
    fn test_body_size_within_limit() {
        let mut headers = HeaderMap::new();
        headers.insert("content-length", HeaderValue::from_static("1024"));
        assert!(check_body_size(&headers, 1024).is_none());
    }

    #[test]
    fn test_body_size_absent_header() {
        assert!(check_body_size(&HeaderMap::new(), 1024).is_none());
    }

    #[test]
    fn test_body_size_unparsable_value() {
        let mut headers = HeaderMap::new();
        headers.insert("content-length", HeaderValue::from_static("not-a-number"));
        assert!(check_body_size(&headers, 1024).is_none());

        headers.insert(
            "content-length",
            HeaderValue::from_bytes("２０４８".as_bytes()).unwrap(),
        );
        assert!(check_body_size(&headers, 1024).is_none());
    }

    #[test]
    fn test_method_gate() {
        assert!(check_http_method(&Method::GET, false).is_none());
        assert!(check_http_method(&Method::HEAD, false).is_none());
        let resp = check_http_method(&Method::OPTIONS, false).unwrap();
        assert_eq!(resp.status(), 204);
        let resp = check_http_method(&Method::POST, false).unwrap();
        assert_eq!(resp.status(), 405);
    }
}
