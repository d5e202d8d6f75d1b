//! Static file serving module
//!
//! Handles the PWA manifest and the `/static/*` asset tree: file loading,
//! MIME detection, and cached responses with `ETag`/304 support.

use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;
use tokio::fs;

/// Serve `<static_dir>/manifest.json`; 404 when the file is absent.
pub async fn serve_manifest(ctx: &RequestContext<'_>, static_dir: &str) -> Response<Full<Bytes>> {
    let manifest_path = Path::new(static_dir).join("manifest.json");
    match load_single_file(&manifest_path).await {
        Some((content, content_type)) => {
            build_static_file_response(&content, content_type, ctx.if_none_match.as_deref(), ctx.is_head)
        }
        None => http::build_404_response(),
    }
}

/// Serve files from the static directory under a route prefix.
pub async fn serve_directory(
    ctx: &RequestContext<'_>,
    dir: &str,
    route_prefix: &str,
) -> Response<Full<Bytes>> {
    match load_from_directory(dir, ctx.path, route_prefix).await {
        Some((content, content_type)) => {
            build_static_file_response(&content, content_type, ctx.if_none_match.as_deref(), ctx.is_head)
        }
        None => http::build_404_response(),
    }
}

/// Load a static file from a directory, refusing paths that escape it.
pub async fn load_from_directory(
    static_dir: &str,
    path: &str,
    route_prefix: &str,
) -> Option<(Vec<u8>, &'static str)> {
    // Remove leading slash and prevent directory traversal
    let clean_path = path.trim_start_matches('/').replace("..", "");

    // Remove route prefix from path
    let prefix_clean = route_prefix.trim_matches('/');
    let relative_path = if prefix_clean.is_empty() {
        clean_path.as_str()
    } else {
        clean_path
            .strip_prefix(&format!("{prefix_clean}/"))
            .unwrap_or(&clean_path)
    };

    let file_path = Path::new(static_dir).join(relative_path);

    // Security: ensure file_path is within static_dir
    let static_dir_canonical = match Path::new(static_dir).canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Static directory not found or inaccessible '{static_dir}': {e}"
            ));
            return None;
        }
    };

    // File not found is common (404), no need to log at warning level
    let Ok(file_path_canonical) = file_path.canonicalize() else {
        return None;
    };
    if !file_path_canonical.starts_with(&static_dir_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            path,
            file_path_canonical.display()
        ));
        return None;
    }

    let content = match fs::read(&file_path).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {}",
                file_path.display(),
                e
            ));
            return None;
        }
    };

    let content_type = mime::get_content_type(file_path.extension().and_then(|e| e.to_str()));
    Some((content, content_type))
}

/// Load a single file by path
pub async fn load_single_file(path: &Path) -> Option<(Vec<u8>, &'static str)> {
    let content = fs::read(path).await.ok()?;
    let content_type = mime::get_content_type(path.extension().and_then(|e| e.to_str()));
    Some((content, content_type))
}

/// Build static file response with `ETag` support
fn build_static_file_response(
    data: &[u8],
    content_type: &str,
    if_none_match: Option<&str>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(data);

    // Check if client has cached version
    if cache::check_etag_match(if_none_match, &etag) {
        return http::response::build_304_response(&etag);
    }

    // build_cached_response keeps the real Content-Length and strips the
    // body itself for HEAD requests
    http::response::build_cached_response(Bytes::from(data.to_owned()), content_type, &etag, is_head)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Tests run with the crate root as working directory, where the
    // static/ tree shipped with the repo lives.

    #[tokio::test]
    async fn test_load_manifest() {
        let (content, content_type) =
            load_single_file(Path::new("static/manifest.json")).await.unwrap();
        assert!(!content.is_empty());
        assert_eq!(content_type, "application/json");
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        assert!(load_single_file(Path::new("static/no-such-file.json"))
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_directory_serving() {
        let loaded = load_from_directory("static", "/static/js/app.js", "/static").await;
        let (content, content_type) = loaded.unwrap();
        assert!(!content.is_empty());
        assert_eq!(content_type, "application/javascript");
    }

    #[tokio::test]
    async fn test_traversal_blocked() {
        assert!(load_from_directory("static", "/static/../Cargo.toml", "/static")
            .await
            .is_none());
    }

    #[test]
    fn test_head_strips_body() {
        let resp = build_static_file_response(b"{}", "application/json", None, true);
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Length"], "2");
    }

    #[test]
    fn test_if_none_match_yields_304() {
        let resp = build_static_file_response(b"{}", "application/json", None, false);
        let etag = resp.headers()["ETag"].to_str().unwrap().to_string();
        let resp = build_static_file_response(b"{}", "application/json", Some(&etag), false);
        assert_eq!(resp.status(), 304);
    }
}
