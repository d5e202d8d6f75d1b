//! MIME type detection module
//!
//! Returns the Content-Type for a file extension. Covers the asset types
//! the Focus+ static tree actually contains plus the common web set.

/// Get MIME Content-Type based on file extension
pub fn get_content_type(extension: Option<&str>) -> &'static str {
    match extension {
        // Text
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("txt" | "md") => "text/plain; charset=utf-8",

        // Scripts and data
        Some("js" | "mjs") => "application/javascript",
        Some("json") => "application/json",
        Some("webmanifest") => "application/manifest+json",

        // Images
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("webp") => "image/webp",

        // Audio (timer chime)
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",

        // Fonts
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",

        // Default
        _ => "application/octet-stream",
    }
}
