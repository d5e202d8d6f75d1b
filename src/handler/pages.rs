//! Page rendering module
//!
//! Builds the home and account pages as HTML strings. Each render takes its
//! context explicitly from `AppContext` (the home page gets the full theme
//! catalog, the account page the simplified list); the markup lives here as
//! code-built strings to avoid a runtime template dependency.

use crate::config::AppContext;
use crate::handler::router::RequestContext;
use crate::http::response::build_html_response;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use serde::Serialize;

/// Shared page chrome: layout plus one gradient class per theme preset.
const PAGE_STYLE: &str = r#"<style>
  * { margin: 0; padding: 0; box-sizing: border-box; }
  body {
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
    min-height: 100vh; color: #fff; padding: 24px;
  }
  .gradient-bg { transition: background 0.4s ease; }
  .theme-sunset { background: linear-gradient(135deg, #ff7e5f 0%, #feb47b 100%); }
  .theme-ocean { background: linear-gradient(135deg, #2b5876 0%, #4e4376 100%); }
  .theme-forest { background: linear-gradient(135deg, #134e5e 0%, #71b280 100%); }
  .theme-candy { background: linear-gradient(135deg, #d53369 0%, #daae51 100%); }
  .theme-midnight { background: linear-gradient(135deg, #0f2027 0%, #2c5364 100%); }
  .topbar { display: flex; justify-content: space-between; align-items: center; max-width: 640px; margin: 0 auto 24px; }
  .brand { font-size: 1.4em; font-weight: 700; }
  .topbar a { color: #fff; text-decoration: none; margin-left: 16px; opacity: 0.85; }
  .card {
    max-width: 640px; margin: 0 auto; padding: 32px; text-align: center;
    background: rgba(255, 255, 255, 0.12); border-radius: 16px;
    backdrop-filter: blur(8px);
  }
  .modes button, .controls button {
    border: none; border-radius: 8px; padding: 10px 16px; margin: 4px;
    background: rgba(255, 255, 255, 0.2); color: #fff; cursor: pointer;
  }
  .modes button.active { background: rgba(255, 255, 255, 0.45); }
  #time { font-size: 5em; font-weight: 700; margin: 24px 0; font-variant-numeric: tabular-nums; }
  #sessionDots span { display: inline-block; width: 10px; height: 10px; border-radius: 50%;
    background: rgba(255, 255, 255, 0.4); margin: 0 4px; }
  .settings { margin-top: 24px; text-align: left; }
  .settings label { display: block; margin: 8px 0; }
  .settings input, .settings select { margin-left: 8px; border-radius: 4px; border: none; padding: 4px 8px; }
  .summary { list-style: none; text-align: left; margin: 16px 0; }
  .summary li { margin: 6px 0; }
  .swatch { display: inline-block; padding: 8px 14px; border-radius: 8px; margin: 4px; }
  footer { text-align: center; margin-top: 24px; opacity: 0.7; font-size: 0.9em; }
</style>
"#;

/// Serve the home page
pub fn serve_index(ctx: &RequestContext<'_>, app: &AppContext) -> Response<Full<Bytes>> {
    build_html_response(render_index(app), ctx.is_head)
}

/// Serve the account page
pub fn serve_account(ctx: &RequestContext<'_>, app: &AppContext) -> Response<Full<Bytes>> {
    build_html_response(render_account(app), ctx.is_head)
}

/// Render the home page: timer UI with the canonical defaults and the full
/// theme catalog, exported to the timer script as `window.DEFAULTS` and
/// `window.THEMES`.
pub fn render_index(app: &AppContext) -> String {
    let d = &app.defaults;
    let mut html = String::with_capacity(8 * 1024);

    push_head(&mut html, "Focus+ — Pomodoro Timer");
    html.push_str("<body class=\"theme-sunset gradient-bg\">\n");
    push_topbar(&mut html);

    html.push_str("<main class=\"card\">\n<div class=\"modes\">\n");
    html.push_str(&format!(
        "<button class=\"btn-switch active\" data-mode=\"pomodoro\">Pomodoro ({} min)</button>\n",
        d.pomodoro_minutes
    ));
    html.push_str(&format!(
        "<button class=\"btn-switch\" data-mode=\"short_break\">Short Break ({} min)</button>\n",
        d.short_break_minutes
    ));
    html.push_str(&format!(
        "<button class=\"btn-switch\" data-mode=\"long_break\">Long Break ({} min)</button>\n",
        d.long_break_minutes
    ));
    html.push_str("</div>\n");

    html.push_str(&format!("<div id=\"time\">{}:00</div>\n", d.pomodoro_minutes));
    html.push_str(concat!(
        "<div class=\"controls\">\n",
        "<button id=\"startPause\">Start</button>\n",
        "<button id=\"reset\">Reset</button>\n",
        "<button id=\"skip\">Skip</button>\n",
        "</div>\n",
        "<div id=\"sessionDots\"></div>\n",
    ));

    // Settings form, pre-filled with the canonical defaults
    html.push_str("<form id=\"settingsForm\" class=\"settings\">\n");
    html.push_str(&format!(
        "<label>Pomodoro (minutes)<input type=\"number\" name=\"pomodoro\" min=\"1\" value=\"{}\"></label>\n",
        d.pomodoro_minutes
    ));
    html.push_str(&format!(
        "<label>Short break (minutes)<input type=\"number\" name=\"short_break\" min=\"1\" value=\"{}\"></label>\n",
        d.short_break_minutes
    ));
    html.push_str(&format!(
        "<label>Long break (minutes)<input type=\"number\" name=\"long_break\" min=\"1\" value=\"{}\"></label>\n",
        d.long_break_minutes
    ));
    html.push_str(&format!(
        "<label>Sessions before long break<input type=\"number\" name=\"sessions_before_long\" min=\"1\" value=\"{}\"></label>\n",
        d.sessions_before_long_break
    ));

    html.push_str("<label>Theme<select id=\"themeSelect\" name=\"theme\">\n");
    for theme in app.theme_catalog {
        html.push_str(&format!(
            "<option value=\"{}\" data-theme-id=\"{}\">{}</option>\n",
            theme.class, theme.id, theme.name
        ));
    }
    html.push_str("</select></label>\n");
    html.push_str("<button id=\"saveSettings\" type=\"button\">Save</button>\n</form>\n</main>\n");

    push_footer(&mut html, &app.version);

    html.push_str("<script>\n");
    html.push_str(&format!("window.DEFAULTS = {};\n", to_json(d)));
    html.push_str(&format!("window.THEMES = {};\n", to_json(&app.theme_catalog)));
    html.push_str(&format!("window.APP_VERSION = {};\n", to_json(&app.version)));
    html.push_str("</script>\n<script src=\"/static/js/app.js\"></script>\n</body>\n</html>\n");

    html
}

/// Render the account page: a static placeholder profile with the defaults
/// summary and the simplified theme list.
pub fn render_account(app: &AppContext) -> String {
    let d = &app.defaults;
    let mut html = String::with_capacity(4 * 1024);

    push_head(&mut html, "Focus+ — Account");
    html.push_str("<body class=\"theme-sunset gradient-bg\">\n");
    push_topbar(&mut html);

    html.push_str(concat!(
        "<main class=\"card\">\n",
        "<h1>Account</h1>\n",
        "<p>Guest — stats and settings live in this browser.</p>\n",
        "<h2>Timer defaults</h2>\n",
        "<ul class=\"summary\">\n",
    ));
    html.push_str(&format!("<li>Pomodoro: {} minutes</li>\n", d.pomodoro_minutes));
    html.push_str(&format!(
        "<li>Short break: {} minutes</li>\n",
        d.short_break_minutes
    ));
    html.push_str(&format!(
        "<li>Long break: {} minutes</li>\n",
        d.long_break_minutes
    ));
    html.push_str(&format!(
        "<li>Sessions before long break: {}</li>\n",
        d.sessions_before_long_break
    ));
    html.push_str("</ul>\n<h2>Themes</h2>\n<div>\n");
    for theme in app.basic_themes {
        html.push_str(&format!(
            "<span class=\"swatch {}\">{}</span>\n",
            theme.class, theme.name
        ));
    }
    html.push_str("</div>\n</main>\n");

    push_footer(&mut html, &app.version);
    html.push_str("</body>\n</html>\n");

    html
}

fn push_head(html: &mut String, title: &str) {
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!("<title>{title}</title>\n"));
    html.push_str("<link rel=\"manifest\" href=\"/manifest.json\">\n");
    html.push_str(PAGE_STYLE);
    html.push_str("</head>\n");
}

fn push_topbar(html: &mut String) {
    html.push_str(concat!(
        "<header class=\"topbar\"><span class=\"brand\">Focus+</span>",
        "<nav><a href=\"/\">Timer</a><a href=\"/account\">Account</a></nav></header>\n",
    ));
}

fn push_footer(html: &mut String, version: &str) {
    html.push_str(&format!("<footer>Focus+ v{version}</footer>\n"));
}

/// Serialize page data for script injection; the payloads are static
/// constants, so failure only happens if a type stops being serializable.
fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        logger::log_error(&format!("Failed to serialize page data: {e}"));
        "null".to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::app::{DefaultSettings, BASIC_THEMES, THEME_CATALOG};

    fn test_context() -> AppContext {
        AppContext {
            defaults: DefaultSettings::STANDARD,
            theme_catalog: &THEME_CATALOG,
            basic_themes: &BASIC_THEMES,
            version: "1.0.0".to_string(),
        }
    }

    #[test]
    fn test_index_contains_defaults() {
        let html = render_index(&test_context());
        assert!(html.contains("value=\"25\""));
        assert!(html.contains("value=\"5\""));
        assert!(html.contains("value=\"15\""));
        assert!(html.contains("value=\"4\""));
        assert!(html.contains("25:00"));
    }

    #[test]
    fn test_index_renders_full_catalog() {
        let html = render_index(&test_context());
        for theme in &THEME_CATALOG {
            assert!(html.contains(theme.name), "missing {}", theme.name);
            assert!(html.contains(theme.class), "missing {}", theme.class);
        }
    }

    #[test]
    fn test_index_script_injection() {
        let html = render_index(&test_context());
        assert!(html.contains("window.DEFAULTS = {\"pomodoro\":25"));
        assert!(html.contains("window.THEMES = [{\"id\":\"sunset\""));
        assert!(html.contains("window.APP_VERSION = \"1.0.0\""));
    }

    #[test]
    fn test_account_contains_defaults() {
        let html = render_account(&test_context());
        assert!(html.contains("Pomodoro: 25 minutes"));
        assert!(html.contains("Short break: 5 minutes"));
        assert!(html.contains("Long break: 15 minutes"));
        assert!(html.contains("Sessions before long break: 4"));
    }

    #[test]
    fn test_account_renders_basic_list_only() {
        let html = render_account(&test_context());
        for theme in &BASIC_THEMES {
            assert!(html.contains(theme.name), "missing {}", theme.name);
        }
        // Catalog-only entries stay off the account page
        assert!(!html.contains("Candy Pop"));
        assert!(!html.contains("Midnight Pulse"));
    }

    #[test]
    fn test_version_in_footer() {
        let mut app = test_context();
        app.version = "2.3.0".to_string();
        assert!(render_index(&app).contains("Focus+ v2.3.0"));
        assert!(render_account(&app).contains("Focus+ v2.3.0"));
    }
}
