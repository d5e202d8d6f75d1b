// Application context module
// Canonical page data: default timer durations, theme catalogs, app version

use serde::Serialize;
use std::env;

/// Fallback version when `APP_VERSION` is not set
const DEFAULT_VERSION: &str = "1.0.0";

/// Default timer durations, in minutes except for the session count.
///
/// This is the single canonical definition; the original front-end had the
/// same literals repeated in three places. Wire names match what the timer
/// script expects in `window.DEFAULTS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DefaultSettings {
    #[serde(rename = "pomodoro")]
    pub pomodoro_minutes: u32,
    #[serde(rename = "short_break")]
    pub short_break_minutes: u32,
    #[serde(rename = "long_break")]
    pub long_break_minutes: u32,
    #[serde(rename = "sessions_before_long")]
    pub sessions_before_long_break: u32,
}

impl DefaultSettings {
    pub const STANDARD: Self = Self {
        pomodoro_minutes: 25,
        short_break_minutes: 5,
        long_break_minutes: 15,
        sessions_before_long_break: 4,
    };
}

/// Theme preset with a stable identifier (full catalog, home page)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub id: &'static str,
    pub name: &'static str,
    pub class: &'static str,
}

/// Theme preset without an identifier (simplified list, account page)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BasicTheme {
    pub name: &'static str,
    pub class: &'static str,
}

/// Full theme catalog rendered on the home page.
pub const THEME_CATALOG: [Theme; 5] = [
    Theme { id: "sunset", name: "Sunset Glow", class: "theme-sunset" },
    Theme { id: "ocean", name: "Ocean Breeze", class: "theme-ocean" },
    Theme { id: "forest", name: "Forest Mist", class: "theme-forest" },
    Theme { id: "candy", name: "Candy Pop", class: "theme-candy" },
    Theme { id: "midnight", name: "Midnight Pulse", class: "theme-midnight" },
];

/// Simplified theme list rendered on the account page.
///
/// Kept as a separate dataset rather than a slice of the catalog: the two
/// lists differ in shape and content and neither is authoritative.
pub const BASIC_THEMES: [BasicTheme; 3] = [
    BasicTheme { name: "Sunset", class: "theme-sunset" },
    BasicTheme { name: "Ocean", class: "theme-ocean" },
    BasicTheme { name: "Forest", class: "theme-forest" },
];

/// Immutable per-process page data, resolved once at startup and injected
/// into every handler through `AppState`.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub defaults: DefaultSettings,
    pub theme_catalog: &'static [Theme],
    pub basic_themes: &'static [BasicTheme],
    pub version: String,
}

impl AppContext {
    /// Build the context, resolving the version from the environment.
    pub fn resolve() -> Self {
        Self {
            defaults: DefaultSettings::STANDARD,
            theme_catalog: &THEME_CATALOG,
            basic_themes: &BASIC_THEMES,
            version: version_from(env::var("APP_VERSION").ok()),
        }
    }
}

/// Resolve the reported version from a raw `APP_VERSION` value.
/// Empty values fall back to the default, same as unset.
fn version_from(raw: Option<String>) -> String {
    match raw {
        Some(v) if !v.is_empty() => v,
        _ => DEFAULT_VERSION.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_defaults() {
        let d = DefaultSettings::STANDARD;
        assert_eq!(d.pomodoro_minutes, 25);
        assert_eq!(d.short_break_minutes, 5);
        assert_eq!(d.long_break_minutes, 15);
        assert_eq!(d.sessions_before_long_break, 4);
    }

    #[test]
    fn test_defaults_wire_names() {
        let json = serde_json::to_value(DefaultSettings::STANDARD).unwrap();
        assert_eq!(json["pomodoro"], 25);
        assert_eq!(json["short_break"], 5);
        assert_eq!(json["long_break"], 15);
        assert_eq!(json["sessions_before_long"], 4);
    }

    #[test]
    fn test_version_from_unset() {
        assert_eq!(version_from(None), "1.0.0");
    }

    #[test]
    fn test_version_from_set() {
        assert_eq!(version_from(Some("2.3.0".to_string())), "2.3.0");
    }

    #[test]
    fn test_version_from_empty() {
        assert_eq!(version_from(Some(String::new())), "1.0.0");
    }

    #[test]
    fn test_theme_datasets_stay_distinct() {
        assert_eq!(THEME_CATALOG.len(), 5);
        assert_eq!(BASIC_THEMES.len(), 3);
        assert!(THEME_CATALOG.iter().all(|t| !t.id.is_empty()));
    }

    #[test]
    fn test_theme_serialization() {
        let json = serde_json::to_value(THEME_CATALOG[0]).unwrap();
        assert_eq!(json["id"], "sunset");
        assert_eq!(json["name"], "Sunset Glow");
        assert_eq!(json["class"], "theme-sunset");

        let json = serde_json::to_value(BASIC_THEMES[0]).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["class"], "theme-sunset");
    }
}
