// Configuration module entry point
// Loads the file/environment configuration and holds shared process state

pub mod app;
mod types;

use std::net::SocketAddr;
use std::sync::atomic::AtomicBool;

pub use app::AppContext;
pub use types::{
    Config, HttpConfig, LoggingConfig, PerformanceConfig, RoutesConfig, ServerConfig,
};

impl Config {
    /// Load configuration from `config.toml` (optional) layered over
    /// built-in defaults and `SERVER_*` environment values.
    ///
    /// The plain `PORT` environment variable overrides `server.port`, the
    /// way the hosting platform expects.
    pub fn load() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("SERVER"))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            // Development default; turn down before exposing the server
            .set_default("logging.level", "debug")?
            .set_default("logging.access_log", true)?
            .set_default("logging.show_headers", false)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.enable_cors", false)?
            .set_default("http.max_body_size", 10_485_760)? // 10MB
            .set_default("routes.static_dir", "static")?
            .build()?;

        let mut cfg: Self = settings.try_deserialize()?;
        if let Some(port) = port_override(std::env::var("PORT").ok()) {
            cfg.server.port = port;
        }
        Ok(cfg)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

/// Parse a raw `PORT` value; invalid values are ignored rather than fatal.
fn port_override(raw: Option<String>) -> Option<u16> {
    raw.and_then(|v| v.parse().ok())
}

/// Shared application state
///
/// All fields are read-only after startup; handlers only ever take shared
/// references, so concurrent requests need no coordination.
pub struct AppState {
    pub config: Config,
    pub app: AppContext,

    // Cached config value for lock-free access on the request path
    pub cached_access_log: AtomicBool,
}

impl AppState {
    pub fn new(config: &Config, app: AppContext) -> Self {
        Self {
            config: config.clone(),
            app,
            cached_access_log: AtomicBool::new(config.logging.access_log),
        }
    }
}
