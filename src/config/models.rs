//! Configuration data structures for Petal.
//!
//! These types map directly to TOML (also JSON / YAML) configuration files. Every
//! section has defaults, so an empty file is a valid configuration.
use std::{collections::HashMap, time::Duration};

use serde::{Deserialize, Serialize};

use crate::core::method::HttpMethod;

pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to bind, e.g. `127.0.0.1:3000`
    pub listen_addr: String,
    /// Keep connections open between requests. Off by default: every response
    /// is sent with `Connection: close`.
    pub keep_alive: bool,
    /// Largest request body accepted; larger bodies are answered with 413
    pub max_body_bytes: usize,
    /// How long shutdown waits for in-flight requests, parsed by humantime ("30s", "1m")
    pub shutdown_timeout: String,
    pub logging: LoggingSettings,
    pub middleware: MiddlewareSettings,
}

impl ServerConfig {
    /// Create a new server configuration builder
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// `shutdown_timeout` as a duration.
    pub fn shutdown_timeout_duration(&self) -> Result<Duration, humantime::DurationError> {
        humantime::parse_duration(&self.shutdown_timeout)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:3000".to_string(),
            keep_alive: false,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            shutdown_timeout: "30s".to_string(),
            logging: LoggingSettings::default(),
            middleware: MiddlewareSettings::default(),
        }
    }
}

/// Log output settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingSettings {
    /// `tracing` filter directive, e.g. `info` or `petal=debug`
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
    /// Include textual request bodies in request logs
    pub log_request_body: bool,
    /// Include textual response bodies in request logs
    pub log_response_body: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            log_request_body: false,
            log_response_body: false,
        }
    }
}

/// Built-in global middleware toggles
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct MiddlewareSettings {
    /// Attach an `X-Request-ID` to every request and response
    pub request_id: bool,
    /// Log every request and its outcome
    pub request_logging: bool,
    /// Add common security hardening headers
    pub security_headers: bool,
    /// Enable CORS handling with this policy
    pub cors: Option<CorsConfig>,
    /// Static headers added to every response
    pub response_headers: HashMap<String, String>,
}

impl Default for MiddlewareSettings {
    fn default() -> Self {
        Self {
            request_id: true,
            request_logging: true,
            security_headers: false,
            cors: None,
            response_headers: HashMap::new(),
        }
    }
}

/// Cross-origin resource sharing policy
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed origins; `*` allows any origin
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<HttpMethod>,
    pub allowed_headers: Vec<String>,
    pub exposed_headers: Vec<String>,
    pub allow_credentials: bool,
    /// Preflight cache lifetime in seconds
    pub max_age: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
            allowed_methods: vec![
                HttpMethod::Get,
                HttpMethod::Post,
                HttpMethod::Put,
                HttpMethod::Delete,
                HttpMethod::Patch,
                HttpMethod::Options,
            ],
            allowed_headers: vec!["Content-Type".to_string(), "Authorization".to_string()],
            exposed_headers: Vec::new(),
            allow_credentials: false,
            max_age: 3600,
        }
    }
}

/// Builder for ServerConfig to allow for cleaner configuration creation
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    config: ServerConfig,
}

impl ServerConfigBuilder {
    /// Set the listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Enable or disable persistent connections
    pub fn keep_alive(mut self, enabled: bool) -> Self {
        self.config.keep_alive = enabled;
        self
    }

    /// Set the request body limit
    pub fn max_body_bytes(mut self, limit: usize) -> Self {
        self.config.max_body_bytes = limit;
        self
    }

    /// Set the shutdown drain timeout (humantime syntax)
    pub fn shutdown_timeout(mut self, timeout: impl Into<String>) -> Self {
        self.config.shutdown_timeout = timeout.into();
        self
    }

    pub fn logging(mut self, logging: LoggingSettings) -> Self {
        self.config.logging = logging;
        self
    }

    pub fn middleware(mut self, middleware: MiddlewareSettings) -> Self {
        self.config.middleware = middleware;
        self
    }

    /// Build the ServerConfig
    pub fn build(self) -> ServerConfig {
        self.config
    }
}

/// Commented template written by `petal init`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Petal server configuration

# The address to listen on
listen_addr = "127.0.0.1:3000"

# Keep connections open between requests (default: close after every response)
keep_alive = false

# Largest accepted request body in bytes
max_body_bytes = 1048576

# How long shutdown waits for in-flight requests
shutdown_timeout = "30s"

[logging]
level = "info"
json = false
log_request_body = false
log_response_body = false

[middleware]
request_id = true
request_logging = true
security_headers = true

[middleware.response_headers]
"X-Powered-By" = "petal"

# Uncomment to enable CORS
# [middleware.cors]
# allowed_origins = ["https://example.com"]
# allowed_methods = ["GET", "POST"]
# allowed_headers = ["Content-Type", "Authorization"]
# exposed_headers = []
# allow_credentials = false
# max_age = 3600
"#;
