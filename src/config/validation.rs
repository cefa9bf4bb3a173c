#![allow(clippy::collapsible_if)]

use std::net::SocketAddr;

use http::{HeaderName, HeaderValue};
use tracing_subscriber::EnvFilter;

use crate::config::models::{CorsConfig, ServerConfig};

/// Validation result type alias
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validation error types
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid field '{field}': {message}")]
    InvalidField { field: String, message: String },

    #[error("Invalid listen address '{address}': {reason}")]
    InvalidListenAddress { address: String, reason: String },

    #[error("Invalid CORS configuration: {message}")]
    InvalidCors { message: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },
}

/// Server configuration validator
pub struct ServerConfigValidator;

impl ServerConfigValidator {
    /// Validate the entire server configuration, reporting every problem at once
    pub fn validate(config: &ServerConfig) -> ValidationResult<()> {
        let mut errors = Vec::new();

        if let Err(e) = Self::validate_listen_address(&config.listen_addr) {
            errors.push(e);
        }

        if config.max_body_bytes == 0 {
            errors.push(ValidationError::InvalidField {
                field: "max_body_bytes".to_string(),
                message: "Must be greater than zero".to_string(),
            });
        }

        if let Err(e) = config.shutdown_timeout_duration() {
            errors.push(ValidationError::InvalidField {
                field: "shutdown_timeout".to_string(),
                message: format!(
                    "Invalid duration '{}': {e} (use e.g. '30s', '1m')",
                    config.shutdown_timeout
                ),
            });
        }

        if let Err(e) = EnvFilter::try_new(&config.logging.level) {
            errors.push(ValidationError::InvalidField {
                field: "logging.level".to_string(),
                message: format!("Invalid log level '{}': {e}", config.logging.level),
            });
        }

        if let Some(cors) = &config.middleware.cors {
            errors.extend(Self::validate_cors(cors));
        }

        for (name, value) in &config.middleware.response_headers {
            if let Err(e) = Self::validate_header(name, Some(value)) {
                errors.push(ValidationError::InvalidField {
                    field: format!("middleware.response_headers.{name}"),
                    message: e,
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else if errors.len() == 1 {
            Err(errors.remove(0))
        } else {
            Err(ValidationError::ValidationFailed {
                message: Self::format_multiple_errors(&errors),
            })
        }
    }

    /// Validate listen address format
    fn validate_listen_address(address: &str) -> ValidationResult<()> {
        if address.parse::<SocketAddr>().is_err() {
            return Err(ValidationError::InvalidListenAddress {
                address: address.to_string(),
                reason: "Must be in format 'IP:PORT' (e.g., '127.0.0.1:3000' or '0.0.0.0:8080')"
                    .to_string(),
            });
        }
        Ok(())
    }

    fn validate_cors(cors: &CorsConfig) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if cors.allowed_origins.is_empty() {
            errors.push(ValidationError::InvalidCors {
                message: "allowed_origins must not be empty".to_string(),
            });
        }
        for origin in &cors.allowed_origins {
            if origin != "*" {
                if let Err(message) = Self::validate_origin(origin) {
                    errors.push(ValidationError::InvalidCors { message });
                }
            }
        }

        if cors.allowed_methods.is_empty() {
            errors.push(ValidationError::InvalidCors {
                message: "allowed_methods must not be empty".to_string(),
            });
        }

        if cors.allow_credentials && cors.allowed_origins.iter().any(|o| o == "*") {
            errors.push(ValidationError::InvalidCors {
                message: "allow_credentials cannot be combined with the '*' origin".to_string(),
            });
        }

        for name in cors.allowed_headers.iter().chain(&cors.exposed_headers) {
            if let Err(message) = Self::validate_header(name, None) {
                errors.push(ValidationError::InvalidCors { message });
            }
        }

        errors
    }

    /// Origins are `scheme://host[:port]` with an http(s) scheme and no path
    fn validate_origin(origin: &str) -> Result<(), String> {
        let url = url::Url::parse(origin).map_err(|e| format!("Invalid origin '{origin}': {e}"))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(format!(
                "Origin '{origin}' must use http or https, got '{}'",
                url.scheme()
            ));
        }
        if url.host().is_none() {
            return Err(format!("Origin '{origin}' must have a host"));
        }
        if url.path() != "/" || url.query().is_some() || origin.ends_with('/') {
            return Err(format!("Origin '{origin}' must not contain a path"));
        }
        Ok(())
    }

    fn validate_header(name: &str, value: Option<&str>) -> Result<(), String> {
        if HeaderName::from_bytes(name.as_bytes()).is_err() {
            return Err(format!("Invalid header name '{name}'"));
        }
        if let Some(value) = value {
            if HeaderValue::from_str(value).is_err() {
                return Err(format!("Invalid value for header '{name}'"));
            }
        }
        Ok(())
    }

    /// Format multiple validation errors into a single message
    fn format_multiple_errors(errors: &[ValidationError]) -> String {
        let mut message = format!("Found {} validation errors:\n", errors.len());
        for (i, error) in errors.iter().enumerate() {
            message.push_str(&format!("  {}. {}\n", i + 1, error));
        }
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::method::HttpMethod;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ServerConfigValidator::validate(&ServerConfig::default()).is_ok());
    }

    #[test]
    fn test_invalid_listen_address() {
        let config = ServerConfig::builder().listen_addr("localhost").build();
        let result = ServerConfigValidator::validate(&config);
        assert!(matches!(
            result,
            Err(ValidationError::InvalidListenAddress { .. })
        ));
    }

    #[test]
    fn test_invalid_shutdown_timeout() {
        let config = ServerConfig::builder().shutdown_timeout("soon").build();
        let error = ServerConfigValidator::validate(&config).unwrap_err();
        assert!(error.to_string().contains("shutdown_timeout"));
    }

    #[test]
    fn test_zero_body_limit() {
        let config = ServerConfig::builder().max_body_bytes(0).build();
        assert!(ServerConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_cors_validation() {
        let mut config = ServerConfig::default();
        config.middleware.cors = Some(CorsConfig {
            allowed_origins: vec!["https://example.com".to_string()],
            allowed_methods: vec![HttpMethod::Get],
            ..CorsConfig::default()
        });
        assert!(ServerConfigValidator::validate(&config).is_ok());

        config.middleware.cors = Some(CorsConfig {
            allowed_origins: vec!["ftp://example.com".to_string()],
            ..CorsConfig::default()
        });
        assert!(matches!(
            ServerConfigValidator::validate(&config),
            Err(ValidationError::InvalidCors { .. })
        ));

        config.middleware.cors = Some(CorsConfig {
            allow_credentials: true,
            ..CorsConfig::default()
        });
        assert!(ServerConfigValidator::validate(&config).is_err());

        config.middleware.cors = Some(CorsConfig {
            allowed_origins: vec!["https://example.com/app".to_string()],
            ..CorsConfig::default()
        });
        assert!(ServerConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_invalid_response_header() {
        let mut config = ServerConfig::default();
        config
            .middleware
            .response_headers
            .insert("Bad Header".to_string(), "x".to_string());
        let error = ServerConfigValidator::validate(&config).unwrap_err();
        assert!(error.to_string().contains("Bad Header"));
    }

    #[test]
    fn test_multiple_errors_are_aggregated() {
        let config = ServerConfig::builder()
            .listen_addr("nope")
            .max_body_bytes(0)
            .shutdown_timeout("later")
            .build();

        match ServerConfigValidator::validate(&config) {
            Err(ValidationError::ValidationFailed { message }) => {
                assert!(message.starts_with("Found 3 validation errors"));
            }
            other => panic!("expected aggregated error, got {other:?}"),
        }
    }
}
