//! Built-in middleware.
//!
//! Each middleware is a small struct implementing
//! [`Middleware`](crate::core::handler::Middleware); the
//! [`from_settings`] helper assembles the configurable global stack.
pub mod cors;
pub mod custom_headers;
pub mod logging;
pub mod recover;
pub mod request_id;
pub mod security_headers;

use std::sync::Arc;

pub use cors::Cors;
pub use custom_headers::CustomHeaders;
pub use logging::{LoggingConfig, RequestLogger};
pub use recover::Recover;
pub use request_id::{REQUEST_ID_CONTEXT_KEY, REQUEST_ID_HEADER, RequestId};
pub use security_headers::SecurityHeaders;

use crate::{
    config::models::{LoggingSettings, MiddlewareSettings},
    core::handler::BoxedMiddleware,
};

/// Build the global middleware stack described by configuration.
///
/// Order (outermost first): request id, request logging, CORS, security
/// headers, custom headers.
pub fn from_settings(
    settings: &MiddlewareSettings,
    logging: &LoggingSettings,
) -> Vec<BoxedMiddleware> {
    let mut stack: Vec<BoxedMiddleware> = Vec::new();

    if settings.request_id {
        stack.push(Arc::new(RequestId));
    }
    if settings.request_logging {
        stack.push(Arc::new(RequestLogger::new(LoggingConfig {
            log_request_body: logging.log_request_body,
            log_response_body: logging.log_response_body,
        })));
    }
    if let Some(cors) = &settings.cors {
        stack.push(Arc::new(Cors::new(cors.clone())));
    }
    if settings.security_headers {
        stack.push(Arc::new(SecurityHeaders));
    }
    if !settings.response_headers.is_empty() {
        stack.push(Arc::new(CustomHeaders::new(
            settings.response_headers.clone(),
        )));
    }

    tracing::debug!(middlewares = stack.len(), "Built global middleware stack");
    stack
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::{
        config::models::CorsConfig,
        core::{
            error::HandlerError,
            handler::{boxed, compose},
            method::HttpMethod,
            request::Request,
            response::Response,
        },
    };

    #[test]
    fn test_defaults_enable_request_id_and_logging() {
        let stack = from_settings(&MiddlewareSettings::default(), &LoggingSettings::default());
        assert_eq!(stack.len(), 2);
    }

    #[test]
    fn test_everything_enabled() {
        let settings = MiddlewareSettings {
            request_id: true,
            request_logging: true,
            security_headers: true,
            cors: Some(CorsConfig::default()),
            response_headers: HashMap::from([("X-A".to_string(), "1".to_string())]),
        };
        assert_eq!(from_settings(&settings, &LoggingSettings::default()).len(), 5);
    }

    #[tokio::test]
    async fn test_stack_applies_headers() {
        let settings = MiddlewareSettings {
            request_id: true,
            request_logging: false,
            security_headers: true,
            cors: Some(CorsConfig::default()),
            response_headers: HashMap::from([("X-Service".to_string(), "demo".to_string())]),
        };
        let stack = from_settings(&settings, &LoggingSettings::default());
        let handler = boxed(|_request: Request| async { Ok::<_, HandlerError>(Response::ok("hi")) });

        let response = compose(&stack, handler)
            .call(Request::new(HttpMethod::Get, "/"))
            .await
            .unwrap();

        assert!(response.headers().contains("x-request-id"));
        assert_eq!(response.header("access-control-allow-origin"), Some("*"));
        assert_eq!(response.header("x-content-type-options"), Some("nosniff"));
        assert_eq!(response.header("x-service"), Some("demo"));
    }
}
