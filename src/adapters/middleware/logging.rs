//! Request/response logging through `tracing`.
use std::time::Instant;

use crate::core::{
    handler::{HandlerFuture, Middleware, Next},
    request::Request,
};

/// What the request logger includes besides method, path, status and latency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoggingConfig {
    pub log_request_body: bool,
    pub log_response_body: bool,
}

/// Log start/end of a request including latency.
///
/// Failures are logged and passed on unchanged.
#[derive(Debug, Clone, Default)]
pub struct RequestLogger {
    config: LoggingConfig,
}

impl RequestLogger {
    pub fn new(config: LoggingConfig) -> Self {
        Self { config }
    }
}

impl Middleware for RequestLogger {
    fn handle(&self, request: Request, next: Next) -> HandlerFuture {
        let start = Instant::now();
        let method = request.method();
        let path = request.path().to_string();
        let config = self.config;

        tracing::info!(%method, %path, "Started processing request");
        if config.log_request_body && !request.body().is_empty() {
            tracing::info!(%method, %path, body = %request.text(), "Request body");
        }

        Box::pin(async move {
            let result = next.run(request).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(response) => {
                    tracing::info!(
                        %method,
                        %path,
                        status = response.status().code(),
                        elapsed_ms,
                        "Completed request"
                    );
                    if config.log_response_body && !response.body().is_empty() {
                        tracing::info!(%method, %path, body = %response.body().as_text(), "Response body");
                    }
                }
                Err(error) => {
                    tracing::warn!(%method, %path, elapsed_ms, error = %error, "Request failed");
                }
            }

            result
        })
    }
}
