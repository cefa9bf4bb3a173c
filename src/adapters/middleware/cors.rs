//! Cross-origin resource sharing.
//!
//! Preflight (`OPTIONS`) requests are answered here with `200` and the CORS
//! headers, without reaching the route table. Every other successful response
//! is extended with the same headers.
use crate::{
    config::models::CorsConfig,
    core::{
        handler::{HandlerFuture, Middleware, Next},
        method::HttpMethod,
        request::Request,
        response::Response,
        status::HttpStatus,
    },
};

#[derive(Debug, Clone)]
pub struct Cors {
    config: CorsConfig,
    allow_methods: String,
    allow_headers: String,
    expose_headers: String,
    any_origin: bool,
}

impl Cors {
    pub fn new(config: CorsConfig) -> Self {
        let allow_methods = config
            .allowed_methods
            .iter()
            .map(HttpMethod::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        let allow_headers = config.allowed_headers.join(", ");
        let expose_headers = config.exposed_headers.join(", ");
        let any_origin = config.allowed_origins.iter().any(|origin| origin == "*");

        Self {
            config,
            allow_methods,
            allow_headers,
            expose_headers,
            any_origin,
        }
    }

    /// `*` when any origin is allowed, the caller's origin when it is listed,
    /// otherwise the first configured origin.
    fn allow_origin(&self, request_origin: Option<&str>) -> String {
        if self.any_origin {
            return "*".to_string();
        }
        match request_origin {
            Some(origin) if self.config.allowed_origins.iter().any(|o| o == origin) => {
                origin.to_string()
            }
            _ => self
                .config
                .allowed_origins
                .first()
                .cloned()
                .unwrap_or_default(),
        }
    }

    fn headers(&self, request_origin: Option<&str>) -> Vec<(&'static str, String)> {
        let mut headers = vec![
            ("Access-Control-Allow-Origin", self.allow_origin(request_origin)),
            ("Access-Control-Allow-Methods", self.allow_methods.clone()),
            ("Access-Control-Allow-Headers", self.allow_headers.clone()),
            ("Access-Control-Max-Age", self.config.max_age.to_string()),
        ];
        if !self.expose_headers.is_empty() {
            headers.push(("Access-Control-Expose-Headers", self.expose_headers.clone()));
        }
        if self.config.allow_credentials {
            headers.push(("Access-Control-Allow-Credentials", "true".to_string()));
        }
        if !self.any_origin {
            headers.push(("Vary", "Origin".to_string()));
        }
        headers
    }
}

impl Default for Cors {
    fn default() -> Self {
        Self::new(CorsConfig::default())
    }
}

impl Middleware for Cors {
    fn handle(&self, request: Request, next: Next) -> HandlerFuture {
        let headers = self.headers(request.header("origin"));

        if request.method() == HttpMethod::Options {
            return Box::pin(async move { Ok(Response::new(HttpStatus::Ok).with_headers(headers)) });
        }

        Box::pin(async move {
            let response = next.run(request).await?;
            Ok(response.with_headers(headers))
        })
    }
}
