use std::{collections::HashMap, sync::Arc};

use http::{HeaderName, HeaderValue};

use crate::core::{
    handler::{HandlerFuture, Middleware, Next},
    request::Request,
};

/// Inject custom headers defined in configuration into every successful
/// response, replacing same-named headers set downstream.
#[derive(Debug, Clone, Default)]
pub struct CustomHeaders {
    headers: Arc<Vec<(String, String)>>,
}

impl CustomHeaders {
    /// Pairs that are not valid on the wire are skipped with a warning.
    pub fn new(headers: HashMap<String, String>) -> Self {
        let mut valid: Vec<(String, String)> = headers
            .into_iter()
            .filter(|(name, value)| {
                let ok = HeaderName::from_bytes(name.as_bytes()).is_ok()
                    && HeaderValue::from_str(value).is_ok();
                if !ok {
                    tracing::warn!("Invalid custom header: {} = {}", name, value);
                }
                ok
            })
            .collect();
        valid.sort();

        Self {
            headers: Arc::new(valid),
        }
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }
}

impl Middleware for CustomHeaders {
    fn handle(&self, request: Request, next: Next) -> HandlerFuture {
        let headers = Arc::clone(&self.headers);
        Box::pin(async move {
            let response = next.run(request).await?;
            Ok(response.with_headers(headers.iter().cloned()))
        })
    }
}
