//! Per-request correlation id.
use uuid::Uuid;

pub use crate::core::request::{REQUEST_ID_CONTEXT_KEY, REQUEST_ID_HEADER};
use crate::core::{
    handler::{HandlerFuture, Middleware, Next},
    request::Request,
};

/// Echo the request's correlation id in `X-Request-ID`.
///
/// The id is the one the dispatcher already assigned (and logged); requests
/// built by hand fall back to the inbound header or a fresh UUID v4. The
/// chosen id is written back to the context for downstream handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestId;

impl Middleware for RequestId {
    fn handle(&self, request: Request, next: Next) -> HandlerFuture {
        let request_id = request
            .request_id()
            .or_else(|| {
                request
                    .header(REQUEST_ID_HEADER)
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        request
            .context()
            .insert(REQUEST_ID_CONTEXT_KEY, request_id.clone());
        tracing::debug!(request_id = %request_id, "Assigned request id");

        Box::pin(async move {
            let response = next.run(request).await?;
            Ok(response.with_header(REQUEST_ID_HEADER, request_id))
        })
    }
}
