//! The per-request pipeline.
//!
//! `dispatch` converts the transport request, matches it against the frozen
//! route table, nests the global middleware around the matched handler (or the
//! not-found fallback), runs the chain and converts the result back. Every
//! failure that escapes the chain, including a handler panic, goes through the
//! [`ErrorHandler`], so each request yields exactly one response.
use std::{
    any::Any,
    convert::Infallible,
    fmt,
    future::Future,
    panic::AssertUnwindSafe,
    sync::Arc,
    task::{Context as TaskContext, Poll},
};

use futures_util::{FutureExt, future::BoxFuture};
use http::HeaderMap;
use tracing::{Instrument, Span, debug, error};
use uuid::Uuid;

use crate::{
    core::{
        convert::{RequestConverter, ResponseConverter},
        error::{HandlerError, HttpError},
        handler::{BoxedHandler, BoxedMiddleware, boxed, compose},
        request::{REQUEST_ID_CONTEXT_KEY, REQUEST_ID_HEADER, Request, RequestHead},
        response::Response,
        routing::{RouteMatch, Router},
    },
    ports::http_server::{TransportRequest, TransportResponse},
    tracing_setup::create_request_span,
    utils::inflight::InflightTracker,
};

/// Last-resort translation of an uncaught error into a response.
///
/// `request` is `None` when the failure happened before the request could be
/// converted (e.g. an unsupported method or an unreadable body).
pub trait ErrorHandler: Send + Sync + 'static {
    fn handle(&self, error: &HandlerError, request: Option<&RequestHead>) -> Response;
}

impl<F> ErrorHandler for F
where
    F: Fn(&HandlerError, Option<&RequestHead>) -> Response + Send + Sync + 'static,
{
    fn handle(&self, error: &HandlerError, request: Option<&RequestHead>) -> Response {
        self(error, request)
    }
}

/// Structured errors keep their status and message; anything else is logged
/// and answered with a bare 500.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultErrorHandler;

impl ErrorHandler for DefaultErrorHandler {
    fn handle(&self, error: &HandlerError, request: Option<&RequestHead>) -> Response {
        if let Some(http_error) = error.as_http() {
            return Response::text(http_error.status(), http_error.message());
        }

        match request {
            Some(head) => error!(
                method = %head.method,
                path = %head.path,
                error = ?error,
                "Unhandled error while processing request"
            ),
            None => error!(error = ?error, "Unhandled error while processing request"),
        }
        Response::internal_server_error("Internal Server Error")
    }
}

struct DispatcherInner {
    router: Router,
    middlewares: Vec<BoxedMiddleware>,
    error_handler: Arc<dyn ErrorHandler>,
    not_found: BoxedHandler,
    inflight: InflightTracker,
}

/// Immutable, cheaply clonable request pipeline.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

impl Dispatcher {
    pub fn new(
        router: Router,
        middlewares: Vec<BoxedMiddleware>,
        error_handler: Arc<dyn ErrorHandler>,
    ) -> Self {
        Self {
            inner: Arc::new(DispatcherInner {
                router,
                middlewares,
                error_handler,
                not_found: boxed(route_not_found),
                inflight: InflightTracker::new(),
            }),
        }
    }

    pub fn router(&self) -> &Router {
        &self.inner.router
    }

    pub fn inflight(&self) -> &InflightTracker {
        &self.inner.inflight
    }

    /// Run one converted request through routing, middleware and the handler.
    pub async fn handle(&self, request: Request) -> Response {
        let head = request.head();

        let (request, terminal) = match self.inner.router.match_request(&request) {
            Some(RouteMatch {
                path_params,
                handler,
            }) => (request.with_path_params(path_params), handler),
            None => (request, Arc::clone(&self.inner.not_found)),
        };
        let chain = compose(&self.inner.middlewares, terminal);

        let outcome = AssertUnwindSafe(async move { chain.call(request).await })
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| Err(HandlerError::Panic(panic_message(payload))));

        match outcome {
            Ok(response) => response,
            Err(error) => self.inner.error_handler.handle(&error, Some(&head)),
        }
    }

    /// Full transport-to-transport pipeline.
    ///
    /// The request id logged on the `request` span is also stored in the
    /// request context, so middleware such as `RequestId` echo the same id.
    pub async fn dispatch(&self, request: TransportRequest) -> TransportResponse {
        let request_id = request_id_for(request.headers());
        let span = create_request_span(request.method().as_str(), request.uri().path(), &request_id);

        self.traced(span, async move {
            match RequestConverter::convert(request) {
                Ok(request) => {
                    request
                        .context()
                        .insert(REQUEST_ID_CONTEXT_KEY, request_id);
                    self.handle(request).await
                }
                Err(error) => self.reject(error),
            }
        })
        .await
    }

    /// Answer a transport request whose body could not be read, with the
    /// same in-flight accounting and `request` span as [`Dispatcher::dispatch`].
    pub async fn dispatch_rejected(
        &self,
        parts: &http::request::Parts,
        error: HttpError,
    ) -> TransportResponse {
        let request_id = request_id_for(&parts.headers);
        let span = create_request_span(parts.method.as_str(), parts.uri.path(), &request_id);

        self.traced(span, async move { self.reject(error) }).await
    }

    async fn traced(
        &self,
        span: Span,
        respond: impl Future<Output = Response>,
    ) -> TransportResponse {
        let guard = self.inner.inflight.begin();

        let response = async {
            let response = respond.await;

            let span = Span::current();
            span.record("http.status_code", response.status().code());
            span.record("duration_ms", guard.elapsed().as_millis() as u64);
            debug!(status = response.status().code(), "Request completed");

            ResponseConverter::convert(response)
        }
        .instrument(span)
        .await;

        guard.finish();
        response
    }

    /// Answer a request that failed before reaching the pipeline.
    pub fn reject(&self, error: HttpError) -> Response {
        self.inner
            .error_handler
            .handle(&HandlerError::Http(error), None)
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("routes", &self.inner.router.routes())
            .field("middlewares", &self.inner.middlewares.len())
            .finish_non_exhaustive()
    }
}

impl tower::Service<TransportRequest> for Dispatcher {
    type Response = TransportResponse;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<TransportResponse, Infallible>>;

    fn poll_ready(&mut self, _cx: &mut TaskContext<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: TransportRequest) -> Self::Future {
        let dispatcher = self.clone();
        Box::pin(async move { Ok(dispatcher.dispatch(request).await) })
    }
}

async fn route_not_found(request: Request) -> Result<Response, HandlerError> {
    Ok(Response::not_found(format!(
        "Route not found: {} {}",
        request.method(),
        request.path()
    )))
}

fn request_id_for(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
