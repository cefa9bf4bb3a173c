//! Handler and middleware abstractions.
//!
//! A [`Handler`] turns a [`Request`] into a [`Response`] (or a
//! [`HandlerError`]). A [`Middleware`] sits in front of a handler and decides
//! whether, and how, to call it through [`Next`]. [`compose`] nests a list of
//! middleware around a terminal handler so that the first middleware is the
//! outermost one.
use std::{fmt, future::Future, sync::Arc};

use futures_util::future::BoxFuture;

use crate::core::{error::HandlerError, request::Request, response::Response};

pub type HandlerResult = Result<Response, HandlerError>;
pub type HandlerFuture = BoxFuture<'static, HandlerResult>;

/// Request handler. Implemented for every `Fn(Request) -> impl Future<Output = HandlerResult>`.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, request: Request) -> HandlerFuture;
}

impl<F, Fut> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn call(&self, request: Request) -> HandlerFuture {
        Box::pin(self(request))
    }
}

pub type BoxedHandler = Arc<dyn Handler>;

/// Erase the concrete handler type.
pub fn boxed<H: Handler>(handler: H) -> BoxedHandler {
    Arc::new(handler)
}

/// Wrapper around the rest of a handler chain.
///
/// A middleware may call `next` once, several times, or not at all
/// (short-circuit), and may rewrite the request before and the result after.
pub trait Middleware: Send + Sync + 'static {
    fn handle(&self, request: Request, next: Next) -> HandlerFuture;
}

pub type BoxedMiddleware = Arc<dyn Middleware>;

/// The downstream part of the chain, as seen by a middleware.
#[derive(Clone)]
pub struct Next {
    handler: BoxedHandler,
}

impl Next {
    pub fn new(handler: BoxedHandler) -> Self {
        Self { handler }
    }

    /// Invoke the downstream chain.
    pub fn run(&self, request: Request) -> HandlerFuture {
        self.handler.call(request)
    }
}

impl fmt::Debug for Next {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next").finish_non_exhaustive()
    }
}

/// A middleware bound to its downstream handler.
struct Wrapped {
    middleware: BoxedMiddleware,
    next: Next,
}

impl Handler for Wrapped {
    fn call(&self, request: Request) -> HandlerFuture {
        self.middleware.handle(request, self.next.clone())
    }
}

/// Nest `middlewares` around `terminal`: `[m1, m2]` becomes `m1(m2(terminal))`.
///
/// An empty list returns `terminal` itself.
pub fn compose(middlewares: &[BoxedMiddleware], terminal: BoxedHandler) -> BoxedHandler {
    middlewares.iter().rev().fold(terminal, |next, middleware| {
        Arc::new(Wrapped {
            middleware: Arc::clone(middleware),
            next: Next::new(next),
        })
    })
}

/// Middleware built from an async closure taking the request and [`Next`].
pub struct FromFn<F> {
    f: F,
}

/// Build a middleware from `|request, next| async move { ... }`.
pub fn from_fn<F, Fut>(f: F) -> FromFn<F>
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    FromFn { f }
}

impl<F, Fut> Middleware for FromFn<F>
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn handle(&self, request: Request, next: Next) -> HandlerFuture {
        Box::pin((self.f)(request, next))
    }
}

impl<F> fmt::Debug for FromFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FromFn").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::core::{body::Body, error::HttpError, method::HttpMethod, status::HttpStatus};

    type Trace = Arc<Mutex<Vec<String>>>;

    fn tracing_middleware(label: &'static str, trace: Trace) -> BoxedMiddleware {
        Arc::new(from_fn(move |request, next: Next| {
            let trace = Arc::clone(&trace);
            async move {
                trace.lock().unwrap().push(format!("{label}-pre"));
                let result = next.run(request).await;
                trace.lock().unwrap().push(format!("{label}-post"));
                result
            }
        }))
    }

    fn recording_handler(trace: Trace) -> BoxedHandler {
        boxed(move |_request: Request| {
            let trace = Arc::clone(&trace);
            async move {
                trace.lock().unwrap().push("H".to_string());
                Ok::<_, HandlerError>(Response::ok("done"))
            }
        })
    }

    fn request() -> Request {
        Request::new(HttpMethod::Get, "/")
    }

    #[tokio::test]
    async fn test_compose_empty_returns_terminal() {
        let trace = Trace::default();
        let terminal = recording_handler(Arc::clone(&trace));
        let composed = compose(&[], Arc::clone(&terminal));

        assert!(Arc::ptr_eq(&composed, &terminal));
        let response = composed.call(request()).await.unwrap();
        assert_eq!(response.body(), &Body::Text("done".to_string()));
        assert_eq!(*trace.lock().unwrap(), ["H"]);
    }

    #[tokio::test]
    async fn test_compose_nests_first_middleware_outermost() {
        let trace = Trace::default();
        let middlewares = vec![
            tracing_middleware("M1", Arc::clone(&trace)),
            tracing_middleware("M2", Arc::clone(&trace)),
            tracing_middleware("M3", Arc::clone(&trace)),
        ];
        let composed = compose(&middlewares, recording_handler(Arc::clone(&trace)));

        composed.call(request()).await.unwrap();
        assert_eq!(
            *trace.lock().unwrap(),
            ["M1-pre", "M2-pre", "M3-pre", "H", "M3-post", "M2-post", "M1-post"]
        );
    }

    #[tokio::test]
    async fn test_middleware_can_short_circuit() {
        let trace = Trace::default();
        let deny: BoxedMiddleware = Arc::new(from_fn(|_request, _next: Next| async {
            Ok::<_, HandlerError>(Response::forbidden("denied"))
        }));
        let composed = compose(&[deny], recording_handler(Arc::clone(&trace)));

        let response = composed.call(request()).await.unwrap();
        assert_eq!(response.status(), HttpStatus::Forbidden);
        assert!(trace.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_middleware_can_translate_errors() {
        let recover: BoxedMiddleware = Arc::new(from_fn(|request, next: Next| async move {
            match next.run(request).await {
                Err(HandlerError::Http(error)) => {
                    Ok(Response::text(error.status(), format!("caught: {}", error.message())))
                }
                other => other,
            }
        }));
        let failing = boxed(|_request: Request| async {
            Err::<Response, _>(HandlerError::from(HttpError::bad_request("bad")))
        });

        let response = compose(&[recover], failing).call(request()).await.unwrap();
        assert_eq!(response.status(), HttpStatus::BadRequest);
        assert_eq!(response.body(), &Body::Text("caught: bad".to_string()));
    }

    #[tokio::test]
    async fn test_middleware_shares_context_with_handler() {
        let auth: BoxedMiddleware = Arc::new(from_fn(|request: Request, next: Next| async move {
            request.context().insert("user", "alice".to_string());
            next.run(request).await
        }));
        let handler = boxed(|request: Request| async move {
            let user = request.context().get::<String>("user").unwrap_or_default();
            Ok::<_, HandlerError>(Response::ok(format!("hello {user}")))
        });

        let response = compose(&[auth], handler).call(request()).await.unwrap();
        assert_eq!(response.body(), &Body::Text("hello alice".to_string()));
    }

    #[tokio::test]
    async fn test_middleware_can_transform_response() {
        let tag: BoxedMiddleware = Arc::new(from_fn(|request, next: Next| async move {
            let response = next.run(request).await?;
            Ok::<_, HandlerError>(response.with_header("X-Tagged", "yes"))
        }));
        let handler =
            boxed(|_request: Request| async { Ok::<_, HandlerError>(Response::ok("plain")) });

        let response = compose(&[tag], handler).call(request()).await.unwrap();
        assert_eq!(response.header("x-tagged"), Some("yes"));
    }
}
