//! Application builder.
//!
//! Routes and global middleware are registered on an [`App`] at startup.
//! [`App::into_dispatcher`] freezes them into an immutable [`Dispatcher`];
//! nothing can be added once requests are being served.
use std::sync::Arc;

use eyre::Result;

use crate::{
    adapters::hyper_server,
    config::models::ServerConfig,
    core::{
        dispatch::{DefaultErrorHandler, Dispatcher, ErrorHandler},
        error::PatternError,
        handler::{BoxedMiddleware, Handler, Middleware},
        method::HttpMethod,
        routing::Router,
    },
};

pub struct App {
    router: Router,
    middlewares: Vec<BoxedMiddleware>,
    error_handler: Arc<dyn ErrorHandler>,
}

impl App {
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            middlewares: Vec::new(),
            error_handler: Arc::new(DefaultErrorHandler),
        }
    }

    /// Register `handler` for `method` requests matching `pattern`.
    ///
    /// Routes are tried in registration order; the first match wins.
    pub fn route<H: Handler>(
        mut self,
        method: HttpMethod,
        pattern: &str,
        handler: H,
    ) -> Result<Self, PatternError> {
        self.router.add_route(method, pattern, handler)?;
        Ok(self)
    }

    pub fn get<H: Handler>(self, pattern: &str, handler: H) -> Result<Self, PatternError> {
        self.route(HttpMethod::Get, pattern, handler)
    }

    pub fn post<H: Handler>(self, pattern: &str, handler: H) -> Result<Self, PatternError> {
        self.route(HttpMethod::Post, pattern, handler)
    }

    pub fn put<H: Handler>(self, pattern: &str, handler: H) -> Result<Self, PatternError> {
        self.route(HttpMethod::Put, pattern, handler)
    }

    pub fn delete<H: Handler>(self, pattern: &str, handler: H) -> Result<Self, PatternError> {
        self.route(HttpMethod::Delete, pattern, handler)
    }

    pub fn patch<H: Handler>(self, pattern: &str, handler: H) -> Result<Self, PatternError> {
        self.route(HttpMethod::Patch, pattern, handler)
    }

    pub fn head<H: Handler>(self, pattern: &str, handler: H) -> Result<Self, PatternError> {
        self.route(HttpMethod::Head, pattern, handler)
    }

    pub fn options<H: Handler>(self, pattern: &str, handler: H) -> Result<Self, PatternError> {
        self.route(HttpMethod::Options, pattern, handler)
    }

    /// Append a global middleware. The first one registered is the outermost.
    pub fn use_middleware<M: Middleware>(mut self, middleware: M) -> Self {
        self.middlewares.push(Arc::new(middleware));
        self
    }

    /// Append several already boxed middleware, in order.
    pub fn use_middlewares(mut self, middlewares: impl IntoIterator<Item = BoxedMiddleware>) -> Self {
        self.middlewares.extend(middlewares);
        self
    }

    /// Replace the last-resort error handler.
    pub fn error_handler<E: ErrorHandler>(mut self, handler: E) -> Self {
        self.error_handler = Arc::new(handler);
        self
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Freeze routes and middleware into a dispatcher.
    pub fn into_dispatcher(self) -> Dispatcher {
        Dispatcher::new(self.router, self.middlewares, self.error_handler)
    }

    /// Serve the application with the hyper transport until Ctrl-C/SIGTERM.
    pub async fn serve(self, config: &ServerConfig) -> Result<()> {
        hyper_server::serve(self.into_dispatcher(), config).await
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("routes", &self.router.routes())
            .field("middlewares", &self.middlewares.len())
            .finish_non_exhaustive()
    }
}
