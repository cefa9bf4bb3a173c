//! Petal - a minimal HTTP application framework.
//!
//! Petal maps inbound HTTP requests to application handlers through a **path-pattern
//! router**, runs them inside a chain of **composable middleware**, and translates every
//! outcome (success, structured error, internal failure, panic) into exactly one response.
//! The crate follows a **hexagonal architecture**: the request model, router, middleware
//! composer and dispatch pipeline live in `core`; the transport is a port with a hyper
//! adapter.
//!
//! # Features
//! - Route patterns with named placeholders (`/users/{id}`, `/files/{name}.{ext}`)
//! - First-registered-wins matching with per-method filtering
//! - Onion-style middleware built from traits or closures (`from_fn`)
//! - Typed path/query accessors and a per-request context store
//! - Structured HTTP errors and a last-resort error handler that never leaks internals
//! - Built-in middleware: CORS, request ids, request logging, security headers
//! - HTTP/1.1 server on tokio + hyper with graceful shutdown and in-flight draining
//! - Structured tracing via `tracing`, layered configuration via `config`
//!
//! # Quick Example
//! ```no_run
//! use petal::{App, HandlerError, HttpError, Request, Response, config::ServerConfig};
//!
//! # #[tokio::main] async fn main() -> eyre::Result<()> {
//! let app = App::new().get("/users/{id}", |req: Request| async move {
//!     let id = req
//!         .path_params()
//!         .int("id")
//!         .ok_or_else(|| HttpError::bad_request("id must be an integer"))?;
//!     Ok::<_, HandlerError>(Response::ok(format!("user {id}")))
//! })?;
//!
//! app.serve(&ServerConfig::default()).await?;
//! # Ok(()) }
//! ```
//!
//! # Architecture
//! The crate separates **ports** (traits) from **adapters** (implementations) while keeping
//! the framework logic inside `core`. End users should prefer the re-exports documented
//! below instead of reaching into internal modules directly.
//!
//! # Error Handling
//! Handlers return `Result<Response, HandlerError>`. Deliberate failures are `HttpError`s and
//! reach the client as-is; anything else becomes a generic `500 Internal Server Error`.
//! Application-level APIs return `eyre::Result<T>` with context attached using `WrapErr`.
//!
//! # Stability
//! This crate is early stage; APIs may evolve. Semantic versioning will be followed after 1.0.
// Re-export public modules with explicit visibility controls
pub mod app;
pub mod config;
pub mod ports;
pub mod tracing_setup;
pub mod utils;

pub mod adapters;
pub mod core;

pub use crate::{
    app::App,
    core::{
        Body, Context, DefaultErrorHandler, Dispatcher, ErrorHandler, Handler, HandlerError,
        HandlerResult, HttpError, HttpMethod, HttpStatus, Middleware, Next, PathParams,
        PatternError, QueryParams, Request, Response, Router, compose, from_fn,
    },
    utils::{GracefulShutdown, InflightTracker},
};
