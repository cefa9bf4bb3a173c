//! HTTP/1.1 transport built on tokio + hyper.
//!
//! Each accepted connection is served on its own task. Request bodies are
//! buffered up to `max_body_bytes` before dispatch. Unless `keep_alive` is
//! enabled the connection is closed after every response.
use std::{convert::Infallible, net::SocketAddr, time::Duration};

use bytes::Bytes;
use eyre::{Result, WrapErr};
use http::{HeaderValue, header::CONNECTION};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::{body::Incoming, server::conn::http1, service::service_fn};
use hyper_util::{rt::TokioIo, server::graceful::GracefulShutdown as ConnectionWatcher};
use tokio::net::{TcpListener, TcpStream};
use tracing::Instrument;

use crate::{
    config::models::ServerConfig,
    core::{dispatch::Dispatcher, error::HttpError, status::HttpStatus},
    ports::http_server::{HttpServer, TransportResponse},
    tracing_setup::configure_component_tracing,
    utils::graceful_shutdown::GracefulShutdown,
};

#[derive(Debug, Clone, Copy)]
struct ConnectionSettings {
    keep_alive: bool,
    max_body_bytes: usize,
}

/// Serves a [`Dispatcher`] over plain TCP.
#[derive(Debug, Clone)]
pub struct HyperServer {
    dispatcher: Dispatcher,
    listen_addr: String,
    settings: ConnectionSettings,
    shutdown: GracefulShutdown,
}

impl HyperServer {
    pub fn new(dispatcher: Dispatcher, config: &ServerConfig) -> Result<Self> {
        let shutdown_timeout = config.shutdown_timeout_duration().wrap_err_with(|| {
            format!("Invalid shutdown_timeout '{}'", config.shutdown_timeout)
        })?;

        Ok(Self {
            dispatcher,
            listen_addr: config.listen_addr.clone(),
            settings: ConnectionSettings {
                keep_alive: config.keep_alive,
                max_body_bytes: config.max_body_bytes,
            },
            shutdown: GracefulShutdown::with_timeout(shutdown_timeout),
        })
    }

    /// Handle used to stop the server programmatically.
    pub fn shutdown_handle(&self) -> GracefulShutdown {
        self.shutdown.clone()
    }

    /// Accept connections from `listener` until shutdown is triggered.
    ///
    /// On shutdown the listener is closed and every open connection is told to
    /// finish its current request and close; idle keep-alive connections close
    /// immediately. Returns once all connections are gone or the shutdown
    /// timeout has elapsed.
    pub async fn serve_with_listener(&self, listener: TcpListener) -> Result<()> {
        let local_addr = listener
            .local_addr()
            .wrap_err("Failed to get local addr")?;
        let mut shutdown_rx = self.shutdown.subscribe();
        let connections = ConnectionWatcher::new();

        tracing::info!(
            address = %local_addr,
            routes = self.dispatcher.router().len(),
            keep_alive = self.settings.keep_alive,
            "Petal server listening"
        );

        if !self.shutdown.is_shutdown_initiated() {
            loop {
                tokio::select! {
                    accepted = listener.accept() => match accepted {
                        Ok((stream, remote_addr)) => {
                            self.spawn_connection(&connections, stream, remote_addr)
                        }
                        Err(e) => {
                            tracing::warn!("Accept error: {}", e);
                            tokio::time::sleep(Duration::from_millis(50)).await;
                        }
                    },
                    reason = shutdown_rx.recv() => {
                        tracing::info!("Shutdown signal received: {:?}", reason);
                        break;
                    }
                }
            }
        }

        drop(listener);
        let timeout = self.shutdown.shutdown_timeout();
        let deadline = tokio::time::Instant::now() + timeout;

        let connections_closed = tokio::time::timeout(timeout, connections.shutdown())
            .await
            .is_ok();
        if !connections_closed {
            tracing::warn!(?timeout, "Connections still open after shutdown timeout");
        }

        let drained = self
            .dispatcher
            .inflight()
            .wait_for_drain(deadline.saturating_duration_since(tokio::time::Instant::now()))
            .await;
        let stats = self.dispatcher.inflight().stats();
        tracing::info!(
            drained,
            connections_closed,
            completed = stats.completed,
            cancelled = stats.cancelled,
            "Petal server stopped"
        );
        Ok(())
    }

    fn spawn_connection(
        &self,
        connections: &ConnectionWatcher,
        stream: TcpStream,
        remote_addr: SocketAddr,
    ) {
        let dispatcher = self.dispatcher.clone();
        let settings = self.settings;
        let span = configure_component_tracing("connection");

        let service = service_fn(move |request: hyper::Request<Incoming>| {
            let dispatcher = dispatcher.clone();
            async move { Ok::<_, Infallible>(serve_request(&dispatcher, request, settings).await) }
        });
        let connection = http1::Builder::new()
            .keep_alive(settings.keep_alive)
            .serve_connection(TokioIo::new(stream), service);
        let connection = connections.watch(connection);

        tokio::spawn(
            async move {
                tracing::debug!(remote_addr = %remote_addr, "Connection accepted");
                if let Err(e) = connection.await {
                    tracing::debug!(remote_addr = %remote_addr, "Connection error: {}", e);
                }
            }
            .instrument(span),
        );
    }
}

impl HttpServer for HyperServer {
    fn run(&self) -> impl std::future::Future<Output = Result<()>> + Send {
        async move {
            let listener = TcpListener::bind(&self.listen_addr)
                .await
                .wrap_err_with(|| format!("Failed to bind to address {}", self.listen_addr))?;

            let signals = self.shutdown.clone();
            let signal_task = tokio::spawn(async move { signals.run_signal_handler().await });

            let result = self.serve_with_listener(listener).await;
            signal_task.abort();
            result
        }
    }
}

async fn serve_request(
    dispatcher: &Dispatcher,
    request: hyper::Request<Incoming>,
    settings: ConnectionSettings,
) -> hyper::Response<Full<Bytes>> {
    let (parts, body) = request.into_parts();

    let response = match Limited::new(body, settings.max_body_bytes).collect().await {
        Ok(collected) => {
            let request = http::Request::from_parts(parts, collected.to_bytes());
            dispatcher.dispatch(request).await
        }
        Err(e) => {
            let error = if e.downcast_ref::<LengthLimitError>().is_some() {
                HttpError::new(
                    HttpStatus::PayloadTooLarge,
                    format!(
                        "Request body exceeds the {} byte limit",
                        settings.max_body_bytes
                    ),
                )
            } else {
                tracing::debug!("Failed to read request body: {}", e);
                HttpError::bad_request("Failed to read request body")
            };
            dispatcher.dispatch_rejected(&parts, error).await
        }
    };

    into_hyper_response(response, settings.keep_alive)
}

fn into_hyper_response(
    response: TransportResponse,
    keep_alive: bool,
) -> hyper::Response<Full<Bytes>> {
    let (mut parts, body) = response.into_parts();
    if !keep_alive {
        parts
            .headers
            .insert(CONNECTION, HeaderValue::from_static("close"));
    }
    hyper::Response::from_parts(parts, Full::new(body))
}

/// Run `dispatcher` on `config.listen_addr` until Ctrl-C/SIGTERM.
pub async fn serve(dispatcher: Dispatcher, config: &ServerConfig) -> Result<()> {
    let server = HyperServer::new(dispatcher, config)?;
    server.run().await
}
