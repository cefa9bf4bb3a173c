use bytes::Bytes;
use eyre::Result;

/// Inbound message as delivered by a transport, with the body fully buffered.
pub type TransportRequest = http::Request<Bytes>;

/// Outbound message handed back to the transport.
pub type TransportResponse = http::Response<Bytes>;

/// HttpServer defines the port (interface) for serving a dispatcher over a transport
pub trait HttpServer: Send + Sync + 'static {
    /// Run the HTTP server
    ///
    /// # Returns
    /// A future that resolves when the server shuts down or encounters an error
    fn run(&self) -> impl std::future::Future<Output = Result<()>> + Send;
}
