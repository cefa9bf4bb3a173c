pub mod hyper_server;
pub mod middleware;

/// Re-export commonly used types from adapters
pub use hyper_server::{HyperServer, serve};
pub use middleware::{
    Cors, CustomHeaders, LoggingConfig, Recover, RequestId, RequestLogger, SecurityHeaders,
    from_settings,
};
