pub mod graceful_shutdown;
pub mod inflight;

pub use graceful_shutdown::{GracefulShutdown, ShutdownReason};
pub use inflight::{InflightGuard, InflightStats, InflightTracker};
