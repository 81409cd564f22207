//! Tower middleware layers for the punch transport.
//!
//! Layers wrap [`HyperClient`](crate::HyperClient)'s inner service and see
//! every [`Request`](crate::Request) before it is sent. Nothing is installed
//! by default.
//!
//! # Available Layers
//!
//! - [`LoggingLayer`] - Logs requests and response heads using `tracing`
//!
//! Any other `tower::Layer` whose service maps `Request` to `RawResponse`
//! can be added with [`HyperClientBuilder::layer`](crate::HyperClientBuilder::layer).

mod logging;

pub use logging::{LogLevel, Logging, LoggingLayer};

// Re-export tower types for convenience
pub use tower::Layer;
