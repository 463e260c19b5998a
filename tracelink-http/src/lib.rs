//! HTTP bindings for tracelink.
//!
//! - [`TracePropagationLayer`]: inbound tower middleware resolving the trace
//!   identity of each request.
//! - [`PropagateTraceLayer`]: outbound tower middleware for HTTP clients.
//! - [`Trace`]: axum extractor for the resolved record.
//! - [`extract_headers`] / [`inject_headers`] / [`outbound_headers`]: the
//!   raw header conversions.
//!
//! # Usage
//!
//! ```rust,ignore
//! use tracelink_core::PropagationConfig;
//! use tracelink_http::{Trace, TracePropagationLayer};
//!
//! let config = PropagationConfig::load("application.yaml")?;
//! let app = Router::new()
//!     .route("/", get(|Trace(record): Trace| async move { record.request_id().to_string() }))
//!     .layer(TracePropagationLayer::from_config(&config));
//! ```
//!
//! Header names are `X-Trace-ID`, `X-Span-ID`, `X-Request-ID`, `traceparent`
//! and `tracestate`.

pub mod carrier;
pub mod extract;
pub mod layer;
pub mod outbound;

pub use carrier::{extract_headers, inject_headers, outbound_headers, HeaderExtractor, HeaderInjector};
pub use extract::Trace;
pub use layer::{TracePropagationFuture, TracePropagationLayer, TracePropagationService};
pub use outbound::{PropagateTraceLayer, PropagateTraceService};
