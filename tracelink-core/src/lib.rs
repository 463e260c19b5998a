//! W3C Trace Context propagation core.
//!
//! Parses and regenerates `traceparent`, decides per field whether an inbound
//! identifier is accepted, discarded or generated, and moves the result in and
//! out of arbitrary key/value carriers. Transport bindings live in
//! `tracelink-http` and `tracelink-grpc`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::collections::HashMap;
//! use tracelink_core::{carrier, CarrierKeys, FieldPolicy};
//!
//! let policy = FieldPolicy::new(true);
//! let raw = carrier::extract(Some(&inbound), &CarrierKeys::HTTP);
//! let (record, _report) = policy.resolve(&raw);
//!
//! let mut outbound = HashMap::new();
//! carrier::inject(&record, &mut outbound, &CarrierKeys::HTTP);
//! ```
//!
//! Everything here is synchronous and free of shared mutable state.

pub mod carrier;
pub mod config;
pub mod error;
pub mod field;
pub mod id;
pub mod logging;
pub mod record;
pub mod store;
pub mod traceparent;
pub mod validate;

pub use carrier::{CarrierKeys, Extractor, Injected, Injector};
pub use config::PropagationConfig;
pub use error::{ConfigError, StoreError};
pub use field::{DiscardReason, FieldDescriptor, FieldKind, FieldOutcome, FieldPolicy, PolicyReport};
pub use logging::{init_tracing, LogFormat};
pub use record::{Field, TraceRecord};
pub use store::ContextStore;
pub use traceparent::Traceparent;
