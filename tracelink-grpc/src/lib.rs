//! gRPC bindings for tracelink.
//!
//! Metadata keys are `x-trace-id`, `x-span-id`, `x-request-id`, `traceparent`
//! and `tracestate`.
//!
//! # Example
//!
//! ```ignore
//! use tracelink_grpc::{ClientTraceInterceptor, ServerTraceInterceptor, TraceRecordExt};
//!
//! async fn say_hello(&self, request: Request<HelloRequest>) -> Result<Response<HelloReply>, Status> {
//!     let record = request.trace_record();
//!     tracelink_core::store::scope(record, async {
//!         // Downstream clients built with `ClientTraceInterceptor::new()`
//!         // forward the record automatically.
//!         self.downstream.clone().call(request.into_inner()).await
//!     })
//!     .await
//! }
//! ```

pub mod interceptor;
pub mod metadata;

pub use interceptor::{ClientTraceInterceptor, ServerTraceInterceptor, TraceRecordExt};
pub use metadata::{
    extract_metadata, inject_metadata, outbound_metadata, MetadataExtractor, MetadataInjector,
};

// Re-export tonic for downstream crates wiring interceptors.
pub use tonic;
