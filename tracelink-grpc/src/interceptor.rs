use std::sync::Arc;

use tonic::service::Interceptor;
use tonic::{Request, Status};
use tracelink_core::{store, FieldPolicy, PropagationConfig, TraceRecord};

use crate::metadata::{extract_metadata, inject_metadata};

/// Server interceptor resolving the trace identity of each inbound call.
///
/// The resolved [`TraceRecord`] is stored in the request extensions; read it
/// back with [`TraceRecordExt::trace_record`]. Malformed trace metadata never
/// fails the call.
///
/// ```rust,ignore
/// let policy = PropagationConfig::load("application.yaml")?.policy();
/// Server::builder()
///     .add_service(GreeterServer::with_interceptor(svc, ServerTraceInterceptor::new(policy)))
/// ```
#[derive(Clone)]
pub struct ServerTraceInterceptor {
    policy: Arc<FieldPolicy>,
}

impl ServerTraceInterceptor {
    pub fn new(policy: Arc<FieldPolicy>) -> Self {
        Self { policy }
    }

    pub fn from_config(config: &PropagationConfig) -> Self {
        Self::new(config.policy())
    }
}

impl Interceptor for ServerTraceInterceptor {
    fn call(&mut self, mut request: Request<()>) -> Result<Request<()>, Status> {
        let raw = extract_metadata(Some(request.metadata()));
        let (record, report) = self.policy.resolve(&raw);
        tracing::debug!(
            target: "tracelink::grpc",
            trace_id = %record.trace_id(),
            span_id = %record.span_id(),
            request_id = %record.request_id(),
            ?report,
            "resolved inbound trace context"
        );
        request.extensions_mut().insert(record);
        Ok(request)
    }
}

/// Client interceptor forwarding trace identity on every outgoing call.
///
/// By default the record comes from the enclosing
/// [`store::scope`](tracelink_core::store::scope); calls made outside a scope
/// go out untouched. [`with_record`](Self::with_record) pins a fixed record
/// instead.
#[derive(Clone, Default)]
pub struct ClientTraceInterceptor {
    record: Option<TraceRecord>,
}

impl ClientTraceInterceptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: TraceRecord) -> Self {
        Self {
            record: Some(record),
        }
    }
}

impl Interceptor for ClientTraceInterceptor {
    fn call(&mut self, mut request: Request<()>) -> Result<Request<()>, Status> {
        let record = match &self.record {
            Some(record) => Some(record.clone()),
            None => store::try_current(),
        };
        match record {
            Some(record) if !record.is_empty() => {
                let injected = inject_metadata(&record, request.metadata_mut());
                tracing::trace!(target: "tracelink::grpc", ?injected, "propagated trace metadata");
            }
            _ => {}
        }
        Ok(request)
    }
}

/// Access to the record stored by [`ServerTraceInterceptor`].
pub trait TraceRecordExt {
    /// The resolved record, or the empty record when the interceptor did not
    /// run.
    fn trace_record(&self) -> TraceRecord;
}

impl<T> TraceRecordExt for Request<T> {
    fn trace_record(&self) -> TraceRecord {
        self.extensions()
            .get::<TraceRecord>()
            .cloned()
            .unwrap_or_default()
    }
}
