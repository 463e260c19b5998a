use std::convert::Infallible;

use axum::extract::FromRequestParts;
use http::request::Parts;
use tracelink_core::store::record_from_extensions;
use tracelink_core::TraceRecord;

/// Axum extractor for the trace identity resolved by
/// [`TracePropagationLayer`](crate::TracePropagationLayer).
///
/// Never rejects: without the layer the record is empty.
///
/// ```rust,ignore
/// async fn handler(Trace(record): Trace) -> String {
///     record.request_id().to_string()
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trace(pub TraceRecord);

impl<S: Send + Sync> FromRequestParts<S> for Trace {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Trace(
            record_from_extensions(&parts.extensions)
                .cloned()
                .unwrap_or_default(),
        ))
    }
}
