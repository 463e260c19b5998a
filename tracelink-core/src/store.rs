//! Per-request context stores.
//!
//! A store holds the resolved [`TraceRecord`] of exactly one request. Two
//! shapes are provided:
//!
//! - value stores implementing [`ContextStore`] (`TraceRecord` itself and
//!   `http::Extensions`), used while a request is being admitted;
//! - a task-local scope ([`scope`] / [`current`]) that lets code deep in a
//!   handler read the record back when making outbound calls.

use std::convert::Infallible;
use std::future::Future;

pub use tokio::task::futures::TaskLocalFuture;

use crate::error::StoreError;
use crate::record::{Field, TraceRecord};

/// Keyed access to the trace fields of one request.
///
/// `set` consumes the store and hands back the updated one. Stores that can
/// lose their backing (a detached handle, a closed scope) report it through
/// `Error`; the in-memory stores below cannot fail.
pub trait ContextStore: Sized {
    type Error: std::error::Error + Send + Sync + 'static;

    /// The value of `field`, or `None` when absent or empty.
    fn get(&self, field: Field) -> Option<&str>;

    fn set(self, field: Field, value: String) -> Result<Self, Self::Error>;
}

impl ContextStore for TraceRecord {
    type Error = Infallible;

    fn get(&self, field: Field) -> Option<&str> {
        Some(self.field(field)).filter(|v| !v.is_empty())
    }

    fn set(self, field: Field, value: String) -> Result<Self, Self::Error> {
        Ok(self.with_field(field, value))
    }
}

impl ContextStore for http::Extensions {
    type Error = Infallible;

    fn get(&self, field: Field) -> Option<&str> {
        record_from_extensions(self).and_then(|r| ContextStore::get(r, field))
    }

    fn set(mut self, field: Field, value: String) -> Result<Self, Self::Error> {
        let record = self
            .remove::<TraceRecord>()
            .unwrap_or_default()
            .with_field(field, value);
        self.insert(record);
        Ok(self)
    }
}

/// The record stored in `extensions`, if any.
pub fn record_from_extensions(extensions: &http::Extensions) -> Option<&TraceRecord> {
    extensions.get::<TraceRecord>()
}

tokio::task_local! {
    static CURRENT: TraceRecord;
}

/// Run `future` with `record` as the current request's trace context.
pub fn scope<F: Future>(record: TraceRecord, future: F) -> TaskLocalFuture<TraceRecord, F> {
    CURRENT.scope(record, future)
}

/// Synchronous counterpart of [`scope`].
pub fn sync_scope<R>(record: TraceRecord, f: impl FnOnce() -> R) -> R {
    CURRENT.sync_scope(record, f)
}

/// The record of the enclosing request scope.
///
/// # Errors
///
/// [`StoreError::OutOfScope`] when called outside [`scope`]/[`sync_scope`].
pub fn current() -> Result<TraceRecord, StoreError> {
    CURRENT
        .try_with(TraceRecord::clone)
        .map_err(|_| StoreError::OutOfScope)
}

/// Like [`current`], but absence is not an error.
pub fn try_current() -> Option<TraceRecord> {
    current().ok()
}
