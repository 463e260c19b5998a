use tracelink_core::store::{self, record_from_extensions};
use tracelink_core::{ContextStore, Field, StoreError, TraceRecord};

fn sample() -> TraceRecord {
    TraceRecord::new()
        .with_trace_id("0af7651916cd43dd8448eb211c80319c")
        .with_request_id("req-7")
}

#[test]
fn record_store_treats_empty_as_absent() {
    let record = sample();
    assert_eq!(record.get(Field::RequestId), Some("req-7"));
    assert_eq!(record.get(Field::SpanId), None);
}

#[test]
fn record_set_returns_new_value() {
    let before = sample();
    let after = before.clone().set(Field::SpanId, "b7ad6b7169203331".into()).unwrap();
    assert_eq!(before.span_id(), "");
    assert_eq!(after.span_id(), "b7ad6b7169203331");
}

#[test]
fn extensions_store_round_trip() {
    let extensions = http::Extensions::new();
    assert!(record_from_extensions(&extensions).is_none());

    let extensions = ContextStore::set(extensions, Field::RequestId, "req-9".into()).unwrap();
    assert_eq!(ContextStore::get(&extensions, Field::RequestId), Some("req-9"));
    assert_eq!(record_from_extensions(&extensions).unwrap().request_id(), "req-9");
}

#[test]
fn empty_record_is_empty() {
    assert!(TraceRecord::new().is_empty());
    assert!(!TraceRecord::new().with_tracestate_raw("a=b").is_empty());
}

#[test]
fn current_outside_scope_is_an_error() {
    assert_eq!(store::current(), Err(StoreError::OutOfScope));
    assert!(store::try_current().is_none());
}

#[tokio::test]
async fn scope_exposes_record() {
    let seen = store::scope(sample(), async { store::current() }).await;
    assert_eq!(seen, Ok(sample()));
}

#[tokio::test]
async fn scopes_are_isolated_per_task() {
    let a = tokio::spawn(store::scope(sample(), async {
        tokio::task::yield_now().await;
        store::current().unwrap().request_id().to_string()
    }));
    let b = tokio::spawn(store::scope(sample().with_request_id("other"), async {
        tokio::task::yield_now().await;
        store::current().unwrap().request_id().to_string()
    }));
    assert_eq!(a.await.unwrap(), "req-7");
    assert_eq!(b.await.unwrap(), "other");
}

#[test]
fn sync_scope_exposes_record() {
    let id = store::sync_scope(sample(), || store::current().unwrap().trace_id().to_string());
    assert_eq!(id, "0af7651916cd43dd8448eb211c80319c");
}
