use tracelink_core::validate::{is_valid_span_id, is_valid_trace_id};
use tracelink_core::{
    ContextStore, Field, FieldDescriptor, FieldKind, FieldOutcome, FieldPolicy, TraceRecord,
};

const TRACE_ID: &str = "0af7651916cd43dd8448eb211c80319c";
const SPAN_ID: &str = "b7ad6b7169203331";

#[test]
fn descriptor_accepts_valid_value() {
    let (store, outcome) = FieldDescriptor::TRACE_ID
        .apply(TraceRecord::new(), TRACE_ID, true)
        .unwrap();
    assert_eq!(outcome, FieldOutcome::Accepted);
    assert_eq!(store.trace_id(), TRACE_ID);
}

#[test]
fn descriptor_regenerates_invalid_value() {
    let (store, outcome) = FieldDescriptor::TRACE_ID
        .apply(TraceRecord::new(), "not-hex!!", true)
        .unwrap();
    assert_eq!(outcome, FieldOutcome::DiscardedAndGenerated);
    assert!(is_valid_trace_id(store.trace_id()));
    assert_ne!(store.trace_id(), "not-hex!!");
}

#[test]
fn descriptor_discards_invalid_value_without_generation() {
    let seeded = TraceRecord::new().with_span_id("nope");
    let (store, outcome) = FieldDescriptor::SPAN_ID.apply(seeded, "nope", false).unwrap();
    assert_eq!(outcome, FieldOutcome::Discarded);
    assert_eq!(store.span_id(), "");
}

#[test]
fn descriptor_absent_value() {
    let (store, outcome) = FieldDescriptor::SPAN_ID
        .apply(TraceRecord::new(), "", false)
        .unwrap();
    assert_eq!(outcome, FieldOutcome::Absent);
    assert!(store.is_empty());

    let (store, outcome) = FieldDescriptor::SPAN_ID
        .apply(TraceRecord::new(), "", true)
        .unwrap();
    assert_eq!(outcome, FieldOutcome::Generated);
    assert!(is_valid_span_id(store.span_id()));
}

#[test]
fn request_id_is_opaque() {
    let (store, outcome) = FieldDescriptor::REQUEST_ID
        .apply(TraceRecord::new(), "req-42/anything goes", false)
        .unwrap();
    assert_eq!(outcome, FieldOutcome::Accepted);
    assert_eq!(store.request_id(), "req-42/anything goes");
}

#[test]
fn policy_generates_everything_for_empty_input() {
    let (record, report) = FieldPolicy::new(true).resolve(&TraceRecord::new());
    assert!(is_valid_trace_id(record.trace_id()));
    assert!(is_valid_span_id(record.span_id()));
    assert!(is_valid_trace_id(record.request_id()));
    assert_eq!(record.trace_flags(), "");
    assert_eq!(report.trace_id, FieldOutcome::Generated);
    assert_eq!(report.trace_flags, FieldOutcome::Absent);
    assert!(!report.any_discarded());
}

#[test]
fn policy_without_generation_leaves_fields_empty() {
    let (record, report) = FieldPolicy::new(false).resolve(&TraceRecord::new());
    assert!(record.is_empty());
    assert_eq!(report.outcome(FieldKind::RequestId), FieldOutcome::Absent);
}

#[test]
fn policy_decides_fields_independently() {
    let raw = TraceRecord::new().with_span_id(SPAN_ID);
    let (record, report) = FieldPolicy::new(true).resolve(&raw);
    assert_eq!(record.span_id(), SPAN_ID);
    assert!(is_valid_trace_id(record.trace_id()));
    assert_eq!(report.span_id, FieldOutcome::Accepted);
    assert_eq!(report.trace_id, FieldOutcome::Generated);
}

#[test]
fn policy_normalises_and_filters_flags() {
    let raw = TraceRecord::new().with_trace_flags("0A");
    let (record, report) = FieldPolicy::new(false).resolve(&raw);
    assert_eq!(record.trace_flags(), "0a");
    assert_eq!(report.trace_flags, FieldOutcome::Accepted);

    let raw = TraceRecord::new().with_trace_flags("xyz");
    let (record, report) = FieldPolicy::new(true).resolve(&raw);
    assert_eq!(record.trace_flags(), "");
    assert_eq!(report.trace_flags, FieldOutcome::Discarded);
    assert!(report.any_discarded());
}

#[test]
fn policy_carries_raw_w3c_fields() {
    let raw = TraceRecord::new()
        .with_traceparent_raw("garbage")
        .with_tracestate_raw("vendor=abc");
    let (record, _) = FieldPolicy::new(false).resolve(&raw);
    assert_eq!(record.traceparent_raw(), "garbage");
    assert_eq!(record.tracestate_raw(), "vendor=abc");
}

#[test]
fn policy_writes_into_extensions() {
    let raw = TraceRecord::new().with_trace_id(TRACE_ID).with_request_id("r-1");
    let (extensions, _) = FieldPolicy::new(false)
        .apply(http::Extensions::new(), &raw)
        .unwrap();
    assert_eq!(ContextStore::get(&extensions, Field::TraceId), Some(TRACE_ID));
    assert_eq!(ContextStore::get(&extensions, Field::RequestId), Some("r-1"));
    assert_eq!(ContextStore::get(&extensions, Field::SpanId), None);
}

#[test]
fn custom_descriptor_replaces_default() {
    fn fixed() -> String {
        "fixed-request-id".to_string()
    }
    let policy = FieldPolicy::new(true).with_descriptor(FieldDescriptor {
        generate: fixed,
        ..FieldDescriptor::REQUEST_ID
    });
    let (record, _) = policy.resolve(&TraceRecord::new());
    assert_eq!(record.request_id(), "fixed-request-id");
    assert_eq!(policy.descriptor(FieldKind::TraceId).name, "trace-id");
}

#[test]
fn discard_reason_classification() {
    use tracelink_core::DiscardReason;

    assert_eq!(DiscardReason::classify("not-hex!!", Some(32)), DiscardReason::InvalidHex);
    assert_eq!(DiscardReason::classify("abc", Some(32)), DiscardReason::WrongLength);
    assert_eq!(
        DiscardReason::classify("0000000000000000", Some(16)),
        DiscardReason::AllZero
    );
    assert_eq!(DiscardReason::classify("anything", None), DiscardReason::Rejected);
    assert_eq!(DiscardReason::WrongLength.as_str(), "wrong length");
    assert_eq!(FieldKind::SpanId.hex_len(), Some(16));
    assert_eq!(FieldKind::RequestId.hex_len(), None);
}
