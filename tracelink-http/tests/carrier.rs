use http::header::{HeaderMap, HeaderValue};
use tracelink_core::TraceRecord;
use tracelink_http::{extract_headers, inject_headers, outbound_headers};

const HEADER: &str = "00-0af7651916cd43dd8448eb211c80319c-b7ad6b7169203331-01";

fn record() -> TraceRecord {
    TraceRecord::new()
        .with_trace_id("0af7651916cd43dd8448eb211c80319c")
        .with_span_id("b7ad6b7169203331")
        .with_request_id("req-1")
        .with_trace_flags("01")
        .with_tracestate_raw("congo=t61rcWkgMzE")
}

#[test]
fn extract_is_case_insensitive() {
    let mut headers = HeaderMap::new();
    headers.insert("x-request-id", HeaderValue::from_static("abc"));
    headers.insert("TRACEPARENT", HeaderValue::from_static(HEADER));
    let record = extract_headers(Some(&headers));
    assert_eq!(record.request_id(), "abc");
    assert_eq!(record.trace_id(), "0af7651916cd43dd8448eb211c80319c");
    assert_eq!(record.trace_flags(), "01");
}

#[test]
fn extract_without_headers_is_empty() {
    assert!(extract_headers(None).is_empty());
}

#[test]
fn extract_ignores_non_text_values() {
    let mut headers = HeaderMap::new();
    headers.insert("x-request-id", HeaderValue::from_bytes(b"\xffbad").unwrap());
    assert_eq!(extract_headers(Some(&headers)).request_id(), "");
}

#[test]
fn inject_sets_all_headers() {
    let mut headers = HeaderMap::new();
    let injected = inject_headers(&record(), &mut headers);
    assert!(injected.tracestate);
    assert_eq!(headers["x-trace-id"], "0af7651916cd43dd8448eb211c80319c");
    assert_eq!(headers["x-span-id"], "b7ad6b7169203331");
    assert_eq!(headers["x-request-id"], "req-1");
    assert_eq!(headers["traceparent"], HEADER);
    assert_eq!(headers["tracestate"], "congo=t61rcWkgMzE");
}

#[test]
fn inject_overwrites_instead_of_appending() {
    let mut headers = HeaderMap::new();
    headers.append("x-request-id", HeaderValue::from_static("old-1"));
    headers.append("x-request-id", HeaderValue::from_static("old-2"));
    inject_headers(&record(), &mut headers);
    inject_headers(&record(), &mut headers);
    let values: Vec<_> = headers.get_all("x-request-id").iter().collect();
    assert_eq!(values, vec!["req-1"]);
    assert_eq!(headers.get_all("traceparent").iter().count(), 1);
}

#[test]
fn inject_skips_unencodable_values() {
    let mut headers = HeaderMap::new();
    let record = TraceRecord::new().with_request_id("line\nbreak");
    inject_headers(&record, &mut headers);
    assert!(headers.is_empty());
}

#[test]
fn outbound_headers_leave_base_untouched() {
    let mut base = HeaderMap::new();
    base.insert("user-agent", HeaderValue::from_static("tracelink-test"));

    let headers = outbound_headers(&record(), &base);
    assert_eq!(base.len(), 1);
    assert_eq!(headers["user-agent"], "tracelink-test");
    assert_eq!(headers["traceparent"], HEADER);

    let untouched = outbound_headers(&TraceRecord::new(), &base);
    assert_eq!(untouched, base);
}

#[test]
fn injected_reflects_skipped_values() {
    let record = record()
        .with_request_id("line\nbreak")
        .with_tracestate_raw("a=1\nb=2");
    let mut headers = HeaderMap::new();
    let injected = inject_headers(&record, &mut headers);
    assert!(injected.traceparent);
    assert!(!injected.request_id);
    assert!(!injected.tracestate);
    assert!(headers.get("x-request-id").is_none());
    assert!(headers.get("tracestate").is_none());
}
