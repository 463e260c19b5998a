//! Transport-agnostic extraction and injection.
//!
//! A transport plugs in by wrapping its header or metadata type in an
//! [`Extractor`] (read side) and an [`Injector`] (write side). The key names
//! differ per transport and are supplied as a [`CarrierKeys`] table.

use std::collections::HashMap;

use crate::record::TraceRecord;
use crate::traceparent;

/// Read access to a carrier.
pub trait Extractor {
    /// The value under `key`, if present and representable as text.
    fn get(&self, key: &str) -> Option<&str>;
}

/// Write access to a carrier.
///
/// `set` must overwrite any existing value under `key`, never append. It
/// returns `false` when the carrier could not represent the key or value and
/// nothing was written.
pub trait Injector {
    fn set(&mut self, key: &str, value: &str) -> bool;
}

/// Key names used by one transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarrierKeys {
    pub trace_id: &'static str,
    pub span_id: &'static str,
    pub request_id: &'static str,
    pub traceparent: &'static str,
    pub tracestate: &'static str,
}

impl CarrierKeys {
    /// HTTP header names.
    pub const HTTP: CarrierKeys = CarrierKeys {
        trace_id: "X-Trace-ID",
        span_id: "X-Span-ID",
        request_id: "X-Request-ID",
        traceparent: "traceparent",
        tracestate: "tracestate",
    };

    /// RPC metadata keys. Metadata keys are lowercase on the wire.
    pub const RPC: CarrierKeys = CarrierKeys {
        trace_id: "x-trace-id",
        span_id: "x-span-id",
        request_id: "x-request-id",
        traceparent: "traceparent",
        tracestate: "tracestate",
    };
}

/// Keys [`inject`] actually wrote into the carrier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Injected {
    pub trace_id: bool,
    pub span_id: bool,
    pub request_id: bool,
    pub traceparent: bool,
    pub tracestate: bool,
}

impl Injected {
    pub fn is_empty(&self) -> bool {
        *self == Injected::default()
    }
}

/// Build a [`TraceRecord`] from a carrier.
///
/// A parseable `traceparent` overrides the custom trace/span headers and
/// supplies the flags. An unparseable one leaves the custom fields alone and
/// is kept verbatim in `traceparent_raw`. A missing carrier yields the empty
/// record.
pub fn extract<E: Extractor + ?Sized>(carrier: Option<&E>, keys: &CarrierKeys) -> TraceRecord {
    let Some(carrier) = carrier else {
        return TraceRecord::new();
    };
    let read = |key: &str| carrier.get(key).map(str::trim).unwrap_or_default().to_string();

    let record = TraceRecord::new()
        .with_trace_id(read(keys.trace_id))
        .with_span_id(read(keys.span_id))
        .with_request_id(read(keys.request_id))
        .with_traceparent_raw(read(keys.traceparent))
        .with_tracestate_raw(read(keys.tracestate));

    if record.traceparent_raw().is_empty() {
        return record;
    }
    match traceparent::parse(record.traceparent_raw()) {
        Some(parsed) => record
            .with_trace_id(parsed.trace_id)
            .with_span_id(parsed.span_id)
            .with_trace_flags(parsed.trace_flags),
        None => {
            tracing::debug!(
                target: "tracelink::carrier",
                len = record.traceparent_raw().len(),
                "ignoring unparseable traceparent"
            );
            record
        }
    }
}

/// Write `record` into a carrier.
///
/// Empty fields are skipped, so an empty record writes nothing. `tracestate`
/// is only written alongside a `traceparent`.
pub fn inject<I: Injector + ?Sized>(
    record: &TraceRecord,
    carrier: &mut I,
    keys: &CarrierKeys,
) -> Injected {
    let mut injected = Injected::default();
    if record.is_empty() {
        return injected;
    }

    let mut put = |key: &str, value: &str| !value.is_empty() && carrier.set(key, value);
    injected.trace_id = put(keys.trace_id, record.trace_id());
    injected.span_id = put(keys.span_id, record.span_id());
    injected.request_id = put(keys.request_id, record.request_id());

    if let Some(header) = traceparent::resolve(record) {
        injected.traceparent = put(keys.traceparent, &header);
        if injected.traceparent {
            injected.tracestate = put(keys.tracestate, record.tracestate_raw());
        }
    }
    injected
}

/// Plain maps are read by exact key first, then by an ASCII
/// case-insensitive scan, so HTTP headers collected under lowercase names
/// still match [`CarrierKeys::HTTP`].
impl<S: std::hash::BuildHasher> Extractor for HashMap<String, String, S> {
    fn get(&self, key: &str) -> Option<&str> {
        HashMap::get(self, key)
            .or_else(|| {
                self.iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(key))
                    .map(|(_, v)| v)
            })
            .map(String::as_str)
    }
}

/// Keys are written exactly as named in the [`CarrierKeys`] table, replacing
/// any entry that differs only in case.
impl<S: std::hash::BuildHasher> Injector for HashMap<String, String, S> {
    fn set(&mut self, key: &str, value: &str) -> bool {
        self.retain(|k, _| k == key || !k.eq_ignore_ascii_case(key));
        self.insert(key.to_string(), value.to_string());
        true
    }
}
