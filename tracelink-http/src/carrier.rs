use http::header::{HeaderMap, HeaderName, HeaderValue};
use tracelink_core::carrier::{self, Extractor, Injected, Injector};
use tracelink_core::{CarrierKeys, TraceRecord};

/// Read-only view of a [`HeaderMap`] as a trace carrier.
pub struct HeaderExtractor<'a>(pub &'a HeaderMap);

impl Extractor for HeaderExtractor<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.to_str().ok())
    }
}

/// Mutable view of a [`HeaderMap`] as a trace carrier.
///
/// Values are inserted, replacing any previous entries under the same name.
/// Values that are not valid header text are skipped.
pub struct HeaderInjector<'a>(pub &'a mut HeaderMap);

impl Injector for HeaderInjector<'_> {
    fn set(&mut self, key: &str, value: &str) -> bool {
        let Ok(name) = HeaderName::from_bytes(key.as_bytes()) else {
            tracing::debug!(target: "tracelink::http", key, "invalid header name, skipping");
            return false;
        };
        match HeaderValue::from_str(value) {
            Ok(value) => {
                self.0.insert(name, value);
                true
            }
            Err(_) => {
                tracing::debug!(target: "tracelink::http", key, "value is not valid header text, skipping");
                false
            }
        }
    }
}

/// Build a [`TraceRecord`] from HTTP request headers.
pub fn extract_headers(headers: Option<&HeaderMap>) -> TraceRecord {
    let extractor = headers.map(HeaderExtractor);
    carrier::extract(extractor.as_ref(), &CarrierKeys::HTTP)
}

/// Write `record` into `headers` in place.
pub fn inject_headers(record: &TraceRecord, headers: &mut HeaderMap) -> Injected {
    carrier::inject(record, &mut HeaderInjector(headers), &CarrierKeys::HTTP)
}

/// A copy of `base` carrying `record`.
///
/// `base` is typically a client's shared default headers; it is never
/// modified. An empty record returns an unchanged copy.
pub fn outbound_headers(record: &TraceRecord, base: &HeaderMap) -> HeaderMap {
    let mut headers = base.clone();
    inject_headers(record, &mut headers);
    headers
}
