use tonic::metadata::{Ascii, MetadataKey, MetadataMap, MetadataValue};
use tracelink_core::carrier::{self, Extractor, Injected, Injector};
use tracelink_core::{CarrierKeys, TraceRecord};

/// Read-only view of gRPC metadata as a trace carrier.
pub struct MetadataExtractor<'a>(pub &'a MetadataMap);

impl Extractor for MetadataExtractor<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.to_str().ok())
    }
}

/// Mutable view of gRPC metadata as a trace carrier.
///
/// Values replace any previous entry under the same key. Values that are not
/// valid ASCII metadata are skipped.
pub struct MetadataInjector<'a>(pub &'a mut MetadataMap);

impl Injector for MetadataInjector<'_> {
    fn set(&mut self, key: &str, value: &str) -> bool {
        let Ok(name) = MetadataKey::<Ascii>::from_bytes(key.as_bytes()) else {
            tracing::debug!(target: "tracelink::grpc", key, "invalid metadata key, skipping");
            return false;
        };
        match value.parse::<MetadataValue<Ascii>>() {
            Ok(value) => {
                self.0.insert(name, value);
                true
            }
            Err(_) => {
                tracing::debug!(target: "tracelink::grpc", key, "value is not valid ASCII metadata, skipping");
                false
            }
        }
    }
}

/// Build a [`TraceRecord`] from inbound call metadata.
pub fn extract_metadata(metadata: Option<&MetadataMap>) -> TraceRecord {
    let extractor = metadata.map(MetadataExtractor);
    carrier::extract(extractor.as_ref(), &CarrierKeys::RPC)
}

/// Write `record` into `metadata` in place.
pub fn inject_metadata(record: &TraceRecord, metadata: &mut MetadataMap) -> Injected {
    carrier::inject(record, &mut MetadataInjector(metadata), &CarrierKeys::RPC)
}

/// A copy of `base` carrying `record`. `base` is never modified.
pub fn outbound_metadata(record: &TraceRecord, base: &MetadataMap) -> MetadataMap {
    let mut metadata = base.clone();
    inject_metadata(record, &mut metadata);
    metadata
}
