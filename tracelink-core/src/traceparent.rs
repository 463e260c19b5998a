//! `traceparent` codec.
//!
//! The header is laid out at fixed byte offsets:
//!
//! ```text
//! 00-0af7651916cd43dd8448eb211c80319c-b7ad6b7169203331-01
//! ^^ ^                                ^                ^^
//! 0  3                                36               53
//! ```
//!
//! Version `00` is the only version ever written. Higher versions are read
//! under the forward-compatibility rule: the first four fields keep their
//! offsets, and anything after a `-` at offset 55 is ignored.

use crate::record::TraceRecord;
use crate::validate::{
    is_valid_span_id, is_valid_trace_flags, is_valid_trace_id, is_valid_version,
};

/// Version emitted by [`format`].
pub const SUPPORTED_VERSION: &str = "00";
/// Flags used by [`format`] when none (or garbage) are supplied.
pub const DEFAULT_TRACE_FLAGS: &str = "00";
/// Exact length of a version-`00` header.
pub const TRACEPARENT_LEN: usize = 55;

const VERSION_RANGE: std::ops::Range<usize> = 0..2;
const TRACE_ID_RANGE: std::ops::Range<usize> = 3..35;
const SPAN_ID_RANGE: std::ops::Range<usize> = 36..52;
const FLAGS_RANGE: std::ops::Range<usize> = 53..55;
const SEPARATORS: [usize; 3] = [2, 35, 52];

/// The three fields carried by a valid `traceparent`, lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Traceparent {
    pub trace_id: String,
    pub span_id: String,
    pub trace_flags: String,
}

impl Traceparent {
    /// Render back to the canonical version-`00` form.
    ///
    /// A hand-built value with invalid ids renders as the empty string.
    pub fn to_header(&self) -> String {
        format(&self.trace_id, &self.span_id, &self.trace_flags).unwrap_or_default()
    }
}

/// Parse a `traceparent` value.
///
/// Returns `None` for anything structurally invalid; there is no partial
/// result.
pub fn parse(traceparent: &str) -> Option<Traceparent> {
    let bytes = traceparent.as_bytes();
    if bytes.len() < TRACEPARENT_LEN {
        return None;
    }
    if SEPARATORS.iter().any(|&i| bytes[i] != b'-') {
        return None;
    }

    let version = traceparent.get(VERSION_RANGE)?;
    if !is_valid_version(version) {
        return None;
    }
    if version == SUPPORTED_VERSION {
        if bytes.len() != TRACEPARENT_LEN {
            return None;
        }
    } else if bytes.len() > TRACEPARENT_LEN && bytes[TRACEPARENT_LEN] != b'-' {
        return None;
    }

    let trace_id = traceparent.get(TRACE_ID_RANGE)?;
    if !is_valid_trace_id(trace_id) {
        return None;
    }
    let span_id = traceparent.get(SPAN_ID_RANGE)?;
    if !is_valid_span_id(span_id) {
        return None;
    }
    let trace_flags = traceparent.get(FLAGS_RANGE)?;
    if !is_valid_trace_flags(trace_flags) {
        return None;
    }

    Some(Traceparent {
        trace_id: trace_id.to_ascii_lowercase(),
        span_id: span_id.to_ascii_lowercase(),
        trace_flags: trace_flags.to_ascii_lowercase(),
    })
}

/// Build a canonical version-`00` header.
///
/// Returns `None` when either id is invalid. Empty or invalid flags fall back
/// to [`DEFAULT_TRACE_FLAGS`].
pub fn format(trace_id: &str, span_id: &str, trace_flags: &str) -> Option<String> {
    if !is_valid_trace_id(trace_id) || !is_valid_span_id(span_id) {
        return None;
    }
    let flags = if is_valid_trace_flags(trace_flags) {
        trace_flags
    } else {
        DEFAULT_TRACE_FLAGS
    };

    let mut out = String::with_capacity(TRACEPARENT_LEN);
    out.push_str(SUPPORTED_VERSION);
    out.push('-');
    out.push_str(&trace_id.to_ascii_lowercase());
    out.push('-');
    out.push_str(&span_id.to_ascii_lowercase());
    out.push('-');
    out.push_str(&flags.to_ascii_lowercase());
    Some(out)
}

/// Pick the `traceparent` to send for `record`.
///
/// A parseable raw header wins and is re-canonicalised; otherwise the header
/// is rebuilt from the discrete fields. An unparseable raw header is never
/// forwarded verbatim.
pub fn resolve(record: &TraceRecord) -> Option<String> {
    if !record.traceparent_raw().is_empty() {
        if let Some(parsed) = parse(record.traceparent_raw()) {
            return Some(parsed.to_header());
        }
    }
    format(record.trace_id(), record.span_id(), record.trace_flags())
}
