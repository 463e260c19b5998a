//! Structural predicates for the W3C Trace Context fields.
//!
//! All functions are total: any input, including the empty string, yields a
//! plain `bool`.

/// Length of a hex-encoded trace id.
pub const TRACE_ID_LEN: usize = 32;
/// Length of a hex-encoded span (parent) id.
pub const SPAN_ID_LEN: usize = 16;
/// Length of hex-encoded trace flags.
pub const TRACE_FLAGS_LEN: usize = 2;
/// Length of a hex-encoded version.
pub const VERSION_LEN: usize = 2;

/// `true` iff `s` is non-empty and every byte is `[0-9a-fA-F]`.
pub fn is_valid_hex(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// 32 hex characters, not all zero.
pub fn is_valid_trace_id(s: &str) -> bool {
    is_valid_id(s, TRACE_ID_LEN)
}

/// 16 hex characters, not all zero.
pub fn is_valid_span_id(s: &str) -> bool {
    is_valid_id(s, SPAN_ID_LEN)
}

/// 2 hex characters. Reserved bits are accepted.
pub fn is_valid_trace_flags(s: &str) -> bool {
    s.len() == TRACE_FLAGS_LEN && is_valid_hex(s)
}

/// 2 hex characters, never `ff` (in any case).
pub fn is_valid_version(s: &str) -> bool {
    s.len() == VERSION_LEN && is_valid_hex(s) && !s.eq_ignore_ascii_case("ff")
}

fn is_valid_id(s: &str, len: usize) -> bool {
    s.len() == len && is_valid_hex(s) && s.bytes().any(|b| b != b'0')
}
