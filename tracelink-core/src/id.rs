//! Random identifier generation.
//!
//! Identifiers are drawn from the operating system CSPRNG. If the entropy
//! source fails the process panics: handing out predictable identifiers is
//! worse than stopping.

use rand::rngs::OsRng;
use rand::RngCore;

/// A fresh 32-hex-character trace id, never all zero.
pub fn generate_trace_id() -> String {
    random_hex::<16>()
}

/// A fresh 16-hex-character span id, never all zero.
pub fn generate_span_id() -> String {
    random_hex::<8>()
}

/// A fresh request id. Same shape as a trace id.
pub fn generate_request_id() -> String {
    random_hex::<16>()
}

fn random_hex<const N: usize>() -> String {
    let mut buf = [0u8; N];
    loop {
        if let Err(err) = OsRng.try_fill_bytes(&mut buf) {
            tracing::error!(error = %err, "entropy source failed while generating an identifier");
            panic!("entropy source unavailable: {err}");
        }
        if buf.iter().any(|&b| b != 0) {
            return hex::encode(buf);
        }
    }
}
