//! Per-field accept / discard / generate policy.
//!
//! Each managed identifier (trace id, span id, request id) is described by a
//! [`FieldDescriptor`]. A [`FieldPolicy`] bundles the three descriptors with
//! the `auto_generate` switch and is built once, then shared behind an `Arc`
//! by every middleware and interceptor.
//!
//! Fields are decided independently. A valid span id arriving without a trace
//! id is kept and paired with a freshly generated trace id, which fabricates a
//! parent link that never existed upstream. Disable `auto_generate` when that
//! is unacceptable.

use crate::id::{generate_request_id, generate_span_id, generate_trace_id};
use crate::record::{Field, TraceRecord};
use crate::store::ContextStore;
use crate::validate::{
    is_valid_hex, is_valid_span_id, is_valid_trace_flags, is_valid_trace_id, SPAN_ID_LEN,
    TRACE_FLAGS_LEN, TRACE_ID_LEN,
};

/// The identifiers that have a generation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    TraceId,
    SpanId,
    RequestId,
}

impl FieldKind {
    pub fn field(&self) -> Field {
        match self {
            FieldKind::TraceId => Field::TraceId,
            FieldKind::SpanId => Field::SpanId,
            FieldKind::RequestId => Field::RequestId,
        }
    }

    /// Fixed hex width of the field, `None` for opaque request ids.
    pub fn hex_len(&self) -> Option<usize> {
        match self {
            FieldKind::TraceId => Some(TRACE_ID_LEN),
            FieldKind::SpanId => Some(SPAN_ID_LEN),
            FieldKind::RequestId => None,
        }
    }
}

/// What the policy did with one inbound value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOutcome {
    /// Present and valid; stored as received.
    Accepted,
    /// Absent; a fresh value was generated.
    Generated,
    /// Present but invalid; dropped and left absent.
    Discarded,
    /// Present but invalid; dropped and replaced by a fresh value.
    DiscardedAndGenerated,
    /// Absent and left absent.
    Absent,
}

impl FieldOutcome {
    pub fn is_discard(&self) -> bool {
        matches!(self, FieldOutcome::Discarded | FieldOutcome::DiscardedAndGenerated)
    }
}

/// Why an inbound value was discarded. Reported on discard events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    InvalidHex,
    WrongLength,
    AllZero,
    /// Rejected by a custom validator.
    Rejected,
}

impl DiscardReason {
    /// Classify a rejected value against a fixed-width hex field.
    /// `expected_len` is `None` for fields without a hex shape.
    pub fn classify(value: &str, expected_len: Option<usize>) -> Self {
        let Some(len) = expected_len else {
            return DiscardReason::Rejected;
        };
        if !is_valid_hex(value) {
            DiscardReason::InvalidHex
        } else if value.len() != len {
            DiscardReason::WrongLength
        } else if value.bytes().all(|b| b == b'0') {
            DiscardReason::AllZero
        } else {
            DiscardReason::Rejected
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DiscardReason::InvalidHex => "invalid hex",
            DiscardReason::WrongLength => "wrong length",
            DiscardReason::AllZero => "all zero",
            DiscardReason::Rejected => "rejected",
        }
    }
}

/// Request ids are opaque: anything non-empty is accepted.
pub fn is_valid_request_id(s: &str) -> bool {
    !s.is_empty()
}

/// Policy description of one managed field.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    pub kind: FieldKind,
    pub name: &'static str,
    pub validate: fn(&str) -> bool,
    pub generate: fn() -> String,
}

impl FieldDescriptor {
    pub const TRACE_ID: FieldDescriptor = FieldDescriptor {
        kind: FieldKind::TraceId,
        name: "trace-id",
        validate: is_valid_trace_id,
        generate: generate_trace_id,
    };

    pub const SPAN_ID: FieldDescriptor = FieldDescriptor {
        kind: FieldKind::SpanId,
        name: "span-id",
        validate: is_valid_span_id,
        generate: generate_span_id,
    };

    pub const REQUEST_ID: FieldDescriptor = FieldDescriptor {
        kind: FieldKind::RequestId,
        name: "request-id",
        validate: is_valid_request_id,
        generate: generate_request_id,
    };

    /// Store `value` as this field.
    pub fn accept_into<S: ContextStore>(&self, store: S, value: &str) -> Result<S, S::Error> {
        store.set(self.kind.field(), value.to_string())
    }

    /// Store a freshly generated value as this field.
    pub fn generate_into<S: ContextStore>(&self, store: S) -> Result<S, S::Error> {
        store.set(self.kind.field(), (self.generate)())
    }

    /// Run the accept / discard / generate decision for one inbound value.
    pub fn apply<S: ContextStore>(
        &self,
        store: S,
        value: &str,
        auto_generate: bool,
    ) -> Result<(S, FieldOutcome), S::Error> {
        if value.is_empty() {
            return if auto_generate {
                Ok((self.generate_into(store)?, FieldOutcome::Generated))
            } else {
                Ok((store, FieldOutcome::Absent))
            };
        }
        if (self.validate)(value) {
            return Ok((self.accept_into(store, value)?, FieldOutcome::Accepted));
        }
        if auto_generate {
            Ok((self.generate_into(store)?, FieldOutcome::DiscardedAndGenerated))
        } else {
            Ok((store.set(self.kind.field(), String::new())?, FieldOutcome::Discarded))
        }
    }
}

/// Reduced policy for trace flags: never generated, lowercased when valid.
pub fn apply_trace_flags<S: ContextStore>(
    store: S,
    value: &str,
) -> Result<(S, FieldOutcome), S::Error> {
    if value.is_empty() {
        Ok((store, FieldOutcome::Absent))
    } else if is_valid_trace_flags(value) {
        let store = store.set(Field::TraceFlags, value.to_ascii_lowercase())?;
        Ok((store, FieldOutcome::Accepted))
    } else {
        Ok((store.set(Field::TraceFlags, String::new())?, FieldOutcome::Discarded))
    }
}

/// Outcome of one [`FieldPolicy::apply`] run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyReport {
    pub trace_id: FieldOutcome,
    pub span_id: FieldOutcome,
    pub request_id: FieldOutcome,
    pub trace_flags: FieldOutcome,
}

impl PolicyReport {
    pub fn outcome(&self, kind: FieldKind) -> FieldOutcome {
        match kind {
            FieldKind::TraceId => self.trace_id,
            FieldKind::SpanId => self.span_id,
            FieldKind::RequestId => self.request_id,
        }
    }

    pub fn any_discarded(&self) -> bool {
        [self.trace_id, self.span_id, self.request_id, self.trace_flags]
            .iter()
            .any(FieldOutcome::is_discard)
    }
}

/// The full inbound policy: three descriptors plus the generation switch.
#[derive(Debug, Clone)]
pub struct FieldPolicy {
    descriptors: [FieldDescriptor; 3],
    auto_generate: bool,
    log_discards: bool,
}

impl Default for FieldPolicy {
    fn default() -> Self {
        Self::new(true)
    }
}

impl FieldPolicy {
    pub fn new(auto_generate: bool) -> Self {
        Self {
            descriptors: [
                FieldDescriptor::TRACE_ID,
                FieldDescriptor::SPAN_ID,
                FieldDescriptor::REQUEST_ID,
            ],
            auto_generate,
            log_discards: true,
        }
    }

    /// Emit discards at `WARN` (default) instead of `DEBUG`.
    pub fn with_log_discards(mut self, enabled: bool) -> Self {
        self.log_discards = enabled;
        self
    }

    /// Swap the descriptor for `descriptor.kind`.
    pub fn with_descriptor(mut self, descriptor: FieldDescriptor) -> Self {
        let slot = self.slot(descriptor.kind);
        self.descriptors[slot] = descriptor;
        self
    }

    pub fn auto_generate(&self) -> bool {
        self.auto_generate
    }

    pub fn descriptor(&self, kind: FieldKind) -> &FieldDescriptor {
        &self.descriptors[self.slot(kind)]
    }

    fn slot(&self, kind: FieldKind) -> usize {
        match kind {
            FieldKind::TraceId => 0,
            FieldKind::SpanId => 1,
            FieldKind::RequestId => 2,
        }
    }

    /// Apply the policy to `raw`, writing the surviving fields into `store`.
    ///
    /// `traceparent_raw` and `tracestate_raw` are carried through verbatim.
    pub fn apply<S: ContextStore>(
        &self,
        mut store: S,
        raw: &TraceRecord,
    ) -> Result<(S, PolicyReport), S::Error> {
        let mut outcomes = [FieldOutcome::Absent; 3];
        for (i, descriptor) in self.descriptors.iter().enumerate() {
            let value = raw.field(descriptor.kind.field());
            let (next, outcome) = descriptor.apply(store, value, self.auto_generate)?;
            if outcome.is_discard() {
                self.signal_discard(descriptor.name, value, descriptor.kind.hex_len(), outcome);
            }
            outcomes[i] = outcome;
            store = next;
        }

        let (store, trace_flags) = apply_trace_flags(store, raw.trace_flags())?;
        if trace_flags.is_discard() {
            self.signal_discard(
                "trace-flags",
                raw.trace_flags(),
                Some(TRACE_FLAGS_LEN),
                trace_flags,
            );
        }

        let store = carry(store, Field::TraceparentRaw, raw.traceparent_raw())?;
        let store = carry(store, Field::TracestateRaw, raw.tracestate_raw())?;

        let report = PolicyReport {
            trace_id: outcomes[0],
            span_id: outcomes[1],
            request_id: outcomes[2],
            trace_flags,
        };
        Ok((store, report))
    }

    /// [`apply`](Self::apply) into a fresh [`TraceRecord`].
    pub fn resolve(&self, raw: &TraceRecord) -> (TraceRecord, PolicyReport) {
        match self.apply(TraceRecord::new(), raw) {
            Ok(resolved) => resolved,
            Err(never) => match never {},
        }
    }

    fn signal_discard(
        &self,
        field: &'static str,
        value: &str,
        expected_len: Option<usize>,
        outcome: FieldOutcome,
    ) {
        let regenerated = outcome == FieldOutcome::DiscardedAndGenerated;
        let reason = DiscardReason::classify(value, expected_len).as_str();
        if self.log_discards {
            tracing::warn!(
                target: "tracelink::policy",
                field,
                value_len = value.len(),
                reason,
                regenerated,
                "discarded invalid inbound trace field"
            );
        } else {
            tracing::debug!(
                target: "tracelink::policy",
                field,
                value_len = value.len(),
                reason,
                regenerated,
                "discarded invalid inbound trace field"
            );
        }
    }
}

fn carry<S: ContextStore>(store: S, field: Field, value: &str) -> Result<S, S::Error> {
    if value.is_empty() {
        Ok(store)
    } else {
        store.set(field, value.to_string())
    }
}
