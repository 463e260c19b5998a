use std::fmt;

/// Names every slot of a [`TraceRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    TraceId,
    SpanId,
    RequestId,
    TraceFlags,
    TraceparentRaw,
    TracestateRaw,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::TraceId,
        Field::SpanId,
        Field::RequestId,
        Field::TraceFlags,
        Field::TraceparentRaw,
        Field::TracestateRaw,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::TraceId => "trace_id",
            Field::SpanId => "span_id",
            Field::RequestId => "request_id",
            Field::TraceFlags => "trace_flags",
            Field::TraceparentRaw => "traceparent",
            Field::TracestateRaw => "tracestate",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trace identity of one request.
///
/// Every field is either a string or empty. The value is never mutated in
/// place; the `with_*` methods consume it and return the updated record.
///
/// The canonical `traceparent` derived from `trace_id`/`span_id`/`trace_flags`
/// (see [`crate::traceparent::resolve`]) is not guaranteed to equal
/// `traceparent_raw` byte for byte.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TraceRecord {
    trace_id: String,
    span_id: String,
    request_id: String,
    trace_flags: String,
    traceparent_raw: String,
    tracestate_raw: String,
}

impl TraceRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    pub fn span_id(&self) -> &str {
        &self.span_id
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn trace_flags(&self) -> &str {
        &self.trace_flags
    }

    /// The inbound `traceparent`, verbatim.
    pub fn traceparent_raw(&self) -> &str {
        &self.traceparent_raw
    }

    /// The inbound `tracestate`, verbatim. Never parsed.
    pub fn tracestate_raw(&self) -> &str {
        &self.tracestate_raw
    }

    pub fn with_trace_id(self, value: impl Into<String>) -> Self {
        self.with_field(Field::TraceId, value)
    }

    pub fn with_span_id(self, value: impl Into<String>) -> Self {
        self.with_field(Field::SpanId, value)
    }

    pub fn with_request_id(self, value: impl Into<String>) -> Self {
        self.with_field(Field::RequestId, value)
    }

    pub fn with_trace_flags(self, value: impl Into<String>) -> Self {
        self.with_field(Field::TraceFlags, value)
    }

    pub fn with_traceparent_raw(self, value: impl Into<String>) -> Self {
        self.with_field(Field::TraceparentRaw, value)
    }

    pub fn with_tracestate_raw(self, value: impl Into<String>) -> Self {
        self.with_field(Field::TracestateRaw, value)
    }

    /// Read a slot by name.
    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::TraceId => &self.trace_id,
            Field::SpanId => &self.span_id,
            Field::RequestId => &self.request_id,
            Field::TraceFlags => &self.trace_flags,
            Field::TraceparentRaw => &self.traceparent_raw,
            Field::TracestateRaw => &self.tracestate_raw,
        }
    }

    /// Replace a slot by name, returning the new record.
    pub fn with_field(mut self, field: Field, value: impl Into<String>) -> Self {
        let value = value.into();
        match field {
            Field::TraceId => self.trace_id = value,
            Field::SpanId => self.span_id = value,
            Field::RequestId => self.request_id = value,
            Field::TraceFlags => self.trace_flags = value,
            Field::TraceparentRaw => self.traceparent_raw = value,
            Field::TracestateRaw => self.tracestate_raw = value,
        }
        self
    }

    /// `true` iff every slot is empty.
    pub fn is_empty(&self) -> bool {
        Field::ALL.iter().all(|f| self.field(*f).is_empty())
    }
}
