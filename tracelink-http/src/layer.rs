use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use http::header::{HeaderName, HeaderValue};
use http::Request;
use pin_project_lite::pin_project;
use tower::{Layer, Service};
use tracing::instrument::Instrumented;
use tracing::Instrument;
use tracelink_core::store::{self, record_from_extensions, TaskLocalFuture};
use tracelink_core::{FieldPolicy, PropagationConfig, TraceRecord};

use crate::carrier::extract_headers;

static X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Tower layer that resolves the trace identity of each inbound request.
///
/// For every request it extracts the trace headers, applies the
/// [`FieldPolicy`], stores the resulting [`TraceRecord`] in the request
/// extensions, and invokes the inner service (its `call` and the returned
/// future) inside a [`store::scope`] so outbound calls made while handling
/// the request can pick the record up.
#[derive(Clone)]
pub struct TracePropagationLayer {
    policy: Arc<FieldPolicy>,
    echo_request_id: bool,
}

impl TracePropagationLayer {
    pub fn new(policy: Arc<FieldPolicy>) -> Self {
        Self {
            policy,
            echo_request_id: false,
        }
    }

    pub fn from_config(config: &PropagationConfig) -> Self {
        Self {
            policy: config.policy(),
            echo_request_id: config.echo_request_id,
        }
    }

    /// Copy the resolved request id onto the response `X-Request-ID` header.
    pub fn echo_request_id(mut self, enabled: bool) -> Self {
        self.echo_request_id = enabled;
        self
    }
}

impl<S> Layer<S> for TracePropagationLayer {
    type Service = TracePropagationService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TracePropagationService {
            inner,
            policy: self.policy.clone(),
            echo_request_id: self.echo_request_id,
        }
    }
}

/// Service produced by [`TracePropagationLayer`].
#[derive(Clone)]
pub struct TracePropagationService<S> {
    inner: S,
    policy: Arc<FieldPolicy>,
    echo_request_id: bool,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for TracePropagationService<S>
where
    S: Service<Request<ReqBody>, Response = http::Response<ResBody>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = TracePropagationFuture<S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        let raw = extract_headers(Some(req.headers()));

        let mut extensions = std::mem::take(req.extensions_mut());
        extensions.remove::<TraceRecord>();
        let (extensions, report) = match self.policy.apply(extensions, &raw) {
            Ok(applied) => applied,
            Err(never) => match never {},
        };
        *req.extensions_mut() = extensions;
        let record = record_from_extensions(req.extensions())
            .cloned()
            .unwrap_or_default();
        req.extensions_mut().insert(record.clone());

        let span = tracing::info_span!(
            "trace_context",
            trace_id = %record.trace_id(),
            span_id = %record.span_id(),
            request_id = %record.request_id(),
        );
        tracing::debug!(parent: &span, ?report, "resolved inbound trace context");

        let echo = if self.echo_request_id && !record.request_id().is_empty() {
            HeaderValue::from_str(record.request_id()).ok()
        } else {
            None
        };

        // The inner service sees the record both in `call` and while its
        // future is polled.
        let inner = &mut self.inner;
        let future = span.in_scope(|| store::sync_scope(record.clone(), || inner.call(req)));

        TracePropagationFuture {
            inner: store::scope(record, future).instrument(span),
            echo,
        }
    }
}

pin_project! {
    /// Future returned by [`TracePropagationService`].
    pub struct TracePropagationFuture<F> {
        #[pin]
        inner: Instrumented<TaskLocalFuture<TraceRecord, F>>,
        echo: Option<HeaderValue>,
    }
}

impl<F, ResBody, E> Future for TracePropagationFuture<F>
where
    F: Future<Output = Result<http::Response<ResBody>, E>>,
{
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        match this.inner.poll(cx) {
            Poll::Ready(Ok(mut response)) => {
                if let Some(value) = this.echo.take() {
                    response.headers_mut().insert(X_REQUEST_ID.clone(), value);
                }
                Poll::Ready(Ok(response))
            }
            other => other,
        }
    }
}
