use std::sync::Arc;
use std::task::{Context, Poll};

use http::{HeaderMap, Request};
use tower::{Layer, Service};
use tracelink_core::store;

use crate::carrier::inject_headers;

/// Tower layer for HTTP clients that forwards the current request's trace
/// context on every outgoing request.
///
/// The record is read from the enclosing [`store::scope`]. Requests sent
/// outside any scope, or from a scope holding an empty record, go out with
/// their headers untouched.
///
/// Default headers set with [`with_default_headers`](Self::with_default_headers)
/// are shared by every request. Each request gets its own copy, with the
/// request's own headers taking precedence; the shared map is never modified.
#[derive(Clone, Default)]
pub struct PropagateTraceLayer {
    default_headers: Option<Arc<HeaderMap>>,
}

impl PropagateTraceLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers = Some(Arc::new(headers));
        self
    }
}

impl<S> Layer<S> for PropagateTraceLayer {
    type Service = PropagateTraceService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        PropagateTraceService {
            inner,
            default_headers: self.default_headers.clone(),
        }
    }
}

/// Service produced by [`PropagateTraceLayer`].
#[derive(Clone)]
pub struct PropagateTraceService<S> {
    inner: S,
    default_headers: Option<Arc<HeaderMap>>,
}

impl<S, ReqBody> Service<Request<ReqBody>> for PropagateTraceService<S>
where
    S: Service<Request<ReqBody>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        if let Some(defaults) = &self.default_headers {
            let mut headers = HeaderMap::clone(defaults);
            // Names present on the request replace the defaults wholesale.
            headers.extend(std::mem::take(req.headers_mut()));
            *req.headers_mut() = headers;
        }

        match store::current() {
            Ok(record) if !record.is_empty() => {
                let injected = inject_headers(&record, req.headers_mut());
                tracing::trace!(target: "tracelink::http", ?injected, "propagated trace headers");
            }
            Ok(_) => {}
            Err(err) => {
                tracing::trace!(target: "tracelink::http", %err, "no trace scope for outbound request");
            }
        }
        self.inner.call(req)
    }
}
