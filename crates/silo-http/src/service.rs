//! The hyper-facing HTTP service.
//!
//! [`SiloHttpService`] is the boundary between the external HTTP server and
//! the S3 pipeline. It intercepts liveness probes before routing or
//! authentication, delegates everything else to the [`S3Dispatcher`], and
//! stamps the common response headers (`x-amz-request-id`, `Server`) onto
//! every response.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use hyper::body::Incoming;
use hyper::service::Service;
use tracing::debug;
use uuid::Uuid;

use crate::body::ResponseBody;
use crate::dispatch::S3Dispatcher;

/// Hyper `Service` wrapping the S3 dispatcher.
#[derive(Debug, Clone)]
pub struct SiloHttpService {
    dispatcher: Arc<S3Dispatcher>,
}

impl SiloHttpService {
    /// Wrap a dispatcher.
    #[must_use]
    pub fn new(dispatcher: S3Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }
}

impl Service<http::Request<Incoming>> for SiloHttpService {
    type Response = http::Response<ResponseBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<Incoming>) -> Self::Future {
        let dispatcher = Arc::clone(&self.dispatcher);

        Box::pin(async move {
            let request_id = Uuid::new_v4().to_string();

            let mut response = if is_health_check(req.method(), req.uri().path()) {
                health_check_response()
            } else {
                debug!(method = %req.method(), uri = %req.uri(), %request_id, "handling request");
                dispatcher.handle(req).await
            };

            add_common_headers(&mut response, &request_id);
            Ok(response)
        })
    }
}

/// Whether the request is a liveness probe. Probes bypass authentication.
fn is_health_check(method: &http::Method, path: &str) -> bool {
    *method == http::Method::GET && (path == "/health" || path == "/_health")
}

/// A small JSON liveness response.
fn health_check_response() -> http::Response<ResponseBody> {
    http::Response::builder()
        .status(http::StatusCode::OK)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(ResponseBody::from_bytes(
            &br#"{"status":"running","service":"silo"}"#[..],
        ))
        .expect("static health response is valid")
}

/// Stamp the common response headers.
fn add_common_headers(response: &mut http::Response<ResponseBody>, request_id: &str) {
    let headers = response.headers_mut();
    if let Ok(value) = http::header::HeaderValue::from_str(request_id) {
        headers.insert("x-amz-request-id", value);
    }
    headers.insert("Server", http::header::HeaderValue::from_static("Silo"));
}
