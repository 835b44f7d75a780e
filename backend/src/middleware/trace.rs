//! Request correlation and access logging.
//!
//! [`Trace`] gives each request a [`TraceId`], reusing a well-formed
//! `trace-id` request header so callers can correlate across services. The
//! identifier is in scope for handlers, stamped onto the response header,
//! and recorded on a `request` span alongside the final status and latency.

use std::rc::Rc;
use std::time::Instant;

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::header::{HeaderName, HeaderValue};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{Instrument, info, info_span, warn};

use crate::domain::{TRACE_ID_HEADER, TraceId};

/// Middleware factory; see the module docs.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use listings::middleware::Trace;
///
/// let app = App::new().wrap(Trace);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Trace;

impl<S, B> Transform<S, ServiceRequest> for Trace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct TraceMiddleware<S> {
    service: Rc<S>,
}

fn incoming_trace_id(req: &ServiceRequest) -> TraceId {
    let header = req
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok());
    TraceId::from_header_or_new(header)
}

impl<S, B> Service<ServiceRequest> for TraceMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let trace_id = incoming_trace_id(&req);
        let span = info_span!(
            "request",
            %trace_id,
            method = %req.method(),
            path = %req.path(),
        );
        let service = Rc::clone(&self.service);
        let started = Instant::now();

        let handled = async move {
            let mut res = service.call(req).await?;
            let elapsed_ms = started.elapsed().as_millis();
            info!(status = res.status().as_u16(), elapsed_ms, "request completed");
            match HeaderValue::from_str(&trace_id.to_string()) {
                Ok(value) => {
                    res.headers_mut()
                        .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
                }
                Err(error) => warn!(%error, "trace id is not a valid header value"),
            }
            Ok(res)
        };
        Box::pin(TraceId::scope(trace_id, handled).instrument(span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Error as ApiError;
    use actix_web::{App, HttpResponse, test, web};

    async fn echo_current() -> HttpResponse {
        match TraceId::current() {
            Some(id) => HttpResponse::Ok().body(id.to_string()),
            None => HttpResponse::InternalServerError().finish(),
        }
    }

    async fn refuse() -> Result<HttpResponse, ApiError> {
        Err(ApiError::forbidden("Not authorized"))
    }

    fn header(res: &ServiceResponse, name: &str) -> String {
        res.headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .expect("header present")
            .to_owned()
    }

    #[actix_web::test]
    async fn handler_sees_the_identifier_in_the_header() {
        let app = test::init_service(
            App::new().wrap(Trace).route("/", web::get().to(echo_current)),
        )
        .await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

        let trace_id = header(&res, TRACE_ID_HEADER);
        assert!(trace_id.parse::<TraceId>().is_ok());
        let body = test::read_body(res).await;
        assert_eq!(body, trace_id.as_bytes());
    }

    #[actix_web::test]
    async fn supplied_identifier_is_propagated() {
        let supplied = "6f1c2a3e-9d4b-4f6a-8e2d-1b3c5d7e9f01";
        let app = test::init_service(
            App::new().wrap(Trace).route("/", web::get().to(echo_current)),
        )
        .await;
        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((TRACE_ID_HEADER, supplied))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(header(&res, TRACE_ID_HEADER), supplied);
    }

    #[actix_web::test]
    async fn error_body_names_the_request() {
        let app =
            test::init_service(App::new().wrap(Trace).route("/", web::get().to(refuse))).await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

        let trace_id = header(&res, TRACE_ID_HEADER);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["traceId"], trace_id.as_str());
    }
}
