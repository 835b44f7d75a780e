//! Prometheus request metrics, compiled with the `metrics` feature.

use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};

/// Namespace prefixed to every exported series.
pub const METRICS_NAMESPACE: &str = "listings";

/// Build the middleware that records request counts and latencies and serves
/// them at `/metrics`.
///
/// # Errors
/// Returns an I/O error when the registry rejects the collectors.
pub fn make_metrics() -> std::io::Result<PrometheusMetrics> {
    PrometheusMetricsBuilder::new(METRICS_NAMESPACE)
        .endpoint("/metrics")
        .build()
        .map_err(|err| std::io::Error::other(format!("configure Prometheus metrics: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test, web};

    #[actix_web::test]
    async fn endpoint_exports_the_namespace() {
        let metrics = make_metrics().expect("metrics build");
        let app = test::init_service(
            App::new()
                .wrap(metrics)
                .route("/ping", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;
        test::call_service(&app, test::TestRequest::get().uri("/ping").to_request()).await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/metrics").to_request()).await;
        let body = test::read_body(res).await;
        let text = std::str::from_utf8(&body).expect("utf8 body");
        assert!(text.contains("listings_http_requests_total"));
    }
}
