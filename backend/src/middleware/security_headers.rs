//! Hardening headers added to every response.

use actix_web::middleware::DefaultHeaders;

/// Headers applied to every response unless a handler already set them.
pub const SECURITY_HEADERS: [(&str, &str); 3] = [
    ("X-Content-Type-Options", "nosniff"),
    ("X-Frame-Options", "DENY"),
    ("X-XSS-Protection", "1; mode=block"),
];

/// Build the middleware that stamps [`SECURITY_HEADERS`] onto responses.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use listings::middleware::security_headers;
///
/// let _app = App::new().wrap(security_headers());
/// ```
pub fn security_headers() -> DefaultHeaders {
    SECURITY_HEADERS
        .iter()
        .fold(DefaultHeaders::new(), |headers, pair| headers.add(*pair))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test, web};

    #[actix_web::test]
    async fn responses_carry_hardening_headers() {
        let app = test::init_service(
            App::new()
                .wrap(security_headers())
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

        for (name, value) in SECURITY_HEADERS {
            let header = res.headers().get(name).expect("header present");
            assert_eq!(header.to_str().expect("ascii"), value);
        }
    }
}
