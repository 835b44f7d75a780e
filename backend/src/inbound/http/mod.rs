//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

pub mod auth;
pub mod error;
pub mod health;
pub mod listings;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

/// Register the `/api` scope and the extractor settings it relies on.
///
/// Callers still provide `web::Data<HttpState>` and `web::Data<HealthState>`.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use listings::inbound::http::configure_api;
///
/// let app = App::new().configure(configure_api);
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(error::json_config())
        .app_data(error::query_config())
        .app_data(error::path_config())
        .service(
            web::scope("/api")
                .service(health::api_health)
                .service(listings::create_listing)
                .service(listings::list_listings)
                .service(listings::get_listing)
                .service(listings::update_listing)
                .service(listings::delete_listing)
                .service(users::add_favorite)
                .service(users::remove_favorite)
                .service(users::list_favorites)
                .service(users::recommend)
                .service(users::list_recommendations),
        );
}
