//! HTTP inbound adapter exposing the directory's REST endpoints.

pub mod envelope;
pub mod error;
pub mod health;
pub mod organizations;
pub mod schemas;
pub mod state;
pub mod stats;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Mount every directory endpoint under `/api`.
///
/// Handlers expect `web::Data<HttpState>` to be registered on the app.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use orgdirectory::inbound::http::{configure_api, state::HttpState};
///
/// let _app = App::new()
///     .app_data(web::Data::new(HttpState::fixtures()))
///     .configure(configure_api);
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(validation::json_config())
            .service(organizations::list_organizations)
            .service(organizations::get_organization)
            .service(organizations::create_organization)
            .service(organizations::update_organization)
            .service(organizations::delete_organization)
            .service(users::list_users)
            .service(users::list_users_by_organization)
            .service(users::get_user)
            .service(users::create_user)
            .service(users::update_user)
            .service(users::delete_user)
            .service(stats::get_stats),
    );
}
