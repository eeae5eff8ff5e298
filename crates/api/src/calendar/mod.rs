#[cfg(test)]
mod fake_provider;
mod oauth_callback;
mod oauth_start;
mod sync_calendars;

use crate::error::FrontdeskError;
use actix_web::web;
use frontdesk_domain::IntegrationProvider;
use oauth_callback::oauth_callback_controller;
use oauth_start::oauth_start_controller;
use sync_calendars::sync_calendars_controller;

pub use sync_calendars::SyncCalendarsUseCase;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/auth/{provider}", web::get().to(oauth_start_controller));
    cfg.route(
        "/auth/{provider}/callback",
        web::get().to(oauth_callback_controller),
    );
    cfg.route(
        "/appointment-sync",
        web::get().to(sync_calendars_controller),
    );
}

fn provider_from_path(route_name: &str) -> Result<IntegrationProvider, FrontdeskError> {
    route_name.parse().map_err(|_| {
        FrontdeskError::NotFound(format!(
            "There is no calendar provider named: {}",
            route_name
        ))
    })
}
