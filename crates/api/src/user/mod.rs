use actix_web::web;

mod get_me;
mod update_notification_settings;

use get_me::get_me_controller;
use update_notification_settings::update_notification_settings_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/me", web::get().to(get_me_controller));
    cfg.route(
        "/me/settings",
        web::put().to(update_notification_settings_controller),
    );
}
