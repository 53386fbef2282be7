use actix_web::web;

mod add_family_member;
mod create_family;
mod get_family;
mod remove_family_member;
mod update_family;

use add_family_member::add_family_member_controller;
use create_family::create_family_controller;
use get_family::get_family_controller;
use remove_family_member::remove_family_member_controller;
use update_family::update_family_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/family", web::post().to(create_family_controller));
    cfg.route("/family", web::get().to(get_family_controller));
    cfg.route("/family", web::put().to(update_family_controller));

    cfg.route("/family/users", web::post().to(add_family_member_controller));
    cfg.route(
        "/family/users/{user_id}",
        web::delete().to(remove_family_member_controller),
    );
}
