use actix_web::web;

mod create_dog;
mod delete_dog;

use create_dog::create_dog_controller;
use delete_dog::delete_dog_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/dogs", web::post().to(create_dog_controller));
    cfg.route("/dogs/{dog_id}", web::delete().to(delete_dog_controller));
}
