mod delivery;
mod dispatch_due_reminders;
mod owner_cache;

use actix_web::web;
use dispatch_due_reminders::dispatch_due_reminders_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/reminders/dispatch",
        web::post().to(dispatch_due_reminders_controller),
    );
}
