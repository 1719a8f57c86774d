mod create_reminder;
mod delete_reminder;
mod get_reminders;
pub mod process_reminders;

use actix_web::web;
use create_reminder::create_reminder_controller;
use delete_reminder::delete_reminder_controller;
use get_reminders::get_reminders_controller;
use process_reminders::process_reminders_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // Registered before the `{reminder_id}` routes so that `process`
    // is never interpreted as an id
    cfg.route(
        "/reminders/process",
        web::post().to(process_reminders_controller),
    );

    cfg.route("/reminders", web::post().to(create_reminder_controller));
    cfg.route("/reminders", web::get().to(get_reminders_controller));
    cfg.route(
        "/reminders/{reminder_id}",
        web::delete().to(delete_reminder_controller),
    );
}
