mod get_reminder_preview;
mod send_reminders;

use actix_web::web;
use get_reminder_preview::get_reminder_preview_controller;
use send_reminders::send_reminders_controller;

pub use send_reminders::SendRemindersUseCase;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/appointment-reminders",
        web::get().to(send_reminders_controller),
    );
    cfg.route(
        "/debug-reminders",
        web::get().to(get_reminder_preview_controller),
    );
}
