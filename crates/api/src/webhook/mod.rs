mod appointment_reply;
mod incoming_call;
mod sms_reply;

use actix_web::web;
use appointment_reply::appointment_reply_controller;
use incoming_call::incoming_call_controller;
use sms_reply::sms_reply_controller;

// Twilio webhooks, every route answers with TwiML
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/call-status", web::post().to(incoming_call_controller));
    cfg.route(
        "/appointment-reply",
        web::post().to(appointment_reply_controller),
    );
    cfg.route("/sms-reply", web::post().to(sms_reply_controller));
}
