use crate::{base::RawResponse, APIResponse, BaseClient};
use frontdesk_api_structs::{get_reminder_preview, send_reminders};
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct ReminderClient {
    base: Arc<BaseClient>,
}

impl ReminderClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    /// Runs a reminder sweep, the way the external cron does
    pub async fn send_reminders(&self) -> APIResponse<send_reminders::APIResponse> {
        self.base
            .get("api/appointment-reminders".into(), StatusCode::OK)
            .await
    }

    pub async fn send_reminders_raw(&self) -> APIResponse<RawResponse> {
        self.base.get_raw("api/appointment-reminders".into()).await
    }

    /// Which appointment dates the next sweep looks for
    pub async fn preview(&self) -> APIResponse<get_reminder_preview::APIResponse> {
        self.base
            .get("api/debug-reminders".into(), StatusCode::OK)
            .await
    }
}
