use crate::{base::RawResponse, APIResponse, BaseClient};
use frontdesk_api_structs::sync_calendars;
use frontdesk_domain::IntegrationProvider;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct CalendarClient {
    base: Arc<BaseClient>,
}

pub struct OAuthCallbackInput {
    pub provider: IntegrationProvider,
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

impl CalendarClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    /// The redirect to the consent page of the provider. It is not followed.
    pub async fn start_oauth(
        &self,
        provider: IntegrationProvider,
        business_id: Option<String>,
    ) -> APIResponse<RawResponse> {
        let mut path = format!("api/auth/{}", provider.route_name());
        if let Some(business_id) = business_id {
            path = format!("{}?businessId={}", path, business_id);
        }
        self.base.get_raw(path).await
    }

    pub async fn oauth_callback(&self, input: OAuthCallbackInput) -> APIResponse<RawResponse> {
        let params = [
            ("code", input.code),
            ("state", input.state),
            ("error", input.error),
        ];
        let query = params
            .iter()
            .filter_map(|(key, value)| value.as_ref().map(|value| format!("{}={}", key, value)))
            .collect::<Vec<_>>()
            .join("&");
        let path = format!("api/auth/{}/callback?{}", input.provider.route_name(), query);
        self.base.get_raw(path).await
    }

    pub async fn sync(&self) -> APIResponse<sync_calendars::APIResponse> {
        self.base
            .get("api/appointment-sync".into(), StatusCode::OK)
            .await
    }
}
