mod auth_provider;
mod calendar_api;

use super::calendar_provider::{ICalendarProvider, OAuthError, TokenGrant};
use crate::config::OAuthClientConfig;
use anyhow::anyhow;
use calendar_api::OutlookCalendarRestApi;
use chrono::{DateTime, Utc};
use frontdesk_domain::{IntegrationProvider, ProviderCalendarEvent};
use reqwest::Client;

// https://docs.microsoft.com/en-us/graph/api/resources/event?view=graph-rest-1.0

#[derive(Debug, Clone)]
pub struct OutlookEndpoints {
    pub authorize: String,
    pub token: String,
    pub graph_api: String,
}

impl Default for OutlookEndpoints {
    fn default() -> Self {
        Self {
            authorize: "https://login.microsoftonline.com/common/oauth2/v2.0/authorize".into(),
            token: "https://login.microsoftonline.com/common/oauth2/v2.0/token".into(),
            graph_api: "https://graph.microsoft.com/v1.0".into(),
        }
    }
}

pub struct OutlookCalendarProvider {
    client: Client,
    config: OAuthClientConfig,
    endpoints: OutlookEndpoints,
}

impl OutlookCalendarProvider {
    pub fn new(config: OAuthClientConfig) -> Self {
        Self::with_endpoints(config, OutlookEndpoints::default())
    }

    pub fn with_endpoints(config: OAuthClientConfig, endpoints: OutlookEndpoints) -> Self {
        Self {
            client: Client::new(),
            config,
            endpoints,
        }
    }
}

#[async_trait::async_trait]
impl ICalendarProvider for OutlookCalendarProvider {
    fn provider(&self) -> IntegrationProvider {
        IntegrationProvider::Outlook
    }

    fn authorize_url(&self, state: &str) -> anyhow::Result<String> {
        auth_provider::authorize_url(&self.endpoints, &self.config, state)
    }

    async fn exchange_code_token(&self, code: &str) -> Result<TokenGrant, OAuthError> {
        auth_provider::exchange_code_token(&self.client, &self.endpoints, &self.config, code).await
    }

    async fn refresh_access_token(&self, refresh_token: &str) -> anyhow::Result<TokenGrant> {
        auth_provider::refresh_access_token(
            &self.client,
            &self.endpoints,
            &self.config,
            refresh_token,
        )
        .await
    }

    async fn get_user_email(&self, access_token: &str) -> anyhow::Result<String> {
        OutlookCalendarRestApi::new(&self.client, access_token)
            .me(&self.endpoints.graph_api)
            .await?
            .email()
            .ok_or_else(|| anyhow!("Microsoft account has no email address"))
    }

    async fn list_upcoming_events(
        &self,
        access_token: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> anyhow::Result<Vec<ProviderCalendarEvent>> {
        let events = OutlookCalendarRestApi::new(&self.client, access_token)
            .list_events(&self.endpoints.graph_api, start, end)
            .await?;
        Ok(events
            .into_iter()
            .filter_map(|e| e.into_provider_event())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;
    use url::Url;
    use wiremock::{
        matchers::{body_string_contains, header, method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    fn config() -> OAuthClientConfig {
        OAuthClientConfig {
            client_id: "client".into(),
            client_secret: "secret".into(),
            redirect_uri: "https://frontdesk.example/api/auth/microsoft/callback".into(),
        }
    }

    fn provider(server: &MockServer) -> OutlookCalendarProvider {
        OutlookCalendarProvider::with_endpoints(
            config(),
            OutlookEndpoints {
                authorize: format!("{}/authorize", server.uri()),
                token: format!("{}/token", server.uri()),
                graph_api: format!("{}/v1.0", server.uri()),
            },
        )
    }

    #[test]
    fn builds_consent_url() {
        let url = OutlookCalendarProvider::new(config())
            .authorize_url("recBiz1")
            .unwrap();
        let url = Url::parse(&url).unwrap();
        assert_eq!(url.host_str(), Some("login.microsoftonline.com"));
        let params: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();
        assert_eq!(params["state"], "recBiz1");
        assert_eq!(params["response_mode"], "query");
        assert!(params["scope"].contains("offline_access"));
        assert!(params["scope"].contains("User.Read"));
    }

    #[tokio::test]
    async fn refreshes_access_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("refresh_token=old-refresh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token_type": "Bearer",
                "access_token": "new-access",
                "refresh_token": "new-refresh",
                "expires_in": 3600
            })))
            .expect(1)
            .mount(&server)
            .await;

        let grant = provider(&server)
            .refresh_access_token("old-refresh")
            .await
            .unwrap();
        assert_eq!(grant.access_token, "new-access");
        assert_eq!(grant.refresh_token.as_deref(), Some("new-refresh"));
    }

    #[tokio::test]
    async fn lists_events_in_utc() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1.0/me/calendar/events"))
            .and(header("prefer", "outlook.timezone=\"UTC\""))
            .and(query_param(
                "$filter",
                "start/dateTime ge '2024-03-10T00:00:00Z' and start/dateTime le '2024-03-24T00:00:00Z'",
            ))
            .and(query_param("$orderby", "start/dateTime"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "value": [{
                    "id": "AAMk1",
                    "subject": "Consultation",
                    "start": { "dateTime": "2024-03-11T09:00:00.0000000", "timeZone": "UTC" }
                }]
            })))
            .mount(&server)
            .await;

        let start = Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap();
        let events = provider(&server)
            .list_upcoming_events("access", start, start + chrono::Duration::days(14))
            .await
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title.as_deref(), Some("Consultation"));
    }
}
