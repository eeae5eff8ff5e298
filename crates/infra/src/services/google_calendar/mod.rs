mod auth_provider;
mod calendar_api;

use super::calendar_provider::{ICalendarProvider, OAuthError, TokenGrant};
use crate::config::OAuthClientConfig;
use calendar_api::GoogleCalendarRestApi;
use chrono::{DateTime, Utc};
use frontdesk_domain::{IntegrationProvider, ProviderCalendarEvent};
use reqwest::Client;

/// Google urls used by the provider
#[derive(Debug, Clone)]
pub struct GoogleEndpoints {
    pub authorize: String,
    pub token: String,
    pub userinfo: String,
    pub calendar_api: String,
}

impl Default for GoogleEndpoints {
    fn default() -> Self {
        Self {
            authorize: "https://accounts.google.com/o/oauth2/v2/auth".into(),
            token: "https://oauth2.googleapis.com/token".into(),
            userinfo: "https://www.googleapis.com/oauth2/v2/userinfo".into(),
            calendar_api: "https://www.googleapis.com/calendar/v3".into(),
        }
    }
}

pub struct GoogleCalendarProvider {
    client: Client,
    config: OAuthClientConfig,
    endpoints: GoogleEndpoints,
}

impl GoogleCalendarProvider {
    pub fn new(config: OAuthClientConfig) -> Self {
        Self::with_endpoints(config, GoogleEndpoints::default())
    }

    pub fn with_endpoints(config: OAuthClientConfig, endpoints: GoogleEndpoints) -> Self {
        Self {
            client: Client::new(),
            config,
            endpoints,
        }
    }
}

#[async_trait::async_trait]
impl ICalendarProvider for GoogleCalendarProvider {
    fn provider(&self) -> IntegrationProvider {
        IntegrationProvider::Google
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
        let info = GoogleCalendarRestApi::new(&self.client, access_token)
            .user_info(&self.endpoints.userinfo)
            .await?;
        Ok(info.email)
    }

    async fn list_upcoming_events(
        &self,
        access_token: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> anyhow::Result<Vec<ProviderCalendarEvent>> {
        let events = GoogleCalendarRestApi::new(&self.client, access_token)
            .list_events(&self.endpoints.calendar_api, start, end)
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
    use wiremock::{
        matchers::{body_string_contains, header, method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    fn provider(server: &MockServer) -> GoogleCalendarProvider {
        GoogleCalendarProvider::with_endpoints(
            OAuthClientConfig {
                client_id: "client".into(),
                client_secret: "secret".into(),
                redirect_uri: "https://frontdesk.example/api/auth/google/callback".into(),
            },
            GoogleEndpoints {
                authorize: format!("{}/auth", server.uri()),
                token: format!("{}/token", server.uri()),
                userinfo: format!("{}/userinfo", server.uri()),
                calendar_api: format!("{}/calendar/v3", server.uri()),
            },
        )
    }

    #[tokio::test]
    async fn exchanges_code_for_tokens() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=authorization_code"))
            .and(body_string_contains("code=abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "access",
                "refresh_token": "refresh",
                "expires_in": 3599,
                "scope": "https://www.googleapis.com/auth/calendar.readonly",
                "token_type": "Bearer"
            })))
            .mount(&server)
            .await;

        let grant = provider(&server).exchange_code_token("abc").await.unwrap();
        assert_eq!(
            grant,
            TokenGrant {
                access_token: "access".into(),
                refresh_token: Some("refresh".into()),
                expires_in: 3599,
            }
        );
    }

    #[tokio::test]
    async fn reports_rejected_code() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "invalid_grant",
                "error_description": "Bad Request"
            })))
            .mount(&server)
            .await;

        match provider(&server).exchange_code_token("used").await {
            Err(OAuthError::Rejected { error, description }) => {
                assert_eq!(error, "invalid_grant");
                assert_eq!(description.as_deref(), Some("Bad Request"));
            }
            other => panic!("Expected rejected code, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn lists_primary_calendar_events() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/calendar/v3/calendars/primary/events"))
            .and(header("authorization", "Bearer access"))
            .and(query_param("singleEvents", "true"))
            .and(query_param("timeMin", "2024-03-10T00:00:00Z"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    { "id": "evt1", "summary": "Cut", "start": { "dateTime": "2024-03-11T09:00:00Z" } },
                    { "id": "broken", "start": {} }
                ]
            })))
            .mount(&server)
            .await;

        let start = Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap();
        let events = provider(&server)
            .list_upcoming_events("access", start, start + chrono::Duration::days(14))
            .await
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, "evt1");
    }

    #[tokio::test]
    async fn fetches_user_email() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/userinfo"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "id": "1", "email": "owner@bloom.example" })),
            )
            .mount(&server)
            .await;

        let email = provider(&server).get_user_email("access").await.unwrap();
        assert_eq!(email, "owner@bloom.example");
    }
}
