use chrono::{DateTime, Utc};
use frontdesk_domain::{IntegrationProvider, ProviderCalendarEvent};
use frontdesk_infra::{ICalendarProvider, OAuthError, TokenGrant};
use std::sync::Mutex;

pub const VALID_CODE: &str = "valid-code";
/// Exchanges like a repeated consent, without a new refresh token
pub const RECONSENT_CODE: &str = "reconsent-code";
pub const OWNER_EMAIL: &str = "owner@bloom.example";

/// Calendar provider answering from memory
pub struct FakeCalendarProvider {
    pub provider: IntegrationProvider,
    pub events: Vec<ProviderCalendarEvent>,
    pub refreshed_with: Mutex<Vec<String>>,
}

impl FakeCalendarProvider {
    pub fn new(provider: IntegrationProvider, events: Vec<ProviderCalendarEvent>) -> Self {
        Self {
            provider,
            events,
            refreshed_with: Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl ICalendarProvider for FakeCalendarProvider {
    fn provider(&self) -> IntegrationProvider {
        self.provider
    }

    fn authorize_url(&self, state: &str) -> anyhow::Result<String> {
        Ok(format!("https://consent.example/authorize?state={}", state))
    }

    async fn exchange_code_token(&self, code: &str) -> Result<TokenGrant, OAuthError> {
        match code {
            VALID_CODE => Ok(TokenGrant {
                access_token: "access-1".into(),
                refresh_token: Some("refresh-1".into()),
                expires_in: 3600,
            }),
            RECONSENT_CODE => Ok(TokenGrant {
                access_token: "access-3".into(),
                refresh_token: None,
                expires_in: 3600,
            }),
            _ => Err(OAuthError::Rejected {
                error: "invalid_grant".into(),
                description: Some("Bad code".into()),
            }),
        }
    }

    async fn refresh_access_token(&self, refresh_token: &str) -> anyhow::Result<TokenGrant> {
        self.refreshed_with
            .lock()
            .unwrap()
            .push(refresh_token.to_string());
        Ok(TokenGrant {
            access_token: "access-2".into(),
            refresh_token: None,
            expires_in: 3600,
        })
    }

    async fn get_user_email(&self, _access_token: &str) -> anyhow::Result<String> {
        Ok(OWNER_EMAIL.into())
    }

    async fn list_upcoming_events(
        &self,
        access_token: &str,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> anyhow::Result<Vec<ProviderCalendarEvent>> {
        if access_token.starts_with("access-") {
            Ok(self.events.clone())
        } else {
            Err(anyhow::anyhow!("Invalid access token"))
        }
    }
}
