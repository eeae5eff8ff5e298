use crate::FrontdeskContext;
use chrono::{DateTime, Utc};
use frontdesk_domain::{Business, IntegrationProvider, ProviderCalendarEvent};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, warn};

/// Tokens handed out by a provider token endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct TokenGrant {
    pub access_token: String,
    /// Not every refresh grant rotates the refresh token
    pub refresh_token: Option<String>,
    /// Lifetime of the access token in seconds
    pub expires_in: i64,
}

#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("The provider rejected the authorization code: {error}")]
    Rejected {
        error: String,
        description: Option<String>,
    },
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

/// A calendar a `Business` can connect and have its events turned into appointments
#[async_trait::async_trait]
pub trait ICalendarProvider: Send + Sync {
    fn provider(&self) -> IntegrationProvider;
    /// Consent page the business owner is redirected to. `state` is echoed back to the callback.
    fn authorize_url(&self, state: &str) -> anyhow::Result<String>;
    async fn exchange_code_token(&self, code: &str) -> Result<TokenGrant, OAuthError>;
    async fn refresh_access_token(&self, refresh_token: &str) -> anyhow::Result<TokenGrant>;
    async fn get_user_email(&self, access_token: &str) -> anyhow::Result<String>;
    /// Events starting between `start` and `end`, soonest first
    async fn list_upcoming_events(
        &self,
        access_token: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> anyhow::Result<Vec<ProviderCalendarEvent>>;
}

/// The configured calendar providers. A provider without oauth client
/// credentials is not available.
#[derive(Clone, Default)]
pub struct CalendarProviders {
    pub google: Option<Arc<dyn ICalendarProvider>>,
    pub outlook: Option<Arc<dyn ICalendarProvider>>,
}

impl CalendarProviders {
    pub fn get(&self, provider: IntegrationProvider) -> Option<Arc<dyn ICalendarProvider>> {
        match provider {
            IntegrationProvider::Google => self.google.clone(),
            IntegrationProvider::Outlook => self.outlook.clone(),
        }
    }
}

/// Returns a valid access token of the business for the provider. An expired
/// token is refreshed first and the new token pair is persisted.
pub async fn get_access_token(
    business: &mut Business,
    provider: &dyn ICalendarProvider,
    ctx: &FrontdeskContext,
) -> Option<String> {
    let kind = provider.provider();
    let tokens = match business.calendar.tokens(kind) {
        Some(tokens) => tokens.clone(),
        None => {
            warn!("Business: {} has no {} tokens", business.id, kind);
            return None;
        }
    };

    let now = ctx.sys.get_timestamp_millis();
    if !tokens.is_expired(now) {
        return Some(tokens.access_token);
    }
    if tokens.refresh_token.is_empty() {
        warn!(
            "The {} access token of business: {} expired and there is no refresh token",
            kind, business.id
        );
        return None;
    }

    let grant = match provider.refresh_access_token(&tokens.refresh_token).await {
        Ok(grant) => grant,
        Err(e) => {
            error!(
                "Unable to refresh {} access token for business: {}. Error: {:?}",
                kind, business.id, e
            );
            return None;
        }
    };
    let refreshed = tokens.refreshed(
        ctx.sys.get_timestamp_millis(),
        grant.access_token,
        grant.refresh_token,
        grant.expires_in,
    );
    if let Err(e) = ctx
        .repos
        .businesses
        .save_tokens(&business.id, kind, &refreshed)
        .await
    {
        error!(
            "Unable to save refreshed {} credentials for business: {}. Error: {:?}",
            kind, business.id, e
        );
    }
    let access_token = refreshed.access_token.clone();
    business.calendar.set_tokens(kind, refreshed);
    Some(access_token)
}
