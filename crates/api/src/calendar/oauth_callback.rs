use super::provider_from_path;
use crate::{
    error::FrontdeskError,
    shared::usecase::{execute, UseCase},
};
use actix_web::{http::header, web, HttpResponse};
use frontdesk_api_structs::oauth_callback::QueryParams;
use frontdesk_domain::{IntegrationProvider, OAuthTokens, ID};
use frontdesk_infra::{FrontdeskContext, OAuthError};
use quick_xml::escape::partial_escape;
use tracing::{info, warn};

pub async fn oauth_callback_controller(
    path: web::Path<String>,
    query: web::Query<QueryParams>,
    ctx: web::Data<FrontdeskContext>,
) -> Result<HttpResponse, FrontdeskError> {
    let provider = provider_from_path(&path)?;
    let query = query.into_inner();

    if let Some(error) = query.error {
        warn!("The {} consent flow returned an error: {}", provider, error);
        return Err(FrontdeskError::BadClientData(format!(
            "Error: {}",
            query.error_description.unwrap_or(error)
        )));
    }
    let code = match query.code.filter(|code| !code.is_empty()) {
        Some(code) => code,
        None => {
            return Err(FrontdeskError::BadClientData(
                "Authorization code not found".into(),
            ))
        }
    };
    let business_id = match query.state.as_deref().map(str::trim) {
        Some(state) if !state.is_empty() => Some(
            state
                .parse::<ID>()
                .map_err(|e| FrontdeskError::BadClientData(e.to_string()))?,
        ),
        _ => None,
    };

    let usecase = OAuthCallbackUseCase {
        provider,
        code,
        business_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|connected| {
            HttpResponse::Ok()
                .insert_header((header::CONTENT_TYPE, "text/html; charset=utf-8"))
                .body(connected_page(&connected))
        })
        .map_err(FrontdeskError::from)
}

fn connected_page(connected: &ConnectedCalendar) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <title>Calendar Connected</title>
    <style>
      body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; display: flex; align-items: center; justify-content: center; min-height: 100vh; margin: 0; background: #f4f5fb; }}
      .card {{ background: white; padding: 3rem; border-radius: 12px; box-shadow: 0 10px 40px rgba(0,0,0,0.15); text-align: center; max-width: 400px; }}
      .email {{ background: #edf2f7; padding: 0.5rem 1rem; border-radius: 6px; margin: 1rem 0; font-family: monospace; }}
    </style>
  </head>
  <body>
    <div class="card">
      <h1>Calendar Connected!</h1>
      <p>Your {} is now syncing.</p>
      <div class="email">{}</div>
      <p>You can close this window.</p>
    </div>
  </body>
</html>"#,
        connected.provider.display_name(),
        partial_escape(connected.email.as_str())
    )
}

#[derive(Debug)]
pub enum UseCaseError {
    ProviderNotConfigured(IntegrationProvider),
    Rejected(String),
    ProviderError(anyhow::Error),
    BusinessNotFound(ID),
    StorageError(anyhow::Error),
}

impl From<UseCaseError> for FrontdeskError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::Rejected(reason) => Self::BadClientData(format!("Error: {}", reason)),
            UseCaseError::BusinessNotFound(business_id) => Self::NotFound(format!(
                "The business with id: {}, was not found.",
                business_id
            )),
            UseCaseError::ProviderNotConfigured(_)
            | UseCaseError::ProviderError(_)
            | UseCaseError::StorageError(_) => Self::InternalError,
        }
    }
}

/// Finishes the consent flow: trades the code for tokens and stores them on the business
#[derive(Debug)]
pub struct OAuthCallbackUseCase {
    pub provider: IntegrationProvider,
    pub code: String,
    /// The `state` the flow was started with. Without it the tokens are not stored.
    pub business_id: Option<ID>,
}

#[derive(Debug)]
pub struct ConnectedCalendar {
    pub provider: IntegrationProvider,
    pub email: String,
}

#[async_trait::async_trait(?Send)]
impl UseCase for OAuthCallbackUseCase {
    type Response = ConnectedCalendar;

    type Error = UseCaseError;

    const NAME: &'static str = "OAuthCallback";

    async fn execute(&mut self, ctx: &FrontdeskContext) -> Result<Self::Response, Self::Error> {
        let provider = ctx
            .calendar_providers
            .get(self.provider)
            .ok_or(UseCaseError::ProviderNotConfigured(self.provider))?;

        let grant = provider
            .exchange_code_token(&self.code)
            .await
            .map_err(|e| match e {
                OAuthError::Rejected { error, description } => {
                    UseCaseError::Rejected(description.unwrap_or(error))
                }
                OAuthError::Unexpected(e) => UseCaseError::ProviderError(e),
            })?;
        let email = provider
            .get_user_email(&grant.access_token)
            .await
            .map_err(UseCaseError::ProviderError)?;
        info!("Received {} tokens for: {}", self.provider, email);

        let business_id = match &self.business_id {
            Some(business_id) => business_id,
            None => {
                warn!("No business id in the {} callback, tokens are not stored", self.provider);
                return Ok(ConnectedCalendar {
                    provider: self.provider,
                    email,
                });
            }
        };
        let mut business = ctx
            .repos
            .businesses
            .find(business_id)
            .await
            .map_err(UseCaseError::StorageError)?
            .ok_or_else(|| UseCaseError::BusinessNotFound(business_id.clone()))?;

        // Providers only hand out a refresh token on the first consent
        let refresh_token = match grant.refresh_token {
            Some(refresh_token) => refresh_token,
            None => business
                .calendar
                .tokens(self.provider)
                .map(|tokens| tokens.refresh_token.clone())
                .unwrap_or_default(),
        };
        let tokens = OAuthTokens::from_grant(
            ctx.sys.get_timestamp_millis(),
            grant.access_token,
            refresh_token,
            grant.expires_in,
        );
        business
            .calendar
            .connect(self.provider, email.clone(), tokens);
        ctx.repos
            .businesses
            .save_calendar_connection(&business)
            .await
            .map_err(UseCaseError::StorageError)?;
        info!("Connected {} calendar of business: {}", self.provider, business.id);

        Ok(ConnectedCalendar {
            provider: self.provider,
            email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::fake_provider::{
        FakeCalendarProvider, OWNER_EMAIL, RECONSENT_CODE, VALID_CODE,
    };
    use frontdesk_domain::Business;
    use frontdesk_infra::StaticTimeSys;
    use std::sync::Arc;

    const NOW: i64 = 1_710_410_400_000;

    async fn setup() -> (FrontdeskContext, ID) {
        let mut ctx = FrontdeskContext::create_inmemory();
        ctx.sys = Arc::new(StaticTimeSys {
            timestamp_millis: NOW,
        });
        ctx.calendar_providers.outlook = Some(Arc::new(FakeCalendarProvider::new(
            IntegrationProvider::Outlook,
            vec![],
        )));
        let business_id = ctx
            .repos
            .businesses
            .insert(&Business::new("Bloom Salon"))
            .await
            .unwrap();
        (ctx, business_id)
    }

    #[actix_web::main]
    #[test]
    async fn stores_tokens_on_business() {
        let (ctx, business_id) = setup().await;

        let usecase = OAuthCallbackUseCase {
            provider: IntegrationProvider::Outlook,
            code: VALID_CODE.into(),
            business_id: Some(business_id.clone()),
        };
        let connected = execute(usecase, &ctx).await.unwrap();
        assert_eq!(connected.email, OWNER_EMAIL);

        let business = ctx
            .repos
            .businesses
            .find(&business_id)
            .await
            .unwrap()
            .unwrap();
        assert!(business.calendar.syncs_with(IntegrationProvider::Outlook));
        assert_eq!(business.calendar.email.as_deref(), Some(OWNER_EMAIL));
        let tokens = business
            .calendar
            .tokens(IntegrationProvider::Outlook)
            .unwrap();
        assert_eq!(tokens.access_token, "access-1");
        assert_eq!(tokens.refresh_token, "refresh-1");
        assert_eq!(tokens.access_token_expires_ts, NOW + 3600 * 1000);
    }

    #[actix_web::main]
    #[test]
    async fn reconnecting_keeps_refresh_token() {
        let (ctx, business_id) = setup().await;

        for code in &[VALID_CODE, RECONSENT_CODE] {
            let usecase = OAuthCallbackUseCase {
                provider: IntegrationProvider::Outlook,
                code: code.to_string(),
                business_id: Some(business_id.clone()),
            };
            execute(usecase, &ctx).await.unwrap();
        }

        let business = ctx
            .repos
            .businesses
            .find(&business_id)
            .await
            .unwrap()
            .unwrap();
        let tokens = business
            .calendar
            .tokens(IntegrationProvider::Outlook)
            .unwrap();
        assert_eq!(tokens.access_token, "access-3");
        assert_eq!(tokens.refresh_token, "refresh-1");
    }

    #[actix_web::main]
    #[test]
    async fn rejected_code_is_a_client_error() {
        let (ctx, business_id) = setup().await;

        let usecase = OAuthCallbackUseCase {
            provider: IntegrationProvider::Outlook,
            code: "expired".into(),
            business_id: Some(business_id),
        };
        let err = execute(usecase, &ctx).await.unwrap_err();
        match FrontdeskError::from(err) {
            FrontdeskError::BadClientData(msg) => assert_eq!(msg, "Error: Bad code"),
            e => panic!("Unexpected error: {:?}", e),
        }
    }

    #[actix_web::main]
    #[test]
    async fn connects_without_business_id() {
        let (ctx, business_id) = setup().await;

        let usecase = OAuthCallbackUseCase {
            provider: IntegrationProvider::Outlook,
            code: VALID_CODE.into(),
            business_id: None,
        };
        assert!(execute(usecase, &ctx).await.is_ok());
        let business = ctx
            .repos
            .businesses
            .find(&business_id)
            .await
            .unwrap()
            .unwrap();
        assert!(business.calendar.provider.is_none());
    }

    #[test]
    fn confirmation_page_escapes_email() {
        let page = connected_page(&ConnectedCalendar {
            provider: IntegrationProvider::Google,
            email: "<owner>@example.com".into(),
        });
        assert!(page.contains("Your Google Calendar is now syncing."));
        assert!(page.contains("&lt;owner&gt;@example.com"));
    }
}
