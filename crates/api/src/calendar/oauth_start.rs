use super::provider_from_path;
use crate::{
    error::FrontdeskError,
    shared::usecase::{execute, UseCase},
};
use actix_web::{http::header, web, HttpResponse};
use frontdesk_api_structs::oauth_start::QueryParams;
use frontdesk_domain::{IntegrationProvider, ID};
use frontdesk_infra::FrontdeskContext;
use tracing::info;

pub async fn oauth_start_controller(
    path: web::Path<String>,
    query: web::Query<QueryParams>,
    ctx: web::Data<FrontdeskContext>,
) -> Result<HttpResponse, FrontdeskError> {
    let provider = provider_from_path(&path)?;
    let business_id = match query.business_id.as_deref().map(str::trim) {
        Some(business_id) if !business_id.is_empty() => business_id
            .parse::<ID>()
            .map_err(|e| FrontdeskError::BadClientData(e.to_string()))?,
        _ => {
            return Err(FrontdeskError::BadClientData(
                "Business ID is required".into(),
            ))
        }
    };

    let usecase = OAuthStartUseCase {
        provider,
        business_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|authorize_url| {
            HttpResponse::Found()
                .insert_header((header::LOCATION, authorize_url))
                .finish()
        })
        .map_err(FrontdeskError::from)
}

#[derive(Debug)]
pub enum UseCaseError {
    ProviderNotConfigured(IntegrationProvider),
    InvalidAuthorizeUrl(anyhow::Error),
}

impl From<UseCaseError> for FrontdeskError {
    fn from(_: UseCaseError) -> Self {
        Self::InternalError
    }
}

/// Builds the consent page url a business owner is sent to for connecting a calendar
#[derive(Debug)]
pub struct OAuthStartUseCase {
    pub provider: IntegrationProvider,
    /// Travels through the consent flow as the `state` parameter
    pub business_id: ID,
}

#[async_trait::async_trait(?Send)]
impl UseCase for OAuthStartUseCase {
    type Response = String;

    type Error = UseCaseError;

    const NAME: &'static str = "OAuthStart";

    async fn execute(&mut self, ctx: &FrontdeskContext) -> Result<Self::Response, Self::Error> {
        let provider = ctx
            .calendar_providers
            .get(self.provider)
            .ok_or(UseCaseError::ProviderNotConfigured(self.provider))?;

        info!(
            "Redirecting business: {} to the {} consent page",
            self.business_id, self.provider
        );
        provider
            .authorize_url(self.business_id.as_str())
            .map_err(UseCaseError::InvalidAuthorizeUrl)
    }
}
