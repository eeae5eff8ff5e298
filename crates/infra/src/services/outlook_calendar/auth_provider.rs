use super::OutlookEndpoints;
use crate::config::OAuthClientConfig;
use crate::services::calendar_provider::{OAuthError, TokenGrant};
use reqwest::Client;
use serde::Deserialize;
use tracing::error;
use url::Url;

// https://docs.microsoft.com/en-us/graph/auth-v2-user

const CONSENT_SCOPES: [&str; 3] = [
    "https://graph.microsoft.com/Calendars.Read",
    "https://graph.microsoft.com/User.Read",
    "offline_access",
];
const TOKEN_SCOPES: [&str; 2] = ["https://graph.microsoft.com/Calendars.Read", "offline_access"];

pub fn authorize_url(
    endpoints: &OutlookEndpoints,
    config: &OAuthClientConfig,
    state: &str,
) -> anyhow::Result<String> {
    let url = Url::parse_with_params(
        &endpoints.authorize,
        &[
            ("client_id", config.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("response_mode", "query"),
            ("scope", &CONSENT_SCOPES.join(" ")),
            ("state", state),
        ],
    )?;
    Ok(url.into())
}

// https://docs.microsoft.com/en-us/graph/auth-v2-user#token-response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    // Access token expires in specified in seconds
    expires_in: i64,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

async fn post_token_form(
    client: &Client,
    endpoint: &str,
    params: &[(&str, &str)],
) -> Result<TokenGrant, OAuthError> {
    let res = client
        .post(endpoint)
        .form(params)
        .send()
        .await
        .map_err(|e| OAuthError::Unexpected(anyhow::Error::new(e)))?;

    if !res.status().is_success() {
        let status = res.status();
        return match res.json::<TokenErrorResponse>().await {
            Ok(err) => Err(OAuthError::Rejected {
                error: err.error,
                description: err.error_description,
            }),
            Err(_) => Err(OAuthError::Unexpected(anyhow::anyhow!(
                "Microsoft token endpoint responded with status: {}",
                status
            ))),
        };
    }

    let res = res.json::<TokenResponse>().await.map_err(|e| {
        error!(
            "[Unexpected Response] Microsoft token endpoint. Error message: {:?}",
            e
        );
        OAuthError::Unexpected(anyhow::Error::new(e))
    })?;
    Ok(TokenGrant {
        access_token: res.access_token,
        refresh_token: res.refresh_token,
        expires_in: res.expires_in,
    })
}

pub async fn exchange_code_token(
    client: &Client,
    endpoints: &OutlookEndpoints,
    config: &OAuthClientConfig,
    code: &str,
) -> Result<TokenGrant, OAuthError> {
    let scope = TOKEN_SCOPES.join(" ");
    let params = [
        ("client_id", config.client_id.as_str()),
        ("client_secret", config.client_secret.as_str()),
        ("redirect_uri", config.redirect_uri.as_str()),
        ("code", code),
        ("scope", scope.as_str()),
        ("grant_type", "authorization_code"),
    ];
    post_token_form(client, &endpoints.token, &params).await
}

pub async fn refresh_access_token(
    client: &Client,
    endpoints: &OutlookEndpoints,
    config: &OAuthClientConfig,
    refresh_token: &str,
) -> anyhow::Result<TokenGrant> {
    let scope = TOKEN_SCOPES.join(" ");
    let params = [
        ("client_id", config.client_id.as_str()),
        ("client_secret", config.client_secret.as_str()),
        ("refresh_token", refresh_token),
        ("scope", scope.as_str()),
        ("grant_type", "refresh_token"),
    ];
    post_token_form(client, &endpoints.token, &params)
        .await
        .map_err(|e| anyhow::anyhow!("Unable to refresh microsoft access token: {}", e))
}
