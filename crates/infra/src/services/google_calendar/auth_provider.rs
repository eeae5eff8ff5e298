use super::GoogleEndpoints;
use crate::config::OAuthClientConfig;
use crate::services::calendar_provider::{OAuthError, TokenGrant};
use reqwest::Client;
use serde::Deserialize;
use tracing::error;
use url::Url;

// https://developers.google.com/identity/protocols/oauth2/web-server#httprest_3

const REQUIRED_OAUTH_SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/calendar.readonly",
    "https://www.googleapis.com/auth/userinfo.email",
];

pub fn authorize_url(
    endpoints: &GoogleEndpoints,
    config: &OAuthClientConfig,
    state: &str,
) -> anyhow::Result<String> {
    let url = Url::parse_with_params(
        &endpoints.authorize,
        &[
            ("client_id", config.client_id.as_str()),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("response_type", "code"),
            ("scope", &REQUIRED_OAUTH_SCOPES.join(" ")),
            ("access_type", "offline"),
            ("prompt", "consent"),
            ("state", state),
        ],
    )?;
    Ok(url.into())
}

// Google api actually returns snake case response
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

impl From<TokenResponse> for TokenGrant {
    fn from(res: TokenResponse) -> Self {
        Self {
            access_token: res.access_token,
            refresh_token: res.refresh_token,
            expires_in: res.expires_in,
        }
    }
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
                "Google token endpoint responded with status: {}",
                status
            ))),
        };
    }

    res.json::<TokenResponse>()
        .await
        .map(TokenGrant::from)
        .map_err(|e| {
            error!(
                "[Unexpected Response] Google token endpoint. Error message: {:?}",
                e
            );
            OAuthError::Unexpected(anyhow::Error::new(e))
        })
}

pub async fn exchange_code_token(
    client: &Client,
    endpoints: &GoogleEndpoints,
    config: &OAuthClientConfig,
    code: &str,
) -> Result<TokenGrant, OAuthError> {
    let params = [
        ("client_id", config.client_id.as_str()),
        ("client_secret", config.client_secret.as_str()),
        ("redirect_uri", config.redirect_uri.as_str()),
        ("code", code),
        ("grant_type", "authorization_code"),
    ];
    post_token_form(client, &endpoints.token, &params).await
}

pub async fn refresh_access_token(
    client: &Client,
    endpoints: &GoogleEndpoints,
    config: &OAuthClientConfig,
    refresh_token: &str,
) -> anyhow::Result<TokenGrant> {
    let params = [
        ("client_id", config.client_id.as_str()),
        ("client_secret", config.client_secret.as_str()),
        ("refresh_token", refresh_token),
        ("grant_type", "refresh_token"),
    ];
    post_token_form(client, &endpoints.token, &params)
        .await
        .map_err(|e| anyhow::anyhow!("Unable to refresh google access token: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_consent_url() {
        let config = OAuthClientConfig {
            client_id: "client".into(),
            client_secret: "secret".into(),
            redirect_uri: "https://frontdesk.example/api/auth/google/callback".into(),
        };
        let url = authorize_url(&GoogleEndpoints::default(), &config, "recBiz1").unwrap();
        let url = Url::parse(&url).unwrap();
        assert_eq!(url.host_str(), Some("accounts.google.com"));
        let params: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();
        assert_eq!(params["state"], "recBiz1");
        assert_eq!(params["access_type"], "offline");
        assert_eq!(params["prompt"], "consent");
        assert_eq!(
            params["redirect_uri"],
            "https://frontdesk.example/api/auth/google/callback"
        );
        assert!(params["scope"].contains("calendar.readonly"));
    }
}
