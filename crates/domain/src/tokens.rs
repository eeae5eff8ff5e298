/// Credentials a `Business` obtained from a calendar provider
#[derive(Debug, Clone, PartialEq)]
pub struct OAuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    /// Timestamp in millis at which `access_token` stops being valid
    pub access_token_expires_ts: i64,
}

impl OAuthTokens {
    /// Builds the token pair from a provider grant where `expires_in` is given in seconds
    pub fn from_grant(
        now_ts: i64,
        access_token: String,
        refresh_token: String,
        expires_in: i64,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            access_token_expires_ts: now_ts + expires_in * 1000,
        }
    }

    pub fn is_expired(&self, now_ts: i64) -> bool {
        self.access_token_expires_ts <= now_ts
    }

    /// Applies a refresh grant. Some providers do not rotate the refresh
    /// token, in which case the current one is kept.
    pub fn refreshed(
        &self,
        now_ts: i64,
        access_token: String,
        refresh_token: Option<String>,
        expires_in: i64,
    ) -> Self {
        Self::from_grant(
            now_ts,
            access_token,
            refresh_token.unwrap_or_else(|| self.refresh_token.clone()),
            expires_in,
        )
    }
}
