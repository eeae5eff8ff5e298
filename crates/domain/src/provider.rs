use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// Calendar provider a `Business` can connect to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum IntegrationProvider {
    Google,
    Outlook,
}

impl IntegrationProvider {
    pub fn all() -> [IntegrationProvider; 2] {
        [Self::Google, Self::Outlook]
    }

    /// Value stored in the `Calendar Type` field of a business
    pub fn calendar_type(&self) -> &'static str {
        match self {
            Self::Google => "Google Calendar",
            Self::Outlook => "Microsoft 365",
        }
    }

    pub fn from_calendar_type(calendar_type: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|p| p.calendar_type() == calendar_type)
    }

    /// Human friendly name shown on the oauth confirmation page
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Google => "Google Calendar",
            Self::Outlook => "Microsoft 365 calendar",
        }
    }

    /// Path segment used by the oauth routes
    pub fn route_name(&self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Outlook => "microsoft",
        }
    }
}

impl Display for IntegrationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.route_name())
    }
}

#[derive(Error, Debug)]
#[error("Unknown calendar provider: {0}")]
pub struct UnknownProviderError(String);

impl FromStr for IntegrationProvider {
    type Err = UnknownProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "microsoft" | "outlook" => Ok(Self::Outlook),
            _ => Err(UnknownProviderError(s.to_string())),
        }
    }
}
