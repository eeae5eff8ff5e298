use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

pub trait Entity {
    fn id(&self) -> &ID;
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

/// Identifier of a record in the record store.
///
/// The record store hands out opaque string ids (e.g. `recA1b2C3d4E5f6G7`),
/// so this is a thin wrapper around the raw string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ID(String);

impl ID {
    /// Generates a new record-store style identifier. Used by in-memory
    /// repositories where nobody else hands out ids.
    pub fn new() -> Self {
        let raw = uuid::Uuid::new_v4().to_simple().to_string();
        Self(format!("rec{}", &raw[..14]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ID {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for ID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum InvalidIDError {
    #[error("ID: {0} is malformed")]
    Malformed(String),
}

impl FromStr for ID {
    type Err = InvalidIDError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || !s.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(InvalidIDError::Malformed(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_record_ids() {
        let id = "recA1b2C3d4E5f6G7".parse::<ID>().unwrap();
        assert_eq!(id.as_str(), "recA1b2C3d4E5f6G7");
        assert_eq!(id.to_string(), "recA1b2C3d4E5f6G7");
    }

    #[test]
    fn rejects_malformed_ids() {
        assert!("".parse::<ID>().is_err());
        assert!("rec'} OR TRUE()".parse::<ID>().is_err());
        assert!("rec/../x".parse::<ID>().is_err());
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = ID::new();
        let b = ID::new();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("rec"));
        assert!(a.as_str().parse::<ID>().is_ok());
    }
}
