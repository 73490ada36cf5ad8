use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CollectionError, Result};

pub const HOUSEHOLD_ID_REQUIRED: &str = "Household ID is required.";

/// Opaque household identifier as printed in the household's QR code
/// (for example `H001`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HouseholdId(String);

impl HouseholdId {
    /// Parse a raw identifier from a scan. Scanners frequently append a
    /// newline, so surrounding whitespace is dropped before validation.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CollectionError::InvalidRequest(
                HOUSEHOLD_ID_REQUIRED.to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Parse an optional query value; absence is treated like an empty id.
    pub fn parse_optional(raw: Option<&str>) -> Result<Self> {
        Self::parse(raw.unwrap_or_default())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HouseholdId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for HouseholdId {
    type Error = CollectionError;

    fn try_from(raw: String) -> Result<Self> {
        Self::parse(&raw)
    }
}

impl From<HouseholdId> for String {
    fn from(id: HouseholdId) -> Self {
        id.0
    }
}

impl AsRef<str> for HouseholdId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_scanner_whitespace() {
        let id = HouseholdId::parse("  H042\n").expect("valid id");
        assert_eq!(id.as_str(), "H042");
    }

    #[test]
    fn rejects_blank_identifier() {
        let err = HouseholdId::parse("   ").unwrap_err();
        assert!(matches!(
            err,
            CollectionError::InvalidRequest(ref msg) if msg == HOUSEHOLD_ID_REQUIRED
        ));
    }

    #[test]
    fn deserializing_applies_the_same_checks() {
        let id: HouseholdId = serde_json::from_str("\" H010 \"").unwrap();
        assert_eq!(id.as_str(), "H010");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"H010\"");

        let err = serde_json::from_str::<HouseholdId>("\"  \"").unwrap_err();
        assert!(err.to_string().contains(HOUSEHOLD_ID_REQUIRED));
    }

    #[test]
    fn missing_identifier_is_invalid() {
        assert!(HouseholdId::parse_optional(None).is_err());
    }
}
