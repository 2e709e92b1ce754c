//! Identifier types for the review domain.
//!
//! Users, teams and pull requests are identified by opaque strings supplied
//! by clients. Validation only rejects blank values and values that would not
//! fit the `VARCHAR(255)` storage columns.

use super::ReviewDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum identifier length accepted by the storage schema.
const MAX_IDENTIFIER_LENGTH: usize = 255;

pub(super) fn validate_identifier(
    raw: String,
    field: &'static str,
) -> Result<String, ReviewDomainError> {
    if raw.trim().is_empty() {
        return Err(ReviewDomainError::EmptyIdentifier { field });
    }
    let length = raw.chars().count();
    if length > MAX_IDENTIFIER_LENGTH {
        return Err(ReviewDomainError::IdentifierTooLong {
            field,
            length,
            max: MAX_IDENTIFIER_LENGTH,
        });
    }
    Ok(raw)
}

/// Opaque identifier of a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a validated user identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewDomainError::EmptyIdentifier`] for blank input or
    /// [`ReviewDomainError::IdentifierTooLong`] past 255 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, ReviewDomainError> {
        validate_identifier(value.into(), "user_id").map(Self)
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique team name. Teams have no other identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamName(String);

impl TeamName {
    /// Creates a validated team name.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewDomainError::EmptyIdentifier`] for blank input or
    /// [`ReviewDomainError::IdentifierTooLong`] past 255 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, ReviewDomainError> {
        validate_identifier(value.into(), "team_name").map(Self)
    }

    /// Returns the team name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TeamName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TeamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Globally unique, client-assigned pull request identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PullRequestId(String);

impl PullRequestId {
    /// Creates a validated pull request identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewDomainError::EmptyIdentifier`] for blank input or
    /// [`ReviewDomainError::IdentifierTooLong`] past 255 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, ReviewDomainError> {
        validate_identifier(value.into(), "pull_request_id").map(Self)
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for PullRequestId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for PullRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
