//! Users and their team membership.

use super::{ReviewDomainError, TeamName, UserId, ids::validate_identifier};
use serde::{Deserialize, Serialize};

/// A user who can author and review pull requests.
///
/// Every user belongs to exactly one team. Re-registering a user under a
/// different team moves them; users are never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    username: String,
    team_name: TeamName,
    is_active: bool,
}

impl User {
    /// Creates a user record.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewDomainError::EmptyIdentifier`] when the username is
    /// blank, or [`ReviewDomainError::IdentifierTooLong`] when it exceeds the
    /// storage limit.
    pub fn new(
        id: UserId,
        username: impl Into<String>,
        team_name: TeamName,
        is_active: bool,
    ) -> Result<Self, ReviewDomainError> {
        let username = validate_identifier(username.into(), "username")?;
        Ok(Self {
            id,
            username,
            team_name,
            is_active,
        })
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> &UserId {
        &self.id
    }

    /// Returns the display username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the team the user belongs to.
    #[must_use]
    pub const fn team_name(&self) -> &TeamName {
        &self.team_name
    }

    /// Returns whether the user may be picked as a reviewer.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    /// Sets the reviewer eligibility flag.
    pub const fn set_active(&mut self, is_active: bool) {
        self.is_active = is_active;
    }

    /// Projects the user into a team member summary.
    #[must_use]
    pub fn to_member(&self) -> TeamMember {
        TeamMember {
            user_id: self.id.clone(),
            username: self.username.clone(),
            is_active: self.is_active,
        }
    }
}

/// Team-scoped view of a user, as listed on a [`super::Team`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    user_id: UserId,
    username: String,
    is_active: bool,
}

impl TeamMember {
    /// Returns the member's user identifier.
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Returns the member's username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns whether the member is currently active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }
}
