//! Team aggregate.

use super::{TeamMember, TeamName};
use serde::{Deserialize, Serialize};

/// A named group of users. Reviewers are always drawn from a single team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    name: TeamName,
    members: Vec<TeamMember>,
}

impl Team {
    /// Creates a team, ordering members by username (then user ID).
    #[must_use]
    pub fn new(name: TeamName, mut members: Vec<TeamMember>) -> Self {
        members.sort_by(|left, right| {
            left.username()
                .cmp(right.username())
                .then_with(|| left.user_id().cmp(right.user_id()))
        });
        Self { name, members }
    }

    /// Returns the team name.
    #[must_use]
    pub const fn name(&self) -> &TeamName {
        &self.name
    }

    /// Returns members ordered by username.
    #[must_use]
    pub fn members(&self) -> &[TeamMember] {
        &self.members
    }
}
