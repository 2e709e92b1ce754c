//! Team and user operations of the review service.

use super::{ReviewServiceError, ReviewServiceResult, ReviewerAssigner};
use crate::review::{
    domain::{PullRequestSummary, Team, TeamName, User, UserId},
    ports::ReviewRepository,
};
use mockable::Clock;
use std::sync::Arc;
use tracing::info;

/// Member entry of a [`CreateTeamRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamMemberInput {
    user_id: String,
    username: String,
    is_active: bool,
}

impl TeamMemberInput {
    /// Creates a member entry.
    #[must_use]
    pub fn new(user_id: impl Into<String>, username: impl Into<String>, is_active: bool) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.into(),
            is_active,
        }
    }
}

/// Request payload for registering a team with its members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTeamRequest {
    team_name: String,
    members: Vec<TeamMemberInput>,
}

impl CreateTeamRequest {
    /// Creates a request for a team without members.
    #[must_use]
    pub fn new(team_name: impl Into<String>) -> Self {
        Self {
            team_name: team_name.into(),
            members: Vec::new(),
        }
    }

    /// Adds one member.
    #[must_use]
    pub fn with_member(mut self, member: TeamMemberInput) -> Self {
        self.members.push(member);
        self
    }

    /// Replaces the member list.
    #[must_use]
    pub fn with_members(mut self, members: impl IntoIterator<Item = TeamMemberInput>) -> Self {
        self.members = members.into_iter().collect();
        self
    }
}

/// Reviewer assignment orchestration service.
///
/// Every operation re-reads storage; the only in-process state is the random
/// source owned by the [`ReviewerAssigner`].
pub struct ReviewService<R, C>
where
    R: ReviewRepository,
    C: Clock + Send + Sync,
{
    pub(super) repository: Arc<R>,
    pub(super) assigner: Arc<ReviewerAssigner>,
    pub(super) clock: Arc<C>,
}

impl<R, C> Clone for ReviewService<R, C>
where
    R: ReviewRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            assigner: Arc::clone(&self.assigner),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R, C> ReviewService<R, C>
where
    R: ReviewRepository,
    C: Clock + Send + Sync,
{
    /// Creates a service with an entropy-seeded reviewer assigner.
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            repository,
            assigner: Arc::new(ReviewerAssigner::from_entropy()),
            clock,
        }
    }

    /// Replaces the reviewer assigner, typically with a seeded one.
    #[must_use]
    pub fn with_assigner(mut self, assigner: ReviewerAssigner) -> Self {
        self.assigner = Arc::new(assigner);
        self
    }

    /// Registers a team and upserts its members.
    ///
    /// Members that already exist are moved into the new team with the
    /// submitted username and active flag.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewServiceError::TeamAlreadyExists`] when the name is
    /// taken, [`ReviewServiceError::Domain`] for invalid identifiers, or
    /// [`ReviewServiceError::Repository`] when storage fails. A member write
    /// failure after the team row was created leaves the team in place.
    pub async fn create_team(&self, request: CreateTeamRequest) -> ReviewServiceResult<Team> {
        let team_name = TeamName::new(request.team_name)?;
        let members = request
            .members
            .into_iter()
            .map(|member| {
                User::new(
                    UserId::new(member.user_id)?,
                    member.username,
                    team_name.clone(),
                    member.is_active,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        if self.repository.team_exists(&team_name).await? {
            return Err(ReviewServiceError::TeamAlreadyExists(team_name));
        }
        self.repository.create_team(&team_name).await?;
        for user in &members {
            self.repository.upsert_user(user).await?;
        }
        info!(team = %team_name, members = members.len(), "team created");

        self.get_team(&team_name).await
    }

    /// Returns a team with its members ordered by username.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewServiceError::TeamNotFound`] when the team does not
    /// exist.
    pub async fn get_team(&self, team_name: &TeamName) -> ReviewServiceResult<Team> {
        self.repository
            .find_team(team_name)
            .await?
            .ok_or_else(|| ReviewServiceError::TeamNotFound(team_name.clone()))
    }

    /// Sets whether a user may be picked as a reviewer.
    ///
    /// Existing assignments are not touched.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewServiceError::UserNotFound`] when the user does not
    /// exist.
    pub async fn set_user_active(
        &self,
        user_id: &UserId,
        is_active: bool,
    ) -> ReviewServiceResult<User> {
        self.repository.set_user_active(user_id, is_active).await?;
        info!(user = %user_id, is_active, "user activity changed");
        self.repository
            .find_user(user_id)
            .await?
            .ok_or_else(|| ReviewServiceError::UserNotFound(user_id.clone()))
    }

    /// Lists pull requests the user currently reviews, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewServiceError::UserNotFound`] when the user does not
    /// exist.
    pub async fn get_user_reviews(
        &self,
        user_id: &UserId,
    ) -> ReviewServiceResult<Vec<PullRequestSummary>> {
        if self.repository.find_user(user_id).await?.is_none() {
            return Err(ReviewServiceError::UserNotFound(user_id.clone()));
        }
        Ok(self.repository.list_reviews_for_user(user_id).await?)
    }
}
