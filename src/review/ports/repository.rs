//! Repository port for teams, users, pull requests and reviewer assignments.

use crate::review::domain::{
    PullRequest, PullRequestId, PullRequestSummary, Team, TeamName, User, UserId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for review repository operations.
pub type ReviewRepositoryResult<T> = Result<T, ReviewRepositoryError>;

/// Review persistence contract.
///
/// Single-row operations are atomic on their own. The two compound
/// operations, [`ReviewRepository::create_pull_request`] and
/// [`ReviewRepository::replace_reviewer`], are all-or-nothing.
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Returns whether a team with the given name exists.
    async fn team_exists(&self, team_name: &TeamName) -> ReviewRepositoryResult<bool>;

    /// Stores a new, empty team.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewRepositoryError::DuplicateTeam`] when the name is
    /// already taken.
    async fn create_team(&self, team_name: &TeamName) -> ReviewRepositoryResult<()>;

    /// Finds a team together with its members ordered by username.
    ///
    /// Returns `None` when the team does not exist.
    async fn find_team(&self, team_name: &TeamName) -> ReviewRepositoryResult<Option<Team>>;

    /// Inserts a user or overwrites username, team and active flag of an
    /// existing one.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewRepositoryError::TeamNotFound`] when the user's team
    /// does not exist.
    async fn upsert_user(&self, user: &User) -> ReviewRepositoryResult<()>;

    /// Finds a user by identifier.
    ///
    /// Returns `None` when the user does not exist.
    async fn find_user(&self, user_id: &UserId) -> ReviewRepositoryResult<Option<User>>;

    /// Sets the active flag of an existing user.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewRepositoryError::UserNotFound`] when no row was
    /// updated.
    async fn set_user_active(&self, user_id: &UserId, is_active: bool)
    -> ReviewRepositoryResult<()>;

    /// Returns the active members of a team, minus the excluded users,
    /// ordered by username.
    async fn list_active_team_members(
        &self,
        team_name: &TeamName,
        exclude: &[UserId],
    ) -> ReviewRepositoryResult<Vec<User>>;

    /// Returns whether a pull request with the given identifier exists.
    async fn pull_request_exists(&self, id: &PullRequestId) -> ReviewRepositoryResult<bool>;

    /// Stores a new pull request together with its reviewer assignments.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewRepositoryError::DuplicatePullRequest`] when the
    /// identifier is taken. Nothing is stored on failure.
    async fn create_pull_request(&self, pull_request: &PullRequest) -> ReviewRepositoryResult<()>;

    /// Finds a pull request with its reviewers in assignment order.
    ///
    /// Returns `None` when the pull request does not exist.
    async fn find_pull_request(
        &self,
        id: &PullRequestId,
    ) -> ReviewRepositoryResult<Option<PullRequest>>;

    /// Marks an open pull request as merged at `merged_at`.
    ///
    /// Already merged pull requests are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewRepositoryError::PullRequestNotFound`] when the pull
    /// request does not exist.
    async fn mark_merged(
        &self,
        id: &PullRequestId,
        merged_at: DateTime<Utc>,
    ) -> ReviewRepositoryResult<()>;

    /// Removes `old_reviewer` and assigns `new_reviewer` in its position.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewRepositoryError::PullRequestNotFound`],
    /// [`ReviewRepositoryError::PullRequestMerged`],
    /// [`ReviewRepositoryError::ReviewerNotAssigned`] or
    /// [`ReviewRepositoryError::ReviewerAlreadyAssigned`] when the stored
    /// state no longer allows the swap. Nothing changes on failure.
    async fn replace_reviewer(
        &self,
        id: &PullRequestId,
        old_reviewer: &UserId,
        new_reviewer: &UserId,
        assigned_at: DateTime<Utc>,
    ) -> ReviewRepositoryResult<()>;

    /// Returns summaries of pull requests the user currently reviews, newest
    /// first.
    async fn list_reviews_for_user(
        &self,
        user_id: &UserId,
    ) -> ReviewRepositoryResult<Vec<PullRequestSummary>>;
}

/// Errors returned by review repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ReviewRepositoryError {
    /// A team with the same name already exists.
    #[error("duplicate team name: {0}")]
    DuplicateTeam(TeamName),

    /// A pull request with the same identifier already exists.
    #[error("duplicate pull request identifier: {0}")]
    DuplicatePullRequest(PullRequestId),

    /// The referenced team does not exist.
    #[error("team not found: {0}")]
    TeamNotFound(TeamName),

    /// The referenced user does not exist.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// The referenced pull request does not exist.
    #[error("pull request not found: {0}")]
    PullRequestNotFound(PullRequestId),

    /// The pull request was merged before the change could be applied.
    #[error("pull request already merged: {0}")]
    PullRequestMerged(PullRequestId),

    /// The reviewer to remove is not assigned.
    #[error("user {user_id} is not assigned to pull request {pull_request_id}")]
    ReviewerNotAssigned {
        /// Pull request being modified.
        pull_request_id: PullRequestId,
        /// Reviewer expected to be assigned.
        user_id: UserId,
    },

    /// The reviewer to add is already assigned.
    #[error("user {user_id} is already assigned to pull request {pull_request_id}")]
    ReviewerAlreadyAssigned {
        /// Pull request being modified.
        pull_request_id: PullRequestId,
        /// Reviewer that is already assigned.
        user_id: UserId,
    },

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ReviewRepositoryError {
    /// Wraps a data-quality or deserialization error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
