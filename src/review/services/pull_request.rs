//! Pull request lifecycle operations of the review service.

use super::{ReviewService, ReviewServiceError, ReviewServiceResult};
use crate::review::{
    domain::{INITIAL_REVIEWER_COUNT, PullRequest, PullRequestId, User, UserId},
    ports::ReviewRepository,
};
use mockable::Clock;
use tracing::{debug, info};

/// Request payload for opening a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePullRequestRequest {
    pull_request_id: String,
    pull_request_name: String,
    author_id: String,
}

impl CreatePullRequestRequest {
    /// Creates a request from raw identifiers.
    #[must_use]
    pub fn new(
        pull_request_id: impl Into<String>,
        pull_request_name: impl Into<String>,
        author_id: impl Into<String>,
    ) -> Self {
        Self {
            pull_request_id: pull_request_id.into(),
            pull_request_name: pull_request_name.into(),
            author_id: author_id.into(),
        }
    }
}

/// Result of a successful reviewer reassignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReassignmentOutcome {
    pull_request: PullRequest,
    replaced_by: UserId,
}

impl ReassignmentOutcome {
    /// Returns the pull request as stored after the swap.
    #[must_use]
    pub const fn pull_request(&self) -> &PullRequest {
        &self.pull_request
    }

    /// Returns the newly assigned reviewer.
    #[must_use]
    pub const fn replaced_by(&self) -> &UserId {
        &self.replaced_by
    }

    /// Splits the outcome into its parts.
    #[must_use]
    pub fn into_parts(self) -> (PullRequest, UserId) {
        (self.pull_request, self.replaced_by)
    }
}

fn user_ids(users: &[User]) -> Vec<UserId> {
    users.iter().map(|user| user.id().clone()).collect()
}

impl<R, C> ReviewService<R, C>
where
    R: ReviewRepository,
    C: Clock + Send + Sync,
{
    /// Opens a pull request and assigns up to two active teammates of the
    /// author as reviewers.
    ///
    /// Fewer than two eligible teammates is not an error: the pull request is
    /// created with as many reviewers as are available, possibly none.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewServiceError::PullRequestAlreadyExists`] when the
    /// identifier is taken, [`ReviewServiceError::UserNotFound`] when the
    /// author does not exist, or [`ReviewServiceError::Domain`] for invalid
    /// input.
    pub async fn create_pull_request(
        &self,
        request: CreatePullRequestRequest,
    ) -> ReviewServiceResult<PullRequest> {
        let pull_request_id = PullRequestId::new(request.pull_request_id)?;
        let author_id = UserId::new(request.author_id)?;

        if self.repository.pull_request_exists(&pull_request_id).await? {
            return Err(ReviewServiceError::PullRequestAlreadyExists(pull_request_id));
        }
        let author = self
            .repository
            .find_user(&author_id)
            .await?
            .ok_or_else(|| ReviewServiceError::UserNotFound(author_id.clone()))?;

        let candidates = self
            .repository
            .list_active_team_members(author.team_name(), std::slice::from_ref(&author_id))
            .await?;
        debug!(
            pull_request = %pull_request_id,
            team = %author.team_name(),
            pool = candidates.len(),
            "selecting initial reviewers"
        );
        let reviewers = self
            .assigner
            .select_reviewers(&user_ids(&candidates), INITIAL_REVIEWER_COUNT);

        let pull_request = PullRequest::open(
            pull_request_id,
            request.pull_request_name,
            author_id,
            reviewers,
            &*self.clock,
        )?;
        self.repository.create_pull_request(&pull_request).await?;
        info!(
            pull_request = %pull_request.id(),
            author = %pull_request.author_id(),
            reviewers = ?pull_request.reviewers(),
            "pull request created"
        );

        self.load_pull_request(pull_request.id()).await
    }

    /// Merges a pull request.
    ///
    /// Merging an already merged pull request returns it unchanged, keeping
    /// the original merge timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewServiceError::PullRequestNotFound`] when the pull
    /// request does not exist.
    pub async fn merge_pull_request(
        &self,
        pull_request_id: &PullRequestId,
    ) -> ReviewServiceResult<PullRequest> {
        let pull_request = self.load_pull_request(pull_request_id).await?;
        if pull_request.is_merged() {
            return Ok(pull_request);
        }

        self.repository
            .mark_merged(pull_request_id, self.clock.utc())
            .await?;
        info!(pull_request = %pull_request_id, "pull request merged");

        self.load_pull_request(pull_request_id).await
    }

    /// Replaces one reviewer with a random active teammate of that reviewer.
    ///
    /// The replacement is never the author nor anyone currently reviewing,
    /// and takes the replaced reviewer's position.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewServiceError::PullRequestNotFound`],
    /// [`ReviewServiceError::PullRequestMerged`],
    /// [`ReviewServiceError::NotAssigned`],
    /// [`ReviewServiceError::UserNotFound`] or
    /// [`ReviewServiceError::NoCandidate`]. Stored state is unchanged on
    /// every error.
    pub async fn reassign_reviewer(
        &self,
        pull_request_id: &PullRequestId,
        old_reviewer: &UserId,
    ) -> ReviewServiceResult<ReassignmentOutcome> {
        let pull_request = self.load_pull_request(pull_request_id).await?;
        if pull_request.is_merged() {
            return Err(ReviewServiceError::PullRequestMerged(pull_request_id.clone()));
        }
        if !pull_request.has_reviewer(old_reviewer) {
            return Err(ReviewServiceError::NotAssigned {
                pull_request_id: pull_request_id.clone(),
                user_id: old_reviewer.clone(),
            });
        }
        let old_user = self
            .repository
            .find_user(old_reviewer)
            .await?
            .ok_or_else(|| ReviewServiceError::UserNotFound(old_reviewer.clone()))?;

        let mut excluded = Vec::with_capacity(pull_request.reviewers().len() + 1);
        excluded.push(pull_request.author_id().clone());
        excluded.extend_from_slice(pull_request.reviewers());
        let candidates = self
            .repository
            .list_active_team_members(old_user.team_name(), &excluded)
            .await?;
        debug!(
            pull_request = %pull_request_id,
            team = %old_user.team_name(),
            pool = candidates.len(),
            "selecting replacement reviewer"
        );

        let Some(replacement) = self
            .assigner
            .select_reviewers(&user_ids(&candidates), 1)
            .into_iter()
            .next()
        else {
            return Err(ReviewServiceError::NoCandidate(pull_request_id.clone()));
        };

        self.repository
            .replace_reviewer(pull_request_id, old_reviewer, &replacement, self.clock.utc())
            .await?;
        info!(
            pull_request = %pull_request_id,
            old_reviewer = %old_reviewer,
            new_reviewer = %replacement,
            "reviewer reassigned"
        );

        Ok(ReassignmentOutcome {
            pull_request: self.load_pull_request(pull_request_id).await?,
            replaced_by: replacement,
        })
    }

    async fn load_pull_request(&self, id: &PullRequestId) -> ReviewServiceResult<PullRequest> {
        self.repository
            .find_pull_request(id)
            .await?
            .ok_or_else(|| ReviewServiceError::PullRequestNotFound(id.clone()))
    }
}
