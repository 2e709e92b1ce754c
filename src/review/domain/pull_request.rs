//! Pull request aggregate root and its review lifecycle.

use super::{
    ParsePullRequestStatusError, PullRequestId, ReviewDomainError, UserId,
    ids::validate_identifier,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Maximum number of reviewers assigned when a pull request is opened.
pub const INITIAL_REVIEWER_COUNT: usize = 2;

/// Pull request lifecycle state. `Merged` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PullRequestStatus {
    /// Under review; reviewers may still change.
    Open,
    /// Merged; status and reviewers are frozen.
    Merged,
}

impl PullRequestStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Merged => "MERGED",
        }
    }
}

impl TryFrom<&str> for PullRequestStatus {
    type Error = ParsePullRequestStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "OPEN" => Ok(Self::Open),
            "MERGED" => Ok(Self::Merged),
            _ => Err(ParsePullRequestStatusError(value.to_owned())),
        }
    }
}

/// Pull request aggregate root.
///
/// Reviewers are kept in assignment order. The author is never a reviewer and
/// no reviewer appears twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    id: PullRequestId,
    name: String,
    author_id: UserId,
    status: PullRequestStatus,
    reviewers: Vec<UserId>,
    created_at: DateTime<Utc>,
    merged_at: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a persisted pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedPullRequestData {
    /// Persisted identifier.
    pub id: PullRequestId,
    /// Persisted title.
    pub name: String,
    /// Persisted author.
    pub author_id: UserId,
    /// Persisted lifecycle state.
    pub status: PullRequestStatus,
    /// Persisted reviewers in assignment order.
    pub reviewers: Vec<UserId>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted merge timestamp, if merged.
    pub merged_at: Option<DateTime<Utc>>,
}

impl PullRequest {
    /// Opens a new pull request with the given reviewers.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewDomainError::EmptyIdentifier`] for a blank name,
    /// [`ReviewDomainError::AuthorCannotReview`] when the author is among the
    /// reviewers, or [`ReviewDomainError::DuplicateReviewer`] when a reviewer
    /// is listed twice.
    pub fn open(
        id: PullRequestId,
        name: impl Into<String>,
        author_id: UserId,
        reviewers: Vec<UserId>,
        clock: &impl Clock,
    ) -> Result<Self, ReviewDomainError> {
        let name = validate_identifier(name.into(), "pull_request_name")?;
        for (index, reviewer) in reviewers.iter().enumerate() {
            if *reviewer == author_id {
                return Err(ReviewDomainError::AuthorCannotReview {
                    pull_request_id: id,
                    author_id,
                });
            }
            if reviewers.iter().skip(index + 1).any(|other| other == reviewer) {
                return Err(ReviewDomainError::DuplicateReviewer {
                    pull_request_id: id,
                    user_id: reviewer.clone(),
                });
            }
        }

        Ok(Self {
            id,
            name,
            author_id,
            status: PullRequestStatus::Open,
            reviewers,
            created_at: clock.utc(),
            merged_at: None,
        })
    }

    /// Reconstructs a pull request from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedPullRequestData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            author_id: data.author_id,
            status: data.status,
            reviewers: data.reviewers,
            created_at: data.created_at,
            merged_at: data.merged_at,
        }
    }

    /// Returns the pull request identifier.
    #[must_use]
    pub const fn id(&self) -> &PullRequestId {
        &self.id
    }

    /// Returns the pull request title.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the author's user identifier.
    #[must_use]
    pub const fn author_id(&self) -> &UserId {
        &self.author_id
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub const fn status(&self) -> PullRequestStatus {
        self.status
    }

    /// Returns whether the pull request has been merged.
    #[must_use]
    pub const fn is_merged(&self) -> bool {
        matches!(self.status, PullRequestStatus::Merged)
    }

    /// Returns the assigned reviewers in assignment order.
    #[must_use]
    pub fn reviewers(&self) -> &[UserId] {
        &self.reviewers
    }

    /// Returns whether `user_id` currently reviews this pull request.
    #[must_use]
    pub fn has_reviewer(&self, user_id: &UserId) -> bool {
        self.reviewers.contains(user_id)
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the merge timestamp, if merged.
    #[must_use]
    pub const fn merged_at(&self) -> Option<DateTime<Utc>> {
        self.merged_at
    }

    /// Marks the pull request as merged at `merged_at`.
    ///
    /// Merging an already merged pull request leaves it untouched and returns
    /// `false`, so the merge timestamp is only ever set once.
    pub const fn merge_at(&mut self, merged_at: DateTime<Utc>) -> bool {
        if self.is_merged() {
            return false;
        }
        self.status = PullRequestStatus::Merged;
        self.merged_at = Some(merged_at);
        true
    }

    /// Swaps `old_reviewer` for `new_reviewer`, keeping its position.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewDomainError::PullRequestMerged`] after merge,
    /// [`ReviewDomainError::ReviewerNotAssigned`] when `old_reviewer` is not
    /// reviewing, [`ReviewDomainError::AuthorCannotReview`] when
    /// `new_reviewer` is the author, or
    /// [`ReviewDomainError::DuplicateReviewer`] when `new_reviewer` already
    /// reviews.
    pub fn replace_reviewer(
        &mut self,
        old_reviewer: &UserId,
        new_reviewer: UserId,
    ) -> Result<(), ReviewDomainError> {
        if self.is_merged() {
            return Err(ReviewDomainError::PullRequestMerged(self.id.clone()));
        }
        let Some(position) = self
            .reviewers
            .iter()
            .position(|reviewer| reviewer == old_reviewer)
        else {
            return Err(ReviewDomainError::ReviewerNotAssigned {
                pull_request_id: self.id.clone(),
                user_id: old_reviewer.clone(),
            });
        };
        if new_reviewer == self.author_id {
            return Err(ReviewDomainError::AuthorCannotReview {
                pull_request_id: self.id.clone(),
                author_id: new_reviewer,
            });
        }
        if self.has_reviewer(&new_reviewer) {
            return Err(ReviewDomainError::DuplicateReviewer {
                pull_request_id: self.id.clone(),
                user_id: new_reviewer,
            });
        }

        if let Some(slot) = self.reviewers.get_mut(position) {
            *slot = new_reviewer;
        }
        Ok(())
    }

    /// Projects the pull request into a lightweight summary.
    #[must_use]
    pub fn summary(&self) -> PullRequestSummary {
        PullRequestSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            author_id: self.author_id.clone(),
            status: self.status,
        }
    }
}

/// Pull request listing entry without reviewers or timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestSummary {
    id: PullRequestId,
    name: String,
    author_id: UserId,
    status: PullRequestStatus,
}

impl PullRequestSummary {
    /// Creates a summary from its parts.
    #[must_use]
    pub const fn new(
        id: PullRequestId,
        name: String,
        author_id: UserId,
        status: PullRequestStatus,
    ) -> Self {
        Self {
            id,
            name,
            author_id,
            status,
        }
    }

    /// Returns the pull request identifier.
    #[must_use]
    pub const fn id(&self) -> &PullRequestId {
        &self.id
    }

    /// Returns the pull request title.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the author's user identifier.
    #[must_use]
    pub const fn author_id(&self) -> &UserId {
        &self.author_id
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub const fn status(&self) -> PullRequestStatus {
        self.status
    }
}
