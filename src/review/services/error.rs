//! Service-level error taxonomy for reviewer assignment.

use crate::review::{
    domain::{PullRequestId, ReviewDomainError, TeamName, UserId},
    ports::ReviewRepositoryError,
};
use thiserror::Error;

/// Service-level errors for team, user and pull request operations.
#[derive(Debug, Clone, Error)]
pub enum ReviewServiceError {
    /// A team with the requested name is already registered.
    #[error("team_name already exists: {0}")]
    TeamAlreadyExists(TeamName),

    /// A pull request with the requested identifier already exists.
    #[error("PR id already exists: {0}")]
    PullRequestAlreadyExists(PullRequestId),

    /// The pull request is merged and its reviewers are frozen.
    #[error("cannot reassign on merged PR: {0}")]
    PullRequestMerged(PullRequestId),

    /// The user to replace does not currently review the pull request.
    #[error("reviewer {user_id} is not assigned to PR {pull_request_id}")]
    NotAssigned {
        /// Pull request being modified.
        pull_request_id: PullRequestId,
        /// User expected to be reviewing.
        user_id: UserId,
    },

    /// No active teammate is eligible to take over the review.
    #[error("no active replacement candidate in team for PR {0}")]
    NoCandidate(PullRequestId),

    /// The referenced team does not exist.
    #[error("team not found: {0}")]
    TeamNotFound(TeamName),

    /// The referenced user does not exist.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// The referenced pull request does not exist.
    #[error("PR not found: {0}")]
    PullRequestNotFound(PullRequestId),

    /// Input validation failed.
    #[error(transparent)]
    Domain(#[from] ReviewDomainError),

    /// Storage failed in a way callers cannot act on.
    #[error(transparent)]
    Repository(ReviewRepositoryError),
}

/// Result type for review service operations.
pub type ReviewServiceResult<T> = Result<T, ReviewServiceError>;

/// Stable classification of [`ReviewServiceError`] for transports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Team name already registered.
    TeamExists,
    /// Pull request identifier already in use.
    PullRequestExists,
    /// Pull request already merged.
    PullRequestMerged,
    /// User is not a current reviewer.
    NotAssigned,
    /// No eligible replacement reviewer.
    NoCandidate,
    /// Team, user or pull request missing.
    NotFound,
    /// Malformed input.
    BadRequest,
    /// Unexpected storage failure.
    InternalError,
}

impl ErrorKind {
    /// Returns the wire code for this kind.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::TeamExists => "TEAM_EXISTS",
            Self::PullRequestExists => "PR_EXISTS",
            Self::PullRequestMerged => "PR_MERGED",
            Self::NotAssigned => "NOT_ASSIGNED",
            Self::NoCandidate => "NO_CANDIDATE",
            Self::NotFound => "NOT_FOUND",
            Self::BadRequest => "BAD_REQUEST",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl ReviewServiceError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::TeamAlreadyExists(_) => ErrorKind::TeamExists,
            Self::PullRequestAlreadyExists(_) => ErrorKind::PullRequestExists,
            Self::PullRequestMerged(_) => ErrorKind::PullRequestMerged,
            Self::NotAssigned { .. } => ErrorKind::NotAssigned,
            Self::NoCandidate(_) => ErrorKind::NoCandidate,
            Self::TeamNotFound(_) | Self::UserNotFound(_) | Self::PullRequestNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::Domain(_) => ErrorKind::BadRequest,
            Self::Repository(_) => ErrorKind::InternalError,
        }
    }
}

impl From<ReviewRepositoryError> for ReviewServiceError {
    fn from(err: ReviewRepositoryError) -> Self {
        match err {
            ReviewRepositoryError::DuplicateTeam(team_name) => Self::TeamAlreadyExists(team_name),
            ReviewRepositoryError::DuplicatePullRequest(id) => Self::PullRequestAlreadyExists(id),
            ReviewRepositoryError::TeamNotFound(team_name) => Self::TeamNotFound(team_name),
            ReviewRepositoryError::UserNotFound(user_id) => Self::UserNotFound(user_id),
            ReviewRepositoryError::PullRequestNotFound(id) => Self::PullRequestNotFound(id),
            ReviewRepositoryError::PullRequestMerged(id) => Self::PullRequestMerged(id),
            ReviewRepositoryError::ReviewerNotAssigned {
                pull_request_id,
                user_id,
            } => Self::NotAssigned {
                pull_request_id,
                user_id,
            },
            other @ (ReviewRepositoryError::ReviewerAlreadyAssigned { .. }
            | ReviewRepositoryError::InvalidPersistedData(_)
            | ReviewRepositoryError::Persistence(_)) => Self::Repository(other),
        }
    }
}
