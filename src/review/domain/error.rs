//! Error types for review domain validation and parsing.

use super::{PullRequestId, UserId};
use thiserror::Error;

/// Errors returned while constructing or mutating review domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReviewDomainError {
    /// An identifier is empty or contains only whitespace.
    #[error("{field} must not be empty")]
    EmptyIdentifier {
        /// Name of the rejected field.
        field: &'static str,
    },

    /// An identifier exceeds the storage column limit.
    #[error("{field} exceeds {max} characters (got {length})")]
    IdentifierTooLong {
        /// Name of the rejected field.
        field: &'static str,
        /// Length of the rejected value in characters.
        length: usize,
        /// Maximum accepted length.
        max: usize,
    },

    /// The pull request author was listed as one of its reviewers.
    #[error("author {author_id} cannot review pull request {pull_request_id}")]
    AuthorCannotReview {
        /// Pull request being assembled.
        pull_request_id: PullRequestId,
        /// Author that appeared in the reviewer set.
        author_id: UserId,
    },

    /// The same reviewer appears twice on one pull request.
    #[error("reviewer {user_id} is already assigned to pull request {pull_request_id}")]
    DuplicateReviewer {
        /// Pull request being modified.
        pull_request_id: PullRequestId,
        /// Reviewer that would be duplicated.
        user_id: UserId,
    },

    /// A reviewer change was attempted after merge.
    #[error("pull request {0} is merged and can no longer change reviewers")]
    PullRequestMerged(PullRequestId),

    /// The reviewer to replace is not assigned to the pull request.
    #[error("user {user_id} is not a reviewer of pull request {pull_request_id}")]
    ReviewerNotAssigned {
        /// Pull request being modified.
        pull_request_id: PullRequestId,
        /// User that is not currently reviewing.
        user_id: UserId,
    },
}

/// Error returned while parsing pull request statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown pull request status: {0}")]
pub struct ParsePullRequestStatusError(pub String);
