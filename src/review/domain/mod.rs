//! Domain model for reviewer assignment.
//!
//! Teams group users; pull requests are authored by users and reviewed by
//! active teammates. All infrastructure concerns stay outside this boundary.

mod error;
mod ids;
mod pull_request;
mod team;
mod user;

pub use error::{ParsePullRequestStatusError, ReviewDomainError};
pub use ids::{PullRequestId, TeamName, UserId};
pub use pull_request::{
    INITIAL_REVIEWER_COUNT, PersistedPullRequestData, PullRequest, PullRequestStatus,
    PullRequestSummary,
};
pub use team::Team;
pub use user::{TeamMember, User};
