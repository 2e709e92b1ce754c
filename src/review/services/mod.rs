//! Application services for reviewer assignment.

mod assignment;
mod error;
mod pull_request;
mod review;

pub use assignment::ReviewerAssigner;
pub use error::{ErrorKind, ReviewServiceError, ReviewServiceResult};
pub use pull_request::{CreatePullRequestRequest, ReassignmentOutcome};
pub use review::{CreateTeamRequest, ReviewService, TeamMemberInput};
