//! Request and response bodies of the HTTP API.

use crate::review::domain::{
    PullRequest, PullRequestStatus, PullRequestSummary, Team, TeamMember, User,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Team member as sent and returned by the team routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMemberDto {
    /// User identifier.
    pub user_id: String,
    /// Display username.
    pub username: String,
    /// Reviewer eligibility flag.
    pub is_active: bool,
}

impl From<&TeamMember> for TeamMemberDto {
    fn from(member: &TeamMember) -> Self {
        Self {
            user_id: member.user_id().as_str().to_owned(),
            username: member.username().to_owned(),
            is_active: member.is_active(),
        }
    }
}

/// Team with its members; the body of `POST /team/add` and the response of
/// `GET /team/get`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamDto {
    /// Team name.
    pub team_name: String,
    /// Members ordered by username.
    #[serde(default)]
    pub members: Vec<TeamMemberDto>,
}

impl From<&Team> for TeamDto {
    fn from(team: &Team) -> Self {
        Self {
            team_name: team.name().as_str().to_owned(),
            members: team.members().iter().map(TeamMemberDto::from).collect(),
        }
    }
}

/// Response of `POST /team/add`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamEnvelope {
    /// The registered team.
    pub team: TeamDto,
}

/// User record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDto {
    /// User identifier.
    pub user_id: String,
    /// Display username.
    pub username: String,
    /// Owning team.
    pub team_name: String,
    /// Reviewer eligibility flag.
    pub is_active: bool,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id().as_str().to_owned(),
            username: user.username().to_owned(),
            team_name: user.team_name().as_str().to_owned(),
            is_active: user.is_active(),
        }
    }
}

/// Response of `POST /users/setIsActive`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEnvelope {
    /// The updated user.
    pub user: UserDto,
}

/// Body of `POST /users/setIsActive`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetIsActiveRequest {
    /// User to update.
    pub user_id: String,
    /// New eligibility flag.
    pub is_active: bool,
}

/// Pull request with reviewers and timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestDto {
    /// Pull request identifier.
    pub pull_request_id: String,
    /// Pull request title.
    pub pull_request_name: String,
    /// Authoring user.
    pub author_id: String,
    /// `OPEN` or `MERGED`.
    pub status: PullRequestStatus,
    /// Reviewers in assignment order.
    pub assigned_reviewers: Vec<String>,
    /// Creation timestamp.
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    /// Merge timestamp, omitted while open.
    #[serde(rename = "mergedAt", default, skip_serializing_if = "Option::is_none")]
    pub merged_at: Option<DateTime<Utc>>,
}

impl From<&PullRequest> for PullRequestDto {
    fn from(pull_request: &PullRequest) -> Self {
        Self {
            pull_request_id: pull_request.id().as_str().to_owned(),
            pull_request_name: pull_request.name().to_owned(),
            author_id: pull_request.author_id().as_str().to_owned(),
            status: pull_request.status(),
            assigned_reviewers: pull_request
                .reviewers()
                .iter()
                .map(|reviewer| reviewer.as_str().to_owned())
                .collect(),
            created_at: pull_request.created_at(),
            merged_at: pull_request.merged_at(),
        }
    }
}

/// Pull request listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestShortDto {
    /// Pull request identifier.
    pub pull_request_id: String,
    /// Pull request title.
    pub pull_request_name: String,
    /// Authoring user.
    pub author_id: String,
    /// `OPEN` or `MERGED`.
    pub status: PullRequestStatus,
}

impl From<&PullRequestSummary> for PullRequestShortDto {
    fn from(summary: &PullRequestSummary) -> Self {
        Self {
            pull_request_id: summary.id().as_str().to_owned(),
            pull_request_name: summary.name().to_owned(),
            author_id: summary.author_id().as_str().to_owned(),
            status: summary.status(),
        }
    }
}

/// Response of the pull request create and merge routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestEnvelope {
    /// The pull request as stored.
    pub pr: PullRequestDto,
}

/// Response of `POST /pullRequest/reassign`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReassignResponse {
    /// The pull request after the swap.
    pub pr: PullRequestDto,
    /// The newly assigned reviewer.
    pub replaced_by: String,
}

/// Response of `GET /users/getReview`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserReviewsResponse {
    /// The queried user.
    pub user_id: String,
    /// Pull requests the user reviews, newest first.
    pub pull_requests: Vec<PullRequestShortDto>,
}

/// Body of `POST /pullRequest/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePullRequestBody {
    /// Client-assigned identifier.
    pub pull_request_id: String,
    /// Pull request title.
    pub pull_request_name: String,
    /// Authoring user.
    pub author_id: String,
}

/// Body of `POST /pullRequest/merge`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergePullRequestBody {
    /// Pull request to merge.
    pub pull_request_id: String,
}

/// Body of `POST /pullRequest/reassign`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReassignBody {
    /// Pull request to modify.
    pub pull_request_id: String,
    /// Reviewer to replace.
    pub old_user_id: String,
}

/// Query of `GET /team/get`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeamQuery {
    /// Team to fetch.
    pub team_name: Option<String>,
}

/// Query of `GET /users/getReview`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserQuery {
    /// User whose reviews are listed.
    pub user_id: Option<String>,
}

/// Response of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `ok` while the process serves requests.
    pub status: String,
}
