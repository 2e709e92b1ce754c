//! Diesel row models for reviewer assignment persistence.

use super::schema::{pr_reviewers, pull_requests, users};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for user records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    /// User identifier.
    pub id: String,
    /// Display username.
    pub username: String,
    /// Owning team.
    pub team_name: String,
    /// Reviewer eligibility flag.
    pub is_active: bool,
}

/// Insert model for user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow {
    /// User identifier.
    pub id: String,
    /// Display username.
    pub username: String,
    /// Owning team.
    pub team_name: String,
    /// Reviewer eligibility flag.
    pub is_active: bool,
}

/// Query result row for pull request records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = pull_requests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PullRequestRow {
    /// Pull request identifier.
    pub id: String,
    /// Pull request title.
    pub name: String,
    /// Authoring user.
    pub author_id: String,
    /// Lifecycle state.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Merge timestamp.
    pub merged_at: Option<DateTime<Utc>>,
}

/// Insert model for pull request records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = pull_requests)]
pub struct NewPullRequestRow {
    /// Pull request identifier.
    pub id: String,
    /// Pull request title.
    pub name: String,
    /// Authoring user.
    pub author_id: String,
    /// Lifecycle state.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Merge timestamp.
    pub merged_at: Option<DateTime<Utc>>,
}

/// Insert model for reviewer assignments.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = pr_reviewers)]
pub struct NewReviewerRow {
    /// Reviewed pull request.
    pub pull_request_id: String,
    /// Assigned reviewer.
    pub user_id: String,
    /// Slot in the reviewer order.
    pub position: i32,
    /// Assignment timestamp.
    pub assigned_at: DateTime<Utc>,
}
