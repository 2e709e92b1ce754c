//! In-memory review repository for tests and embedding.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::review::{
    domain::{
        PullRequest, PullRequestId, PullRequestSummary, Team, TeamName, User, UserId,
    },
    ports::{ReviewRepository, ReviewRepositoryError, ReviewRepositoryResult},
};

/// Thread-safe in-memory review repository.
///
/// Every operation takes the state lock once, so compound operations are
/// atomic with respect to each other.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReviewRepository {
    state: Arc<RwLock<InMemoryReviewState>>,
}

#[derive(Debug, Default)]
struct InMemoryReviewState {
    teams: HashSet<TeamName>,
    users: HashMap<UserId, User>,
    pull_requests: HashMap<PullRequestId, PullRequest>,
}

impl InMemoryReviewRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> ReviewRepositoryResult<RwLockReadGuard<'_, InMemoryReviewState>> {
        self.state.read().map_err(|err| {
            ReviewRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> ReviewRepositoryResult<RwLockWriteGuard<'_, InMemoryReviewState>> {
        self.state.write().map_err(|err| {
            ReviewRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

fn ensure_user_exists(
    state: &InMemoryReviewState,
    user_id: &UserId,
) -> ReviewRepositoryResult<()> {
    if state.users.contains_key(user_id) {
        Ok(())
    } else {
        Err(ReviewRepositoryError::UserNotFound(user_id.clone()))
    }
}

#[async_trait]
impl ReviewRepository for InMemoryReviewRepository {
    async fn team_exists(&self, team_name: &TeamName) -> ReviewRepositoryResult<bool> {
        Ok(self.read()?.teams.contains(team_name))
    }

    async fn create_team(&self, team_name: &TeamName) -> ReviewRepositoryResult<()> {
        let mut state = self.write()?;
        if !state.teams.insert(team_name.clone()) {
            return Err(ReviewRepositoryError::DuplicateTeam(team_name.clone()));
        }
        Ok(())
    }

    async fn find_team(&self, team_name: &TeamName) -> ReviewRepositoryResult<Option<Team>> {
        let state = self.read()?;
        if !state.teams.contains(team_name) {
            return Ok(None);
        }
        let members = state
            .users
            .values()
            .filter(|user| user.team_name() == team_name)
            .map(User::to_member)
            .collect();
        Ok(Some(Team::new(team_name.clone(), members)))
    }

    async fn upsert_user(&self, user: &User) -> ReviewRepositoryResult<()> {
        let mut state = self.write()?;
        if !state.teams.contains(user.team_name()) {
            return Err(ReviewRepositoryError::TeamNotFound(user.team_name().clone()));
        }
        state.users.insert(user.id().clone(), user.clone());
        Ok(())
    }

    async fn find_user(&self, user_id: &UserId) -> ReviewRepositoryResult<Option<User>> {
        Ok(self.read()?.users.get(user_id).cloned())
    }

    async fn set_user_active(
        &self,
        user_id: &UserId,
        is_active: bool,
    ) -> ReviewRepositoryResult<()> {
        let mut state = self.write()?;
        let user = state
            .users
            .get_mut(user_id)
            .ok_or_else(|| ReviewRepositoryError::UserNotFound(user_id.clone()))?;
        user.set_active(is_active);
        Ok(())
    }

    async fn list_active_team_members(
        &self,
        team_name: &TeamName,
        exclude: &[UserId],
    ) -> ReviewRepositoryResult<Vec<User>> {
        let state = self.read()?;
        let mut members: Vec<User> = state
            .users
            .values()
            .filter(|user| {
                user.team_name() == team_name && user.is_active() && !exclude.contains(user.id())
            })
            .cloned()
            .collect();
        members.sort_by(|left, right| {
            left.username()
                .cmp(right.username())
                .then_with(|| left.id().cmp(right.id()))
        });
        Ok(members)
    }

    async fn pull_request_exists(&self, id: &PullRequestId) -> ReviewRepositoryResult<bool> {
        Ok(self.read()?.pull_requests.contains_key(id))
    }

    async fn create_pull_request(&self, pull_request: &PullRequest) -> ReviewRepositoryResult<()> {
        let mut state = self.write()?;
        if state.pull_requests.contains_key(pull_request.id()) {
            return Err(ReviewRepositoryError::DuplicatePullRequest(
                pull_request.id().clone(),
            ));
        }
        ensure_user_exists(&state, pull_request.author_id())?;
        for reviewer in pull_request.reviewers() {
            ensure_user_exists(&state, reviewer)?;
        }

        state
            .pull_requests
            .insert(pull_request.id().clone(), pull_request.clone());
        Ok(())
    }

    async fn find_pull_request(
        &self,
        id: &PullRequestId,
    ) -> ReviewRepositoryResult<Option<PullRequest>> {
        Ok(self.read()?.pull_requests.get(id).cloned())
    }

    async fn mark_merged(
        &self,
        id: &PullRequestId,
        merged_at: DateTime<Utc>,
    ) -> ReviewRepositoryResult<()> {
        let mut state = self.write()?;
        let pull_request = state
            .pull_requests
            .get_mut(id)
            .ok_or_else(|| ReviewRepositoryError::PullRequestNotFound(id.clone()))?;
        pull_request.merge_at(merged_at);
        Ok(())
    }

    async fn replace_reviewer(
        &self,
        id: &PullRequestId,
        old_reviewer: &UserId,
        new_reviewer: &UserId,
        _assigned_at: DateTime<Utc>,
    ) -> ReviewRepositoryResult<()> {
        let mut state = self.write()?;
        ensure_user_exists(&state, new_reviewer)?;
        let pull_request = state
            .pull_requests
            .get_mut(id)
            .ok_or_else(|| ReviewRepositoryError::PullRequestNotFound(id.clone()))?;
        if pull_request.is_merged() {
            return Err(ReviewRepositoryError::PullRequestMerged(id.clone()));
        }
        if !pull_request.has_reviewer(old_reviewer) {
            return Err(ReviewRepositoryError::ReviewerNotAssigned {
                pull_request_id: id.clone(),
                user_id: old_reviewer.clone(),
            });
        }
        if pull_request.has_reviewer(new_reviewer) {
            return Err(ReviewRepositoryError::ReviewerAlreadyAssigned {
                pull_request_id: id.clone(),
                user_id: new_reviewer.clone(),
            });
        }

        pull_request
            .replace_reviewer(old_reviewer, new_reviewer.clone())
            .map_err(ReviewRepositoryError::persistence)
    }

    async fn list_reviews_for_user(
        &self,
        user_id: &UserId,
    ) -> ReviewRepositoryResult<Vec<PullRequestSummary>> {
        let state = self.read()?;
        let mut reviewed: Vec<&PullRequest> = state
            .pull_requests
            .values()
            .filter(|pull_request| pull_request.has_reviewer(user_id))
            .collect();
        reviewed.sort_by(|left, right| {
            right
                .created_at()
                .cmp(&left.created_at())
                .then_with(|| left.id().cmp(right.id()))
        });
        Ok(reviewed.into_iter().map(PullRequest::summary).collect())
    }
}
