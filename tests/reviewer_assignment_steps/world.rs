//! Shared world state for reviewer assignment BDD scenarios.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::DefaultClock;
use rota::review::{
    adapters::memory::InMemoryReviewRepository,
    domain::{PullRequest, UserId},
    services::{ReviewService, ReviewServiceError},
};
use rstest::fixture;

/// Service type used by the BDD world.
pub type TestReviewService = ReviewService<InMemoryReviewRepository, DefaultClock>;

/// Scenario world for reviewer assignment behaviour tests.
pub struct AssignmentWorld {
    pub service: TestReviewService,
    pub last_pull_request: Option<PullRequest>,
    pub reviewers_before: Vec<UserId>,
    pub merged_at_before: Option<DateTime<Utc>>,
    pub replacement: Option<UserId>,
    pub last_error: Option<ReviewServiceError>,
}

impl AssignmentWorld {
    /// Creates a world backed by an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        let service = ReviewService::new(
            Arc::new(InMemoryReviewRepository::new()),
            Arc::new(DefaultClock),
        );

        Self {
            service,
            last_pull_request: None,
            reviewers_before: Vec::new(),
            merged_at_before: None,
            replacement: None,
            last_error: None,
        }
    }

    /// Returns the pull request produced by the most recent step.
    ///
    /// # Errors
    ///
    /// Returns an error when no step has produced a pull request yet.
    pub fn pull_request(&self) -> Result<&PullRequest, eyre::Report> {
        self.last_pull_request
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing pull request in scenario world"))
    }
}

impl Default for AssignmentWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> AssignmentWorld {
    AssignmentWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Splits a comma-separated list of identifiers.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Parses a user identifier used in a step.
///
/// # Errors
///
/// Returns an error when the identifier is blank.
pub fn user_id(raw: &str) -> Result<UserId, eyre::Report> {
    UserId::new(raw).map_err(|err| eyre::eyre!("invalid user id in scenario: {err}"))
}
