//! HTTP boundary for the reviewer assignment service.
//!
//! Routes accept and return JSON. Failures use a single envelope,
//! `{"error": {"code": .., "message": ..}}`, whose codes mirror
//! [`crate::review::services::ErrorKind`].

pub mod dto;
mod error;
mod handlers;

pub use error::{ApiError, ErrorDetail, ErrorResponse};

use crate::review::{ports::ReviewRepository, services::ReviewService};
use axum::Router;
use axum::routing::{get, post};
use mockable::Clock;
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Upper bound on the time spent serving one request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Builds the application router around a review service.
#[must_use]
pub fn router<R, C>(service: ReviewService<R, C>) -> Router
where
    R: ReviewRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(handlers::health))
        .route("/team/add", post(handlers::add_team::<R, C>))
        .route("/team/get", get(handlers::get_team::<R, C>))
        .route("/users/setIsActive", post(handlers::set_user_active::<R, C>))
        .route("/users/getReview", get(handlers::get_user_reviews::<R, C>))
        .route(
            "/pullRequest/create",
            post(handlers::create_pull_request::<R, C>),
        )
        .route(
            "/pullRequest/merge",
            post(handlers::merge_pull_request::<R, C>),
        )
        .route(
            "/pullRequest/reassign",
            post(handlers::reassign_reviewer::<R, C>),
        )
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}
