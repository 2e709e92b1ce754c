//! Route handlers translating JSON requests into review service calls.

use super::dto::{
    CreatePullRequestBody, HealthResponse, MergePullRequestBody, PullRequestDto,
    PullRequestEnvelope, PullRequestShortDto, ReassignBody, ReassignResponse, SetIsActiveRequest,
    TeamDto, TeamEnvelope, TeamQuery, UserDto, UserEnvelope, UserQuery, UserReviewsResponse,
};
use super::error::ApiError;
use crate::review::{
    domain::{PullRequestId, TeamName, UserId},
    ports::ReviewRepository,
    services::{CreatePullRequestRequest, CreateTeamRequest, ReviewService, TeamMemberInput},
};
use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use mockable::Clock;
use tracing::debug;

type ApiResult<T> = Result<T, ApiError>;

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload.map(|Json(value)| value).map_err(|rejection| {
        debug!(error = %rejection, "rejected request body");
        ApiError::bad_request("Invalid request body")
    })
}

fn query<T>(params: Result<Query<T>, QueryRejection>) -> ApiResult<T> {
    params.map(|Query(value)| value).map_err(|rejection| {
        debug!(error = %rejection, "rejected query string");
        ApiError::bad_request("Invalid query string")
    })
}

fn required(value: Option<String>, field: &str) -> ApiResult<String> {
    value
        .filter(|raw| !raw.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request(format!("{field} is required")))
}

pub(super) async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_owned(),
    })
}

pub(super) async fn add_team<R, C>(
    State(service): State<ReviewService<R, C>>,
    payload: Result<Json<TeamDto>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<TeamEnvelope>)>
where
    R: ReviewRepository,
    C: Clock + Send + Sync,
{
    let team = body(payload)?;
    let request = CreateTeamRequest::new(team.team_name).with_members(
        team.members
            .into_iter()
            .map(|member| TeamMemberInput::new(member.user_id, member.username, member.is_active)),
    );
    let created = service.create_team(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(TeamEnvelope {
            team: TeamDto::from(&created),
        }),
    ))
}

pub(super) async fn get_team<R, C>(
    State(service): State<ReviewService<R, C>>,
    params: Result<Query<TeamQuery>, QueryRejection>,
) -> ApiResult<Json<TeamDto>>
where
    R: ReviewRepository,
    C: Clock + Send + Sync,
{
    let lookup = query(params)?;
    let team_name = TeamName::new(required(lookup.team_name, "team_name")?)?;
    let team = service.get_team(&team_name).await?;
    Ok(Json(TeamDto::from(&team)))
}

pub(super) async fn set_user_active<R, C>(
    State(service): State<ReviewService<R, C>>,
    payload: Result<Json<SetIsActiveRequest>, JsonRejection>,
) -> ApiResult<Json<UserEnvelope>>
where
    R: ReviewRepository,
    C: Clock + Send + Sync,
{
    let request = body(payload)?;
    let user_id = UserId::new(request.user_id)?;
    let user = service.set_user_active(&user_id, request.is_active).await?;
    Ok(Json(UserEnvelope {
        user: UserDto::from(&user),
    }))
}

pub(super) async fn get_user_reviews<R, C>(
    State(service): State<ReviewService<R, C>>,
    params: Result<Query<UserQuery>, QueryRejection>,
) -> ApiResult<Json<UserReviewsResponse>>
where
    R: ReviewRepository,
    C: Clock + Send + Sync,
{
    let lookup = query(params)?;
    let user_id = UserId::new(required(lookup.user_id, "user_id")?)?;
    let reviews = service.get_user_reviews(&user_id).await?;
    Ok(Json(UserReviewsResponse {
        user_id: user_id.as_str().to_owned(),
        pull_requests: reviews.iter().map(PullRequestShortDto::from).collect(),
    }))
}

pub(super) async fn create_pull_request<R, C>(
    State(service): State<ReviewService<R, C>>,
    payload: Result<Json<CreatePullRequestBody>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<PullRequestEnvelope>)>
where
    R: ReviewRepository,
    C: Clock + Send + Sync,
{
    let request = body(payload)?;
    let pull_request = service
        .create_pull_request(CreatePullRequestRequest::new(
            request.pull_request_id,
            request.pull_request_name,
            request.author_id,
        ))
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(PullRequestEnvelope {
            pr: PullRequestDto::from(&pull_request),
        }),
    ))
}

pub(super) async fn merge_pull_request<R, C>(
    State(service): State<ReviewService<R, C>>,
    payload: Result<Json<MergePullRequestBody>, JsonRejection>,
) -> ApiResult<Json<PullRequestEnvelope>>
where
    R: ReviewRepository,
    C: Clock + Send + Sync,
{
    let request = body(payload)?;
    let pull_request_id = PullRequestId::new(request.pull_request_id)?;
    let pull_request = service.merge_pull_request(&pull_request_id).await?;
    Ok(Json(PullRequestEnvelope {
        pr: PullRequestDto::from(&pull_request),
    }))
}

pub(super) async fn reassign_reviewer<R, C>(
    State(service): State<ReviewService<R, C>>,
    payload: Result<Json<ReassignBody>, JsonRejection>,
) -> ApiResult<Json<ReassignResponse>>
where
    R: ReviewRepository,
    C: Clock + Send + Sync,
{
    let request = body(payload)?;
    let pull_request_id = PullRequestId::new(request.pull_request_id)?;
    let old_reviewer = UserId::new(request.old_user_id)?;
    let (pull_request, replaced_by) = service
        .reassign_reviewer(&pull_request_id, &old_reviewer)
        .await?
        .into_parts();
    Ok(Json(ReassignResponse {
        pr: PullRequestDto::from(&pull_request),
        replaced_by: replaced_by.as_str().to_owned(),
    }))
}
