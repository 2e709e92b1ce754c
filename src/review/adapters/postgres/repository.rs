//! `PostgreSQL` repository implementation for reviewer assignment storage.

use super::{
    models::{NewPullRequestRow, NewReviewerRow, NewUserRow, PullRequestRow, UserRow},
    schema::{pr_reviewers, pull_requests, teams, users},
};
use crate::review::{
    domain::{
        PersistedPullRequestData, PullRequest, PullRequestId, PullRequestStatus,
        PullRequestSummary, Team, TeamName, User, UserId,
    },
    ports::{ReviewRepository, ReviewRepositoryError, ReviewRepositoryResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use diesel::upsert::excluded;

/// `PostgreSQL` connection pool type used by review adapters.
pub type ReviewPgPool = Pool<ConnectionManager<PgConnection>>;

const REVIEWER_PRIMARY_KEY: &str = "pr_reviewers_pkey";

/// `PostgreSQL`-backed review repository.
#[derive(Debug, Clone)]
pub struct PostgresReviewRepository {
    pool: ReviewPgPool,
}

impl PostgresReviewRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: ReviewPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ReviewRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ReviewRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(ReviewRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(ReviewRepositoryError::persistence)?
    }
}

impl From<DieselError> for ReviewRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl ReviewRepository for PostgresReviewRepository {
    async fn team_exists(&self, team_name: &TeamName) -> ReviewRepositoryResult<bool> {
        let name = team_name.as_str().to_owned();
        self.run_blocking(move |connection| team_row_exists(connection, &name))
            .await
    }

    async fn create_team(&self, team_name: &TeamName) -> ReviewRepositoryResult<()> {
        let name = team_name.clone();
        self.run_blocking(move |connection| {
            diesel::insert_into(teams::table)
                .values(teams::team_name.eq(name.as_str()))
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        ReviewRepositoryError::DuplicateTeam(name.clone())
                    }
                    _ => ReviewRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_team(&self, team_name: &TeamName) -> ReviewRepositoryResult<Option<Team>> {
        let name = team_name.clone();
        self.run_blocking(move |connection| {
            if !team_row_exists(connection, name.as_str())? {
                return Ok(None);
            }
            let rows = users::table
                .filter(users::team_name.eq(name.as_str()))
                .order((users::username.asc(), users::id.asc()))
                .select(UserRow::as_select())
                .load::<UserRow>(connection)?;
            let members = rows
                .into_iter()
                .map(|row| row_to_user(row).map(|user| user.to_member()))
                .collect::<ReviewRepositoryResult<Vec<_>>>()?;
            Ok(Some(Team::new(name, members)))
        })
        .await
    }

    async fn upsert_user(&self, user: &User) -> ReviewRepositoryResult<()> {
        let team_name = user.team_name().clone();
        let new_row = NewUserRow {
            id: user.id().as_str().to_owned(),
            username: user.username().to_owned(),
            team_name: team_name.as_str().to_owned(),
            is_active: user.is_active(),
        };
        self.run_blocking(move |connection| {
            diesel::insert_into(users::table)
                .values(&new_row)
                .on_conflict(users::id)
                .do_update()
                .set((
                    users::username.eq(excluded(users::username)),
                    users::team_name.eq(excluded(users::team_name)),
                    users::is_active.eq(excluded(users::is_active)),
                    users::updated_at.eq(diesel::dsl::now),
                ))
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                        ReviewRepositoryError::TeamNotFound(team_name.clone())
                    }
                    _ => ReviewRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_user(&self, user_id: &UserId) -> ReviewRepositoryResult<Option<User>> {
        let id = user_id.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = users::table
                .find(id)
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn set_user_active(
        &self,
        user_id: &UserId,
        is_active: bool,
    ) -> ReviewRepositoryResult<()> {
        let id = user_id.clone();
        self.run_blocking(move |connection| {
            let updated = diesel::update(users::table.find(id.as_str()))
                .set((
                    users::is_active.eq(is_active),
                    users::updated_at.eq(diesel::dsl::now),
                ))
                .execute(connection)?;
            if updated == 0 {
                return Err(ReviewRepositoryError::UserNotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn list_active_team_members(
        &self,
        team_name: &TeamName,
        exclude: &[UserId],
    ) -> ReviewRepositoryResult<Vec<User>> {
        let name = team_name.as_str().to_owned();
        let excluded_ids: Vec<String> = exclude.iter().map(|id| id.as_str().to_owned()).collect();
        self.run_blocking(move |connection| {
            let rows = users::table
                .filter(users::team_name.eq(name))
                .filter(users::is_active.eq(true))
                .filter(users::id.ne_all(excluded_ids))
                .order((users::username.asc(), users::id.asc()))
                .select(UserRow::as_select())
                .load::<UserRow>(connection)?;
            rows.into_iter().map(row_to_user).collect()
        })
        .await
    }

    async fn pull_request_exists(&self, id: &PullRequestId) -> ReviewRepositoryResult<bool> {
        let pull_request_id = id.as_str().to_owned();
        self.run_blocking(move |connection| {
            pull_request_row_exists(connection, &pull_request_id)
        })
        .await
    }

    async fn create_pull_request(&self, pull_request: &PullRequest) -> ReviewRepositoryResult<()> {
        let pull_request_id = pull_request.id().clone();
        let author_id = pull_request.author_id().clone();
        let new_row = to_new_pull_request_row(pull_request);
        let reviewer_rows = to_reviewer_rows(pull_request)?;

        self.run_blocking(move |connection| {
            connection.transaction::<_, ReviewRepositoryError, _>(|tx| {
                diesel::insert_into(pull_requests::table)
                    .values(&new_row)
                    .execute(tx)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                            ReviewRepositoryError::DuplicatePullRequest(pull_request_id.clone())
                        }
                        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                            ReviewRepositoryError::UserNotFound(author_id.clone())
                        }
                        _ => ReviewRepositoryError::persistence(err),
                    })?;

                if !reviewer_rows.is_empty() {
                    diesel::insert_into(pr_reviewers::table)
                        .values(&reviewer_rows)
                        .execute(tx)?;
                }
                Ok(())
            })
        })
        .await
    }

    async fn find_pull_request(
        &self,
        id: &PullRequestId,
    ) -> ReviewRepositoryResult<Option<PullRequest>> {
        let pull_request_id = id.as_str().to_owned();
        self.run_blocking(move |connection| {
            let Some(row) = pull_requests::table
                .find(&pull_request_id)
                .select(PullRequestRow::as_select())
                .first::<PullRequestRow>(connection)
                .optional()?
            else {
                return Ok(None);
            };
            let reviewers = load_reviewer_ids(connection, &pull_request_id)?;
            row_to_pull_request(row, reviewers).map(Some)
        })
        .await
    }

    async fn mark_merged(
        &self,
        id: &PullRequestId,
        merged_at: DateTime<Utc>,
    ) -> ReviewRepositoryResult<()> {
        let pull_request_id = id.clone();
        self.run_blocking(move |connection| {
            let updated = diesel::update(
                pull_requests::table
                    .filter(pull_requests::id.eq(pull_request_id.as_str()))
                    .filter(pull_requests::status.eq(PullRequestStatus::Open.as_str())),
            )
            .set((
                pull_requests::status.eq(PullRequestStatus::Merged.as_str()),
                pull_requests::merged_at.eq(Some(merged_at)),
            ))
            .execute(connection)?;

            if updated == 0 && !pull_request_row_exists(connection, pull_request_id.as_str())? {
                return Err(ReviewRepositoryError::PullRequestNotFound(pull_request_id));
            }
            Ok(())
        })
        .await
    }

    async fn replace_reviewer(
        &self,
        id: &PullRequestId,
        old_reviewer: &UserId,
        new_reviewer: &UserId,
        assigned_at: DateTime<Utc>,
    ) -> ReviewRepositoryResult<()> {
        let pull_request_id = id.clone();
        let old_reviewer = old_reviewer.clone();
        let new_reviewer = new_reviewer.clone();

        self.run_blocking(move |connection| {
            connection.transaction::<_, ReviewRepositoryError, _>(|tx| {
                let stored_status = pull_requests::table
                    .find(pull_request_id.as_str())
                    .select(pull_requests::status)
                    .for_update()
                    .first::<String>(tx)
                    .optional()?
                    .ok_or_else(|| {
                        ReviewRepositoryError::PullRequestNotFound(pull_request_id.clone())
                    })?;
                let status = PullRequestStatus::try_from(stored_status.as_str())
                    .map_err(ReviewRepositoryError::invalid_persisted_data)?;
                if status == PullRequestStatus::Merged {
                    return Err(ReviewRepositoryError::PullRequestMerged(
                        pull_request_id.clone(),
                    ));
                }

                let position = diesel::delete(
                    pr_reviewers::table
                        .filter(pr_reviewers::pull_request_id.eq(pull_request_id.as_str()))
                        .filter(pr_reviewers::user_id.eq(old_reviewer.as_str())),
                )
                .returning(pr_reviewers::position)
                .get_result::<i32>(tx)
                .optional()?
                .ok_or_else(|| ReviewRepositoryError::ReviewerNotAssigned {
                    pull_request_id: pull_request_id.clone(),
                    user_id: old_reviewer.clone(),
                })?;

                diesel::insert_into(pr_reviewers::table)
                    .values(&NewReviewerRow {
                        pull_request_id: pull_request_id.as_str().to_owned(),
                        user_id: new_reviewer.as_str().to_owned(),
                        position,
                        assigned_at,
                    })
                    .execute(tx)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                            if is_reviewer_primary_key_violation(info.as_ref()) =>
                        {
                            ReviewRepositoryError::ReviewerAlreadyAssigned {
                                pull_request_id: pull_request_id.clone(),
                                user_id: new_reviewer.clone(),
                            }
                        }
                        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                            ReviewRepositoryError::UserNotFound(new_reviewer.clone())
                        }
                        _ => ReviewRepositoryError::persistence(err),
                    })?;
                Ok(())
            })
        })
        .await
    }

    async fn list_reviews_for_user(
        &self,
        user_id: &UserId,
    ) -> ReviewRepositoryResult<Vec<PullRequestSummary>> {
        let reviewer = user_id.as_str().to_owned();
        self.run_blocking(move |connection| {
            let rows = pr_reviewers::table
                .inner_join(pull_requests::table)
                .filter(pr_reviewers::user_id.eq(reviewer))
                .order((pull_requests::created_at.desc(), pull_requests::id.asc()))
                .select((
                    pull_requests::id,
                    pull_requests::name,
                    pull_requests::author_id,
                    pull_requests::status,
                ))
                .load::<(String, String, String, String)>(connection)?;
            rows.into_iter().map(row_to_summary).collect()
        })
        .await
    }
}

fn team_row_exists(connection: &mut PgConnection, name: &str) -> ReviewRepositoryResult<bool> {
    diesel::select(diesel::dsl::exists(
        teams::table.filter(teams::team_name.eq(name)),
    ))
    .get_result::<bool>(connection)
    .map_err(ReviewRepositoryError::persistence)
}

fn pull_request_row_exists(
    connection: &mut PgConnection,
    id: &str,
) -> ReviewRepositoryResult<bool> {
    diesel::select(diesel::dsl::exists(
        pull_requests::table.filter(pull_requests::id.eq(id)),
    ))
    .get_result::<bool>(connection)
    .map_err(ReviewRepositoryError::persistence)
}

fn load_reviewer_ids(
    connection: &mut PgConnection,
    pull_request_id: &str,
) -> ReviewRepositoryResult<Vec<UserId>> {
    let ids = pr_reviewers::table
        .filter(pr_reviewers::pull_request_id.eq(pull_request_id))
        .order(pr_reviewers::position.asc())
        .select(pr_reviewers::user_id)
        .load::<String>(connection)?;
    ids.into_iter()
        .map(|id| UserId::new(id).map_err(ReviewRepositoryError::invalid_persisted_data))
        .collect()
}

fn is_reviewer_primary_key_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == REVIEWER_PRIMARY_KEY)
}

fn to_new_pull_request_row(pull_request: &PullRequest) -> NewPullRequestRow {
    NewPullRequestRow {
        id: pull_request.id().as_str().to_owned(),
        name: pull_request.name().to_owned(),
        author_id: pull_request.author_id().as_str().to_owned(),
        status: pull_request.status().as_str().to_owned(),
        created_at: pull_request.created_at(),
        merged_at: pull_request.merged_at(),
    }
}

fn to_reviewer_rows(pull_request: &PullRequest) -> ReviewRepositoryResult<Vec<NewReviewerRow>> {
    pull_request
        .reviewers()
        .iter()
        .enumerate()
        .map(|(index, reviewer)| {
            let position = i32::try_from(index).map_err(ReviewRepositoryError::persistence)?;
            Ok(NewReviewerRow {
                pull_request_id: pull_request.id().as_str().to_owned(),
                user_id: reviewer.as_str().to_owned(),
                position,
                assigned_at: pull_request.created_at(),
            })
        })
        .collect()
}

fn row_to_user(row: UserRow) -> ReviewRepositoryResult<User> {
    let UserRow {
        id,
        username,
        team_name,
        is_active,
    } = row;
    let id = UserId::new(id).map_err(ReviewRepositoryError::invalid_persisted_data)?;
    let team_name =
        TeamName::new(team_name).map_err(ReviewRepositoryError::invalid_persisted_data)?;
    User::new(id, username, team_name, is_active)
        .map_err(ReviewRepositoryError::invalid_persisted_data)
}

fn row_to_pull_request(
    row: PullRequestRow,
    reviewers: Vec<UserId>,
) -> ReviewRepositoryResult<PullRequest> {
    let PullRequestRow {
        id,
        name,
        author_id,
        status,
        created_at,
        merged_at,
    } = row;

    let data = PersistedPullRequestData {
        id: PullRequestId::new(id).map_err(ReviewRepositoryError::invalid_persisted_data)?,
        name,
        author_id: UserId::new(author_id)
            .map_err(ReviewRepositoryError::invalid_persisted_data)?,
        status: PullRequestStatus::try_from(status.as_str())
            .map_err(ReviewRepositoryError::invalid_persisted_data)?,
        reviewers,
        created_at,
        merged_at,
    };
    Ok(PullRequest::from_persisted(data))
}

fn row_to_summary(
    (id, name, author_id, status): (String, String, String, String),
) -> ReviewRepositoryResult<PullRequestSummary> {
    Ok(PullRequestSummary::new(
        PullRequestId::new(id).map_err(ReviewRepositoryError::invalid_persisted_data)?,
        name,
        UserId::new(author_id).map_err(ReviewRepositoryError::invalid_persisted_data)?,
        PullRequestStatus::try_from(status.as_str())
            .map_err(ReviewRepositoryError::invalid_persisted_data)?,
    ))
}
