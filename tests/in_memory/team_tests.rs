//! In-memory integration tests for teams and users.

use super::helpers::{repo, seed_team, team_name, user_id};
use eyre::WrapErr;
use rota::review::{
    adapters::memory::InMemoryReviewRepository,
    domain::User,
    ports::{ReviewRepository, ReviewRepositoryError},
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn team_members_are_ordered_by_username(repo: InMemoryReviewRepository) -> eyre::Result<()> {
    let name = seed_team(
        &repo,
        "backend",
        &[("u3", "Carol", true), ("u1", "Alice", false), ("u2", "Bob", true)],
    )
    .await?;

    let team = repo
        .find_team(&name)
        .await?
        .ok_or_else(|| eyre::eyre!("team should exist"))?;
    let usernames: Vec<&str> = team.members().iter().map(|member| member.username()).collect();

    eyre::ensure!(usernames == ["Alice", "Bob", "Carol"], "unexpected order {usernames:?}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_team_is_none(repo: InMemoryReviewRepository) -> eyre::Result<()> {
    let name = team_name("ghosts")?;

    eyre::ensure!(!repo.team_exists(&name).await?, "team should not exist");
    eyre::ensure!(repo.find_team(&name).await?.is_none(), "team should not be found");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_team_is_rejected(repo: InMemoryReviewRepository) -> eyre::Result<()> {
    let name = seed_team(&repo, "backend", &[]).await?;

    let result = repo.create_team(&name).await;

    eyre::ensure!(
        matches!(result, Err(ReviewRepositoryError::DuplicateTeam(ref duplicate)) if duplicate == &name),
        "expected DuplicateTeam, got {result:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn upsert_moves_user_between_teams(repo: InMemoryReviewRepository) -> eyre::Result<()> {
    let backend = seed_team(&repo, "backend", &[("u1", "Alice", true)]).await?;
    let frontend = seed_team(&repo, "frontend", &[]).await?;

    let moved = User::new(user_id("u1")?, "Alice Smith", frontend.clone(), false)
        .wrap_err("build user")?;
    repo.upsert_user(&moved).await?;

    let stored = repo
        .find_user(&user_id("u1")?)
        .await?
        .ok_or_else(|| eyre::eyre!("user should exist"))?;
    eyre::ensure!(stored == moved, "user should be overwritten, got {stored:?}");

    let old_team = repo
        .find_team(&backend)
        .await?
        .ok_or_else(|| eyre::eyre!("team should exist"))?;
    eyre::ensure!(old_team.members().is_empty(), "user should have left backend");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn upsert_into_missing_team_fails(repo: InMemoryReviewRepository) -> eyre::Result<()> {
    let user = User::new(user_id("u1")?, "Alice", team_name("nowhere")?, true)
        .wrap_err("build user")?;

    let result = repo.upsert_user(&user).await;

    eyre::ensure!(
        matches!(result, Err(ReviewRepositoryError::TeamNotFound(_))),
        "expected TeamNotFound, got {result:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn set_user_active_reports_missing_user(repo: InMemoryReviewRepository) -> eyre::Result<()> {
    let result = repo.set_user_active(&user_id("ghost")?, false).await;

    eyre::ensure!(
        matches!(result, Err(ReviewRepositoryError::UserNotFound(_))),
        "expected UserNotFound, got {result:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn active_members_skip_inactive_and_excluded(
    repo: InMemoryReviewRepository,
) -> eyre::Result<()> {
    let name = seed_team(
        &repo,
        "backend",
        &[
            ("u1", "Alice", true),
            ("u2", "Bob", true),
            ("u3", "Carol", true),
            ("u4", "Dan", true),
        ],
    )
    .await?;
    seed_team(&repo, "frontend", &[("u5", "Eve", true)]).await?;
    repo.set_user_active(&user_id("u3")?, false).await?;

    let members = repo
        .list_active_team_members(&name, &[user_id("u1")?])
        .await?;
    let ids: Vec<&str> = members.iter().map(|user| user.id().as_str()).collect();

    eyre::ensure!(ids == ["u2", "u4"], "unexpected candidates {ids:?}");
    Ok(())
}
