//! In-memory integration tests for pull request storage.

use super::helpers::{at_minute, open_pull_request, pull_request_id, repo, seed_team, user_id};
use rota::review::{
    adapters::memory::InMemoryReviewRepository,
    domain::PullRequestStatus,
    ports::{ReviewRepository, ReviewRepositoryError},
};
use rstest::rstest;

async fn seeded(repo: &InMemoryReviewRepository) -> eyre::Result<()> {
    seed_team(
        repo,
        "backend",
        &[
            ("u1", "Alice", true),
            ("u2", "Bob", true),
            ("u3", "Carol", true),
            ("u4", "Dan", true),
        ],
    )
    .await?;
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stored_pull_request_round_trips(repo: InMemoryReviewRepository) -> eyre::Result<()> {
    seeded(&repo).await?;
    let pull_request = open_pull_request("pr-1", "u1", &["u3", "u2"], 0)?;

    repo.create_pull_request(&pull_request).await?;

    eyre::ensure!(repo.pull_request_exists(pull_request.id()).await?, "should exist");
    let stored = repo.find_pull_request(pull_request.id()).await?;
    eyre::ensure!(stored.as_ref() == Some(&pull_request), "got {stored:?}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_pull_request_is_rejected(repo: InMemoryReviewRepository) -> eyre::Result<()> {
    seeded(&repo).await?;
    let first = open_pull_request("pr-1", "u1", &["u2"], 0)?;
    repo.create_pull_request(&first).await?;

    let second = open_pull_request("pr-1", "u4", &[], 1)?;
    let result = repo.create_pull_request(&second).await;

    eyre::ensure!(
        matches!(result, Err(ReviewRepositoryError::DuplicatePullRequest(_))),
        "expected DuplicatePullRequest, got {result:?}"
    );
    let stored = repo.find_pull_request(first.id()).await?;
    eyre::ensure!(stored.as_ref() == Some(&first), "original should survive");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_author_stores_nothing(repo: InMemoryReviewRepository) -> eyre::Result<()> {
    seeded(&repo).await?;
    let pull_request = open_pull_request("pr-1", "ghost", &["u2"], 0)?;

    let result = repo.create_pull_request(&pull_request).await;

    eyre::ensure!(
        matches!(result, Err(ReviewRepositoryError::UserNotFound(_))),
        "expected UserNotFound, got {result:?}"
    );
    eyre::ensure!(!repo.pull_request_exists(pull_request.id()).await?, "nothing stored");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn merge_is_recorded_once(repo: InMemoryReviewRepository) -> eyre::Result<()> {
    seeded(&repo).await?;
    let pull_request = open_pull_request("pr-1", "u1", &["u2"], 0)?;
    repo.create_pull_request(&pull_request).await?;

    repo.mark_merged(pull_request.id(), at_minute(5)?).await?;
    repo.mark_merged(pull_request.id(), at_minute(9)?).await?;

    let stored = repo
        .find_pull_request(pull_request.id())
        .await?
        .ok_or_else(|| eyre::eyre!("pull request should exist"))?;
    eyre::ensure!(stored.status() == PullRequestStatus::Merged, "should be merged");
    eyre::ensure!(stored.merged_at() == Some(at_minute(5)?), "first merge time wins");
    eyre::ensure!(stored.reviewers() == pull_request.reviewers(), "reviewers kept");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn merging_missing_pull_request_fails(repo: InMemoryReviewRepository) -> eyre::Result<()> {
    let result = repo.mark_merged(&pull_request_id("pr-404")?, at_minute(0)?).await;

    eyre::ensure!(
        matches!(result, Err(ReviewRepositoryError::PullRequestNotFound(_))),
        "expected PullRequestNotFound, got {result:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn replacement_keeps_reviewer_position(repo: InMemoryReviewRepository) -> eyre::Result<()> {
    seeded(&repo).await?;
    let pull_request = open_pull_request("pr-1", "u1", &["u2", "u3"], 0)?;
    repo.create_pull_request(&pull_request).await?;

    repo.replace_reviewer(pull_request.id(), &user_id("u2")?, &user_id("u4")?, at_minute(1)?)
        .await?;

    let stored = repo
        .find_pull_request(pull_request.id())
        .await?
        .ok_or_else(|| eyre::eyre!("pull request should exist"))?;
    let reviewers: Vec<&str> = stored.reviewers().iter().map(|id| id.as_str()).collect();
    eyre::ensure!(reviewers == ["u4", "u3"], "unexpected reviewers {reviewers:?}");
    Ok(())
}

#[rstest]
#[case::not_assigned("u4", "u2")]
#[case::already_assigned("u2", "u3")]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_replacement_changes_nothing(
    repo: InMemoryReviewRepository,
    #[case] old_reviewer: &str,
    #[case] new_reviewer: &str,
) -> eyre::Result<()> {
    seeded(&repo).await?;
    let pull_request = open_pull_request("pr-1", "u1", &["u2", "u3"], 0)?;
    repo.create_pull_request(&pull_request).await?;

    let result = repo
        .replace_reviewer(
            pull_request.id(),
            &user_id(old_reviewer)?,
            &user_id(new_reviewer)?,
            at_minute(1)?,
        )
        .await;

    eyre::ensure!(
        matches!(
            result,
            Err(ReviewRepositoryError::ReviewerNotAssigned { .. }
                | ReviewRepositoryError::ReviewerAlreadyAssigned { .. })
        ),
        "expected a rejected swap, got {result:?}"
    );
    let stored = repo.find_pull_request(pull_request.id()).await?;
    eyre::ensure!(stored.as_ref() == Some(&pull_request), "state should be unchanged");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn merged_pull_request_rejects_replacement(
    repo: InMemoryReviewRepository,
) -> eyre::Result<()> {
    seeded(&repo).await?;
    let pull_request = open_pull_request("pr-1", "u1", &["u2"], 0)?;
    repo.create_pull_request(&pull_request).await?;
    repo.mark_merged(pull_request.id(), at_minute(2)?).await?;

    let result = repo
        .replace_reviewer(pull_request.id(), &user_id("u2")?, &user_id("u3")?, at_minute(3)?)
        .await;

    eyre::ensure!(
        matches!(result, Err(ReviewRepositoryError::PullRequestMerged(_))),
        "expected PullRequestMerged, got {result:?}"
    );
    Ok(())
}
