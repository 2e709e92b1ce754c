//! In-memory integration tests for per-user review listings.

use super::helpers::{at_minute, open_pull_request, pull_request_id, repo, seed_team, user_id};
use rota::review::{
    adapters::memory::InMemoryReviewRepository, domain::PullRequestStatus,
    ports::ReviewRepository,
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reviews_are_listed_newest_first(repo: InMemoryReviewRepository) -> eyre::Result<()> {
    seed_team(
        &repo,
        "backend",
        &[("u1", "Alice", true), ("u2", "Bob", true), ("u3", "Carol", true)],
    )
    .await?;
    for (id, minute) in [("pr-b", 10), ("pr-c", 30), ("pr-a", 10), ("pr-d", 20)] {
        repo.create_pull_request(&open_pull_request(id, "u1", &["u2"], minute)?)
            .await?;
    }
    repo.create_pull_request(&open_pull_request("pr-e", "u1", &["u3"], 40)?)
        .await?;
    repo.mark_merged(&pull_request_id("pr-d")?, at_minute(50)?)
        .await?;

    let reviews = repo.list_reviews_for_user(&user_id("u2")?).await?;
    let ids: Vec<&str> = reviews.iter().map(|summary| summary.id().as_str()).collect();

    eyre::ensure!(
        ids == ["pr-c", "pr-d", "pr-a", "pr-b"],
        "unexpected order {ids:?}"
    );
    let merged = reviews
        .iter()
        .find(|summary| summary.id().as_str() == "pr-d")
        .ok_or_else(|| eyre::eyre!("merged pull request should be listed"))?;
    eyre::ensure!(merged.status() == PullRequestStatus::Merged, "status should be merged");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn replaced_reviewer_no_longer_lists_review(
    repo: InMemoryReviewRepository,
) -> eyre::Result<()> {
    seed_team(
        &repo,
        "backend",
        &[("u1", "Alice", true), ("u2", "Bob", true), ("u3", "Carol", true)],
    )
    .await?;
    let pull_request = open_pull_request("pr-1", "u1", &["u2"], 0)?;
    repo.create_pull_request(&pull_request).await?;

    repo.replace_reviewer(pull_request.id(), &user_id("u2")?, &user_id("u3")?, at_minute(1)?)
        .await?;

    eyre::ensure!(
        repo.list_reviews_for_user(&user_id("u2")?).await?.is_empty(),
        "u2 should have no reviews"
    );
    let reviews = repo.list_reviews_for_user(&user_id("u3")?).await?;
    eyre::ensure!(reviews.len() == 1, "u3 should review one pull request");
    Ok(())
}
