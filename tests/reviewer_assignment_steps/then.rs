//! Then steps for reviewer assignment BDD scenarios.

use super::world::{AssignmentWorld, parse_list, run_async, user_id};
use rota::review::domain::UserId;
use rstest_bdd_macros::then;

#[then("the pull request has {count:usize} reviewers")]
fn pull_request_has_reviewers(world: &AssignmentWorld, count: usize) -> Result<(), eyre::Report> {
    let reviewers = world.pull_request()?.reviewers();
    eyre::ensure!(
        reviewers.len() == count,
        "expected {count} reviewers, found {reviewers:?}"
    );
    Ok(())
}

#[then(r#"the reviewers are "{members}""#)]
fn reviewers_are(world: &AssignmentWorld, members: String) -> Result<(), eyre::Report> {
    let expected = parse_list(&members)
        .iter()
        .map(|raw| user_id(raw))
        .collect::<Result<Vec<UserId>, _>>()?;
    let reviewers = world.pull_request()?.reviewers();
    eyre::ensure!(
        reviewers == expected.as_slice(),
        "expected reviewers {expected:?}, found {reviewers:?}"
    );
    Ok(())
}

#[then(r#"the reviewers exclude "{user}""#)]
fn reviewers_exclude(world: &AssignmentWorld, user: String) -> Result<(), eyre::Report> {
    let excluded = user_id(&user)?;
    let pull_request = world.pull_request()?;
    eyre::ensure!(
        !pull_request.has_reviewer(&excluded),
        "{user} unexpectedly reviews {}",
        pull_request.id()
    );
    Ok(())
}

#[then(r#"the replacement reviewer is "{user}""#)]
fn replacement_reviewer_is(world: &AssignmentWorld, user: String) -> Result<(), eyre::Report> {
    let expected = user_id(&user)?;
    let replacement = world
        .replacement
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing replacement reviewer"))?;
    eyre::ensure!(
        replacement == &expected,
        "expected replacement {expected}, found {replacement}"
    );
    Ok(())
}

#[then(r#""{new_reviewer}" took the position of "{old_reviewer}""#)]
fn took_position_of(
    world: &AssignmentWorld,
    new_reviewer: String,
    old_reviewer: String,
) -> Result<(), eyre::Report> {
    let old_id = user_id(&old_reviewer)?;
    let new_id = user_id(&new_reviewer)?;
    let before = world
        .reviewers_before
        .iter()
        .position(|id| id == &old_id)
        .ok_or_else(|| eyre::eyre!("{old_reviewer} was not a reviewer before reassignment"))?;
    let after = world
        .pull_request()?
        .reviewers()
        .iter()
        .position(|id| id == &new_id)
        .ok_or_else(|| eyre::eyre!("{new_reviewer} is not a reviewer after reassignment"))?;
    eyre::ensure!(
        before == after,
        "expected position {before}, found position {after}"
    );
    Ok(())
}

#[then(r#"the operation fails with "{code}""#)]
fn operation_fails_with(world: &AssignmentWorld, code: String) -> Result<(), eyre::Report> {
    let err = world
        .last_error
        .as_ref()
        .ok_or_else(|| eyre::eyre!("expected the operation to fail with {code}"))?;
    eyre::ensure!(
        err.kind().code() == code,
        "expected error code {code}, got {err:?}"
    );
    Ok(())
}

#[then(r#"user "{user}" still reviews "{pull_request}""#)]
fn user_still_reviews(
    world: &AssignmentWorld,
    user: String,
    pull_request: String,
) -> Result<(), eyre::Report> {
    let id = user_id(&user)?;
    let reviews = run_async(world.service.get_user_reviews(&id))
        .map_err(|err| eyre::eyre!("list reviews for {user}: {err}"))?;
    eyre::ensure!(
        reviews
            .iter()
            .any(|summary| summary.id().as_str() == pull_request),
        "{user} no longer reviews {pull_request}"
    );
    Ok(())
}

#[then("the merge timestamp is unchanged")]
fn merge_timestamp_unchanged(world: &AssignmentWorld) -> Result<(), eyre::Report> {
    let merged_at = world.pull_request()?.merged_at();
    eyre::ensure!(
        merged_at.is_some() && merged_at == world.merged_at_before,
        "expected merge timestamp {:?}, found {merged_at:?}",
        world.merged_at_before
    );
    Ok(())
}
