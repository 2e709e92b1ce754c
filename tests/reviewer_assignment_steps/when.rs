//! When steps for reviewer assignment BDD scenarios.

use super::world::{AssignmentWorld, parse_list, run_async, user_id};
use rota::review::{
    domain::PullRequestId,
    services::{CreatePullRequestRequest, CreateTeamRequest, TeamMemberInput},
};
use rstest_bdd_macros::when;

fn pull_request_id(raw: &str) -> Result<PullRequestId, eyre::Report> {
    PullRequestId::new(raw).map_err(|err| eyre::eyre!("invalid pull request id in scenario: {err}"))
}

#[when(r#"user "{user}" opens pull request "{pull_request}""#)]
fn user_opens_pull_request(world: &mut AssignmentWorld, user: String, pull_request: String) {
    let request =
        CreatePullRequestRequest::new(pull_request.clone(), format!("Change {pull_request}"), user);
    match run_async(world.service.create_pull_request(request)) {
        Ok(created) => world.last_pull_request = Some(created),
        Err(err) => world.last_error = Some(err),
    }
}

#[when(r#"reviewer "{user}" is reassigned on "{pull_request}""#)]
fn reviewer_is_reassigned(
    world: &mut AssignmentWorld,
    user: String,
    pull_request: String,
) -> Result<(), eyre::Report> {
    let id = pull_request_id(&pull_request)?;
    let old_reviewer = user_id(&user)?;
    world.reviewers_before = world.pull_request()?.reviewers().to_vec();

    match run_async(world.service.reassign_reviewer(&id, &old_reviewer)) {
        Ok(outcome) => {
            let (updated, replaced_by) = outcome.into_parts();
            world.last_pull_request = Some(updated);
            world.replacement = Some(replaced_by);
        }
        Err(err) => world.last_error = Some(err),
    }
    Ok(())
}

#[when(r#"pull request "{pull_request}" is merged again"#)]
fn pull_request_is_merged_again(
    world: &mut AssignmentWorld,
    pull_request: String,
) -> Result<(), eyre::Report> {
    let id = pull_request_id(&pull_request)?;
    match run_async(world.service.merge_pull_request(&id)) {
        Ok(merged) => world.last_pull_request = Some(merged),
        Err(err) => world.last_error = Some(err),
    }
    Ok(())
}

#[when(r#"team "{team}" is registered again with members "{members}""#)]
fn team_is_registered_again(world: &mut AssignmentWorld, team: String, members: String) {
    let request = CreateTeamRequest::new(team).with_members(
        parse_list(&members)
            .into_iter()
            .map(|id| TeamMemberInput::new(id.clone(), format!("user-{id}"), true)),
    );
    if let Err(err) = run_async(world.service.create_team(request)) {
        world.last_error = Some(err);
    }
}
