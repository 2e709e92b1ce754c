//! Given steps for reviewer assignment BDD scenarios.

use super::world::{AssignmentWorld, parse_list, run_async, user_id};
use eyre::WrapErr;
use rota::review::{
    domain::PullRequestId,
    services::{CreatePullRequestRequest, CreateTeamRequest, TeamMemberInput},
};
use rstest_bdd_macros::given;

#[given(r#"team "{team}" has active members "{members}""#)]
fn team_with_active_members(
    world: &mut AssignmentWorld,
    team: String,
    members: String,
) -> Result<(), eyre::Report> {
    let request = CreateTeamRequest::new(team).with_members(
        parse_list(&members)
            .into_iter()
            .map(|id| TeamMemberInput::new(id.clone(), format!("user-{id}"), true)),
    );
    run_async(world.service.create_team(request)).wrap_err("register team for scenario")?;
    Ok(())
}

#[given(r#"user "{user}" is inactive"#)]
fn user_is_inactive(world: &mut AssignmentWorld, user: String) -> Result<(), eyre::Report> {
    let id = user_id(&user)?;
    run_async(world.service.set_user_active(&id, false)).wrap_err("deactivate user")?;
    Ok(())
}

#[given(r#"user "{user}" is reactivated"#)]
fn user_is_reactivated(world: &mut AssignmentWorld, user: String) -> Result<(), eyre::Report> {
    let id = user_id(&user)?;
    run_async(world.service.set_user_active(&id, true)).wrap_err("reactivate user")?;
    Ok(())
}

#[given(r#"user "{user}" has opened pull request "{pull_request}""#)]
fn user_has_opened_pull_request(
    world: &mut AssignmentWorld,
    user: String,
    pull_request: String,
) -> Result<(), eyre::Report> {
    let request =
        CreatePullRequestRequest::new(pull_request.clone(), format!("Change {pull_request}"), user);
    let created = run_async(world.service.create_pull_request(request))
        .wrap_err("open pull request for scenario")?;
    world.last_pull_request = Some(created);
    Ok(())
}

#[given(r#"pull request "{pull_request}" has been merged"#)]
fn pull_request_has_been_merged(
    world: &mut AssignmentWorld,
    pull_request: String,
) -> Result<(), eyre::Report> {
    let id = PullRequestId::new(pull_request)
        .map_err(|err| eyre::eyre!("invalid pull request id in scenario: {err}"))?;
    let merged =
        run_async(world.service.merge_pull_request(&id)).wrap_err("merge pull request")?;
    world.merged_at_before = merged.merged_at();
    world.last_pull_request = Some(merged);
    Ok(())
}
