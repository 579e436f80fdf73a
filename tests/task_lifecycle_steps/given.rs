//! Given steps for task lifecycle BDD scenarios.

use super::world::{LifecycleWorld, assign_task, attempt_start, attempt_submit, minutes};
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given(r#"manager "{manager}" has assigned "{title}" to "{assignee}""#)]
fn manager_has_assigned(
    world: &mut LifecycleWorld,
    manager: String,
    title: String,
    assignee: String,
) -> Result<(), eyre::Report> {
    assign_task(world, &manager, &title, &assignee)?;
    Ok(())
}

#[given(r#""{member}" has started the task"#)]
fn member_has_started(world: &mut LifecycleWorld, member: String) -> Result<(), eyre::Report> {
    let task = attempt_start(world, &member)?.wrap_err("start task")?;
    world.current_task = Some(task);
    Ok(())
}

#[given(r#""{member}" has submitted the task with deliverable link "{link}""#)]
fn member_has_submitted(
    world: &mut LifecycleWorld,
    member: String,
    link: String,
) -> Result<(), eyre::Report> {
    let task = attempt_submit(world, &member, Some(&link))?.wrap_err("submit task")?;
    world.current_task = Some(task);
    Ok(())
}

#[given(r#""{member}" has completed a task in {elapsed:u64} minutes"#)]
fn member_has_completed_in(
    world: &mut LifecycleWorld,
    member: String,
    elapsed: u64,
) -> Result<(), eyre::Report> {
    assign_task(world, "m-1", "Timed task", &member)?;
    member_has_started(world, member.clone())?;
    world.clock.advance(minutes(elapsed)?);
    member_has_submitted(world, member, "http://timed".to_owned())
}
