//! When steps for task lifecycle BDD scenarios.

use super::world::{LifecycleWorld, attempt_start, attempt_submit, minutes};
use rstest_bdd_macros::when;
use taskflow::task::{domain::Task, services::TaskLifecycleError};

fn record(world: &mut LifecycleWorld, result: Result<Task, TaskLifecycleError>) {
    if let Ok(ref updated) = result {
        world.current_task = Some(updated.clone());
    }
    world.last_result = Some(result);
}

#[when(r#""{member}" starts the task"#)]
fn member_starts(world: &mut LifecycleWorld, member: String) -> Result<(), eyre::Report> {
    let result = attempt_start(world, &member)?;
    record(world, result);
    Ok(())
}

#[when("{elapsed:u64} minutes pass")]
fn minutes_pass(world: &mut LifecycleWorld, elapsed: u64) -> Result<(), eyre::Report> {
    world.clock.advance(minutes(elapsed)?);
    Ok(())
}

#[when(r#""{member}" submits the task with deliverable link "{link}""#)]
fn member_submits_link(
    world: &mut LifecycleWorld,
    member: String,
    link: String,
) -> Result<(), eyre::Report> {
    let result = attempt_submit(world, &member, Some(&link))?;
    record(world, result);
    Ok(())
}

#[when(r#""{member}" submits the task without evidence"#)]
fn member_submits_nothing(world: &mut LifecycleWorld, member: String) -> Result<(), eyre::Report> {
    let result = attempt_submit(world, &member, None)?;
    record(world, result);
    Ok(())
}
