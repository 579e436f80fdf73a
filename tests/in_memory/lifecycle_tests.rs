//! Lifecycle integration tests over the in-memory adapters.

use super::helpers::{Stack, stack};
use crate::test_helpers::{manager_caller, member_caller, user};
use chrono::Duration;
use eyre::{bail, ensure};
use rstest::rstest;
use taskflow::task::{
    domain::{ErrorKind, TaskStatus},
    ports::TaskRepository,
    services::SubmitTaskRequest,
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn report_scenario_runs_end_to_end(stack: Stack) -> eyre::Result<()> {
    let task = stack.assign_to("a-1", "Write report").await;
    let assignee = member_caller("a-1");

    let started = stack.lifecycle.start(&assignee, task.id()).await?;
    stack.clock.advance(Duration::minutes(42));
    let completed = stack
        .lifecycle
        .submit(
            &assignee,
            SubmitTaskRequest::new(task.id()).with_deliverable_link("http://doc"),
        )
        .await?;

    ensure!(started.status() == TaskStatus::InProgress);
    ensure!(started.started_at().is_some());
    ensure!(completed.status() == TaskStatus::Completed);
    ensure!(completed.completed_at().is_some());
    ensure!(completed.deliverable_link().map(|link| link.as_str()) == Some("http://doc"));
    ensure!(completed.completion_proof().is_none());
    ensure!(completed.completion_duration() == Some(Duration::minutes(42)));
    ensure!(stack.repository.get(task.id()).await? == completed);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn proof_only_submission_is_accepted(stack: Stack) -> eyre::Result<()> {
    let task = stack.assign_to("a-1", "Design mock-up").await;
    let assignee = member_caller("a-1");
    stack.lifecycle.start(&assignee, task.id()).await?;

    let completed = stack
        .lifecycle
        .submit(
            &assignee,
            SubmitTaskRequest::new(task.id())
                .with_deliverable_link("")
                .with_proof("data:image/png;base64,iVBORw0KGgo="),
        )
        .await?;

    ensure!(completed.deliverable_link().is_none());
    ensure!(completed.completion_proof().is_some());
    Ok(())
}

#[rstest]
#[case::teammate("b-1")]
#[case::other_team("c-1")]
#[tokio::test(flavor = "multi_thread")]
async fn only_the_assignee_may_advance_a_task(
    stack: Stack,
    #[case] intruder: &str,
) -> eyre::Result<()> {
    let task = stack.assign_to("a-1", "Write report").await;

    let result = stack.lifecycle.start(&member_caller(intruder), task.id()).await;

    match result {
        Err(err) => ensure!(err.kind() == ErrorKind::Forbidden),
        Ok(unexpected) => bail!("intruder start should fail, got {unexpected:?}"),
    }
    ensure!(stack.repository.get(task.id()).await?.status() == TaskStatus::Assigned);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn manager_cannot_submit_on_behalf_of_member(stack: Stack) -> eyre::Result<()> {
    let task = stack.assign_to("a-1", "Write report").await;
    stack.lifecycle.start(&member_caller("a-1"), task.id()).await?;

    let result = stack
        .lifecycle
        .submit(
            &manager_caller("m-1"),
            SubmitTaskRequest::new(task.id()).with_deliverable_link("http://doc"),
        )
        .await;

    match result {
        Err(err) => ensure!(err.kind() == ErrorKind::Forbidden),
        Ok(unexpected) => bail!("manager submit should fail, got {unexpected:?}"),
    }
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completed_record_is_frozen(stack: Stack) -> eyre::Result<()> {
    let task = stack.assign_to("a-1", "Write report").await;
    let assignee = member_caller("a-1");
    stack.lifecycle.start(&assignee, task.id()).await?;
    let first = stack
        .lifecycle
        .submit(
            &assignee,
            SubmitTaskRequest::new(task.id()).with_deliverable_link("http://first"),
        )
        .await?;
    stack.clock.advance(Duration::hours(1));

    let restart = stack.lifecycle.start(&assignee, task.id()).await;
    let resubmit = stack
        .lifecycle
        .submit(
            &assignee,
            SubmitTaskRequest::new(task.id()).with_deliverable_link("http://second"),
        )
        .await;

    for outcome in [restart, resubmit] {
        match outcome {
            Err(err) => ensure!(err.kind() == ErrorKind::InvalidTransition),
            Ok(unexpected) => bail!("completed task changed: {unexpected:?}"),
        }
    }
    ensure!(stack.repository.get(task.id()).await? == first);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn every_stored_task_satisfies_invariants(stack: Stack) -> eyre::Result<()> {
    let assignee = member_caller("a-1");
    let waiting = stack.assign_to("a-1", "Waiting").await;
    let working = stack.assign_to("a-1", "Working").await;
    let done = stack.assign_to("a-1", "Done").await;
    stack.lifecycle.start(&assignee, working.id()).await?;
    stack.lifecycle.start(&assignee, done.id()).await?;
    stack
        .lifecycle
        .submit(&assignee, SubmitTaskRequest::new(done.id()).with_proof("proof"))
        .await?;

    let stored = stack.repository.list_by_assignee(&user("a-1")).await?;

    ensure!(stored.len() == 3);
    for task in &stored {
        task.check_invariants()?;
    }
    let statuses: Vec<_> = stored.iter().map(|task| task.status()).collect();
    ensure!(
        statuses == [TaskStatus::Assigned, TaskStatus::InProgress, TaskStatus::Completed]
    );
    ensure!(stored.first().map(|task| task.id()) == Some(waiting.id()));
    Ok(())
}
