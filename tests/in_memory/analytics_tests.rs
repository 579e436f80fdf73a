//! Analytics integration tests over engine-written tasks.

use super::helpers::{Stack, stack};
use crate::test_helpers::{manager_caller, member_caller, user};
use chrono::Duration;
use eyre::ensure;
use rstest::rstest;
use taskflow::task::{domain::ErrorKind, services::SubmitTaskRequest};

async fn complete_after(stack: &Stack, assignee: &str, minutes: i64) -> eyre::Result<()> {
    let task = stack.assign_to(assignee, "Timed task").await;
    let caller = member_caller(assignee);
    stack.lifecycle.start(&caller, task.id()).await?;
    stack.clock.advance(Duration::minutes(minutes));
    stack
        .lifecycle
        .submit(
            &caller,
            SubmitTaskRequest::new(task.id()).with_deliverable_link("http://doc"),
        )
        .await?;
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn member_average_spans_completed_tasks(stack: Stack) -> eyre::Result<()> {
    complete_after(&stack, "a-1", 10).await?;
    complete_after(&stack, "a-1", 20).await?;
    stack.assign_to("a-1", "Still open").await;

    let stats = stack.analytics.member_analytics(&member_caller("a-1")).await?;

    ensure!(stats.total_tasks() == 3);
    ensure!(stats.completed_tasks() == 2);
    ensure!(stats.average_completion_minutes() == Some(15));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn member_without_completions_has_no_average(stack: Stack) -> eyre::Result<()> {
    let task = stack.assign_to("b-1", "Open").await;
    stack.lifecycle.start(&member_caller("b-1"), task.id()).await?;

    let stats = stack.analytics.member_analytics(&member_caller("b-1")).await?;

    ensure!(stats.completed_tasks() == 0);
    ensure!(stats.average_completion_minutes().is_none());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn team_analytics_cover_roster_only(stack: Stack) -> eyre::Result<()> {
    complete_after(&stack, "a-1", 6).await?;

    let stats = stack.analytics.team_analytics(&manager_caller("m-1")).await?;
    let other_team = stack.analytics.team_analytics(&manager_caller("m-2")).await?;

    ensure!(stats.keys().map(|id| id.as_str()).collect::<Vec<_>>() == ["a-1", "b-1"]);
    ensure!(
        stats.get(&user("a-1")).and_then(|entry| entry.average_completion_minutes()) == Some(6)
    );
    ensure!(stats.get(&user("b-1")).map(|entry| entry.completed_tasks()) == Some(0));
    ensure!(other_team.get(&user("c-1")).map(|entry| entry.total_tasks()) == Some(0));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn team_analytics_refuse_members(stack: Stack) -> eyre::Result<()> {
    let result = stack.analytics.team_analytics(&member_caller("a-1")).await;

    ensure!(result.is_err_and(|err| err.kind() == ErrorKind::Forbidden));
    Ok(())
}
