//! Racing transitions against a single task.

use super::helpers::{Stack, stack};
use crate::test_helpers::member_caller;
use eyre::{bail, ensure};
use rstest::rstest;
use std::sync::Arc;
use taskflow::task::{
    domain::{ErrorKind, TaskStatus},
    ports::TaskRepository,
    services::SubmitTaskRequest,
};
use tokio::task::JoinSet;

const CONTENDERS: usize = 8;

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_submits_have_exactly_one_winner(stack: Stack) -> eyre::Result<()> {
    let task = stack.assign_to("a-1", "Contended").await;
    stack.lifecycle.start(&member_caller("a-1"), task.id()).await?;

    let mut contenders = JoinSet::new();
    for attempt in 0..CONTENDERS {
        let lifecycle = Arc::clone(&stack.lifecycle);
        let task_id = task.id();
        contenders.spawn(async move {
            let request =
                SubmitTaskRequest::new(task_id).with_deliverable_link(format!("http://doc/{attempt}"));
            lifecycle.submit(&member_caller("a-1"), request).await
        });
    }

    let mut winners = Vec::new();
    while let Some(joined) = contenders.join_next().await {
        match joined? {
            Ok(task) => winners.push(task),
            Err(err) => ensure!(
                err.kind() == ErrorKind::InvalidTransition,
                "loser should see an invalid transition, got {err}"
            ),
        }
    }

    let [winner] = winners.as_slice() else {
        bail!("expected exactly one winner, got {}", winners.len());
    };
    let stored = stack.repository.get(task.id()).await?;
    ensure!(stored == *winner);
    ensure!(stored.status() == TaskStatus::Completed);
    stored.check_invariants()?;
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_starts_stamp_start_time_once(stack: Stack) -> eyre::Result<()> {
    let task = stack.assign_to("a-1", "Contended start").await;

    let mut contenders = JoinSet::new();
    for _ in 0..CONTENDERS {
        let lifecycle = Arc::clone(&stack.lifecycle);
        let task_id = task.id();
        contenders.spawn(async move { lifecycle.start(&member_caller("a-1"), task_id).await });
    }

    let mut successes = 0_usize;
    while let Some(joined) = contenders.join_next().await {
        if joined?.is_ok() {
            successes += 1;
        }
    }

    ensure!(successes == 1);
    ensure!(stack.repository.get(task.id()).await?.status() == TaskStatus::InProgress);
    Ok(())
}
