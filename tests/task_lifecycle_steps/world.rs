//! World state for task lifecycle BDD scenarios.

use std::sync::Arc;

use crate::test_helpers::{ManualClock, seeded_directory, user};
use chrono::Duration;
use eyre::{WrapErr, eyre};
use rstest::fixture;
use taskflow::task::{
    adapters::memory::{InMemoryMemberDirectory, InMemoryTaskRepository},
    domain::{Caller, Task, TaskId},
    ports::{MemberDirectory, TaskRepository},
    services::{
        AssignTaskRequest, SubmitTaskRequest, TaskAnalyticsService, TaskLifecycleError,
        TaskLifecycleService,
    },
};

pub type TestLifecycleService =
    TaskLifecycleService<InMemoryTaskRepository, InMemoryMemberDirectory, ManualClock>;

/// World state for lifecycle BDD tests.
pub struct LifecycleWorld {
    pub repository: Arc<InMemoryTaskRepository>,
    pub directory: Arc<InMemoryMemberDirectory>,
    pub clock: Arc<ManualClock>,
    pub service: TestLifecycleService,
    pub analytics: TaskAnalyticsService<InMemoryTaskRepository, InMemoryMemberDirectory>,
    pub current_task: Option<Task>,
    pub last_result: Option<Result<Task, TaskLifecycleError>>,
}

impl Default for LifecycleWorld {
    fn default() -> Self {
        let repository = Arc::new(InMemoryTaskRepository::new());
        let directory = Arc::new(seeded_directory());
        let clock = Arc::new(ManualClock::new());
        let service = TaskLifecycleService::new(
            Arc::clone(&repository),
            Arc::clone(&directory),
            Arc::clone(&clock),
        );
        let analytics = TaskAnalyticsService::new(Arc::clone(&repository), Arc::clone(&directory));

        Self {
            repository,
            directory,
            clock,
            service,
            analytics,
            current_task: None,
            last_result: None,
        }
    }
}

#[fixture]
pub fn world() -> LifecycleWorld {
    LifecycleWorld::default()
}

pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Builds the caller context from the directory record, as a verified token would.
pub fn caller_for(world: &LifecycleWorld, id: &str) -> Result<Caller, eyre::Report> {
    let record = run_async(world.directory.find_user(&user(id)))
        .wrap_err("look up caller")?
        .ok_or_else(|| eyre!("{id} is not in the directory"))?;
    Ok(Caller::new(record.id().clone(), record.role()))
}

pub fn current_task_id(world: &LifecycleWorld) -> Result<TaskId, eyre::Report> {
    world
        .current_task
        .as_ref()
        .map(Task::id)
        .ok_or_else(|| eyre!("no task in scenario world"))
}

/// Re-reads the current task from the store.
pub fn stored_task(world: &LifecycleWorld) -> Result<Task, eyre::Report> {
    let id = current_task_id(world)?;
    run_async(world.repository.get(id)).wrap_err("fetch current task")
}

pub fn assign_task(
    world: &mut LifecycleWorld,
    manager: &str,
    title: &str,
    assignee: &str,
) -> Result<Task, eyre::Report> {
    let caller = caller_for(world, manager)?;
    let request = AssignTaskRequest::new(assignee, title, "Scenario task");
    let task = run_async(world.service.assign(&caller, request)).wrap_err("assign task")?;
    world.current_task = Some(task.clone());
    Ok(task)
}

pub fn attempt_start(
    world: &LifecycleWorld,
    member: &str,
) -> Result<Result<Task, TaskLifecycleError>, eyre::Report> {
    let caller = caller_for(world, member)?;
    let id = current_task_id(world)?;
    Ok(run_async(world.service.start(&caller, id)))
}

pub fn attempt_submit(
    world: &LifecycleWorld,
    member: &str,
    link: Option<&str>,
) -> Result<Result<Task, TaskLifecycleError>, eyre::Report> {
    let caller = caller_for(world, member)?;
    let base = SubmitTaskRequest::new(current_task_id(world)?);
    let request = match link {
        Some(value) => base.with_deliverable_link(value),
        None => base,
    };
    Ok(run_async(world.service.submit(&caller, request)))
}

pub fn minutes(count: u64) -> Result<Duration, eyre::Report> {
    let whole = i64::try_from(count).wrap_err("minute count out of range")?;
    Ok(Duration::minutes(whole))
}
