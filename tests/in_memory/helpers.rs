//! Shared wiring for in-memory integration tests.

use crate::test_helpers::{ManualClock, manager_caller, seeded_directory};
use rstest::fixture;
use std::sync::Arc;
use taskflow::task::{
    adapters::memory::{InMemoryMemberDirectory, InMemoryTaskRepository},
    domain::Task,
    services::{AssignTaskRequest, TaskAnalyticsService, TaskLifecycleService},
};

/// Lifecycle service over the in-memory adapters.
pub type MemoryLifecycle =
    TaskLifecycleService<InMemoryTaskRepository, InMemoryMemberDirectory, ManualClock>;

/// Services sharing one store, one directory, and one clock.
pub struct Stack {
    pub lifecycle: Arc<MemoryLifecycle>,
    pub analytics: TaskAnalyticsService<InMemoryTaskRepository, InMemoryMemberDirectory>,
    pub repository: Arc<InMemoryTaskRepository>,
    pub clock: Arc<ManualClock>,
}

impl Stack {
    /// Assigns a task from manager `m-1` to `assignee`.
    pub async fn assign_to(&self, assignee: &str, title: &str) -> Task {
        self.lifecycle
            .assign(
                &manager_caller("m-1"),
                AssignTaskRequest::new(assignee, title, "Integration test task"),
            )
            .await
            .expect("assignment should succeed")
    }
}

/// Provides a fresh service stack for each test.
#[fixture]
pub fn stack() -> Stack {
    let repository = Arc::new(InMemoryTaskRepository::new());
    let directory = Arc::new(seeded_directory());
    let clock = Arc::new(ManualClock::new());
    Stack {
        lifecycle: Arc::new(TaskLifecycleService::new(
            Arc::clone(&repository),
            Arc::clone(&directory),
            Arc::clone(&clock),
        )),
        analytics: TaskAnalyticsService::new(Arc::clone(&repository), directory),
        repository,
        clock,
    }
}
