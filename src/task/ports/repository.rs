//! Repository port for task persistence and atomic lifecycle updates.

use crate::task::domain::{Task, TaskDomainError, TaskId, TeamCode, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Read-modify-write closure applied to a task inside [`TaskRepository::update`].
///
/// The closure sees the current stored record and either mutates it through
/// the aggregate's transition methods or rejects the change.
pub type TaskMutator = Box<dyn FnOnce(&mut Task) -> Result<(), TaskDomainError> + Send>;

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists or [`TaskRepositoryError::Rejected`] when the record violates
    /// the lifecycle invariants.
    async fn create(&self, task: &Task) -> TaskRepositoryResult<TaskId>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Loads a task that must exist.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn get(&self, id: TaskId) -> TaskRepositoryResult<Task> {
        self.find_by_id(id)
            .await?
            .ok_or(TaskRepositoryError::NotFound(id))
    }

    /// Atomically applies `mutator` to the stored task and persists the
    /// result.
    ///
    /// Implementations serialise concurrent updates of the same task, pass
    /// the candidate through [`apply_mutation`], and only write when the
    /// stored status still matches the status the mutator observed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist
    /// and [`TaskRepositoryError::Rejected`] when the mutator or the
    /// invariant re-check refuses the change. The stored record is unchanged
    /// on error.
    async fn update(&self, id: TaskId, mutator: TaskMutator) -> TaskRepositoryResult<Task>;

    /// Returns every task assigned to `assignee`, oldest first.
    async fn list_by_assignee(&self, assignee: &UserId) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns every task created within `team`, oldest first.
    async fn list_by_team(&self, team: &TeamCode) -> TaskRepositoryResult<Vec<Task>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The write was refused by the mutator or the invariant re-check.
    #[error("task update rejected: {0}")]
    Rejected(#[from] TaskDomainError),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// Runs `mutator` against a copy of `current` and validates the outcome.
///
/// Shared by every adapter so the store enforces the lifecycle invariants
/// independently of the engine: completed records never change, identity
/// and content fields are fixed at creation, and the status/timestamp
/// biconditionals hold after the write.
///
/// # Errors
///
/// Returns [`TaskRepositoryError::Rejected`] carrying the mutator's error or
/// the violated invariant.
pub fn apply_mutation(current: &Task, mutator: TaskMutator) -> TaskRepositoryResult<Task> {
    let mut candidate = current.clone();
    mutator(&mut candidate)?;

    if candidate == *current {
        return Ok(candidate);
    }
    if current.status().is_terminal() {
        return Err(TaskDomainError::CompletedTaskImmutable(current.id()).into());
    }
    if !same_identity(current, &candidate) {
        return Err(TaskDomainError::InvariantViolation {
            task_id: current.id(),
            reason: "identity and content fields are fixed at creation",
        }
        .into());
    }
    candidate.check_invariants()?;
    Ok(candidate)
}

fn same_identity(current: &Task, candidate: &Task) -> bool {
    current.id() == candidate.id()
        && current.assigned_to() == candidate.assigned_to()
        && current.created_by() == candidate.created_by()
        && current.team() == candidate.team()
        && current.title() == candidate.title()
        && current.description() == candidate.description()
        && current.created_at() == candidate.created_at()
}
