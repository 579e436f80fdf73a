//! In-memory task repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{Task, TaskId, TeamCode, UserId},
    ports::{TaskMutator, TaskRepository, TaskRepositoryError, TaskRepositoryResult, apply_mutation},
};

/// Thread-safe in-memory task repository.
///
/// A single write lock covers each read-modify-write, so concurrent updates
/// of the same task observe each other's committed status.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    assignee_index: HashMap<UserId, Vec<TaskId>>,
    team_index: HashMap<TeamCode, Vec<TaskId>>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

/// Helper to look up tasks by index key, preserving insertion order.
fn find_by_index<K: Eq + Hash>(
    state: &InMemoryTaskState,
    index: &HashMap<K, Vec<TaskId>>,
    key: &K,
) -> Vec<Task> {
    index
        .get(key)
        .map(|ids| {
            ids.iter()
                .filter_map(|id| state.tasks.get(id).cloned())
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn create(&self, task: &Task) -> TaskRepositoryResult<TaskId> {
        task.check_invariants()?;
        let mut state = self.state.write().map_err(lock_error)?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }

        state
            .assignee_index
            .entry(task.assigned_to().clone())
            .or_default()
            .push(task.id());
        state
            .team_index
            .entry(task.team().clone())
            .or_default()
            .push(task.id());
        state.tasks.insert(task.id(), task.clone());
        Ok(task.id())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn update(&self, id: TaskId, mutator: TaskMutator) -> TaskRepositoryResult<Task> {
        let mut state = self.state.write().map_err(lock_error)?;
        let current = state
            .tasks
            .get(&id)
            .ok_or(TaskRepositoryError::NotFound(id))?;

        let updated = apply_mutation(current, mutator)?;
        state.tasks.insert(id, updated.clone());
        Ok(updated)
    }

    async fn list_by_assignee(&self, assignee: &UserId) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(find_by_index(&state, &state.assignee_index, assignee))
    }

    async fn list_by_team(&self, team: &TeamCode) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(find_by_index(&state, &state.team_index, team))
    }
}
