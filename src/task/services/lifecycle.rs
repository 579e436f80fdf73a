//! Task lifecycle engine: assignment, start, and submission.

use crate::task::{
    domain::{
        Caller, CompletionEvidence, ErrorKind, Role, Task, TaskAssignment, TaskDomainError,
        TaskId, TeamCode, TeamMember, UserId,
    },
    ports::{MemberDirectory, MemberDirectoryError, TaskRepository, TaskRepositoryError},
};
use log::{debug, info, warn};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for assigning a new task to a team member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignTaskRequest {
    assigned_to: String,
    title: String,
    description: String,
}

impl AssignTaskRequest {
    /// Creates a request with the assignee and task text.
    #[must_use]
    pub fn new(
        assigned_to: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            assigned_to: assigned_to.into(),
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Request payload for submitting a task as completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitTaskRequest {
    task_id: TaskId,
    deliverable_link: Option<String>,
    proof: Option<String>,
}

impl SubmitTaskRequest {
    /// Creates a request for `task_id` with no evidence attached yet.
    #[must_use]
    pub const fn new(task_id: TaskId) -> Self {
        Self {
            task_id,
            deliverable_link: None,
            proof: None,
        }
    }

    /// Sets the deliverable link.
    #[must_use]
    pub fn with_deliverable_link(mut self, link: impl Into<String>) -> Self {
        self.deliverable_link = Some(link.into());
        self
    }

    /// Sets the completion proof reference.
    #[must_use]
    pub fn with_proof(mut self, proof: impl Into<String>) -> Self {
        self.proof = Some(proof.into());
        self
    }
}

/// Service-level errors for task lifecycle and analytics operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation or a transition guard failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(TaskRepositoryError),
    /// Directory lookup failed.
    #[error(transparent)]
    Directory(#[from] MemberDirectoryError),
    /// The caller does not hold the manager role.
    #[error("user {0} is not a manager")]
    NotManager(UserId),
    /// The requested assignee is not a member of the manager's team.
    #[error("member {member} is not on team {team}")]
    MemberNotOnTeam {
        /// Requested assignee.
        member: UserId,
        /// Manager's team.
        team: TeamCode,
    },
    /// The task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
}

impl TaskLifecycleError {
    /// Returns the caller-facing classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) => err.kind(),
            Self::Repository(_) | Self::Directory(_) => ErrorKind::Internal,
            Self::NotManager(_) => ErrorKind::Forbidden,
            Self::MemberNotOnTeam { .. } | Self::TaskNotFound(_) => ErrorKind::NotFound,
        }
    }
}

impl From<TaskRepositoryError> for TaskLifecycleError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::NotFound(id) => Self::TaskNotFound(id),
            TaskRepositoryError::Rejected(domain) => Self::Domain(domain),
            other => Self::Repository(other),
        }
    }
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Resolves the caller's directory record and requires the manager role.
pub(crate) async fn resolve_manager<D>(
    directory: &D,
    caller: &Caller,
) -> TaskLifecycleResult<TeamMember>
where
    D: MemberDirectory + ?Sized,
{
    let not_manager = || TaskLifecycleError::NotManager(caller.user_id().clone());
    if caller.role() != Role::Manager {
        return Err(not_manager());
    }
    directory
        .find_user(caller.user_id())
        .await?
        .filter(TeamMember::is_manager)
        .ok_or_else(not_manager)
}

/// Task lifecycle orchestration service.
///
/// Every mutation funnels through [`TaskRepository::update`], so the
/// ownership and source-state checks run against the stored record inside
/// the repository's atomic section.
pub struct TaskLifecycleService<R, D, C>
where
    R: TaskRepository + ?Sized,
    D: MemberDirectory + ?Sized,
    C: Clock + Send + Sync + 'static,
{
    repository: Arc<R>,
    directory: Arc<D>,
    clock: Arc<C>,
}

impl<R, D, C> TaskLifecycleService<R, D, C>
where
    R: TaskRepository + ?Sized,
    D: MemberDirectory + ?Sized,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(repository: Arc<R>, directory: Arc<D>, clock: Arc<C>) -> Self {
        Self {
            repository,
            directory,
            clock,
        }
    }

    /// Creates a task for a member of the calling manager's team.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotManager`] when the caller is not a
    /// manager, [`TaskLifecycleError::MemberNotOnTeam`] when the assignee is
    /// not a member of the manager's team, and
    /// [`TaskLifecycleError::Domain`] when the title or description is blank.
    pub async fn assign(
        &self,
        caller: &Caller,
        request: AssignTaskRequest,
    ) -> TaskLifecycleResult<Task> {
        let manager = resolve_manager(&*self.directory, caller)
            .await
            .inspect_err(|err| warn!("assign refused for {}: {err}", caller.user_id()))?;

        let member_id = UserId::new(request.assigned_to)?;
        let on_team = self
            .directory
            .find_user(&member_id)
            .await?
            .is_some_and(|user| !user.is_manager() && user.team() == manager.team());
        if !on_team {
            return Err(TaskLifecycleError::MemberNotOnTeam {
                member: member_id,
                team: manager.team().clone(),
            });
        }

        let assignment = TaskAssignment {
            title: request.title,
            description: request.description,
            assigned_to: member_id,
            created_by: manager.id().clone(),
            team: manager.team().clone(),
        };
        let task = Task::assign(assignment, &*self.clock)?;
        self.repository.create(&task).await?;
        info!(
            "task {} assigned to {} by {}",
            task.id(),
            task.assigned_to(),
            task.created_by()
        );
        Ok(task)
    }

    /// Starts work on a task. Only the assignee may start it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] for an unknown task,
    /// [`TaskDomainError::NotAssignee`] when the caller is not the assignee,
    /// and [`TaskDomainError::InvalidStatusTransition`] when the task is not
    /// in the assigned state.
    pub async fn start(&self, caller: &Caller, task_id: TaskId) -> TaskLifecycleResult<Task> {
        let user = caller.user_id().clone();
        let clock = Arc::clone(&self.clock);
        let task = self
            .repository
            .update(task_id, Box::new(move |task: &mut Task| task.start(&user, &*clock)))
            .await
            .map_err(TaskLifecycleError::from)
            .inspect_err(|err| log_refusal("start", task_id, caller, err))?;
        info!("task {task_id} started by {}", caller.user_id());
        Ok(task)
    }

    /// Completes a task with a deliverable link, a proof artifact, or both.
    ///
    /// Evidence is validated before the task is loaded, so a submission
    /// without evidence fails the same way whatever the task's state.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::MissingCompletionEvidence`] when neither
    /// link nor proof is present, [`TaskLifecycleError::TaskNotFound`] for an
    /// unknown task, [`TaskDomainError::NotAssignee`] when the caller is not
    /// the assignee, and [`TaskDomainError::InvalidStatusTransition`] unless
    /// the task is in progress.
    pub async fn submit(
        &self,
        caller: &Caller,
        request: SubmitTaskRequest,
    ) -> TaskLifecycleResult<Task> {
        let task_id = request.task_id;
        let evidence = CompletionEvidence::from_raw(
            request.deliverable_link.as_deref(),
            request.proof.as_deref(),
        )
        .map_err(TaskLifecycleError::from)
        .inspect_err(|err| log_refusal("submit", task_id, caller, err))?;

        let user = caller.user_id().clone();
        let clock = Arc::clone(&self.clock);
        let task = self
            .repository
            .update(
                task_id,
                Box::new(move |task: &mut Task| {
                    task.submit(&user, evidence, &*clock)
                }),
            )
            .await
            .map_err(TaskLifecycleError::from)
            .inspect_err(|err| log_refusal("submit", task_id, caller, err))?;
        info!("task {task_id} completed by {}", caller.user_id());
        Ok(task)
    }

    /// Returns the tasks assigned to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn tasks_for_member(&self, caller: &Caller) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.repository.list_by_assignee(caller.user_id()).await?)
    }

    /// Returns every task on the calling manager's team.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotManager`] when the caller is not a
    /// manager, or a repository/directory error when a lookup fails.
    pub async fn tasks_for_manager(&self, caller: &Caller) -> TaskLifecycleResult<Vec<Task>> {
        let manager = resolve_manager(&*self.directory, caller).await?;
        Ok(self.repository.list_by_team(manager.team()).await?)
    }

    /// Returns the members of the calling manager's team.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotManager`] when the caller is not a
    /// manager, or a directory error when the lookup fails.
    pub async fn team_roster(&self, caller: &Caller) -> TaskLifecycleResult<Vec<TeamMember>> {
        let manager = resolve_manager(&*self.directory, caller).await?;
        Ok(self.directory.list_team_members(manager.team()).await?)
    }
}

fn log_refusal(operation: &str, task_id: TaskId, caller: &Caller, err: &TaskLifecycleError) {
    let user = caller.user_id();
    match err.kind() {
        ErrorKind::Internal => warn!("{operation} of task {task_id} by {user} failed: {err}"),
        _ => debug!("{operation} of task {task_id} by {user} refused: {err}"),
    }
}
