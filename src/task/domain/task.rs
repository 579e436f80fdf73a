//! Task aggregate root and lifecycle status.

use super::{
    CompletionEvidence, DeliverableLink, ParseTaskStatusError, ProofArtifact, TaskDomainError,
    TaskId, TeamCode, UserId,
};
use chrono::{DateTime, Duration, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
///
/// `Pending` is accepted on input as a legacy spelling of
/// [`TaskStatus::Assigned`] and is never produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Created and bound to an assignee; work has not started.
    #[serde(alias = "Pending")]
    Assigned,
    /// The assignee has started work.
    #[serde(rename = "In Progress", alias = "InProgress")]
    InProgress,
    /// The assignee submitted completion evidence. Terminal.
    Completed,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Assigned => "assigned",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    /// Returns the label shown to clients.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Assigned => "Assigned",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }

    /// Returns whether the state machine permits moving to `target`.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Assigned, Self::InProgress) | (Self::InProgress, Self::Completed)
        )
    }

    /// Returns whether no further transitions are possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "assigned" | "pending" => Ok(Self::Assigned),
            "in_progress" | "in progress" | "inprogress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// Parameter object for creating a freshly assigned task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskAssignment {
    /// Task title; must be non-empty after trimming.
    pub title: String,
    /// Task description; must be non-empty after trimming.
    pub description: String,
    /// Member the task is bound to.
    pub assigned_to: UserId,
    /// Manager creating the task.
    pub created_by: UserId,
    /// Team code shared by the manager and the assignee.
    pub team: TeamCode,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: String,
    /// Persisted description.
    pub description: String,
    /// Persisted assignee.
    pub assigned_to: UserId,
    /// Persisted creator.
    pub created_by: UserId,
    /// Persisted team code.
    pub team: TeamCode,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted start timestamp.
    pub started_at: Option<DateTime<Utc>>,
    /// Persisted completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Persisted deliverable link.
    pub deliverable_link: Option<DeliverableLink>,
    /// Persisted completion proof.
    pub completion_proof: Option<ProofArtifact>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "_id")]
    id: TaskId,
    title: String,
    description: String,
    assigned_to: UserId,
    created_by: UserId,
    #[serde(rename = "teamCode")]
    team: TeamCode,
    status: TaskStatus,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    deliverable_link: Option<DeliverableLink>,
    completion_proof: Option<ProofArtifact>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task in the [`TaskStatus::Assigned`] state.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] or
    /// [`TaskDomainError::EmptyDescription`] when either text is blank.
    pub fn assign(assignment: TaskAssignment, clock: &impl Clock) -> Result<Self, TaskDomainError> {
        let title = assignment.title.trim();
        if title.is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        let description = assignment.description.trim();
        if description.is_empty() {
            return Err(TaskDomainError::EmptyDescription);
        }

        let timestamp = clock.utc();
        Ok(Self {
            id: TaskId::new(),
            title: title.to_owned(),
            description: description.to_owned(),
            assigned_to: assignment.assigned_to,
            created_by: assignment.created_by,
            team: assignment.team,
            status: TaskStatus::Assigned,
            started_at: None,
            completed_at: None,
            deliverable_link: None,
            completion_proof: None,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            assigned_to: data.assigned_to,
            created_by: data.created_by,
            team: data.team,
            status: data.status,
            started_at: data.started_at,
            completed_at: data.completed_at,
            deliverable_link: data.deliverable_link,
            completion_proof: data.completion_proof,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the assignee.
    #[must_use]
    pub const fn assigned_to(&self) -> &UserId {
        &self.assigned_to
    }

    /// Returns the manager who created the task.
    #[must_use]
    pub const fn created_by(&self) -> &UserId {
        &self.created_by
    }

    /// Returns the owning team code.
    #[must_use]
    pub const fn team(&self) -> &TeamCode {
        &self.team
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns when work started, if it has.
    #[must_use]
    pub const fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Returns when the task was completed, if it has been.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns the submitted deliverable link, if any.
    #[must_use]
    pub const fn deliverable_link(&self) -> Option<&DeliverableLink> {
        self.deliverable_link.as_ref()
    }

    /// Returns the submitted completion proof, if any.
    #[must_use]
    pub const fn completion_proof(&self) -> Option<&ProofArtifact> {
        self.completion_proof.as_ref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest lifecycle timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns whether `user` is the assignee.
    #[must_use]
    pub fn is_assigned_to(&self, user: &UserId) -> bool {
        &self.assigned_to == user
    }

    /// Returns the time between start and completion.
    ///
    /// `None` unless the task is completed and both timestamps are present.
    #[must_use]
    pub fn completion_duration(&self) -> Option<Duration> {
        if self.status != TaskStatus::Completed {
            return None;
        }
        let started = self.started_at?;
        let completed = self.completed_at?;
        Some(completed.signed_duration_since(started))
    }

    /// Moves the task to [`TaskStatus::InProgress`] and stamps `started_at`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotAssignee`] when `caller` is not the
    /// assignee, or [`TaskDomainError::InvalidStatusTransition`] when the task
    /// has already started. The task is unchanged on error.
    pub fn start(&mut self, caller: &UserId, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.ensure_assignee(caller)?;
        self.ensure_transition(TaskStatus::InProgress)?;

        let now = clock.utc();
        self.status = TaskStatus::InProgress;
        self.started_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Moves the task to [`TaskStatus::Completed`], stamps `completed_at`,
    /// and records the supplied evidence.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotAssignee`] when `caller` is not the
    /// assignee, or [`TaskDomainError::InvalidStatusTransition`] unless the
    /// task is in progress. The task is unchanged on error.
    pub fn submit(
        &mut self,
        caller: &UserId,
        evidence: CompletionEvidence,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_assignee(caller)?;
        self.ensure_transition(TaskStatus::Completed)?;

        let now = clock.utc();
        // A clock that stepped backwards must not yield a negative duration.
        let completed_at = self.started_at.map_or(now, |started| now.max(started));
        let (link, proof) = evidence.into_parts();
        self.status = TaskStatus::Completed;
        self.completed_at = Some(completed_at);
        self.deliverable_link = link;
        self.completion_proof = proof;
        self.updated_at = completed_at;
        Ok(())
    }

    /// Verifies the status and timestamp invariants.
    ///
    /// `completed_at` is set iff the task is completed, `started_at` is set
    /// iff the task has started, completion never precedes the start, and
    /// evidence only exists on completed tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvariantViolation`] naming the first
    /// invariant that fails.
    pub fn check_invariants(&self) -> Result<(), TaskDomainError> {
        let started = matches!(self.status, TaskStatus::InProgress | TaskStatus::Completed);
        let completed = self.status == TaskStatus::Completed;

        if self.started_at.is_some() != started {
            return Err(self.violation("started_at must be set exactly when work has started"));
        }
        if self.completed_at.is_some() != completed {
            return Err(self.violation("completed_at must be set exactly when completed"));
        }
        if let (Some(started_at), Some(completed_at)) = (self.started_at, self.completed_at)
            && completed_at < started_at
        {
            return Err(self.violation("completed_at must not precede started_at"));
        }
        let has_evidence = self.deliverable_link.is_some() || self.completion_proof.is_some();
        if has_evidence != completed {
            return Err(self.violation("completion evidence must accompany completion"));
        }
        Ok(())
    }

    fn ensure_assignee(&self, caller: &UserId) -> Result<(), TaskDomainError> {
        if self.is_assigned_to(caller) {
            return Ok(());
        }
        Err(TaskDomainError::NotAssignee {
            task_id: self.id,
            caller: caller.clone(),
        })
    }

    const fn ensure_transition(&self, target: TaskStatus) -> Result<(), TaskDomainError> {
        if self.status.can_transition_to(target) {
            return Ok(());
        }
        Err(TaskDomainError::InvalidStatusTransition {
            task_id: self.id,
            from: self.status,
            to: target,
        })
    }

    const fn violation(&self, reason: &'static str) -> TaskDomainError {
        TaskDomainError::InvariantViolation {
            task_id: self.id,
            reason,
        }
    }
}
