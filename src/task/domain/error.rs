//! Error types for task domain validation, transitions, and parsing.

use super::{TaskId, TaskStatus, UserId};
use thiserror::Error;

/// Coarse classification of failures surfaced to callers.
///
/// The HTTP surface maps each kind onto a status code; the engine never
/// retries any of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or missing input the caller can fix.
    Validation,
    /// Authenticated but not authorised for the role or task.
    Forbidden,
    /// Unknown task, member, or team.
    NotFound,
    /// A lifecycle precondition failed, possibly because of a lost race.
    InvalidTransition,
    /// Infrastructure or invariant failure.
    Internal,
}

/// Errors returned while constructing or transitioning domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The user identifier is empty after trimming.
    #[error("user identifier must not be empty")]
    EmptyUserId,

    /// The team code is empty or contains whitespace.
    #[error("invalid team code '{0}'")]
    InvalidTeamCode(String),

    /// The member display name is empty after trimming.
    #[error("member name must not be empty")]
    EmptyMemberName,

    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The task description is empty after trimming.
    #[error("task description must not be empty")]
    EmptyDescription,

    /// A submission carried neither a deliverable link nor a proof artifact.
    #[error("a deliverable link or a completion proof is required")]
    MissingCompletionEvidence,

    /// The caller is not the member the task is assigned to.
    #[error("user {caller} is not the assignee of task {task_id}")]
    NotAssignee {
        /// Task the caller tried to advance.
        task_id: TaskId,
        /// Caller that attempted the transition.
        caller: UserId,
    },

    /// The requested status change is not permitted by the state machine.
    #[error("invalid status transition for task {task_id}: {from} -> {to}")]
    InvalidStatusTransition {
        /// Task identifier.
        task_id: TaskId,
        /// Status at the time of the attempt.
        from: TaskStatus,
        /// Requested target status.
        to: TaskStatus,
    },

    /// A completed task record was about to be modified.
    #[error("task {0} is completed and can no longer change")]
    CompletedTaskImmutable(TaskId),

    /// A persisted or mutated task violates the status/timestamp invariants.
    #[error("task {task_id} violates lifecycle invariant: {reason}")]
    InvariantViolation {
        /// Task identifier.
        task_id: TaskId,
        /// Which invariant failed.
        reason: &'static str,
    },
}

impl TaskDomainError {
    /// Returns the caller-facing classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyUserId
            | Self::InvalidTeamCode(_)
            | Self::EmptyMemberName
            | Self::EmptyTitle
            | Self::EmptyDescription
            | Self::MissingCompletionEvidence => ErrorKind::Validation,
            Self::NotAssignee { .. } => ErrorKind::Forbidden,
            Self::InvalidStatusTransition { .. } | Self::CompletedTaskImmutable(_) => {
                ErrorKind::InvalidTransition
            }
            Self::InvariantViolation { .. } => ErrorKind::Internal,
        }
    }
}

/// Error returned while parsing task statuses from persistence or requests.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing member roles.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);
