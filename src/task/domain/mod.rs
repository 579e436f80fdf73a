//! Domain model for the team task lifecycle.
//!
//! The domain covers task creation by a manager, the assignee-driven
//! `Assigned → InProgress → Completed` state machine, and the membership
//! records the engine authorises against. Infrastructure concerns stay
//! outside this boundary.

mod error;
mod evidence;
mod ids;
mod member;
mod task;

pub use error::{ErrorKind, ParseRoleError, ParseTaskStatusError, TaskDomainError};
pub use evidence::{CompletionEvidence, DeliverableLink, ProofArtifact};
pub use ids::{TaskId, TeamCode, UserId};
pub use member::{Caller, Role, TeamMember};
pub use task::{PersistedTaskData, Task, TaskAssignment, TaskStatus};
