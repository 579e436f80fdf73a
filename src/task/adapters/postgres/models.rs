//! Diesel row models for task persistence.

use super::schema::team_tasks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = team_tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Assigned member identifier.
    pub assigned_to: String,
    /// Creating manager identifier.
    pub created_by: String,
    /// Owning team code.
    pub team_code: String,
    /// Lifecycle status.
    pub status: String,
    /// Start timestamp.
    pub started_at: Option<DateTime<Utc>>,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Deliverable link.
    pub deliverable_link: Option<String>,
    /// Completion proof reference.
    pub completion_proof: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = team_tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Assigned member identifier.
    pub assigned_to: String,
    /// Creating manager identifier.
    pub created_by: String,
    /// Owning team code.
    pub team_code: String,
    /// Lifecycle status.
    pub status: String,
    /// Start timestamp.
    pub started_at: Option<DateTime<Utc>>,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Deliverable link.
    pub deliverable_link: Option<String>,
    /// Completion proof reference.
    pub completion_proof: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Changeset written by a lifecycle transition.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = team_tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskLifecycleChangeset {
    /// New lifecycle status.
    pub status: String,
    /// Start timestamp.
    pub started_at: Option<DateTime<Utc>>,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Deliverable link.
    pub deliverable_link: Option<String>,
    /// Completion proof reference.
    pub completion_proof: Option<String>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
