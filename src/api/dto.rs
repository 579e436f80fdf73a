//! Request and response bodies for the HTTP surface.

use crate::task::{
    domain::{TaskId, TeamMember, UserId},
    services::{AssignTaskRequest, MemberStats, SubmitTaskRequest, TeamStats},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Body of `POST /api/tasks/assign`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignTaskBody {
    /// Member to assign the task to.
    pub assigned_to_id: String,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
}

impl From<AssignTaskBody> for AssignTaskRequest {
    fn from(body: AssignTaskBody) -> Self {
        Self::new(body.assigned_to_id, body.title, body.description)
    }
}

/// Body of `PUT /api/tasks/submit/{id}`.
///
/// Empty strings count as absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitTaskBody {
    /// URL of the delivered work.
    #[serde(default)]
    pub deliverable_link: Option<String>,
    /// Encoded proof file or a reference to stored proof.
    #[serde(default, alias = "proofFile")]
    pub proof_base64: Option<String>,
}

impl SubmitTaskBody {
    /// Builds the service request for `task_id`.
    #[must_use]
    pub fn into_request(self, task_id: TaskId) -> SubmitTaskRequest {
        let Self {
            deliverable_link,
            proof_base64,
        } = self;
        let mut request = SubmitTaskRequest::new(task_id);
        if let Some(link) = deliverable_link {
            request = request.with_deliverable_link(link);
        }
        if let Some(proof) = proof_base64 {
            request = request.with_proof(proof);
        }
        request
    }
}

/// Response of `GET /api/tasks/analytics/member`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberAnalyticsBody {
    /// Tasks assigned to the caller in any status.
    pub total_tasks: u64,
    /// Completed tasks.
    pub total_completed: u64,
    /// Mean completion time in minutes; `null` when nothing has completed.
    pub average_completion_time: Option<i64>,
}

impl From<MemberStats> for MemberAnalyticsBody {
    fn from(stats: MemberStats) -> Self {
        Self {
            total_tasks: stats.total_tasks(),
            total_completed: stats.completed_tasks(),
            average_completion_time: stats.average_completion_minutes(),
        }
    }
}

/// One entry of `GET /api/tasks/analytics/manager`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberAnalyticsBody {
    /// Completed tasks.
    pub completed_tasks: u64,
    /// Tasks assigned in any status.
    pub total_tasks: u64,
    /// Mean completion time in minutes; `null` when nothing has completed.
    pub average_completion_time: Option<i64>,
}

impl From<MemberStats> for TeamMemberAnalyticsBody {
    fn from(stats: MemberStats) -> Self {
        Self {
            completed_tasks: stats.completed_tasks(),
            total_tasks: stats.total_tasks(),
            average_completion_time: stats.average_completion_minutes(),
        }
    }
}

/// Manager analytics keyed by member id.
pub type TeamAnalyticsBody = BTreeMap<UserId, TeamMemberAnalyticsBody>;

/// Converts team statistics into the response body.
#[must_use]
pub fn team_analytics_body(stats: TeamStats) -> TeamAnalyticsBody {
    stats
        .into_iter()
        .map(|(member, entry)| (member, entry.into()))
        .collect()
}

/// Response of `GET /api/users/profile`.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileBody {
    /// Caller's directory record.
    pub user: TeamMember,
}
