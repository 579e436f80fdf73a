//! Application services for the task lifecycle and analytics.

mod analytics;
mod lifecycle;

pub use analytics::{MemberStats, TaskAnalyticsService, TeamStats, member_stats, team_stats};
pub use lifecycle::{
    AssignTaskRequest, SubmitTaskRequest, TaskLifecycleError, TaskLifecycleResult,
    TaskLifecycleService,
};
