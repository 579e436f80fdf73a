//! Per-member and per-team completion statistics.
//!
//! Statistics are recomputed from a task snapshot on every call; nothing is
//! cached or incrementally maintained, so the figures stay correct however
//! the store was written.

use super::lifecycle::{TaskLifecycleResult, resolve_manager};
use crate::task::{
    domain::{Caller, Task, TaskStatus, TeamMember, UserId},
    ports::{MemberDirectory, TaskRepository},
};
use std::collections::BTreeMap;
use std::sync::Arc;

const MILLIS_PER_MINUTE: i64 = 60_000;

/// Completion statistics for one member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberStats {
    completed_tasks: u64,
    total_tasks: u64,
    average_completion_minutes: Option<i64>,
}

impl MemberStats {
    /// Returns the number of completed tasks.
    #[must_use]
    pub const fn completed_tasks(&self) -> u64 {
        self.completed_tasks
    }

    /// Returns the number of tasks assigned in any status.
    #[must_use]
    pub const fn total_tasks(&self) -> u64 {
        self.total_tasks
    }

    /// Returns the mean start-to-completion time in whole minutes.
    ///
    /// `None` means there is no completed task with both timestamps, which
    /// is distinct from an average of zero minutes.
    #[must_use]
    pub const fn average_completion_minutes(&self) -> Option<i64> {
        self.average_completion_minutes
    }
}

/// Statistics keyed by member, covering the whole roster.
pub type TeamStats = BTreeMap<UserId, MemberStats>;

/// Computes statistics for `member` over `tasks`.
///
/// Tasks assigned to other users are ignored. Completed tasks missing either
/// timestamp still count as completed but are left out of the average.
#[must_use]
pub fn member_stats(member: &UserId, tasks: &[Task]) -> MemberStats {
    stats_for(tasks.iter().filter(|task| task.is_assigned_to(member)))
}

/// Computes statistics for every member on `roster`.
///
/// Members with no tasks appear with zero counts and no average.
#[must_use]
pub fn team_stats(roster: &[TeamMember], tasks: &[Task]) -> TeamStats {
    roster
        .iter()
        .map(|member| (member.id().clone(), member_stats(member.id(), tasks)))
        .collect()
}

fn stats_for<'a>(tasks: impl Iterator<Item = &'a Task>) -> MemberStats {
    let mut total_tasks = 0_u64;
    let mut completed_tasks = 0_u64;
    let mut total_millis = 0_i64;
    let mut samples = 0_i64;

    for task in tasks {
        total_tasks = total_tasks.saturating_add(1);
        if task.status() != TaskStatus::Completed {
            continue;
        }
        completed_tasks = completed_tasks.saturating_add(1);
        if let Some(duration) = task.completion_duration() {
            total_millis = total_millis.saturating_add(duration.num_milliseconds());
            samples = samples.saturating_add(1);
        }
    }

    MemberStats {
        completed_tasks,
        total_tasks,
        average_completion_minutes: rounded_mean_minutes(total_millis, samples),
    }
}

/// Mean of `samples` durations totalling `total_millis`, rounded half-up to
/// whole minutes.
fn rounded_mean_minutes(total_millis: i64, samples: i64) -> Option<i64> {
    if samples <= 0 {
        return None;
    }
    let denominator = samples.checked_mul(MILLIS_PER_MINUTE)?;
    let half = denominator.checked_div(2)?;
    total_millis
        .checked_add(half)?
        .checked_div_euclid(denominator)
}

/// Analytics service reading task snapshots from the store.
pub struct TaskAnalyticsService<R, D>
where
    R: TaskRepository + ?Sized,
    D: MemberDirectory + ?Sized,
{
    repository: Arc<R>,
    directory: Arc<D>,
}

impl<R, D> TaskAnalyticsService<R, D>
where
    R: TaskRepository + ?Sized,
    D: MemberDirectory + ?Sized,
{
    /// Creates a new analytics service.
    #[must_use]
    pub const fn new(repository: Arc<R>, directory: Arc<D>) -> Self {
        Self {
            repository,
            directory,
        }
    }

    /// Returns the caller's own statistics.
    ///
    /// # Errors
    ///
    /// Returns a repository error when the task snapshot cannot be loaded.
    pub async fn member_analytics(&self, caller: &Caller) -> TaskLifecycleResult<MemberStats> {
        let tasks = self.repository.list_by_assignee(caller.user_id()).await?;
        Ok(member_stats(caller.user_id(), &tasks))
    }

    /// Returns statistics for every member of the calling manager's team.
    ///
    /// # Errors
    ///
    /// Returns [`super::TaskLifecycleError::NotManager`] when the caller is
    /// not a manager, or a repository/directory error when a lookup fails.
    pub async fn team_analytics(&self, caller: &Caller) -> TaskLifecycleResult<TeamStats> {
        let manager = resolve_manager(&*self.directory, caller).await?;
        let tasks = self.repository.list_by_team(manager.team()).await?;
        let roster = self.directory.list_team_members(manager.team()).await?;
        Ok(team_stats(&roster, &tasks))
    }
}
