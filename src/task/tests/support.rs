//! Shared fixtures for task unit tests.

use crate::task::domain::{Role, Task, TaskAssignment, TeamCode, TeamMember, UserId};
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;
use std::sync::Mutex;

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().expect("clock lock should not be poisoned");
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::starting_at(epoch())
    }
}

impl Clock for ManualClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock should not be poisoned")
    }
}

pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0)
        .single()
        .expect("fixed timestamp should be valid")
}

pub fn user(id: &str) -> UserId {
    UserId::new(id).expect("valid user id")
}

pub fn team(code: &str) -> TeamCode {
    TeamCode::new(code).expect("valid team code")
}

pub fn manager(id: &str, code: &str) -> TeamMember {
    TeamMember::new(user(id), format!("Manager {id}"), Role::Manager, team(code))
        .expect("valid manager record")
}

pub fn member(id: &str, code: &str) -> TeamMember {
    TeamMember::new(user(id), format!("Member {id}"), Role::Member, team(code))
        .expect("valid member record")
}

pub fn assignment(assignee: &str) -> TaskAssignment {
    TaskAssignment {
        title: "Write report".to_owned(),
        description: "Quarterly figures".to_owned(),
        assigned_to: user(assignee),
        created_by: user("m-1"),
        team: team("T7"),
    }
}

pub fn assigned_task(assignee: &str, clock: &ManualClock) -> Task {
    Task::assign(assignment(assignee), clock).expect("assignment should be valid")
}
