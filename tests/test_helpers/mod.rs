//! Shared fixtures for integration tests.
//!
//! Every suite uses the same directory: manager `m-1` owns team `T7` with
//! members `a-1` and `b-1`; manager `m-2` owns team `T8` with member `c-1`.

use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;
use std::sync::Mutex;
use taskflow::task::{
    adapters::memory::InMemoryMemberDirectory,
    domain::{Caller, Role, TeamCode, TeamMember, UserId},
};

/// Clock that only moves when a test advances it.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Creates a clock frozen at a fixed instant.
    pub fn new() -> Self {
        let start = Utc
            .with_ymd_and_hms(2026, 3, 2, 9, 0, 0)
            .single()
            .expect("fixed timestamp should be valid");
        Self {
            now: Mutex::new(start),
        }
    }

    /// Moves the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().expect("clock lock should not be poisoned");
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
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

/// Parses a user id.
pub fn user(id: &str) -> UserId {
    UserId::new(id).expect("valid user id")
}

/// Parses a team code.
pub fn team(code: &str) -> TeamCode {
    TeamCode::new(code).expect("valid team code")
}

fn record(id: &str, role: Role, code: &str) -> TeamMember {
    TeamMember::new(user(id), format!("User {id}"), role, team(code)).expect("valid record")
}

/// Directory records for the two standard teams.
pub fn directory_records() -> Vec<TeamMember> {
    vec![
        record("m-1", Role::Manager, "T7"),
        record("a-1", Role::Member, "T7"),
        record("b-1", Role::Member, "T7"),
        record("m-2", Role::Manager, "T8"),
        record("c-1", Role::Member, "T8"),
    ]
}

/// Directory seeded with the two standard teams.
pub fn seeded_directory() -> InMemoryMemberDirectory {
    InMemoryMemberDirectory::from_records(directory_records())
        .expect("directory seed should be consistent")
}

/// Caller context for a manager.
pub fn manager_caller(id: &str) -> Caller {
    Caller::new(user(id), Role::Manager)
}

/// Caller context for a member.
pub fn member_caller(id: &str) -> Caller {
    Caller::new(user(id), Role::Member)
}
