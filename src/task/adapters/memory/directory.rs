//! In-memory membership directory.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{TeamCode, TeamMember, UserId},
    ports::{MemberDirectory, MemberDirectoryError, MemberDirectoryResult},
};

/// Thread-safe in-memory directory of managers, members, and team codes.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMemberDirectory {
    state: Arc<RwLock<DirectoryState>>,
}

#[derive(Debug, Default)]
struct DirectoryState {
    users: HashMap<UserId, TeamMember>,
    /// Team code to owning manager.
    teams: HashMap<TeamCode, UserId>,
    /// Registration order, used to keep rosters stable.
    order: Vec<UserId>,
}

fn lock_error(err: impl ToString) -> MemberDirectoryError {
    MemberDirectoryError::backend(std::io::Error::other(err.to_string()))
}

impl InMemoryMemberDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a directory from existing records, registering managers before
    /// members so every member's team code resolves.
    ///
    /// # Errors
    ///
    /// Returns the first registration error encountered.
    pub fn from_records(
        records: impl IntoIterator<Item = TeamMember>,
    ) -> MemberDirectoryResult<Self> {
        let directory = Self::new();
        let (managers, members): (Vec<_>, Vec<_>) =
            records.into_iter().partition(TeamMember::is_manager);
        for record in managers.into_iter().chain(members) {
            directory.register(record)?;
        }
        Ok(directory)
    }

    /// Registers a user.
    ///
    /// A manager claims their team code; a member must join a code that a
    /// manager already owns.
    ///
    /// # Errors
    ///
    /// Returns [`MemberDirectoryError::DuplicateUser`] for a reused user id,
    /// [`MemberDirectoryError::DuplicateTeam`] when a manager's code is taken,
    /// or [`MemberDirectoryError::UnknownTeam`] when a member's code has no
    /// manager.
    pub fn register(&self, user: TeamMember) -> MemberDirectoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.users.contains_key(user.id()) {
            return Err(MemberDirectoryError::DuplicateUser(user.id().clone()));
        }

        if user.is_manager() {
            if state.teams.contains_key(user.team()) {
                return Err(MemberDirectoryError::DuplicateTeam(user.team().clone()));
            }
            state.teams.insert(user.team().clone(), user.id().clone());
        } else if !state.teams.contains_key(user.team()) {
            return Err(MemberDirectoryError::UnknownTeam(user.team().clone()));
        }

        state.order.push(user.id().clone());
        state.users.insert(user.id().clone(), user);
        Ok(())
    }
}

#[async_trait]
impl MemberDirectory for InMemoryMemberDirectory {
    async fn find_user(&self, id: &UserId) -> MemberDirectoryResult<Option<TeamMember>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.users.get(id).cloned())
    }

    async fn list_team_members(&self, team: &TeamCode) -> MemberDirectoryResult<Vec<TeamMember>> {
        let state = self.state.read().map_err(lock_error)?;
        let roster = state
            .order
            .iter()
            .filter_map(|id| state.users.get(id))
            .filter(|user| !user.is_manager() && user.team() == team)
            .cloned()
            .collect();
        Ok(roster)
    }
}
