//! Port for the identity and membership directory.
//!
//! Registration, credentials, and team-code issuance live behind this
//! boundary; the engine only needs to resolve users and rosters.

use crate::task::domain::{TeamCode, TeamMember, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for directory operations.
pub type MemberDirectoryResult<T> = Result<T, MemberDirectoryError>;

/// Read access to users and team rosters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MemberDirectory: Send + Sync {
    /// Resolves a user by identifier.
    ///
    /// Returns `None` when the user is unknown.
    async fn find_user(&self, id: &UserId) -> MemberDirectoryResult<Option<TeamMember>>;

    /// Returns the members (not the manager) whose team equals `team`.
    async fn list_team_members(&self, team: &TeamCode) -> MemberDirectoryResult<Vec<TeamMember>>;
}

/// Errors returned by directory implementations.
#[derive(Debug, Clone, Error)]
pub enum MemberDirectoryError {
    /// A user with the same identifier is already registered.
    #[error("duplicate user identifier: {0}")]
    DuplicateUser(UserId),

    /// A team code is already owned by another manager.
    #[error("team code already in use: {0}")]
    DuplicateTeam(TeamCode),

    /// A member referenced a team code no manager owns.
    #[error("unknown team code: {0}")]
    UnknownTeam(TeamCode),

    /// Backend failure.
    #[error("directory backend error: {0}")]
    Backend(Arc<dyn std::error::Error + Send + Sync>),
}

impl MemberDirectoryError {
    /// Wraps a backend error.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Arc::new(err))
    }
}
