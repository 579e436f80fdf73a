//! Team membership records resolved from the identity directory.

use super::{ParseRoleError, TaskDomainError, TeamCode, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role held by a user. Fixed at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Owns a team, creates tasks, and reads team analytics.
    #[serde(alias = "Project Manager")]
    Manager,
    /// Belongs to a team and advances the tasks assigned to them.
    #[serde(alias = "Team Member")]
    Member,
}

impl Role {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Manager => "manager",
            Self::Member => "member",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Role {
    type Error = ParseRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "manager" | "project manager" | "project_manager" => Ok(Self::Manager),
            "member" | "team member" | "team_member" => Ok(Self::Member),
            _ => Err(ParseRoleError(value.to_owned())),
        }
    }
}

/// A user record as supplied by the membership directory.
///
/// Deserialization runs the same checks as [`TeamMember::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "TeamMemberRecord")]
pub struct TeamMember {
    #[serde(rename = "_id")]
    id: UserId,
    name: String,
    role: Role,
    #[serde(rename = "teamCode")]
    team: TeamCode,
    #[serde(rename = "profilePhoto", skip_serializing_if = "Option::is_none")]
    avatar: Option<String>,
}

/// Unvalidated wire form of [`TeamMember`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TeamMemberRecord {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    role: Role,
    team_code: String,
    #[serde(default)]
    profile_photo: Option<String>,
}

impl TryFrom<TeamMemberRecord> for TeamMember {
    type Error = TaskDomainError;

    fn try_from(record: TeamMemberRecord) -> Result<Self, Self::Error> {
        let TeamMemberRecord {
            id,
            name,
            role,
            team_code,
            profile_photo,
        } = record;
        let mut member = Self::new(UserId::new(id)?, name, role, TeamCode::new(team_code)?)?;
        member.avatar = profile_photo.filter(|photo| !photo.trim().is_empty());
        Ok(member)
    }
}

impl TeamMember {
    /// Creates a directory record.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyMemberName`] when the name is blank.
    pub fn new(
        id: UserId,
        name: impl Into<String>,
        role: Role,
        team: TeamCode,
    ) -> Result<Self, TaskDomainError> {
        let raw_name = name.into();
        let trimmed = raw_name.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyMemberName);
        }
        Ok(Self {
            id,
            name: trimmed.to_owned(),
            role,
            team,
            avatar: None,
        })
    }

    /// Sets the avatar reference.
    #[must_use]
    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> &UserId {
        &self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the team the user owns (managers) or belongs to (members).
    #[must_use]
    pub const fn team(&self) -> &TeamCode {
        &self.team
    }

    /// Returns the avatar reference, if any.
    #[must_use]
    pub fn avatar(&self) -> Option<&str> {
        self.avatar.as_deref()
    }

    /// Returns `true` when the user holds the manager role.
    #[must_use]
    pub const fn is_manager(&self) -> bool {
        matches!(self.role, Role::Manager)
    }
}

/// Request-scoped authentication context.
///
/// Built by the HTTP surface from a verified bearer token and passed into
/// every engine call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    user_id: UserId,
    role: Role,
}

impl Caller {
    /// Creates a caller context.
    #[must_use]
    pub const fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Returns the caller's user identifier.
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Returns the role claimed by the caller's credentials.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }
}
