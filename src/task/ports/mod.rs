//! Port contracts for the task lifecycle.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod directory;
pub mod repository;

pub use directory::{MemberDirectory, MemberDirectoryError, MemberDirectoryResult};
pub use repository::{
    TaskMutator, TaskRepository, TaskRepositoryError, TaskRepositoryResult, apply_mutation,
};
