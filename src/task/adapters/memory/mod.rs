//! In-memory adapters used by tests and by the server when no database is
//! configured.

mod directory;
mod task;

pub use directory::InMemoryMemberDirectory;
pub use task::InMemoryTaskRepository;
