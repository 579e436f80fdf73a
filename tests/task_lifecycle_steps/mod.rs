//! Step definitions for the team task lifecycle scenarios.

pub mod given;
pub mod when;
pub mod world;
