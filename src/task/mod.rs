//! Team task lifecycle and analytics.
//!
//! A manager assigns tasks to members of their own team; the assignee moves
//! each task from `Assigned` to `InProgress` to `Completed`, attaching a
//! deliverable link or proof artifact on submission. Completion events are
//! summarised into per-member and per-team statistics on demand. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
