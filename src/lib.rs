//! Taskflow: team task tracking with completion analytics.
//!
//! Managers assign tasks to the members of their team; members start them
//! and submit completion evidence; managers read per-member statistics.
//!
//! # Architecture
//!
//! Taskflow follows hexagonal architecture principles:
//!
//! - **Domain**: the task aggregate, its lifecycle state machine, and
//!   membership records
//! - **Ports**: the task store and member directory contracts
//! - **Adapters**: in-memory and `PostgreSQL` implementations of the ports
//! - **Services**: the lifecycle engine and analytics aggregator
//!
//! # Modules
//!
//! - [`task`]: domain, ports, adapters, and services
//! - [`api`]: actix-web HTTP surface with bearer-token authentication

pub mod api;
pub mod task;
