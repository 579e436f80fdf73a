//! Unit tests for the task module.

mod support;
