//! Workflow integration tests

pub mod commit_verify;
pub mod store_maintenance;
