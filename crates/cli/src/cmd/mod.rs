//! CLI command implementations

pub mod build;
pub mod config;
pub mod fetch;
pub mod generate;
pub mod prune;
pub mod signature;
pub mod verify;
