//! Integration tests for the kvfs virtual filesystem

mod cli_commands;
mod persistence_recovery;
mod properties;
mod sled_reopen;
mod support;
mod vfs_scenarios;
