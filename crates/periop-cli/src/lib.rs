//! periop-cli library root.
//!
//! The binary is a thin wrapper; argument parsing, config handling and the
//! command implementations live here so integration tests can reach them.

pub mod cli;
pub mod commands;
pub mod config;
