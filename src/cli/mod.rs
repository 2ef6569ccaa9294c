//! Command line interface for the forkchain binary

pub mod commands;

pub use commands::run_cli;
