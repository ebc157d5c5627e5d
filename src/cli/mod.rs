// file: src/cli/mod.rs
// version: 1.0.0
// guid: 2f8d1b6a-93c4-4e7a-b05d-c6a1e9f43d28

//! Command line interface for dotnet-invoke

pub mod args;
pub mod commands;

pub use args::Cli;
pub use commands::*;
