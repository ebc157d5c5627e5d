// file: src/lib.rs
// version: 1.0.0
// guid: 5b3f0c8e-2a71-4d6c-9e0b-8f14a6d2c937

//! # dotnet-invoke
//!
//! A uniform front end over the dotnet toolchain. Each command variant
//! (build, test, pack, publish, clean, restore, run) turns a typed parameter
//! set into an ordered argument vector, starts the toolchain, multiplexes its
//! stdout and stderr into one sequenced event stream and reports a single
//! execution result.

pub mod arguments;
pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod invocation;
pub mod logging;
pub mod params;
pub mod project;
pub mod reporter;
pub mod stream;
pub mod variant;

pub use error::{InvokeError, Result};
pub use invocation::{Invocation, InvocationState};
pub use params::InvokeParameters;
pub use reporter::ExecutionResult;
pub use variant::CommandVariant;

/// Version information for the utility
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
