// file: src/logging/mod.rs
// version: 1.0.0
// guid: 6a0dfb50-c503-48a2-b42d-3cc4dd3cd372

//! Logging system for dotnet-invoke

pub mod logger;

pub use logger::init_logger;
