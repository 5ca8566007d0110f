//! Core support for the a2xx shader assembler
//!
//! This crate provides the error taxonomy, configuration, and logging
//! infrastructure shared by the IR and code generation crates.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{Config, DebugConfig, Limits, LogLevel};
pub use error::{AsmError, EncodeError, Location, RegistryKind, Result};
