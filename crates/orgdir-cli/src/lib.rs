//! # orgdir CLI
//!
//! Operator front end for the organization directory. Every invocation
//! loads a JSON snapshot into an in-memory store, runs one command against
//! the [`orgdir_core::Directory`] facade and, for mutating commands, writes
//! the snapshot back.

#![deny(missing_docs)]

pub mod cli;
pub mod logging;
pub mod run;

pub use cli::command;
pub use run::{exit_code, run, Outcome, Session};

/// Version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
