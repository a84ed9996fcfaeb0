// src/exec/mod.rs

//! Process execution layer.
//!
//! Runs the external bridge / SDK executables with `tokio::process::Command`
//! and hands back a [`CommandResult`] holding the captured stdout / stderr.
//!
//! - [`runner`] owns [`CommandSpec`], [`CommandResult`], the
//!   [`ProcessRunner`] trait and the production [`RealProcessRunner`].
//!   Tests provide their own `ProcessRunner` that never spawns anything.

pub mod runner;

pub use runner::{CommandResult, CommandSpec, ProcessRunner, RealProcessRunner};
