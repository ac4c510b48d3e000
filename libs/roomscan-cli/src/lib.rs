//! # Room Scan CLI
//!
//! Library half of the `roomscan` binary: argument definitions and the
//! replay runner, kept here so they can be tested without spawning a
//! process.

pub mod args;
pub mod runner;

pub use args::{Cli, Command, ReplayArgs};
pub use runner::{init_tracing, load_config, replay, Outcome};
