//! Shared implementation of the statekit command-line tools.
//!
//! Each binary parses its own [`clap`] arguments and hands them to a
//! `run` function in [`commands`]. Results go to stdout; diagnostics and
//! logs go to stderr.

pub mod commands;
pub mod logging;
pub mod output;
