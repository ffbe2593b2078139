//! Command implementations for the apidiff CLI
//!
//! Each command module provides a `run` function that executes the command logic.

pub mod diff;
