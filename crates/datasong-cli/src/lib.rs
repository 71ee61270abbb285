//! datasong CLI library.
//!
//! Command implementations for the `datasong` binary, kept in a library so
//! integration tests can drive them without spawning a process.

pub mod commands;
