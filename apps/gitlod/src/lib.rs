//! # gitlod
//!
//! The application layer around `gitlod-core`: configuration, the GitHub
//! record source, the HTTP server and the command line.
//!
//! The binary in `main.rs` is a thin wrapper; everything lives here so the
//! integration tests can build a router over a fixture source.

pub mod api;
pub mod cli;
pub mod config;
pub mod source;
