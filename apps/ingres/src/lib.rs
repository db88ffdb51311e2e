//! # ingres
//!
//! The INGRES application crate - THE BINARY's library half.
//!
//! Exposes the HTTP API, the CLI and the configuration layer so the binary
//! and the integration tests share one code path.

pub mod api;
pub mod cli;
pub mod config;
