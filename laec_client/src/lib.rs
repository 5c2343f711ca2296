//! Internal modules for the LAEC client.
//!
//! Configuration, logging setup and command parsing used by the
//! `laec_client` binary.

pub mod commands;
pub mod config;
pub mod logging;
