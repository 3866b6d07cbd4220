//! missive-core library.
//!
//! Domain model, slug generation, the letter-reveal interaction engine, and
//! the SQLite storage layer shared by the server and the CLI.
//!
//! # Conventions
//!
//! - **Errors**: typed errors in [`error`]; `anyhow::Result` with context at
//!   application seams.
//! - **Logging**: `tracing` macros (`info!`, `warn!`, `error!`, `debug!`).

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod model;
pub mod reveal;
pub mod slug;
