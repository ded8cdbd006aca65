#![forbid(unsafe_code)]
//! orghealth-core library.
//!
//! # Conventions
//!
//! - **Errors**: Use `anyhow::Result` for store and config return types;
//!   domain failures that callers branch on are typed with `thiserror`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod db;
pub mod error;
pub mod model;
