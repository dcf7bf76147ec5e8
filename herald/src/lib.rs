//! HTTP service around the herald dispatch engine.
//!
//! Wires the engine's seams together: an in-memory settings store behind
//! `PATCH /api/v1/settings`, the HTTP gateway and origin reporter from the
//! config file, and a fire-and-forget `POST /api/v1/email` entry point.

pub mod api;
pub mod config;
pub mod server;

pub use api::AppState;
pub use config::{Config, ConfigError};
pub use server::{ApiServer, ServerError};
