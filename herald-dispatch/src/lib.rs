//! Dispatch-and-retry engine for outbound campaign email
//!
//! This crate provides functionality to:
//! - Send addressed jobs through the email gateway in bounded-size batches
//! - Classify every per-job outcome into a closed set
//! - Escalate recoverable failures through a bounded, exponentially
//!   backed-off retry ladder
//! - Report final and partial outcomes to the origin system through a second,
//!   independent retry ladder

mod dispatcher;
mod error;
mod gateway;
mod policy;
mod reporter;
mod settings;

pub use dispatcher::Dispatcher;
pub use error::SettingsError;
pub use gateway::{EmailGateway, HttpGateway};
pub use policy::RetryPolicy;
pub use reporter::{HttpStatusReporter, StatusReporter};
pub use settings::{SettingsProvider, SettingsStore};
