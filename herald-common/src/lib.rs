//! Shared value types and ambient plumbing for the herald dispatch service.
//!
//! Everything that crosses a crate boundary lives here: jobs, outcomes and
//! outcome reports, the gateway settings bundle, template substitution, and
//! logging initialisation.

pub mod job;
pub mod logging;
pub mod outcome;
pub mod settings;
pub mod template;

pub use job::{Job, JobId};
pub use outcome::{Outcome, OutcomeEntry, OutcomeReport};
pub use settings::{Credentials, FromAddress, GatewaySettings};

pub use tracing;
