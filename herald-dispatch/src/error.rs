//! Typed errors for dispatch collaborators.
//!
//! The send path itself never errors: every transport problem is folded into
//! an [`herald_common::Outcome`]. The only fallible collaborator is the
//! settings provider, whose failure aborts a dispatch before any batch runs.

use thiserror::Error;

/// Failure to produce the gateway settings bundle.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// No gateway credentials have been configured yet.
    #[error("gateway credentials are not configured")]
    MissingCredentials,

    /// No sender address has been configured yet.
    #[error("sender address is not configured")]
    MissingFrom,

    /// The backing store failed.
    #[error("settings backend error: {0}")]
    Backend(String),
}
