//! Closed classification of per-job send attempts.
//!
//! The outcome set distinguishes:
//! - `Success` - the gateway accepted the message
//! - `AuthFailure` - credentials rejected, not retryable within a dispatch
//! - `Failure` - request rejected as malformed, not retryable
//! - `RecoverableFailure` - transient, re-enters the retry ladder

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::job::{Job, JobId};

/// Outcome of a single gateway send attempt.
///
/// The set is closed: any unmapped transport or HTTP condition must be
/// coerced to `RecoverableFailure` so it re-enters the retry ladder instead
/// of being dropped silently.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    AuthFailure,
    Failure,
    #[serde(rename = "retry")]
    RecoverableFailure,
}

impl Outcome {
    /// Stable wire name used as the JSON key in status reports.
    ///
    /// Matched exhaustively so adding an outcome forces updating the wire
    /// mapping.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::AuthFailure => "auth_failure",
            Self::Failure => "failure",
            Self::RecoverableFailure => "retry",
        }
    }

    /// Whether this outcome re-enters the dispatch retry ladder.
    #[must_use]
    pub const fn is_recoverable(self) -> bool {
        matches!(self, Self::RecoverableFailure)
    }
}

/// One report entry: the job id plus the gateway-issued message id when the
/// send succeeded, empty otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeEntry {
    pub id: JobId,
    pub message_id: String,
}

impl OutcomeEntry {
    #[must_use]
    pub fn new(id: JobId, message_id: impl Into<String>) -> Self {
        Self {
            id,
            message_id: message_id.into(),
        }
    }
}

/// Outcome-to-entries mapping delivered to the origin system.
///
/// Only outcomes actually observed are present; within a group, entries
/// follow submission order. Serializes with the outcomes' wire names as JSON
/// keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutcomeReport(BTreeMap<Outcome, Vec<OutcomeEntry>>);

impl OutcomeReport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Report classifying every given job as a terminal `Failure`, preserving
    /// order. Used when the retry ceiling drops the remaining jobs.
    #[must_use]
    pub fn failures(jobs: &[Job]) -> Self {
        let mut report = Self::new();
        for job in jobs {
            report.push(Outcome::Failure, OutcomeEntry::new(job.id.clone(), ""));
        }
        report
    }

    pub fn push(&mut self, outcome: Outcome, entry: OutcomeEntry) {
        self.0.entry(outcome).or_default().push(entry);
    }

    #[must_use]
    pub fn get(&self, outcome: Outcome) -> Option<&[OutcomeEntry]> {
        self.0.get(&outcome).map(Vec::as_slice)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of entries across all groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Outcome, &[OutcomeEntry])> {
        self.0.iter().map(|(outcome, entries)| (*outcome, entries.as_slice()))
    }
}
