//! Job value types shared across the dispatch pipeline.

use core::fmt::{self, Display, Formatter};
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Caller-assigned job identifier.
///
/// The origin system keys final job state by this value, so it is carried
/// through every report untouched. Both integer and string forms appear on
/// the wire.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JobId {
    Int(i64),
    Text(String),
}

impl Display for JobId {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            Self::Int(id) => write!(fmt, "{id}"),
            Self::Text(id) => write!(fmt, "{id}"),
        }
    }
}

impl From<i64> for JobId {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<&str> for JobId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

impl From<String> for JobId {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}

/// One addressed, templated email send request.
///
/// Jobs are immutable value objects: a retry re-submits the same value, it
/// never mutates one in place. A job dies once a terminal outcome for it has
/// been reported, or once the retry ceiling drops it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Extra fields available to template substitution.
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
}

impl Job {
    /// Display name for the recipient, falling back to the address.
    #[must_use]
    pub fn recipient_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }

    /// Look up a substitution field by placeholder name.
    ///
    /// `id`, `email` and `name` resolve to the job's own attributes; anything
    /// else resolves through the extra fields.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<String> {
        match key {
            "id" => Some(self.id.to_string()),
            "email" => Some(self.email.clone()),
            "name" => self.name.clone(),
            _ => self.fields.get(key).cloned(),
        }
    }
}
