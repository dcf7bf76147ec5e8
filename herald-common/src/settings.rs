//! Gateway settings bundles.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Basic-auth credential pair for the email gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Sender identity applied to every message of a dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FromAddress {
    pub name: String,
    pub email: String,
}

/// Everything the gateway adapter needs for one top-level dispatch.
///
/// Fetched once when a dispatch starts and shared read-only by all of its
/// batches and retry rounds. Credential rotation mid-ladder is not observed;
/// the next top-level dispatch picks up fresh values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewaySettings {
    pub credentials: Credentials,
    pub headers: BTreeMap<String, String>,
    pub from: FromAddress,
}
