//! Status reporting back to the origin system.
//!
//! The origin system is the authority on final job state, keyed by job id,
//! and it may itself be slow or unavailable. The reporter therefore carries
//! its own retry ladder, independent of the dispatch ladder, and never
//! propagates failure to the caller.

use std::time::Duration;

use async_trait::async_trait;
use herald_common::{
    OutcomeReport,
    tracing::{error, warn},
};
use reqwest::StatusCode;
use tokio::time::sleep;

use crate::policy::RetryPolicy;

/// Seam between the orchestrator and the origin system.
#[async_trait]
pub trait StatusReporter: Send + Sync {
    /// Deliver one outcome report.
    ///
    /// Infallible from the caller's point of view: exhaustion is logged, not
    /// propagated, because there is no higher layer to hand the error to.
    async fn report(&self, report: &OutcomeReport);
}

/// HTTP reporter posting outcome reports to the origin status endpoint.
pub struct HttpStatusReporter {
    client: reqwest::Client,
    url: String,
    policy: RetryPolicy,
}

impl HttpStatusReporter {
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(
        url: impl Into<String>,
        timeout: Duration,
        policy: RetryPolicy,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
            policy,
        })
    }
}

#[async_trait]
impl StatusReporter for HttpStatusReporter {
    async fn report(&self, report: &OutcomeReport) {
        for attempt in 0..=self.policy.retry_count {
            if attempt > 0 {
                sleep(self.policy.delay(attempt)).await;
            }

            match self.client.post(&self.url).json(report).send().await {
                Ok(response) if response.status() == StatusCode::OK => return,
                Ok(response) => {
                    warn!(
                        status = %response.status(),
                        attempt,
                        "origin rejected status report"
                    );
                }
                Err(err) if err.is_timeout() || err.is_connect() => {
                    warn!(
                        error = %err,
                        attempt,
                        "connection problem reporting job status"
                    );
                }
                Err(err) => {
                    error!(
                        error = %err,
                        attempt,
                        "unexpected error reporting job status"
                    );
                }
            }
        }

        // The report is persisted nowhere else, so it must at least hit the
        // log before it is dropped.
        let lost = serde_json::to_string(report).unwrap_or_else(|_| format!("{report:?}"));
        error!(
            report_lost = true,
            report = %lost,
            "could not deliver status report to origin, outcomes dropped"
        );
    }
}
