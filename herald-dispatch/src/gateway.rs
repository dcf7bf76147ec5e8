//! Gateway send adapter and batch outcome aggregation.
//!
//! The adapter owns the per-job HTTP call and the mapping from raw transport
//! results onto the closed [`Outcome`] set:
//!
//! - 202 with a JSON `message_id` body → `Success`
//! - 401 → `AuthFailure`
//! - 400 → `Failure`
//! - anything else (status, timeout, connect error, unreadable body) →
//!   `RecoverableFailure`
//!
//! It never raises past its boundary; one invocation is exactly one outbound
//! request plus a classification.

use std::{collections::BTreeMap, time::Duration};

use async_trait::async_trait;
use futures_util::future::join_all;
use herald_common::{
    FromAddress, GatewaySettings, Job, Outcome, OutcomeEntry, OutcomeReport, template,
    tracing::{error, warn},
};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Seam between the orchestrator and the gateway transport.
#[async_trait]
pub trait EmailGateway: Send + Sync {
    /// Send one batch of jobs concurrently.
    ///
    /// Returns the outcome report covering every job in the batch plus the
    /// jobs whose outcome was recoverable, both in submission order.
    async fn send_batch(
        &self,
        jobs: &[Job],
        template: &str,
        subject: &str,
        settings: &GatewaySettings,
    ) -> (OutcomeReport, Vec<Job>);
}

#[derive(Serialize)]
struct Payload<'a> {
    from: &'a FromAddress,
    to: Recipient<'a>,
    subject: &'a str,
    text: String,
    headers: &'a BTreeMap<String, String>,
}

#[derive(Serialize)]
struct Recipient<'a> {
    name: &'a str,
    email: &'a str,
}

#[derive(Deserialize)]
struct Accepted {
    message_id: String,
}

/// HTTP client for the transactional-email gateway.
pub struct HttpGateway {
    client: reqwest::Client,
    url: String,
}

impl HttpGateway {
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Send a single job and classify the result.
    async fn send_job(
        &self,
        job: &Job,
        template_text: &str,
        subject: &str,
        settings: &GatewaySettings,
    ) -> (Outcome, Option<String>) {
        let text = match template::render(template_text, job) {
            Ok(text) => text,
            Err(err) => {
                // Templates are validated at the API boundary; reaching this
                // means a template bug slipped through. Fail open toward
                // retry rather than dropping the job.
                error!(
                    job_id = %job.id,
                    error = %err,
                    "template substitution failed"
                );
                return (Outcome::RecoverableFailure, None);
            }
        };

        let payload = Payload {
            from: &settings.from,
            to: Recipient {
                name: job.recipient_name(),
                email: &job.email,
            },
            subject,
            text,
            headers: &settings.headers,
        };

        let response = self
            .client
            .post(&self.url)
            .basic_auth(
                &settings.credentials.username,
                Some(&settings.credentials.password),
            )
            .json(&payload)
            .send()
            .await;

        match response {
            Ok(response) => match response.status() {
                StatusCode::ACCEPTED => match response.json::<Accepted>().await {
                    Ok(accepted) => (Outcome::Success, Some(accepted.message_id)),
                    Err(err) => {
                        error!(
                            job_id = %job.id,
                            error = %err,
                            "gateway accepted the job but returned an unreadable body"
                        );
                        (Outcome::RecoverableFailure, None)
                    }
                },
                StatusCode::UNAUTHORIZED => (Outcome::AuthFailure, None),
                StatusCode::BAD_REQUEST => (Outcome::Failure, None),
                status => {
                    warn!(
                        job_id = %job.id,
                        status = %status,
                        "unexpected gateway status, job will retry"
                    );
                    (Outcome::RecoverableFailure, None)
                }
            },
            Err(err) if err.is_timeout() || err.is_connect() => {
                warn!(
                    job_id = %job.id,
                    error = %err,
                    "connection problem sending job, job will retry"
                );
                (Outcome::RecoverableFailure, None)
            }
            Err(err) => {
                error!(
                    job_id = %job.id,
                    error = %err,
                    "unexpected error sending job, job will retry"
                );
                (Outcome::RecoverableFailure, None)
            }
        }
    }
}

#[async_trait]
impl EmailGateway for HttpGateway {
    async fn send_batch(
        &self,
        jobs: &[Job],
        template: &str,
        subject: &str,
        settings: &GatewaySettings,
    ) -> (OutcomeReport, Vec<Job>) {
        let sends = jobs
            .iter()
            .map(|job| self.send_job(job, template, subject, settings));
        let results = join_all(sends).await;

        let mut report = OutcomeReport::new();
        let mut retry_jobs = Vec::new();

        for (job, (outcome, message_id)) in jobs.iter().zip(results) {
            if outcome.is_recoverable() {
                retry_jobs.push(job.clone());
            }
            report.push(
                outcome,
                OutcomeEntry::new(job.id.clone(), message_id.unwrap_or_default()),
            );
        }

        (report, retry_jobs)
    }
}
