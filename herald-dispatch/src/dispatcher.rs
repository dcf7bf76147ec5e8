//! Dispatch orchestration: batching, fan-out, and the retry ladder.

use std::sync::Arc;

use futures_util::future::join_all;
use herald_common::{
    GatewaySettings, Job, OutcomeReport,
    tracing::{debug, error, info},
};
use tokio::{sync::Mutex, task::JoinSet, time::sleep};

use crate::{
    gateway::EmailGateway, policy::RetryPolicy, reporter::StatusReporter,
    settings::SettingsProvider,
};

/// Orchestrates top-level sends: splits jobs into bounded batches, drives
/// them concurrently, and escalates recoverable failures through the retry
/// ladder.
///
/// Every call to [`dispatch`](Self::dispatch) spawns one detached task that
/// owns the whole ladder for its job set - the continuation state (jobs,
/// template, subject, attempt number) lives on that task's stack and nowhere
/// else. The tasks are tracked in a [`JoinSet`] so shutdown can drain them
/// instead of leaking mid-ladder state; an unrecovered job set is still lost
/// if the process dies mid-retry.
pub struct Dispatcher {
    gateway: Arc<dyn EmailGateway>,
    reporter: Arc<dyn StatusReporter>,
    settings: Arc<dyn SettingsProvider>,
    policy: RetryPolicy,
    batch_size: usize,
    ladders: Mutex<JoinSet<()>>,
}

impl Dispatcher {
    #[must_use]
    pub fn new(
        gateway: Arc<dyn EmailGateway>,
        reporter: Arc<dyn StatusReporter>,
        settings: Arc<dyn SettingsProvider>,
        policy: RetryPolicy,
        batch_size: usize,
    ) -> Self {
        Self {
            gateway,
            reporter,
            settings,
            policy,
            batch_size: batch_size.max(1),
            ladders: Mutex::new(JoinSet::new()),
        }
    }

    /// Fire-and-forget entry point.
    ///
    /// Schedules the send and returns once the background task is spawned;
    /// the caller must not assume anything has been sent yet. An empty job
    /// list is a no-op.
    pub async fn dispatch(self: &Arc<Self>, jobs: Vec<Job>, template: String, subject: String) {
        if jobs.is_empty() {
            debug!("dispatch requested with no jobs, nothing to do");
            return;
        }

        let dispatcher = Arc::clone(self);
        let mut ladders = self.ladders.lock().await;

        // Reap ladders that have already finished; the set would otherwise
        // hold one completed entry per dispatch until shutdown.
        while ladders.try_join_next().is_some() {}

        ladders.spawn(async move {
            dispatcher.run(jobs, template, subject).await;
        });
    }

    /// Wait for every in-flight dispatch ladder to finish.
    ///
    /// Intended for shutdown. Ladders can be long (bounded by
    /// `retry_count` rounds of backoff), so callers should pair this with an
    /// overall shutdown timeout if they need one.
    pub async fn drain(&self) {
        let mut ladders = self.ladders.lock().await;
        while ladders.join_next().await.is_some() {}
    }

    /// One detached ladder: fetch settings once, then alternate send rounds
    /// and backoff waits until no recoverable jobs remain or the ceiling is
    /// hit.
    async fn run(&self, mut jobs: Vec<Job>, template: String, subject: String) {
        let settings = match self.settings.gateway_settings().await {
            Ok(settings) => settings,
            Err(err) => {
                error!(
                    error = %err,
                    jobs = jobs.len(),
                    "cannot fetch gateway settings, aborting dispatch"
                );
                return;
            }
        };

        let mut attempt: u32 = 0;
        loop {
            jobs = self.send_round(&jobs, &template, &subject, &settings).await;
            if jobs.is_empty() {
                return;
            }

            attempt += 1;
            if self.policy.exhausted(attempt) {
                info!(
                    dropped = jobs.len(),
                    attempt,
                    "retry ceiling reached, reporting remaining jobs as failed"
                );
                self.reporter.report(&OutcomeReport::failures(&jobs)).await;
                return;
            }

            debug!(
                retrying = jobs.len(),
                attempt,
                delay_secs = self.policy.delay(attempt).as_secs(),
                "scheduling retry round"
            );
            sleep(self.policy.delay(attempt)).await;
        }
    }

    /// One attempt: fan all batches out concurrently, report each batch the
    /// moment it settles, and merge the recoverable jobs for the next round.
    async fn send_round(
        &self,
        jobs: &[Job],
        template: &str,
        subject: &str,
        settings: &GatewaySettings,
    ) -> Vec<Job> {
        let batches = jobs.chunks(self.batch_size).map(|batch| async move {
            let (report, retry_jobs) = self
                .gateway
                .send_batch(batch, template, subject, settings)
                .await;

            if !report.is_empty() {
                self.reporter.report(&report).await;
            }

            retry_jobs
        });

        join_all(batches).await.into_iter().flatten().collect()
    }
}
