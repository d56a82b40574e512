//! Analysis status polling
//!
//! A poll is a tokio task owned by a [`PollHandle`]. It fetches the record
//! right away, then every `interval` while the status is pending or
//! processing, and stops on its own at completed/failed. Dropping the handle
//! (the owning view going away) aborts the task.

use crate::error::ClientError;
use doctorstats_types::{AnalysisRecord, AnalysisStatus};
use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// How a poll ended
#[derive(Debug)]
pub enum PollOutcome {
    Completed(AnalysisRecord),
    /// `error` is the server's message, unchanged
    Failed {
        record: AnalysisRecord,
        error: String,
    },
    /// A status fetch failed; polling stopped
    Error(ClientError),
    Cancelled,
}

impl PollOutcome {
    pub fn record(&self) -> Option<&AnalysisRecord> {
        match self {
            PollOutcome::Completed(record) | PollOutcome::Failed { record, .. } => Some(record),
            PollOutcome::Error(_) | PollOutcome::Cancelled => None,
        }
    }
}

/// Handle to a running poll
pub struct PollHandle {
    updates: watch::Receiver<Option<AnalysisRecord>>,
    task: Option<JoinHandle<PollOutcome>>,
}

impl PollHandle {
    /// Most recent record, if any fetch has succeeded yet
    pub fn latest(&self) -> Option<AnalysisRecord> {
        self.updates.borrow().clone()
    }

    /// Independent receiver of every record the poll publishes
    pub fn subscribe(&self) -> watch::Receiver<Option<AnalysisRecord>> {
        self.updates.clone()
    }

    /// Wait for the next published record; `None` once the poll has ended
    pub async fn changed(&mut self) -> Option<AnalysisRecord> {
        self.updates.changed().await.ok()?;
        self.updates.borrow_and_update().clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(|task| task.is_finished())
    }

    /// Stop polling now
    pub fn cancel(&self) {
        if let Some(task) = &self.task {
            task.abort();
        }
    }

    /// Wait for the poll to end
    pub async fn wait(mut self) -> PollOutcome {
        let Some(task) = self.task.take() else {
            return PollOutcome::Cancelled;
        };
        match task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                if !e.is_cancelled() {
                    tracing::warn!(error = %e, "poll task panicked");
                }
                PollOutcome::Cancelled
            }
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Spawns status polls
pub struct AnalysisPoller;

impl AnalysisPoller {
    /// Start polling analysis `id` with `fetch`.
    ///
    /// Must be called inside a tokio runtime.
    pub fn spawn<F, Fut>(fetch: F, id: impl Into<String>, interval: Duration) -> PollHandle
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<AnalysisRecord, ClientError>> + Send + 'static,
    {
        let id = id.into();
        let (tx, rx) = watch::channel(None);
        let task = tokio::spawn(run(fetch, id, interval, tx));
        PollHandle {
            updates: rx,
            task: Some(task),
        }
    }
}

async fn run<F, Fut>(
    fetch: F,
    id: String,
    interval: Duration,
    tx: watch::Sender<Option<AnalysisRecord>>,
) -> PollOutcome
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<AnalysisRecord, ClientError>>,
{
    let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last_status = None;

    loop {
        ticker.tick().await;

        let record = match fetch(id.clone()).await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(analysis = %id, error = %e, "status poll failed");
                return PollOutcome::Error(e);
            }
        };

        let status = record.status;
        if last_status != Some(status) {
            tracing::info!(analysis = %id, %status, "analysis status");
            last_status = Some(status);
        }
        tx.send_replace(Some(record.clone()));

        match status {
            AnalysisStatus::Completed => return PollOutcome::Completed(record),
            AnalysisStatus::Failed => {
                let error = record.failure().unwrap_or_default().to_string();
                return PollOutcome::Failed { record, error };
            }
            AnalysisStatus::Pending | AnalysisStatus::Processing => {}
        }
    }
}
