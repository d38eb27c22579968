use crate::core::handler::{SubmissionHandler, Ticket};
use crate::core::{CycleOutcome, PredictionSource, ResultsView};
use crate::utils::error::Result;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::JoinHandle;

/// Outcome counts for every submission a session has seen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub submitted: u64,
    pub rendered: u64,
    pub rejected: u64,
    pub not_found: u64,
    pub failed: u64,
    pub superseded: u64,
}

impl SessionSummary {
    fn record(&mut self, outcome: &CycleOutcome) {
        match outcome {
            CycleOutcome::Rendered { .. } => self.rendered += 1,
            CycleOutcome::Rejected => self.rejected += 1,
            CycleOutcome::NotFound => self.not_found += 1,
            CycleOutcome::Failed(_) => self.failed += 1,
            CycleOutcome::Superseded => self.superseded += 1,
        }
    }

    fn settled(&self) -> u64 {
        self.rendered + self.rejected + self.not_found + self.failed + self.superseded
    }
}

/// Feeds submissions to a shared handler.
///
/// Clearing and validation run inside [`submit`](Self::submit); only the
/// lookup is spawned. With `supersede_in_flight` set, every new submission
/// aborts the lookups still pending and tickets its own, so a late response
/// can never overwrite a newer one. Without it lookups run untracked and
/// overlapping responses may interleave in the view.
pub struct Session<S, V>
where
    S: PredictionSource + 'static,
    V: ResultsView + 'static,
{
    handler: Arc<SubmissionHandler<S, V>>,
    latest: Arc<AtomicU64>,
    pending: Vec<JoinHandle<()>>,
    recorded: Arc<Mutex<SessionSummary>>,
    submitted: u64,
    panicked: u64,
    supersede_in_flight: bool,
}

impl<S, V> Session<S, V>
where
    S: PredictionSource + 'static,
    V: ResultsView + 'static,
{
    pub fn new(handler: Arc<SubmissionHandler<S, V>>, supersede_in_flight: bool) -> Self {
        Self {
            handler,
            latest: Arc::new(AtomicU64::new(0)),
            pending: Vec::new(),
            recorded: Arc::new(Mutex::new(SessionSummary::default())),
            submitted: 0,
            panicked: 0,
            supersede_in_flight,
        }
    }

    pub fn handler(&self) -> &Arc<SubmissionHandler<S, V>> {
        &self.handler
    }

    /// Lookup tasks still held by the session.
    pub fn tracked_tasks(&self) -> usize {
        self.pending.len()
    }

    fn recorded(&self) -> MutexGuard<'_, SessionSummary> {
        self.recorded
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Handles `raw` up to the lookup and returns its generation without
    /// waiting for the response.
    pub fn submit(&mut self, raw: String) -> u64 {
        self.pending.retain(|task| !task.is_finished());

        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        self.submitted += 1;

        if self.supersede_in_flight {
            for task in &self.pending {
                task.abort();
            }
        }

        let Some(query) = self.handler.begin(&raw) else {
            self.recorded().record(&CycleOutcome::Rejected);
            return generation;
        };

        let handler = Arc::clone(&self.handler);
        let recorded = Arc::clone(&self.recorded);
        let ticket = self
            .supersede_in_flight
            .then(|| Ticket::new(generation, Arc::clone(&self.latest)));

        let task = tokio::spawn(async move {
            let outcome = handler.complete(&query, ticket.as_ref()).await;
            recorded
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .record(&outcome);
        });

        tracing::debug!("Submission {} started", generation);
        self.pending.push(task);
        generation
    }

    /// Waits for every pending lookup and summarizes the session so far.
    ///
    /// Lookups aborted before they settled count as superseded.
    pub async fn drain(&mut self) -> SessionSummary {
        for task in self.pending.drain(..) {
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    tracing::error!("Lookup task failed: {}", e);
                    self.panicked += 1;
                }
            }
        }

        let mut summary = *self.recorded();
        summary.submitted = self.submitted;
        summary.failed += self.panicked;
        summary.superseded += self.submitted.saturating_sub(summary.settled());
        summary
    }

    /// Submits one line at a time until `reader` is exhausted.
    pub async fn run<R>(mut self, reader: R) -> Result<SessionSummary>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            self.submit(line);
        }
        Ok(self.drain().await)
    }
}
