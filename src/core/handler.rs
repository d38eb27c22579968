use crate::core::{CycleOutcome, Notice, PredictionSource, Query, ResultsView};
use crate::utils::error::NationalizeError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Marks a cycle as belonging to one submission generation.
///
/// A ticket stops being current as soon as a newer submission bumps the
/// shared counter.
#[derive(Debug, Clone)]
pub struct Ticket {
    generation: u64,
    latest: Arc<AtomicU64>,
}

impl Ticket {
    pub fn new(generation: u64, latest: Arc<AtomicU64>) -> Self {
        Self { generation, latest }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::SeqCst) == self.generation
    }
}

/// Runs one submit, request, render cycle per call.
pub struct SubmissionHandler<S: PredictionSource, V: ResultsView> {
    source: S,
    view: V,
}

impl<S: PredictionSource, V: ResultsView> SubmissionHandler<S, V> {
    pub fn new(source: S, view: V) -> Self {
        Self { source, view }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Runs a full cycle and waits for it.
    pub async fn handle(&self, raw: &str) -> CycleOutcome {
        match self.begin(raw) {
            Some(query) => self.complete(&query, None).await,
            None => CycleOutcome::Rejected,
        }
    }

    /// Synchronous head of a cycle: clears and hides the results section,
    /// then validates `raw`. Returns `None` after raising the empty-name
    /// notice.
    pub fn begin(&self, raw: &str) -> Option<Query> {
        self.view.clear_results();
        self.view.hide_results();

        match Query::parse(raw) {
            Ok(query) => Some(query),
            Err(e) => {
                tracing::warn!("Submission rejected: {}", e);
                self.view.notify(Notice::EmptyName);
                None
            }
        }
    }

    /// Fetches and renders `query`. With a ticket, a response that arrives
    /// after a newer submission is dropped untouched.
    pub async fn complete(&self, query: &Query, ticket: Option<&Ticket>) -> CycleOutcome {
        tracing::debug!("Requesting prediction for '{}'", query);
        let fetched = self.source.predict(query).await;

        if let Some(ticket) = ticket {
            if !ticket.is_current() {
                tracing::debug!(
                    "Dropping response for '{}' (generation {} superseded)",
                    query,
                    ticket.generation()
                );
                return CycleOutcome::Superseded;
            }
        }

        let result = match fetched {
            Ok(result) => result,
            Err(e) => return self.fail(query, e),
        };

        let Some(guesses) = result.guesses() else {
            tracing::info!("No country data for '{}'", query);
            self.view.notify(Notice::NotFound);
            return CycleOutcome::NotFound;
        };

        self.view.show_results(query, result.count);
        for guess in guesses {
            self.view.append_result(&guess.to_string());
        }
        tracing::debug!("Rendered {} entries for '{}'", guesses.len(), query);

        CycleOutcome::Rendered {
            entries: guesses.len(),
        }
    }

    fn fail(&self, query: &Query, error: NationalizeError) -> CycleOutcome {
        let category = error.category();
        tracing::error!(
            "Lookup for '{}' failed: {} (Category: {:?})",
            query,
            error,
            category
        );

        self.view.notify(Notice::FetchFailed);
        CycleOutcome::Failed(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::terminal::TerminalView;
    use crate::domain::model::{CountryGuess, PredictionResult};
    use crate::utils::error::{ErrorCategory, Result};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    struct MockSource {
        replies: Mutex<VecDeque<Result<PredictionResult>>>,
        seen: Mutex<Vec<String>>,
    }

    impl MockSource {
        fn new(replies: Vec<Result<PredictionResult>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl PredictionSource for MockSource {
        async fn predict(&self, query: &Query) -> Result<PredictionResult> {
            self.seen.lock().unwrap().push(query.as_str().to_string());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(PredictionResult::default()))
        }
    }

    fn result_of(pairs: &[(&str, f64)]) -> PredictionResult {
        PredictionResult {
            name: None,
            count: None,
            country: Some(
                pairs
                    .iter()
                    .map(|(id, p)| CountryGuess::new(*id, *p))
                    .collect(),
            ),
        }
    }

    fn handler(
        replies: Vec<Result<PredictionResult>>,
    ) -> SubmissionHandler<MockSource, TerminalView<Vec<u8>>> {
        SubmissionHandler::new(MockSource::new(replies), TerminalView::new(Vec::new()))
    }

    #[tokio::test]
    async fn test_blank_input_makes_no_request() {
        let handler = handler(vec![]);

        for raw in ["", "   ", "\t"] {
            assert_eq!(handler.handle(raw).await, CycleOutcome::Rejected);
        }

        assert!(handler.source().calls().is_empty());
        assert_eq!(handler.view().notices(), vec![Notice::EmptyName; 3]);
        assert!(!handler.view().snapshot().visible);
    }

    #[tokio::test]
    async fn test_renders_in_server_order() {
        let handler = handler(vec![Ok(result_of(&[("FR", 0.8), ("BE", 0.2)]))]);

        let outcome = handler.handle(" Jean ").await;

        assert_eq!(outcome, CycleOutcome::Rendered { entries: 2 });
        assert_eq!(handler.source().calls(), vec!["Jean".to_string()]);
        let list = handler.view().snapshot();
        assert!(list.visible);
        assert_eq!(list.items, vec!["FR: 0.8", "BE: 0.2"]);
    }

    #[tokio::test]
    async fn test_second_cycle_replaces_first() {
        let handler = handler(vec![
            Ok(result_of(&[("FR", 0.8), ("BE", 0.2)])),
            Ok(result_of(&[("JP", 0.9)])),
        ]);

        handler.handle("first").await;
        handler.handle("second").await;

        assert_eq!(handler.view().snapshot().items, vec!["JP: 0.9"]);
    }

    #[tokio::test]
    async fn test_failure_after_success_leaves_section_hidden() {
        let handler = handler(vec![
            Ok(result_of(&[("FR", 0.8)])),
            Err(NationalizeError::StatusError { status: 500 }),
        ]);

        handler.handle("first").await;
        let outcome = handler.handle("second").await;

        assert_eq!(outcome, CycleOutcome::Failed(ErrorCategory::Transport));
        let list = handler.view().snapshot();
        assert!(!list.visible);
        assert!(list.items.is_empty());
        assert_eq!(handler.view().notices(), vec![Notice::FetchFailed]);
    }

    #[tokio::test]
    async fn test_empty_country_list_is_not_found() {
        let handler = handler(vec![Ok(result_of(&[]))]);

        assert_eq!(handler.handle("Nobody").await, CycleOutcome::NotFound);
        assert!(!handler.view().snapshot().visible);
        assert_eq!(handler.view().notices(), vec![Notice::NotFound]);
    }

    #[tokio::test]
    async fn test_malformed_payload_is_unexpected() {
        let handler = handler(vec![Err(NationalizeError::MalformedPayload {
            message: "bad".into(),
        })]);

        assert_eq!(
            handler.handle("Jean").await,
            CycleOutcome::Failed(ErrorCategory::Unexpected)
        );
        assert_eq!(handler.view().notices(), vec![Notice::FetchFailed]);
    }

    #[tokio::test]
    async fn test_stale_ticket_drops_response() {
        let handler = handler(vec![Ok(result_of(&[("FR", 0.8)]))]);
        let latest = Arc::new(AtomicU64::new(1));
        let ticket = Ticket::new(1, latest.clone());
        latest.store(2, Ordering::SeqCst);

        let query = Query::parse("Jean").unwrap();
        let outcome = handler.complete(&query, Some(&ticket)).await;

        assert_eq!(outcome, CycleOutcome::Superseded);
        assert_eq!(handler.source().calls().len(), 1);
        assert!(handler.view().snapshot().items.is_empty());
        assert!(handler.view().notices().is_empty());
    }
}
