use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::app::ports::StudentSourcePort;
use crate::domain::FilterState;
use crate::error::{SeatError, SourceFailure};
use crate::pipeline::{self, IngestReport, ResultSet};

/// Inputs that trigger a fetch
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    FilterChanged(FilterState),
    Refresh,
    Reset,
}

/// What the display currently shows
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Idle,
    Loading { seq: u64 },
    Ready { seq: u64, filter: FilterState, result: ResultSet, report: IngestReport },
    /// The previous result is cleared on failure; only the message remains.
    Failed { seq: u64, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Applied { seq: u64, rows: usize },
    Failed { seq: u64, message: String },
    /// A newer request was issued after this one; its response was discarded.
    Stale { seq: u64, latest: u64 },
}

struct SessionState {
    filter: FilterState,
    issued: u64,
    view: ViewState,
}

/// Drives fetch -> resolve -> display. Requests may overlap; each carries a
/// sequence number and only the response to the latest issued request is
/// applied. Every fetch is bounded by `timeout`.
pub struct SearchController {
    source: Arc<dyn StudentSourcePort>,
    timeout: Duration,
    state: Mutex<SessionState>,
}

impl SearchController {
    pub fn new(source: Arc<dyn StudentSourcePort>, timeout: Duration) -> Self {
        Self {
            source,
            timeout,
            state: Mutex::new(SessionState {
                filter: FilterState::default(),
                issued: 0,
                view: ViewState::Idle,
            }),
        }
    }

    pub async fn filter(&self) -> FilterState {
        self.state.lock().await.filter.clone()
    }

    pub async fn view(&self) -> ViewState {
        self.state.lock().await.view.clone()
    }

    /// Feed one event and run the fetch it triggers to completion
    pub async fn handle(&self, event: SearchEvent) -> SearchOutcome {
        let (seq, filter) = self.begin(event).await;
        info!(seq, %filter, source = %self.source.describe(), "search started");

        let fetched = match tokio::time::timeout(self.timeout, self.source.fetch(&filter)).await {
            Ok(result) => result,
            Err(_) => Err(SeatError::SourceUnavailable(SourceFailure::Timeout(self.timeout))),
        };
        let resolved = fetched
            .map(|ingested| (pipeline::resolve(ingested.records, &filter), ingested.report));

        self.complete(seq, filter, resolved).await
    }

    async fn begin(&self, event: SearchEvent) -> (u64, FilterState) {
        let mut state = self.state.lock().await;
        match event {
            SearchEvent::FilterChanged(filter) => state.filter = filter,
            SearchEvent::Refresh => {}
            SearchEvent::Reset => state.filter = FilterState::default(),
        }
        state.issued += 1;
        let seq = state.issued;
        state.view = ViewState::Loading { seq };
        (seq, state.filter.clone())
    }

    async fn complete(
        &self,
        seq: u64,
        filter: FilterState,
        resolved: crate::error::Result<(ResultSet, IngestReport)>,
    ) -> SearchOutcome {
        let mut state = self.state.lock().await;
        // Only the latest issued request may replace the view, including
        // while it is still loading.
        if seq < state.issued {
            debug!(seq, latest = state.issued, "discarding stale response");
            return SearchOutcome::Stale { seq, latest: state.issued };
        }

        match resolved {
            Ok((result, report)) => {
                let rows = result.len();
                if result.is_empty() {
                    info!(seq, "search returned no results");
                } else {
                    info!(seq, rows, "search applied");
                }
                state.view = ViewState::Ready { seq, filter, result, report };
                SearchOutcome::Applied { seq, rows }
            }
            Err(e) => {
                let message = e.to_string();
                warn!(seq, error = %message, "search failed");
                state.view = ViewState::Failed { seq, message: message.clone() };
                SearchOutcome::Failed { seq, message }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StudentRecord;
    use crate::pipeline::Ingested;
    use async_trait::async_trait;

    struct FixedSource {
        records: Vec<StudentRecord>,
    }

    #[async_trait]
    impl StudentSourcePort for FixedSource {
        async fn fetch(&self, _filter: &FilterState) -> crate::error::Result<Ingested> {
            Ok(Ingested {
                records: self.records.clone(),
                report: IngestReport { accepted: self.records.len(), rejected: 0 },
            })
        }

        fn describe(&self) -> String {
            "fixed".to_string()
        }
    }

    struct SlowSource;

    #[async_trait]
    impl StudentSourcePort for SlowSource {
        async fn fetch(&self, _filter: &FilterState) -> crate::error::Result<Ingested> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(Ingested { records: Vec::new(), report: IngestReport::default() })
        }

        fn describe(&self) -> String {
            "slow".to_string()
        }
    }

    fn branch(id: &str, code: &str) -> StudentRecord {
        StudentRecord { branch_code: code.to_string(), ..StudentRecord::new(id) }
    }

    #[tokio::test]
    async fn filter_change_fetches_and_applies() {
        let records = vec![branch("1", "CSE"), branch("2", "ECE")];
        let source = Arc::new(FixedSource { records });
        let controller = SearchController::new(source, Duration::from_secs(5));
        assert_eq!(controller.view().await, ViewState::Idle);

        let outcome = controller
            .handle(SearchEvent::FilterChanged(FilterState::new().with_branch("CSE")))
            .await;
        assert_eq!(outcome, SearchOutcome::Applied { seq: 1, rows: 1 });

        let outcome = controller.handle(SearchEvent::Reset).await;
        assert_eq!(outcome, SearchOutcome::Applied { seq: 2, rows: 2 });
        assert_eq!(controller.filter().await, FilterState::default());
    }

    #[tokio::test]
    async fn timeout_clears_the_view() {
        let controller = SearchController::new(Arc::new(SlowSource), Duration::from_millis(20));
        let outcome = controller.handle(SearchEvent::Refresh).await;
        match outcome {
            SearchOutcome::Failed { seq: 1, message } => assert!(message.contains("timed out")),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(matches!(controller.view().await, ViewState::Failed { seq: 1, .. }));
    }
}
