//! Concurrent execution of the planned searches for one job.

use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::agents::AgentSpec;
use crate::capabilities::{parse_text, StageRunner};
use crate::jobs::record::{JobId, JobStatus};
use crate::jobs::store::JobStore;
use crate::research::fallback::NO_RESULTS_SENTINEL;
use crate::research::plan::{search_input, SearchItem};
use crate::types::Result;

/// Progress after `completed` of `total` searches have finished.
pub fn progress_for(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 60;
    }
    let completed = completed.min(total);
    (25 + 35 * completed / total) as u8
}

pub struct FanOutExecutor {
    store: Arc<JobStore>,
    runner: Arc<dyn StageRunner>,
    agent: AgentSpec,
    /// Shared by every job of this executor; `None` launches all items at once.
    permits: Option<Arc<Semaphore>>,
}

impl FanOutExecutor {
    pub fn new(store: Arc<JobStore>, runner: Arc<dyn StageRunner>, agent: AgentSpec) -> Self {
        Self {
            store,
            runner,
            agent,
            permits: None,
        }
    }

    /// Cap the number of searches in flight. `0` means unbounded.
    pub fn with_max_concurrency(mut self, max: usize) -> Self {
        self.permits = (max > 0).then(|| Arc::new(Semaphore::new(max)));
        self
    }

    /// Run every item concurrently and return the surviving results in
    /// completion order.
    ///
    /// Each completion commits a progress update for `job_id`. Failed items
    /// are logged and dropped. A store error aborts the remaining searches.
    pub async fn run(&self, job_id: &JobId, items: &[SearchItem]) -> Result<Vec<String>> {
        let total = items.len();
        let mut set = JoinSet::new();

        for item in items {
            let runner = Arc::clone(&self.runner);
            let agent = self.agent.clone();
            let permits = self.permits.clone();
            let query = item.query.clone();
            let input = search_input(item);

            set.spawn(async move {
                let _permit = match permits {
                    Some(permits) => Some(permits.acquire_owned().await),
                    None => None,
                };
                let outcome = runner
                    .run(&agent, &input)
                    .await
                    .and_then(|value| parse_text(&agent, value));
                (query, outcome)
            });
        }

        let mut results = Vec::with_capacity(total);
        let mut completed = 0;
        while let Some(joined) = set.join_next().await {
            completed += 1;
            match joined {
                Ok((_, Ok(text))) => results.push(text),
                Ok((query, Err(e))) => {
                    tracing::warn!(job_id = %job_id, search = %query, error = %e, "search failed");
                }
                Err(e) => {
                    tracing::warn!(job_id = %job_id, error = %e, "search task aborted");
                }
            }

            let progress = progress_for(completed, total);
            self.store.update(job_id, |record| {
                record.advance(
                    JobStatus::Searching,
                    progress,
                    format!("Searching... {}/{} completed", completed, total),
                )
            })?;
        }

        if results.is_empty() {
            tracing::warn!(job_id = %job_id, total, "no search produced a result");
            results.push(NO_RESULTS_SENTINEL.to_string());
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::OutputShape;
    use crate::jobs::record::JobMode;
    use crate::types::AppError;
    use async_trait::async_trait;
    use rstest::rstest;
    use serde_json::Value;
    use std::time::Duration;

    /// Echoes the search term back, failing for terms starting with "fail".
    struct EchoRunner;

    #[async_trait]
    impl StageRunner for EchoRunner {
        async fn run(&self, _agent: &AgentSpec, input: &str) -> Result<Value> {
            let term = input
                .lines()
                .next()
                .and_then(|line| line.strip_prefix("Search term: "))
                .unwrap_or_default()
                .to_string();
            if let Some(ms) = term.strip_prefix("slow-").and_then(|ms| ms.parse().ok()) {
                tokio::time::sleep(Duration::from_millis(ms)).await;
            }
            if term.starts_with("fail") {
                return Err(AppError::LLM(format!("search for {} timed out", term)));
            }
            Ok(Value::String(format!("results for {}", term)))
        }

        fn name(&self) -> &str {
            "echo"
        }
    }

    fn item(query: &str) -> SearchItem {
        SearchItem {
            query: query.into(),
            reason: "because".into(),
        }
    }

    fn executor() -> (Arc<JobStore>, FanOutExecutor, JobId) {
        let store = Arc::new(JobStore::default());
        let id = JobId::new("job");
        store.create(id.clone(), "query", JobMode::Report).unwrap();
        let agent = AgentSpec::new("SearchAgent", "search", OutputShape::Text);
        let executor = FanOutExecutor::new(Arc::clone(&store), Arc::new(EchoRunner), agent);
        (store, executor, id)
    }

    #[rstest]
    #[case(0, 3, 25)]
    #[case(1, 3, 36)]
    #[case(2, 3, 48)]
    #[case(3, 3, 60)]
    #[case(1, 1, 60)]
    #[case(7, 20, 37)]
    #[case(0, 0, 60)]
    fn test_progress_for(#[case] completed: usize, #[case] total: usize, #[case] expected: u8) {
        assert_eq!(progress_for(completed, total), expected);
    }

    #[tokio::test]
    async fn test_failed_items_are_dropped() {
        let (store, executor, id) = executor();
        let results = executor
            .run(&id, &[item("a"), item("fail-b"), item("c")])
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| !r.contains("fail")));
        let record = store.get(&id).unwrap();
        assert_eq!(record.progress, 60);
        assert_eq!(record.progress_message, "Searching... 3/3 completed");
    }

    #[tokio::test]
    async fn test_all_failed_yields_sentinel() {
        let (_store, executor, id) = executor();
        let results = executor
            .run(&id, &[item("fail-1"), item("fail-2")])
            .await
            .unwrap();
        assert_eq!(results, vec![NO_RESULTS_SENTINEL.to_string()]);
    }

    #[tokio::test]
    async fn test_results_arrive_in_completion_order() {
        let (_store, executor, id) = executor();
        let results = executor
            .run(&id, &[item("slow-200"), item("fast")])
            .await
            .unwrap();
        assert_eq!(results, vec!["results for fast", "results for slow-200"]);
    }

    #[tokio::test]
    async fn test_bounded_pool_runs_everything() {
        let (_store, executor, id) = executor();
        let executor = executor.with_max_concurrency(1);
        let items: Vec<SearchItem> = (0..5).map(|i| item(&format!("q{i}"))).collect();
        let results = executor.run(&id, &items).await.unwrap();
        assert_eq!(results.len(), 5);
    }

    #[tokio::test]
    async fn test_store_error_is_propagated() {
        let (_store, executor, _id) = executor();
        let err = executor
            .run(&JobId::new("unknown"), &[item("a")])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
