use tracing::{debug, info, warn};

use crate::client::ComparisonApi;
use crate::errors::{CompareError, CompareResult};
use crate::format::friendly_error;
use crate::types::{ComparisonResult, HealthStatus};

pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a query to compare.";
pub const BACKEND_NOT_READY_MESSAGE: &str =
    "⚠️ Backend not ready. Please make sure parlant_agent_server.py is running.";

/// Where the current query is in its lifecycle.
///
/// Results only exist in `Displaying`, so a loading state can never carry
/// stale results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Displaying(ComparisonResult),
}

/// Demo queries fetched once per session
#[derive(Debug, Clone, Default)]
struct DemoQueryList {
    cache: Vec<String>,
    visible: bool,
}

impl DemoQueryList {
    fn is_loaded(&self) -> bool {
        !self.cache.is_empty()
    }
}

/// Everything the demo shows at one moment
#[derive(Debug, Clone, Default)]
pub struct DemoState {
    query: String,
    phase: Phase,
    error: Option<String>,
    demo: DemoQueryList,
}

impl DemoState {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn result(&self) -> Option<&ComparisonResult> {
        match &self.phase {
            Phase::Displaying(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The cached demo queries, whether or not they are currently shown
    pub fn demo_queries(&self) -> &[String] {
        &self.demo.cache
    }

    pub fn demo_queries_visible(&self) -> bool {
        self.demo.visible && self.demo.is_loaded()
    }

    /// Validating: records the raw text and returns the trimmed query, or
    /// sets the validation error and leaves the phase untouched.
    fn validate(&mut self, raw: &str) -> CompareResult<String> {
        self.query = raw.to_string();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            self.error = Some(EMPTY_QUERY_MESSAGE.to_string());
            return Err(CompareError::ValidationError(EMPTY_QUERY_MESSAGE.to_string()));
        }
        Ok(trimmed.to_string())
    }

    fn start_loading(&mut self) {
        self.error = None;
        self.phase = Phase::Loading;
    }

    fn finish_loading(&mut self, outcome: Result<ComparisonResult, String>) {
        match outcome {
            Ok(result) => self.phase = Phase::Displaying(result),
            Err(message) => {
                self.phase = Phase::Idle;
                self.error = Some(message);
            }
        }
    }

    fn clear(&mut self) {
        self.query.clear();
        self.phase = Phase::Idle;
        self.error = None;
        self.demo.visible = false;
    }
}

/// Drives one user's interaction with the comparison backend.
///
/// Every operation catches its own errors and turns them into the display
/// string held in [`DemoState::error`]; nothing here returns a
/// [`CompareError`] to the caller.
pub struct DemoSession<A: ComparisonApi> {
    api: A,
    state: DemoState,
    friendly_errors: bool,
    api_port: String,
}

impl<A: ComparisonApi> DemoSession<A> {
    pub fn new(api: A, api_port: impl Into<String>) -> Self {
        Self {
            api,
            state: DemoState::default(),
            friendly_errors: true,
            api_port: api_port.into(),
        }
    }

    pub fn with_friendly_errors(mut self, enabled: bool) -> Self {
        self.friendly_errors = enabled;
        self
    }

    pub fn state(&self) -> &DemoState {
        &self.state
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    fn unreachable_message(&self) -> String {
        format!(
            "⚠️ Cannot connect to API server. Make sure api_server.py is running on port {}.",
            self.api_port
        )
    }

    /// Asks the backend whether it is ready. Not-ready and unreachable
    /// backends set different error messages; a ready backend leaves the
    /// error untouched.
    pub async fn check_health(&mut self) -> Option<HealthStatus> {
        match self.api.health().await {
            Ok(health) => {
                if !health.ready {
                    warn!("Backend reported not ready");
                    self.state.error = Some(BACKEND_NOT_READY_MESSAGE.to_string());
                }
                Some(health)
            }
            Err(e) => {
                warn!("Health check failed: {}", e);
                self.state.error = Some(self.unreachable_message());
                None
            }
        }
    }

    /// Runs one comparison. On failure the returned string is also the
    /// session's current error.
    pub async fn compare(&mut self, query: &str) -> Result<&ComparisonResult, String> {
        let query = match self.state.validate(query) {
            Ok(query) => query,
            Err(e) => {
                debug!("Rejected query: {}", e);
                return Err(e.to_string());
            }
        };

        self.state.start_loading();
        info!("Comparing query: {}", query);

        let outcome = self
            .api
            .compare(&query)
            .await
            .map_err(|e| self.describe_failure(&e));
        self.state.finish_loading(outcome);

        match &self.state.phase {
            Phase::Displaying(result) => Ok(result),
            _ => Err(self.state.error.clone().unwrap_or_default()),
        }
    }

    fn describe_failure(&self, error: &CompareError) -> String {
        let raw = error.to_string();
        let message = if self.friendly_errors {
            friendly_error(&raw)
        } else {
            raw
        };
        format!("Error: {}", message)
    }

    /// Fetches the demo queries on first use and shows them; afterwards only
    /// toggles their visibility. A failed fetch leaves the cache empty so the
    /// next call tries again.
    pub async fn load_demo_queries(&mut self) -> Result<&[String], String> {
        if self.state.demo.is_loaded() {
            self.state.demo.visible = !self.state.demo.visible;
            debug!(visible = self.state.demo.visible, "Toggled demo queries");
            return Ok(&self.state.demo.cache);
        }

        match self.api.demo_queries().await {
            Ok(queries) => {
                info!("Loaded {} demo queries", queries.len());
                self.state.demo.cache = queries;
                self.state.demo.visible = true;
                Ok(&self.state.demo.cache)
            }
            Err(e) => {
                let message = format!("Error loading demo queries: {}", e);
                warn!("{}", message);
                self.state.error = Some(message.clone());
                Err(message)
            }
        }
    }

    /// Copies a cached demo query (zero-based) into the query text, hides
    /// the list, and compares it.
    pub async fn select_demo_query(&mut self, index: usize) -> Result<&ComparisonResult, String> {
        let Some(selected) = self.state.demo.cache.get(index).cloned() else {
            let error = CompareError::ValidationError(format!(
                "No demo query #{}. {} demo queries are loaded.",
                index.saturating_add(1),
                self.state.demo.cache.len()
            ));
            self.state.error = Some(error.to_string());
            return Err(error.to_string());
        };

        self.state.demo.visible = false;
        self.compare(&selected).await
    }

    /// Resets query, error and results and hides the demo list. The demo
    /// query cache survives.
    pub fn clear(&mut self) {
        self.state.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeApi {
        ready: Option<bool>,
        compare_error: Option<String>,
        demo_fails: bool,
        compare_calls: AtomicUsize,
        demo_calls: AtomicUsize,
        sent: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ComparisonApi for FakeApi {
        async fn health(&self) -> CompareResult<HealthStatus> {
            match self.ready {
                Some(ready) => Ok(HealthStatus { ready }),
                None => Err(CompareError::TransportError("connection refused".into())),
            }
        }

        async fn compare(&self, query: &str) -> CompareResult<ComparisonResult> {
            self.compare_calls.fetch_add(1, Ordering::SeqCst);
            self.sent.lock().unwrap().push(query.to_string());
            if let Some(message) = &self.compare_error {
                return Err(CompareError::ServerError {
                    status_code: 500,
                    message: message.clone(),
                });
            }
            Ok(ComparisonResult {
                query: query.to_string(),
                traditional_response: "traditional".into(),
                parlant_response: "agent".into(),
                reasoning: "Guidelines: g".into(),
            })
        }

        async fn demo_queries(&self) -> CompareResult<Vec<String>> {
            self.demo_calls.fetch_add(1, Ordering::SeqCst);
            if self.demo_fails {
                return Err(CompareError::ServerError {
                    status_code: 500,
                    message: "Failed to load demo queries".into(),
                });
            }
            Ok(vec!["first".into(), "second".into()])
        }
    }

    fn session(api: FakeApi) -> DemoSession<FakeApi> {
        DemoSession::new(api, "5000")
    }

    #[tokio::test]
    async fn test_trimmed_query_sent_once() {
        let mut s = session(FakeApi::default());
        let result = s.compare("  Should I buy whole life?\n").await.unwrap();
        assert_eq!(result.query, "Should I buy whole life?");

        assert_eq!(s.api().compare_calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            s.api().sent.lock().unwrap().as_slice(),
            ["Should I buy whole life?".to_string()]
        );
        assert!(s.state().error().is_none());
        assert!(!s.state().is_loading());
    }

    #[tokio::test]
    async fn test_blank_query_sends_nothing() {
        let mut s = session(FakeApi::default());
        for blank in ["", "   ", "\n\t "] {
            let err = s.compare(blank).await.unwrap_err();
            assert_eq!(err, EMPTY_QUERY_MESSAGE);
        }
        assert_eq!(s.api().compare_calls.load(Ordering::SeqCst), 0);
        assert_eq!(s.state().error(), Some(EMPTY_QUERY_MESSAGE));
        assert_eq!(s.state().phase(), &Phase::Idle);
    }

    #[tokio::test]
    async fn test_failure_clears_previous_result() {
        let mut s = session(FakeApi::default());
        s.compare("first question").await.unwrap();
        assert!(s.state().result().is_some());

        s.api.compare_error = Some("Internal server error: boom".into());
        let err = s.compare("second question").await.unwrap_err();
        assert!(err.starts_with("Error: "));
        assert!(s.state().result().is_none());
        assert_eq!(s.state().error(), Some(err.as_str()));
        assert_eq!(s.state().phase(), &Phase::Idle);
    }

    #[tokio::test]
    async fn test_raw_errors_when_friendly_disabled() {
        let api = FakeApi {
            compare_error: Some("Internal server error: boom".into()),
            ..FakeApi::default()
        };
        let mut s = session(api).with_friendly_errors(false);
        let err = s.compare("question").await.unwrap_err();
        assert_eq!(err, "Error: Internal server error: boom");
    }

    #[tokio::test]
    async fn test_success_clears_previous_error() {
        let mut s = session(FakeApi::default());
        s.compare(" ").await.unwrap_err();
        assert!(s.state().error().is_some());

        s.compare("real question").await.unwrap();
        assert!(s.state().error().is_none());
    }

    #[tokio::test]
    async fn test_demo_queries_fetched_once() {
        let mut s = session(FakeApi::default());

        let first = s.load_demo_queries().await.unwrap().to_vec();
        assert_eq!(first, vec!["first".to_string(), "second".to_string()]);
        assert!(s.state().demo_queries_visible());

        s.load_demo_queries().await.unwrap();
        assert!(!s.state().demo_queries_visible());
        s.load_demo_queries().await.unwrap();
        assert!(s.state().demo_queries_visible());

        assert_eq!(s.api().demo_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_demo_query_failure_retries_on_next_call() {
        let api = FakeApi {
            demo_fails: true,
            ..FakeApi::default()
        };
        let mut s = session(api);
        let err = s.load_demo_queries().await.unwrap_err();
        assert_eq!(err, "Error loading demo queries: Failed to load demo queries");
        assert_eq!(s.state().error(), Some(err.as_str()));

        s.load_demo_queries().await.unwrap_err();
        assert_eq!(s.api().demo_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_select_demo_query_compares_it() {
        let mut s = session(FakeApi::default());
        s.load_demo_queries().await.unwrap();

        let result = s.select_demo_query(1).await.unwrap();
        assert_eq!(result.query, "second");
        assert_eq!(s.state().query(), "second");
        assert!(!s.state().demo_queries_visible());

        let err = s.select_demo_query(7).await.unwrap_err();
        assert!(err.contains("#8"));
        assert_eq!(s.api().compare_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_select_demo_query_huge_index_fails_cleanly() {
        let mut s = session(FakeApi::default());
        let err = s.select_demo_query(usize::MAX).await.unwrap_err();
        assert!(err.contains("0 demo queries are loaded"));
        assert_eq!(s.state().error(), Some(err.as_str()));
        assert_eq!(s.api().compare_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_blank_query_keeps_displayed_result() {
        let mut s = session(FakeApi::default());
        s.compare("first question").await.unwrap();

        let err = s.compare("   ").await.unwrap_err();
        assert_eq!(err, EMPTY_QUERY_MESSAGE);
        assert_eq!(s.state().error(), Some(EMPTY_QUERY_MESSAGE));
        assert_eq!(
            s.state().result().map(|r| r.query.as_str()),
            Some("first question")
        );
        assert!(!s.state().is_loading());
        assert_eq!(s.api().compare_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_clear_keeps_cache() {
        let mut s = session(FakeApi::default());
        s.load_demo_queries().await.unwrap();
        s.compare("question").await.unwrap();

        s.clear();
        assert_eq!(s.state().query(), "");
        assert!(s.state().result().is_none());
        assert!(s.state().error().is_none());
        assert!(!s.state().demo_queries_visible());
        assert_eq!(s.state().demo_queries().len(), 2);

        // Showing the list again needs no second fetch
        s.load_demo_queries().await.unwrap();
        assert!(s.state().demo_queries_visible());
        assert_eq!(s.api().demo_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_health_messages_differ() {
        let mut not_ready = session(FakeApi {
            ready: Some(false),
            ..FakeApi::default()
        });
        let health = not_ready.check_health().await.unwrap();
        assert!(!health.ready);
        assert_eq!(not_ready.state().error(), Some(BACKEND_NOT_READY_MESSAGE));

        let mut unreachable = session(FakeApi::default());
        assert!(unreachable.check_health().await.is_none());
        let message = unreachable.state().error().unwrap();
        assert!(message.contains("Cannot connect to API server"));
        assert!(message.ends_with("port 5000."));

        let mut ready = session(FakeApi {
            ready: Some(true),
            ..FakeApi::default()
        });
        assert!(ready.check_health().await.unwrap().ready);
        assert!(ready.state().error().is_none());
    }
}
