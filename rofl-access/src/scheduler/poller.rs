//! Log poller
//!
//! Periodically fetches the logs of one machine instance from its scheduler.
//! Polling only happens while a scheduler endpoint and a session token are both
//! present. Each successful poll replaces the previous snapshot; failures are
//! recorded in the observable state and never stop the loop.

use reqwest::Client;
use rofl_client::SchedulerClient;
use rofl_core::domain::log::LogSnapshot;
use rofl_core::domain::token::SessionToken;
use std::sync::Arc;
use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::error::{AccessError, Result};
use crate::token_cache::TokenCache;

/// Default interval between automatic polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Which instance to fetch logs for, and from where
#[derive(Debug, Clone)]
pub struct LogTarget {
    /// Scheduler base address; polling is inactive without it
    pub scheduler_url: Option<String>,
    pub instance_id: String,
}

impl LogTarget {
    pub fn new(scheduler_url: Option<String>, instance_id: impl Into<String>) -> Self {
        Self {
            scheduler_url: scheduler_url.filter(|url| !url.trim().is_empty()),
            instance_id: instance_id.into(),
        }
    }
}

/// Observable poller state
#[derive(Debug, Clone, Default)]
pub struct LogState {
    /// Last successfully fetched logs, kept across failed polls
    pub snapshot: LogSnapshot,
    /// A request is in flight
    pub fetching: bool,
    /// Failure of the most recent poll, cleared by the next success
    pub error: Option<AccessError>,
    /// Number of requests issued so far
    pub fetches: u64,
}

impl LogState {
    pub fn logs(&self) -> &[String] {
        &self.snapshot.lines
    }

    /// No request is in flight
    pub fn is_idle(&self) -> bool {
        !self.fetching
    }

    /// A request is in flight and nothing has been fetched yet
    pub fn is_loading(&self) -> bool {
        self.fetching && self.snapshot.fetched_at.is_none()
    }
}

/// Fetches the current logs of an instance once
///
/// A response without a `logs` key yields an empty list.
pub async fn fetch_logs(
    client: &SchedulerClient,
    token: &SessionToken,
    instance_id: &str,
) -> Result<Vec<String>> {
    let response = client
        .get_logs(token, instance_id)
        .await
        .map_err(AccessError::from_log_fetch)?;

    Ok(response.logs)
}

/// Handle to a running log polling task
///
/// Dropping the handle stops polling.
pub struct LogPoller {
    state: watch::Receiver<LogState>,
    trigger: Arc<Notify>,
    handle: JoinHandle<()>,
}

impl LogPoller {
    /// Starts polling `target` every `interval`
    ///
    /// The first poll runs right away if a token is already cached, otherwise
    /// on the first tick or `refresh()` after one is stored. A zero interval
    /// is rejected with `InvalidPollInterval`.
    pub fn spawn(target: LogTarget, tokens: TokenCache, interval: Duration) -> Result<Self> {
        Self::spawn_with_client(target, tokens, interval, Client::new())
    }

    /// Starts polling with a preconfigured HTTP client
    pub fn spawn_with_client(
        target: LogTarget,
        tokens: TokenCache,
        interval: Duration,
        http: Client,
    ) -> Result<Self> {
        let poll_now = !tokens.is_empty();
        Self::start(target, tokens, interval, http, poll_now)
    }

    /// Starts polling; the first poll waits for `refresh()` or a tick unless `poll_now`
    pub(crate) fn start(
        target: LogTarget,
        tokens: TokenCache,
        interval: Duration,
        http: Client,
        poll_now: bool,
    ) -> Result<Self> {
        if interval.is_zero() {
            return Err(AccessError::InvalidPollInterval);
        }

        let (state_tx, state_rx) = watch::channel(LogState::default());
        let trigger = Arc::new(Notify::new());

        if poll_now {
            trigger.notify_one();
        }

        let worker = PollWorker {
            client: target
                .scheduler_url
                .map(|url| SchedulerClient::with_client(url, http)),
            instance_id: target.instance_id,
            tokens,
            state: state_tx,
        };

        let handle = tokio::spawn(worker.run(interval, Arc::clone(&trigger)));

        Ok(Self {
            state: state_rx,
            trigger,
            handle,
        })
    }

    /// Requests a poll as soon as possible
    ///
    /// Requests made while a poll is pending are merged into it.
    pub fn refresh(&self) {
        self.trigger.notify_one();
    }

    /// Subscribes to state changes
    pub fn subscribe(&self) -> watch::Receiver<LogState> {
        self.state.clone()
    }

    /// Current state
    pub fn state(&self) -> LogState {
        self.state.borrow().clone()
    }

    /// Stops the polling task
    pub fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for LogPoller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

struct PollWorker {
    client: Option<SchedulerClient>,
    instance_id: String,
    tokens: TokenCache,
    state: watch::Sender<LogState>,
}

impl PollWorker {
    async fn run(self, interval: Duration, trigger: Arc<Notify>) {
        info!(
            instance_id = %self.instance_id,
            "Starting log poller (interval: {:?})",
            interval
        );

        let mut ticker = time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = trigger.notified() => {
                    ticker.reset();
                }
            }

            self.poll_once().await;
        }
    }

    async fn poll_once(&self) {
        let (Some(client), Some(token)) = (self.client.as_ref(), self.tokens.current()) else {
            debug!(
                instance_id = %self.instance_id,
                "Log polling inactive: no scheduler endpoint or session token"
            );
            self.state
                .send_if_modified(|s| std::mem::replace(&mut s.fetching, false));
            return;
        };

        self.state.send_modify(|s| {
            s.fetching = true;
            s.fetches += 1;
        });

        let result = fetch_logs(client, &token, &self.instance_id).await;

        if let Err(e) = &result {
            warn!(instance_id = %self.instance_id, "Failed to fetch logs: {}", e);

            if e.is_unauthorized() && self.tokens.clear_if(&token) {
                info!("Session token refused by scheduler; cleared until next access");
            }
        }

        self.state.send_modify(|s| {
            s.fetching = false;
            match result {
                Ok(lines) => {
                    debug!(instance_id = %self.instance_id, "Fetched {} log line(s)", lines.len());
                    s.snapshot = LogSnapshot::now(lines);
                    s.error = None;
                }
                Err(e) => s.error = Some(e),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rofl_client::LOGS_PATH;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

    const LONG: Duration = Duration::from_secs(3600);

    fn token() -> SessionToken {
        SessionToken::new("auth-token-123").unwrap()
    }

    async fn wait_for(
        rx: &mut watch::Receiver<LogState>,
        f: impl FnMut(&LogState) -> bool,
    ) -> LogState {
        time::timeout(Duration::from_secs(5), rx.wait_for(f))
            .await
            .expect("timed out waiting for poller state")
            .expect("poller stopped")
            .clone()
    }

    /// Simulated instance whose output grows by one line per request and
    /// whose second request fails
    struct GrowingLogs {
        calls: AtomicUsize,
    }

    impl Respond for GrowingLogs {
        fn respond(&self, _: &Request) -> ResponseTemplate {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n == 2 {
                return ResponseTemplate::new(503).set_body_string("scheduler busy");
            }
            let logs: Vec<String> = (1..=n).map(|i| format!("line {i}")).collect();
            ResponseTemplate::new(200).set_body_json(json!({ "logs": logs }))
        }
    }

    #[tokio::test]
    async fn test_inert_without_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(LOGS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "logs": ["a"] })))
            .expect(0)
            .mount(&server)
            .await;

        let poller = LogPoller::spawn(
            LogTarget::new(Some(server.uri()), "instance-1"),
            TokenCache::new(),
            LONG,
        )
        .unwrap();
        poller.refresh();
        time::sleep(Duration::from_millis(100)).await;

        let state = poller.state();
        assert!(state.is_idle());
        assert!(!state.is_loading());
        assert_eq!(state.fetches, 0);
        assert!(state.logs().is_empty());
    }

    #[tokio::test]
    async fn test_inert_without_scheduler_endpoint() {
        let poller = LogPoller::spawn(
            LogTarget::new(Some("  ".to_string()), "instance-1"),
            TokenCache::with_token(token()),
            LONG,
        )
        .unwrap();
        poller.refresh();
        time::sleep(Duration::from_millis(100)).await;

        let state = poller.state();
        assert!(state.is_idle());
        assert_eq!(state.fetches, 0);
    }

    #[tokio::test]
    async fn test_fetches_logs_with_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(LOGS_PATH))
            .and(header("authorization", "Bearer auth-token-123"))
            .and(body_json(json!({ "instance_id": "instance-1" })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "logs": ["a", "b", "c"] })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let poller = LogPoller::spawn(
            LogTarget::new(Some(server.uri()), "instance-1"),
            TokenCache::with_token(token()),
            LONG,
        )
        .unwrap();

        let mut rx = poller.subscribe();
        let state = wait_for(&mut rx, |s| s.fetches == 1 && s.is_idle()).await;

        assert_eq!(state.logs(), ["a", "b", "c"]);
        assert!(state.error.is_none());
        assert!(state.snapshot.fetched_at.is_some());
    }

    #[tokio::test]
    async fn test_missing_logs_key_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(LOGS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": "other" })))
            .mount(&server)
            .await;

        let poller = LogPoller::spawn(
            LogTarget::new(Some(server.uri()), "instance-1"),
            TokenCache::with_token(token()),
            LONG,
        )
        .unwrap();

        let mut rx = poller.subscribe();
        let state = wait_for(&mut rx, |s| s.fetches == 1 && s.is_idle()).await;

        assert!(state.logs().is_empty());
        assert!(state.error.is_none());
        assert!(state.snapshot.fetched_at.is_some());
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_logs() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(LOGS_PATH))
            .respond_with(GrowingLogs {
                calls: AtomicUsize::new(0),
            })
            .mount(&server)
            .await;

        let poller = LogPoller::spawn(
            LogTarget::new(Some(server.uri()), "instance-1"),
            TokenCache::with_token(token()),
            LONG,
        )
        .unwrap();
        let mut rx = poller.subscribe();

        let state = wait_for(&mut rx, |s| s.fetches == 1 && s.is_idle()).await;
        assert_eq!(state.logs(), ["line 1"]);

        poller.refresh();
        let state = wait_for(&mut rx, |s| s.fetches == 2 && s.is_idle()).await;
        assert_eq!(state.logs(), ["line 1"]);
        assert_eq!(
            state.error,
            Some(AccessError::LogFetchFailed {
                status: Some(503),
                body: "scheduler busy".to_string()
            })
        );

        poller.refresh();
        let state = wait_for(&mut rx, |s| s.fetches == 3 && s.is_idle()).await;
        assert_eq!(state.logs(), ["line 1", "line 2", "line 3"]);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_unauthorized_clears_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(LOGS_PATH))
            .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
            .expect(1)
            .mount(&server)
            .await;

        let tokens = TokenCache::with_token(token());
        let poller = LogPoller::spawn(
            LogTarget::new(Some(server.uri()), "instance-1"),
            tokens.clone(),
            LONG,
        )
        .unwrap();
        let mut rx = poller.subscribe();

        let state = wait_for(&mut rx, |s| s.fetches == 1 && s.is_idle()).await;
        assert!(state.error.as_ref().is_some_and(|e| e.is_unauthorized()));
        assert!(tokens.is_empty());

        // Later polls are inert until a new token is stored
        poller.refresh();
        time::sleep(Duration::from_millis(100)).await;
        assert_eq!(poller.state().fetches, 1);
    }

    #[tokio::test]
    async fn test_polls_on_interval() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(LOGS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "logs": ["a"] })))
            .mount(&server)
            .await;

        let poller = LogPoller::spawn(
            LogTarget::new(Some(server.uri()), "instance-1"),
            TokenCache::with_token(token()),
            Duration::from_millis(50),
        )
        .unwrap();
        let mut rx = poller.subscribe();

        let state = wait_for(&mut rx, |s| s.fetches >= 3 && s.is_idle()).await;
        assert_eq!(state.logs(), ["a"]);
    }

    #[tokio::test]
    async fn test_zero_interval_rejected() {
        let result = LogPoller::spawn(
            LogTarget::new(Some("http://127.0.0.1:1".to_string()), "instance-1"),
            TokenCache::with_token(token()),
            Duration::ZERO,
        );

        assert!(matches!(result, Err(AccessError::InvalidPollInterval)));
    }

    #[tokio::test]
    async fn test_start_without_initial_poll() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(LOGS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "logs": ["a"] })))
            .expect(1)
            .mount(&server)
            .await;

        let poller = LogPoller::start(
            LogTarget::new(Some(server.uri()), "instance-1"),
            TokenCache::with_token(token()),
            LONG,
            Client::new(),
            false,
        )
        .unwrap();

        time::sleep(Duration::from_millis(100)).await;
        assert_eq!(poller.state().fetches, 0);

        poller.refresh();
        let mut rx = poller.subscribe();
        let state = wait_for(&mut rx, |s| s.fetches == 1 && s.is_idle()).await;
        assert_eq!(state.logs(), ["a"]);
    }

    #[tokio::test]
    async fn test_stop_ends_polling() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(LOGS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "logs": [] })))
            .mount(&server)
            .await;

        let poller = LogPoller::spawn(
            LogTarget::new(Some(server.uri()), "instance-1"),
            TokenCache::with_token(token()),
            Duration::from_millis(20),
        )
        .unwrap();
        let mut rx = poller.subscribe();
        wait_for(&mut rx, |s| s.fetches >= 1 && s.is_idle()).await;

        poller.stop();
        time::sleep(Duration::from_millis(50)).await;
        let fetches = poller.state().fetches;
        time::sleep(Duration::from_millis(100)).await;
        assert_eq!(poller.state().fetches, fetches);
    }
}
