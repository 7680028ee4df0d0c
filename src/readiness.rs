//! Waiting for a third-party library to show up on the page
//!
//! Map and scene-graph libraries are injected by script tags that may finish
//! loading after the crate starts. [`ReadinessPoller`] re-checks a presence
//! predicate on a fixed delay until it holds, then fires its callback once.

use crate::{core::config::ReadinessConfig, runtime::async_delay, MapError, Result};
use std::sync::Mutex;
use std::time::Duration;

/// Lifecycle of a poller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessState {
    Idle,
    Polling,
    Ready,
    /// The retry budget ran out; terminal
    Unavailable,
}

/// Returns a claimed poller to `Idle` when its polling run ends without
/// settling, e.g. when the caller drops the future mid-wait
struct PollingClaim<'a> {
    state: &'a Mutex<(ReadinessState, u32)>,
}

impl Drop for PollingClaim<'_> {
    fn drop(&mut self) {
        if let Ok(mut s) = self.state.lock() {
            if s.0 == ReadinessState::Polling {
                s.0 = ReadinessState::Idle;
            }
        }
    }
}

/// Polls for one library. Each poller fires its `on_ready` at most once.
#[derive(Debug)]
pub struct ReadinessPoller {
    library: String,
    config: ReadinessConfig,
    state: Mutex<(ReadinessState, u32)>,
}

impl ReadinessPoller {
    pub fn new(library: impl Into<String>, config: ReadinessConfig) -> Self {
        Self {
            library: library.into(),
            config,
            state: Mutex::new((ReadinessState::Idle, 0)),
        }
    }

    pub fn library(&self) -> &str {
        &self.library
    }

    pub fn state(&self) -> ReadinessState {
        self.state
            .lock()
            .map(|s| s.0)
            .unwrap_or(ReadinessState::Unavailable)
    }

    /// Number of predicate evaluations so far
    pub fn attempts(&self) -> u32 {
        self.state.lock().map(|s| s.1).unwrap_or(0)
    }

    fn set_state(&self, state: ReadinessState) {
        if let Ok(mut s) = self.state.lock() {
            s.0 = state;
        }
    }

    fn record_attempt(&self) -> u32 {
        match self.state.lock() {
            Ok(mut s) => {
                s.1 += 1;
                s.1
            }
            Err(_) => 0,
        }
    }

    /// Claims the poller for a polling run; only an idle poller can be claimed
    fn begin(&self) -> Result<bool> {
        let mut s = self
            .state
            .lock()
            .map_err(|_| MapError::InvalidState("readiness state lock poisoned".to_string()))?;
        match s.0 {
            ReadinessState::Idle => {
                s.0 = ReadinessState::Polling;
                Ok(true)
            }
            ReadinessState::Unavailable => Err(MapError::LibraryUnavailable {
                library: self.library.clone(),
                attempts: s.1,
            }),
            ReadinessState::Polling | ReadinessState::Ready => Ok(false),
        }
    }

    /// Evaluates `predicate` now and then every `retry_delay_ms` until it
    /// holds, then calls `on_ready`.
    ///
    /// Returns `Ok(true)` when this call fired `on_ready`, `Ok(false)` when the
    /// poller was already polling or ready (the callback is dropped), and
    /// [`MapError::LibraryUnavailable`] once the retry budget is spent.
    pub async fn ensure_ready<P, F>(&self, mut predicate: P, on_ready: F) -> Result<bool>
    where
        P: FnMut() -> bool,
        F: FnOnce(),
    {
        if !self.begin()? {
            log::debug!("readiness check for {} already in progress", self.library);
            return Ok(false);
        }
        let _claim = PollingClaim { state: &self.state };

        let delay = Duration::from_millis(self.config.retry_delay_ms);
        let max_retries = self.config.max_retries();
        let mut retries = 0u32;

        loop {
            let attempt = self.record_attempt();
            if predicate() {
                log::info!("{} is ready after {} check(s)", self.library, attempt);
                self.set_state(ReadinessState::Ready);
                on_ready();
                return Ok(true);
            }

            if let Some(max) = max_retries {
                if retries >= max {
                    log::warn!(
                        "{} did not load after {} check(s), giving up",
                        self.library,
                        attempt
                    );
                    self.set_state(ReadinessState::Unavailable);
                    return Err(MapError::LibraryUnavailable {
                        library: self.library.clone(),
                        attempts: attempt,
                    });
                }
            }

            log::debug!(
                "{} not loaded yet, retrying in {}ms",
                self.library,
                self.config.retry_delay_ms
            );
            retries += 1;
            async_delay(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn config(timeout_ms: Option<u64>) -> ReadinessConfig {
        ReadinessConfig {
            retry_delay_ms: 500,
            timeout_ms,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_ready_immediately() {
        let poller = ReadinessPoller::new("google.maps", config(Some(1_000)));
        let fired = AtomicU32::new(0);

        let result = poller
            .ensure_ready(|| true, || {
                fired.fetch_add(1, Ordering::SeqCst);
            })
            .await;

        assert!(result.unwrap());
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(poller.attempts(), 1);
        assert_eq!(poller.state(), ReadinessState::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ready_after_retries() {
        let poller = ReadinessPoller::new("L", config(None));
        let mut checks = 0;

        let result = poller
            .ensure_ready(
                || {
                    checks += 1;
                    checks == 4
                },
                || {},
            )
            .await;

        assert!(result.unwrap());
        assert_eq!(poller.attempts(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out_to_unavailable() {
        let poller = ReadinessPoller::new("THREE", config(Some(1_200)));
        let fired = AtomicU32::new(0);

        let result = poller
            .ensure_ready(|| false, || {
                fired.fetch_add(1, Ordering::SeqCst);
            })
            .await;

        match result {
            Err(MapError::LibraryUnavailable { library, attempts }) => {
                assert_eq!(library, "THREE");
                // first check plus ceil(1200 / 500) retries
                assert_eq!(attempts, 4);
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert_eq!(poller.state(), ReadinessState::Unavailable);

        // Terminal: a second call reports the same failure without polling
        assert!(poller.ensure_ready(|| true, || {}).await.is_err());
        assert_eq!(poller.attempts(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_wait_releases_poller() {
        let poller = ReadinessPoller::new("google.maps", config(None));
        let fired = AtomicU32::new(0);

        let abandoned = tokio::time::timeout(
            Duration::from_millis(1_200),
            poller.ensure_ready(|| false, || {}),
        )
        .await;
        assert!(abandoned.is_err());
        assert_eq!(poller.state(), ReadinessState::Idle);

        let result = poller
            .ensure_ready(|| true, || {
                fired.fetch_add(1, Ordering::SeqCst);
            })
            .await;

        assert!(result.unwrap());
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(poller.state(), ReadinessState::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reentry_after_ready_is_noop() {
        let poller = ReadinessPoller::new("google.maps", config(Some(1_000)));
        let fired = AtomicU32::new(0);

        for _ in 0..3 {
            let _ = poller
                .ensure_ready(|| true, || {
                    fired.fetch_add(1, Ordering::SeqCst);
                })
                .await;
        }

        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(poller.attempts(), 1);
    }
}
