//! Blocking entry point for synchronous callers
//!
//! The shortening chain runs as a task on the bridge's own Tokio runtime
//! and reports its single terminal result through a one-shot channel.
//! The calling thread blocks on the receiving end.

use std::time::Duration;

use log::debug;
use tokio::runtime::{Builder, Handle, Runtime};
use tokio::sync::oneshot;

use crate::error::{Result, SmallcatError};
use crate::parser::{Extractor, SmallCatMarkup};
use crate::shortener::Shortener;
use crate::transport::{ClientConfig, ReqwestTransport, Transport};
use crate::types::Expiry;

/// Runs the async shortening chain for a blocking caller
///
/// Each [`run`](Self::run) delivers exactly one result: the sender half of
/// the channel is consumed by the send, and a task that dies without
/// sending drops it, which wakes the caller with an error.
///
/// Without a timeout the caller waits as long as the transport does.
/// The runtime and the HTTP session live as long as the bridge.
///
/// Meant for synchronous code. Inside a Tokio runtime (including
/// `spawn_blocking` threads) `run` refuses with `AsyncContext`, and
/// dropping the bridge there shuts its runtime down in the background
/// instead of blocking.
pub struct SyncBridge<T = ReqwestTransport, E = SmallCatMarkup> {
    runtime: Option<Runtime>,
    shortener: Shortener<T, E>,
    timeout: Option<Duration>,
}

impl SyncBridge {
    /// Create a bridge over a default [`Shortener`]
    ///
    /// # Errors
    /// Returns error if the HTTP client or the runtime cannot be created
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a bridge over a [`Shortener`] with custom client configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Self::from_shortener(Shortener::with_config(config)?)
    }
}

impl<T: Transport, E: Extractor> SyncBridge<T, E> {
    /// Wrap an existing shortener
    pub fn from_shortener(shortener: Shortener<T, E>) -> Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("smallcat-io")
            .enable_all()
            .build()?;

        Ok(Self {
            runtime: Some(runtime),
            shortener,
            timeout: None,
        })
    }

    /// Give up waiting after `limit`
    ///
    /// The in-flight task is aborted once the limit elapses.
    pub fn with_timeout(mut self, limit: Duration) -> Self {
        self.timeout = Some(limit);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Shorten `url`, blocking until the chain has finished
    ///
    /// Must be called from synchronous code.
    ///
    /// # Errors
    /// - `AsyncContext` if called from inside a Tokio runtime
    /// - Whatever [`Shortener::shorten`] returns, unchanged
    /// - `Timeout` if a limit is set and elapses first
    /// - `InvalidResponse` if the task ends without producing a result
    pub fn run(&self, url: &str, expiry: Expiry) -> Result<String> {
        if Handle::try_current().is_ok() {
            return Err(SmallcatError::AsyncContext);
        }
        let Some(runtime) = self.runtime.as_ref() else {
            return Err(SmallcatError::AsyncContext);
        };

        let (tx, rx) = oneshot::channel();
        let shortener = self.shortener.clone();
        let url = url.to_string();

        let task = runtime.spawn(async move {
            let result = shortener.shorten(&url, expiry).await;
            if tx.send(result).is_err() {
                debug!("caller stopped waiting, dropping result");
            }
        });

        let received = match self.timeout {
            None => runtime.block_on(rx),
            Some(limit) => {
                match runtime.block_on(async { tokio::time::timeout(limit, rx).await }) {
                    Ok(received) => received,
                    Err(_) => {
                        task.abort();
                        return Err(SmallcatError::Timeout(limit));
                    }
                }
            }
        };

        received.map_err(|_| {
            SmallcatError::invalid_response("shortening task ended without a result")
        })?
    }
}

impl<T, E> Drop for SyncBridge<T, E> {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take()
            && Handle::try_current().is_ok()
        {
            runtime.shutdown_background();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Instant;

    use super::*;
    use crate::testing::FakeTransport;

    const LANDING_URL: &str = "https://small.cat/";
    const SUBMIT_URL: &str = "https://small.cat/entries";
    const LANDING_HTML: &str = r#"<input name="authenticity_token" type="hidden" value="ABC123" />"#;
    const CONFIRMATION_HTML: &str = "<h2>Your Small.Cat link is:</h2>\n\n  <a href=\"http://small.cat/xyz\" rel=\"nofollow\" class=\"smallcat\">";

    struct PanickingMarkup;

    impl Extractor for PanickingMarkup {
        fn extract_token(&self, _html: &str) -> Option<String> {
            panic!("markup exploded");
        }

        fn extract_short_url(&self, _html: &str) -> Option<String> {
            None
        }
    }

    fn happy_transport() -> FakeTransport {
        FakeTransport::new()
            .page(LANDING_URL, 200, LANDING_HTML)
            .redirect(SUBMIT_URL, 302, "/entries/7")
            .page("https://small.cat/entries/7", 200, CONFIRMATION_HTML)
    }

    fn bridge<E: Extractor>(transport: FakeTransport, extractor: E) -> (SyncBridge<FakeTransport, E>, Arc<FakeTransport>) {
        let transport = Arc::new(transport);
        let shortener = Shortener::with_parts(
            Arc::clone(&transport),
            Arc::new(extractor),
            &ClientConfig::default(),
        );
        let bridge = SyncBridge::from_shortener(shortener).expect("runtime should start");
        (bridge, transport)
    }

    #[test]
    fn test_bridge_creation() {
        let bridge = SyncBridge::new().expect("bridge should build");
        assert_eq!(bridge.timeout(), None);
    }

    #[test]
    fn test_run_returns_submission_result() {
        let (bridge, transport) = bridge(happy_transport(), SmallCatMarkup);

        let result = bridge.run("http://example.com", Expiry::OneDay);

        assert_eq!(result.ok().as_deref(), Some("http://small.cat/xyz"));
        assert_eq!(transport.get_calls(), 2);
        assert_eq!(transport.post_calls(), 1);
    }

    #[test]
    fn test_run_fetch_failure_never_submits() {
        let (bridge, transport) = bridge(
            FakeTransport::new().page(LANDING_URL, 200, "<html>maintenance</html>"),
            SmallCatMarkup,
        );

        let result = bridge.run("http://example.com", Expiry::OneDay);

        assert!(matches!(result, Err(SmallcatError::TokenNotFound)));
        assert_eq!(transport.post_calls(), 0);
    }

    #[test]
    fn test_run_transport_failure_does_not_hang() {
        let (bridge, transport) = bridge(FakeTransport::new(), SmallCatMarkup);

        let result = bridge.run("http://example.com", Expiry::OneWeek);

        match result {
            Err(SmallcatError::InvalidResponse(msg)) => assert!(msg.contains("connection refused")),
            other => panic!("Expected InvalidResponse error, got {:?}", other),
        }
        assert_eq!(transport.post_calls(), 0);
    }

    #[test]
    fn test_run_repeatedly_on_one_bridge() {
        let (bridge, transport) = bridge(happy_transport(), SmallCatMarkup);

        for expiry in Expiry::ALL {
            let result = bridge.run("http://example.com", expiry);
            assert_eq!(result.ok().as_deref(), Some("http://small.cat/xyz"));
        }
        assert_eq!(transport.post_calls(), Expiry::ALL.len());
    }

    #[test]
    fn test_run_panicking_task_unblocks_caller() {
        let (bridge, transport) = bridge(happy_transport(), PanickingMarkup);

        let result = bridge.run("http://example.com", Expiry::OneHour);

        match result {
            Err(SmallcatError::InvalidResponse(msg)) => assert!(msg.contains("without a result")),
            other => panic!("Expected InvalidResponse error, got {:?}", other),
        }
        assert_eq!(transport.post_calls(), 0);
    }

    #[test]
    fn test_run_times_out_on_hanging_transport() {
        let limit = Duration::from_millis(100);
        let (bridge, _) = bridge(FakeTransport::hanging(), SmallCatMarkup);
        let bridge = bridge.with_timeout(limit);

        let start = Instant::now();
        let result = bridge.run("http://example.com", Expiry::OneDay);

        assert!(matches!(result, Err(SmallcatError::Timeout(d)) if d == limit));
        assert!(start.elapsed() >= Duration::from_millis(90));
    }

    #[test]
    fn test_run_timeout_not_hit_on_fast_chain() {
        let (bridge, _) = bridge(happy_transport(), SmallCatMarkup);
        let bridge = bridge.with_timeout(Duration::from_secs(5));

        let result = bridge.run("http://example.com", Expiry::TenMinutes);
        assert_eq!(result.ok().as_deref(), Some("http://small.cat/xyz"));
    }

    #[tokio::test]
    async fn test_run_inside_runtime_is_refused() {
        let (bridge, transport) = bridge(happy_transport(), SmallCatMarkup);

        let result = bridge.run("http://example.com", Expiry::OneDay);

        assert!(matches!(result, Err(SmallcatError::AsyncContext)));
        assert_eq!(transport.get_calls(), 0);

        // must not panic inside the runtime
        drop(bridge);
    }
}
