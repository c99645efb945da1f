/*!
 * Scripted link probe implementations for testing
 *
 * These probes never touch the network. Each one answers from a fixed
 * table of live URLs and records every URL it was asked about.
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::time::Duration;

use tablecheck::validation::{CancelFlag, LinkProbe};

/// Answers `true` only for the URLs it was given
#[derive(Debug, Default)]
pub struct StaticProbe {
    /// URLs that answer 2xx
    live: HashSet<String>,
    /// Every probed URL, in call order
    calls: Mutex<Vec<String>>,
    /// Artificial latency per probe
    delay: Option<Duration>,
}

impl StaticProbe {
    /// Create a probe where exactly `live` URLs are reachable
    pub fn with_live<I, S>(live: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            live: live.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Sleep this long inside every probe
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// URLs probed so far
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// How often `url` was probed
    pub fn call_count(&self, url: &str) -> usize {
        self.calls.lock().iter().filter(|u| u.as_str() == url).count()
    }
}

#[async_trait]
impl LinkProbe for StaticProbe {
    async fn probe(&self, url: &str) -> bool {
        self.calls.lock().push(url.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.live.contains(url)
    }
}

/// Sets a cancel flag on its first probe, then answers like a `StaticProbe`
#[derive(Debug)]
pub struct CancellingProbe {
    inner: StaticProbe,
    flag: CancelFlag,
}

impl CancellingProbe {
    pub fn new(inner: StaticProbe, flag: CancelFlag) -> Self {
        Self { inner, flag }
    }

    pub fn calls(&self) -> Vec<String> {
        self.inner.calls()
    }
}

#[async_trait]
impl LinkProbe for CancellingProbe {
    async fn probe(&self, url: &str) -> bool {
        self.flag.cancel();
        self.inner.probe(url).await
    }
}
