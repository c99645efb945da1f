/*!
 * Per-host concurrency limiting.
 *
 * Every host gets its own semaphore so a table pointing mostly at one
 * server cannot flood it, while links to other hosts keep flowing.
 */

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use url::Url;

/// Hands out per-host permits
#[derive(Debug)]
pub struct HostLimiter {
    /// Permits per host
    per_host: usize,
    /// Lazily created semaphores keyed by host
    semaphores: Mutex<HashMap<String, Arc<Semaphore>>>,
}

impl HostLimiter {
    /// Create a limiter allowing `per_host` in-flight probes per host
    pub fn new(per_host: usize) -> Self {
        Self {
            per_host: per_host.max(1),
            semaphores: Mutex::new(HashMap::new()),
        }
    }

    /// Host key of a URL; unparsable URLs share one bucket
    pub fn host_key(url: &str) -> String {
        Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_ascii_lowercase()))
            .unwrap_or_default()
    }

    /// Wait for a permit for the host of `url`
    pub async fn acquire(&self, url: &str) -> Option<OwnedSemaphorePermit> {
        let semaphore = {
            let mut semaphores = self.semaphores.lock();
            semaphores
                .entry(Self::host_key(url))
                .or_insert_with(|| Arc::new(Semaphore::new(self.per_host)))
                .clone()
        };
        semaphore.acquire_owned().await.ok()
    }
}
