/*!
 * Link validation with bounded concurrency.
 *
 * Wraps a `LinkProbe` with a global in-flight cap, per-host permits,
 * a per-item outcome cache and a cancellation flag, and optionally
 * retries publication links against their alternate spellings.
 */

use futures::stream::{self, StreamExt};
use log::{debug, info};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;

use super::alternates::alternate_urls;
use super::limiter::HostLimiter;
use super::probe::LinkProbe;

/// Result of validating one link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    /// Whether the link, or one of its alternates, is live
    pub is_valid: bool,

    /// The URL that answered; differs from the input when an alternate succeeded
    pub resolved_url: String,
}

impl ValidationOutcome {
    /// A failed validation of `url`
    pub fn invalid(url: &str) -> Self {
        Self { is_valid: false, resolved_url: url.to_string() }
    }

    /// A successful validation resolved to `url`
    pub fn valid(url: &str) -> Self {
        Self { is_valid: true, resolved_url: url.to_string() }
    }
}

/// Shared flag that stops new probes from being issued
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Create an unset flag
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop issuing new probes; in-flight ones finish or time out
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Validator tuning
#[derive(Debug, Clone)]
pub struct ValidatorOptions {
    /// Maximum probes in flight across all hosts
    pub max_concurrent_probes: usize,

    /// Maximum probes in flight against one host
    pub max_probes_per_host: usize,

    /// Whether to try alternate publication URLs after a failure
    pub resolve_alternates: bool,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            max_concurrent_probes: 8,
            max_probes_per_host: 4,
            resolve_alternates: false,
        }
    }
}

/// Validates links through a `LinkProbe`
#[derive(Debug)]
pub struct LinkValidator {
    probe: Arc<dyn LinkProbe>,
    options: ValidatorOptions,
    global: Arc<Semaphore>,
    limiter: HostLimiter,
    cache: RwLock<HashMap<String, bool>>,
    cancel: CancelFlag,
    probes_issued: AtomicUsize,
}

impl LinkValidator {
    /// Create a validator over `probe`
    pub fn new(probe: Arc<dyn LinkProbe>, options: ValidatorOptions) -> Self {
        Self::with_cancel_flag(probe, options, CancelFlag::new())
    }

    /// Create a validator that stops issuing probes once `cancel` is set
    pub fn with_cancel_flag(probe: Arc<dyn LinkProbe>, options: ValidatorOptions, cancel: CancelFlag) -> Self {
        Self {
            global: Arc::new(Semaphore::new(options.max_concurrent_probes.max(1))),
            limiter: HostLimiter::new(options.max_probes_per_host),
            probe,
            options,
            cache: RwLock::new(HashMap::new()),
            cancel,
            probes_issued: AtomicUsize::new(0),
        }
    }

    /// The validator's options
    pub fn options(&self) -> &ValidatorOptions {
        &self.options
    }

    /// The cancellation flag observed by this validator
    pub fn cancel_flag(&self) -> &CancelFlag {
        &self.cancel
    }

    /// Number of network probes actually issued (cache hits excluded)
    pub fn probes_issued(&self) -> usize {
        self.probes_issued.load(Ordering::SeqCst)
    }

    /// Forget every cached outcome
    pub fn clear_cache(&self) {
        self.cache.write().clear();
    }

    /// Probe a single URL once until the cache is cleared. `None` when cancelled before probing.
    pub async fn probe_once(&self, url: &str) -> Option<bool> {
        if let Some(cached) = self.cache.read().get(url).copied() {
            return Some(cached);
        }
        if self.cancel.is_cancelled() {
            return None;
        }

        let _global = self.global.clone().acquire_owned().await.ok()?;
        let _host = self.limiter.acquire(url).await?;
        if self.cancel.is_cancelled() {
            return None;
        }

        self.probes_issued.fetch_add(1, Ordering::SeqCst);
        let live = self.probe.probe(url).await;
        self.cache.write().insert(url.to_string(), live);
        Some(live)
    }

    /// Validate `url`, falling back to its alternates when enabled.
    /// `None` when cancellation prevented a decision.
    pub async fn resolve(&self, url: &str) -> Option<ValidationOutcome> {
        if self.probe_once(url).await? {
            return Some(ValidationOutcome::valid(url));
        }
        if !self.options.resolve_alternates {
            return Some(ValidationOutcome::invalid(url));
        }

        for alternate in alternate_urls(url) {
            if self.probe_once(&alternate).await? {
                info!("Resolved {} to alternate {}", url, alternate);
                return Some(ValidationOutcome::valid(&alternate));
            }
        }
        Some(ValidationOutcome::invalid(url))
    }

    /// Validate every distinct URL concurrently.
    ///
    /// URLs absent from the result were not decided because of cancellation.
    pub async fn validate_all<I>(&self, urls: I) -> HashMap<String, ValidationOutcome>
    where
        I: IntoIterator<Item = String>,
    {
        let mut seen = HashSet::new();
        let unique: Vec<String> = urls.into_iter().filter(|u| seen.insert(u.clone())).collect();
        debug!("Validating {} distinct link(s)", unique.len());

        stream::iter(unique)
            .map(|url| async move {
                let outcome = self.resolve(&url).await;
                (url, outcome)
            })
            .buffer_unordered(self.options.max_concurrent_probes.max(1))
            .filter_map(|(url, outcome)| async move { outcome.map(|o| (url, o)) })
            .collect::<HashMap<_, _>>()
            .await
    }
}
