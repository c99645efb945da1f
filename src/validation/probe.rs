use async_trait::async_trait;
use log::debug;
use reqwest::{redirect, Client, Method};
use std::fmt::Debug;
use std::time::Duration;

use crate::errors::ProbeError;

/// Liveness check for a single URL
///
/// Implementations never fail: any error, timeout or non-2xx answer is `false`.
#[async_trait]
pub trait LinkProbe: Send + Sync + Debug {
    /// Whether the resource at `url` answered with a 2xx status
    async fn probe(&self, url: &str) -> bool;
}

/// HTTP prober: HEAD first, GET as fallback, redirects never followed
#[derive(Debug, Clone)]
pub struct HttpProbe {
    /// HTTP client configured without redirects
    client: Client,
    /// Budget shared by the HEAD and GET attempts
    timeout: Duration,
}

impl HttpProbe {
    /// Create a prober with the given timeout budget
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, ProbeError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .redirect(redirect::Policy::none())
            .user_agent(user_agent)
            .pool_idle_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ProbeError::RequestFailed(e.to_string()))?;

        Ok(Self { client, timeout })
    }

    /// The timeout budget of one probe
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Probe `url`, returning the successful status code or why it failed
    pub async fn check(&self, url: &str) -> Result<u16, ProbeError> {
        match tokio::time::timeout(self.timeout, self.head_then_get(url)).await {
            Ok(result) => result,
            Err(_) => Err(ProbeError::Timeout(self.timeout)),
        }
    }

    async fn head_then_get(&self, url: &str) -> Result<u16, ProbeError> {
        match self.request(Method::HEAD, url).await {
            Ok(status) => Ok(status),
            Err(e) => {
                debug!("HEAD {} failed ({}), retrying with GET", url, e);
                self.request(Method::GET, url).await
            }
        }
    }

    async fn request(&self, method: Method, url: &str) -> Result<u16, ProbeError> {
        let response = self
            .client
            .request(method, url)
            .send()
            .await
            .map_err(|e| {
                if e.is_builder() {
                    ProbeError::InvalidUrl(url.to_string())
                } else {
                    ProbeError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if status.is_success() {
            Ok(status.as_u16())
        } else {
            Err(ProbeError::Status(status.as_u16()))
        }
    }
}

#[async_trait]
impl LinkProbe for HttpProbe {
    async fn probe(&self, url: &str) -> bool {
        match self.check(url).await {
            Ok(status) => {
                debug!("{} -> {}", url, status);
                true
            }
            Err(e) => {
                debug!("{} -> invalid: {}", url, e);
                false
            }
        }
    }
}
