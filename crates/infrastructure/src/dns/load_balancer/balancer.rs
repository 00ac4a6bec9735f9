use super::policy::{RandomPolicy, SelectionPolicy};
use crate::dns::transport::UpstreamClient;
use ferrous_doh_domain::DohError;
use hickory_proto::op::Message;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Per-attempt timeout used when none is configured.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// Construction parameters of a [`LoadBalancer`].
#[derive(Clone)]
pub struct LoadBalancerOptions {
    pub policy: Arc<dyn SelectionPolicy>,

    /// Attempts per query; `None` means one per upstream. Clamped to the
    /// pool size.
    pub max_fails: Option<usize>,

    /// Bound of each individual attempt.
    pub timeout: Duration,
}

impl Default for LoadBalancerOptions {
    fn default() -> Self {
        Self {
            policy: Arc::new(RandomPolicy::new()),
            max_fails: None,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Spreads queries over a fixed pool of upstreams with bounded failover.
///
/// Each query asks the policy for an attempt order and walks it for at most
/// `max_fails` attempts, each under its own timeout. The first success wins;
/// if every attempt fails, only the last error is returned.
pub struct LoadBalancer {
    upstreams: Vec<Arc<dyn UpstreamClient>>,
    policy: Arc<dyn SelectionPolicy>,
    max_fails: usize,
    timeout: Duration,
}

impl LoadBalancer {
    pub fn new(upstreams: Vec<Arc<dyn UpstreamClient>>, options: LoadBalancerOptions) -> Self {
        let max_fails = options
            .max_fails
            .unwrap_or(upstreams.len())
            .min(upstreams.len());

        Self {
            upstreams,
            policy: options.policy,
            max_fails,
            timeout: options.timeout,
        }
    }

    pub async fn query(&self, request: &[u8]) -> Result<Message, DohError> {
        let order = self.policy.list(self.upstreams.len());
        let mut last_error = DohError::NoUpstreams;

        for (attempt, &index) in order.iter().take(self.max_fails).enumerate() {
            let Some(upstream) = self.upstreams.get(index) else {
                continue;
            };

            // The attempt future is dropped when the timeout fires, which
            // cancels that exchange and nothing else.
            match tokio::time::timeout(self.timeout, upstream.query(request)).await {
                Ok(Ok(message)) => {
                    debug!(
                        endpoint = %upstream.endpoint(),
                        attempt,
                        policy = self.policy.name(),
                        "Upstream responded"
                    );
                    return Ok(message);
                }
                Ok(Err(e)) => last_error = e,
                Err(_) => {
                    last_error = DohError::Network {
                        endpoint: upstream.endpoint().to_string(),
                        reason: format!("timed out after {}ms", self.timeout.as_millis()),
                    }
                }
            }
        }

        Err(last_error)
    }

    pub fn len(&self) -> usize {
        self.upstreams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.upstreams.is_empty()
    }

    pub fn max_fails(&self) -> usize {
        self.max_fails
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    pub fn endpoints(&self) -> Vec<&str> {
        self.upstreams.iter().map(|u| u.endpoint()).collect()
    }
}
