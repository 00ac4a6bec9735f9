use super::balancer::{LoadBalancer, LoadBalancerOptions};
use super::policy;
use crate::dns::transport::{build_http_client, HttpsTransport, InstrumentedClient, UpstreamClient};
use ferrous_doh_domain::{ConfigError, UpstreamConfig};
use std::sync::Arc;
use tracing::info;

impl LoadBalancer {
    /// Build the DoH pool described by `config`.
    ///
    /// Every endpoint gets an instrumented HTTPS transport; all of them share
    /// one HTTP client so connections are pooled.
    pub fn from_config(config: &UpstreamConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let client = build_http_client(config.tls.as_ref())?;
        let upstreams: Vec<Arc<dyn UpstreamClient>> = config
            .endpoint_urls()
            .into_iter()
            .map(|url| {
                Arc::new(InstrumentedClient::new(HttpsTransport::new(client.clone(), url)))
                    as Arc<dyn UpstreamClient>
            })
            .collect();

        let balancer = Self::new(
            upstreams,
            LoadBalancerOptions {
                policy: policy::from_choice(config.policy),
                max_fails: config.max_fails,
                timeout: config.timeout(),
            },
        );

        info!(
            upstreams = balancer.len(),
            policy = balancer.policy_name(),
            max_fails = balancer.max_fails(),
            timeout_ms = config.timeout_ms,
            mtls = config.tls.as_ref().is_some_and(|tls| tls.has_client_auth()),
            "DoH load balancer ready"
        );
        Ok(balancer)
    }
}
