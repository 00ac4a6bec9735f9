use async_trait::async_trait;
use ferrous_doh_domain::DohError;
use ferrous_doh_infrastructure::dns::UpstreamClient;
use hickory_proto::op::Message;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Scripted upstream counting how often it is asked and how often it finishes.
pub struct MockUpstream {
    endpoint: String,
    outcome: Result<Message, DohError>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    completed: AtomicUsize,
}

impl MockUpstream {
    pub fn ok(endpoint: &str) -> Arc<Self> {
        Self::with_outcome(endpoint, Ok(super::expected_message()), None)
    }

    pub fn responding(endpoint: &str, message: Message) -> Arc<Self> {
        Self::with_outcome(endpoint, Ok(message), None)
    }

    pub fn failing(endpoint: &str) -> Arc<Self> {
        Self::with_outcome(
            endpoint,
            Err(DohError::Network {
                endpoint: endpoint.to_string(),
                reason: "client error".to_string(),
            }),
            None,
        )
    }

    pub fn slow(endpoint: &str, delay: Duration) -> Arc<Self> {
        Self::with_outcome(endpoint, Ok(super::expected_message()), Some(delay))
    }

    fn with_outcome(
        endpoint: &str,
        outcome: Result<Message, DohError>,
        delay: Option<Duration>,
    ) -> Arc<Self> {
        Arc::new(Self {
            endpoint: endpoint.to_string(),
            outcome,
            delay,
            calls: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UpstreamClient for MockUpstream {
    async fn query(&self, request: &[u8]) -> Result<Message, DohError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(request, super::REQUEST, "invalid request body");

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.completed.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
