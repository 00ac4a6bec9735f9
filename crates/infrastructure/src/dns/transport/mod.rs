pub mod https;
pub mod instrumented;
pub mod tls;

use async_trait::async_trait;
use ferrous_doh_domain::DohError;
use hickory_proto::op::Message;
use std::sync::Arc;

pub use https::{build_http_client, HttpsTransport, MAX_DNS_MESSAGE_SIZE};
pub use instrumented::InstrumentedClient;

/// One DNS exchange against one upstream.
///
/// Implementations perform exactly one attempt and never retry; retrying and
/// time-bounding belong to the load balancer.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    async fn query(&self, request: &[u8]) -> Result<Message, DohError>;

    /// Identity of the upstream, used for logs and metric labels.
    fn endpoint(&self) -> &str;
}

#[async_trait]
impl<T: UpstreamClient + ?Sized> UpstreamClient for Arc<T> {
    async fn query(&self, request: &[u8]) -> Result<Message, DohError> {
        (**self).query(request).await
    }

    fn endpoint(&self) -> &str {
        (**self).endpoint()
    }
}
