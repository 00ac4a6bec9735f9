use super::UpstreamClient;
use crate::dns::message::rcode_name;
use crate::metrics::{REQUESTS_TOTAL, REQUEST_DURATION_SECONDS, RESPONSES_TOTAL};
use async_trait::async_trait;
use ferrous_doh_domain::DohError;
use hickory_proto::op::Message;
use metrics::{counter, histogram};
use std::time::Instant;

/// Records request count, response code and latency of successful exchanges.
///
/// Failed exchanges are passed through untouched and leave no trace in the
/// counters.
pub struct InstrumentedClient<C> {
    inner: C,
}

impl<C: UpstreamClient> InstrumentedClient<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

#[async_trait]
impl<C: UpstreamClient> UpstreamClient for InstrumentedClient<C> {
    async fn query(&self, request: &[u8]) -> Result<Message, DohError> {
        let start = Instant::now();

        let message = self.inner.query(request).await?;

        let to = self.inner.endpoint().to_string();
        let rcode = rcode_name(message.response_code()).into_owned();

        counter!(REQUESTS_TOTAL, "to" => to.clone()).increment(1);
        counter!(RESPONSES_TOTAL, "rcode" => rcode, "to" => to.clone()).increment(1);
        histogram!(REQUEST_DURATION_SECONDS, "to" => to).record(start.elapsed().as_secs_f64());

        Ok(message)
    }

    fn endpoint(&self) -> &str {
        self.inner.endpoint()
    }
}
