use thiserror::Error;

/// Failure of a single DNS-over-HTTPS exchange, or of a whole balanced query.
///
/// Every variant except [`DohError::NoUpstreams`] describes one attempt against
/// one endpoint. The load balancer surfaces only the error of the last attempt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DohError {
    #[error("Cannot build DoH request for {endpoint}: {reason}")]
    RequestConstruction { endpoint: String, reason: String },

    #[error("DoH exchange with {endpoint} failed: {reason}")]
    Network { endpoint: String, reason: String },

    #[error("DoH server {endpoint} returned HTTP {status}")]
    Protocol { endpoint: String, status: u16 },

    #[error("DoH response from {endpoint} exceeds {limit} bytes")]
    SizeLimit { endpoint: String, limit: usize },

    #[error("Invalid DNS message from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },

    #[error("No upstream attempt could be made")]
    NoUpstreams,
}

impl DohError {
    /// Endpoint URL the failed attempt was made against, if any.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Self::RequestConstruction { endpoint, .. }
            | Self::Network { endpoint, .. }
            | Self::Protocol { endpoint, .. }
            | Self::SizeLimit { endpoint, .. }
            | Self::Decode { endpoint, .. } => Some(endpoint),
            Self::NoUpstreams => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::RequestConstruction { .. } => "request",
            Self::Network { .. } => "network",
            Self::Protocol { .. } => "protocol",
            Self::SizeLimit { .. } => "size_limit",
            Self::Decode { .. } => "decode",
            Self::NoUpstreams => "no_upstreams",
        }
    }
}
