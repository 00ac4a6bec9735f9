pub mod errors;
pub mod logging;
pub mod metrics;
pub mod root;
pub mod server;
pub mod tls;
pub mod upstream;

pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use metrics::MetricsConfig;
pub use root::{CliOverrides, Config};
pub use server::ServerConfig;
pub use tls::TlsOptions;
pub use upstream::{UpstreamConfig, UpstreamPolicy, MAX_UPSTREAMS};
