//! Ferrous DoH Domain Layer
pub mod config;
pub mod errors;

pub use config::{
    CliOverrides, Config, ConfigError, LoggingConfig, MetricsConfig, ServerConfig, TlsOptions,
    UpstreamConfig, UpstreamPolicy, MAX_UPSTREAMS,
};
pub use errors::DohError;
