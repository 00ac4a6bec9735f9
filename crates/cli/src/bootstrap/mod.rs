use ferrous_doh_domain::{CliOverrides, Config};
use ferrous_doh_infrastructure::dns::LoadBalancer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn load_config(path: Option<&str>, overrides: CliOverrides) -> anyhow::Result<Config> {
    let config = Config::load(path, overrides)?;
    config.validate()?;
    Ok(config)
}

/// `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.as_str()));

    let registry = tracing_subscriber::registry().with(filter);

    if config.logging.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(false))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .init();
    }
}

pub fn init_metrics(config: &Config) -> anyhow::Result<()> {
    ferrous_doh_infrastructure::metrics::init(&config.metrics)?;
    if config.metrics.enabled {
        info!(listen = %config.metrics.listen, "Prometheus exporter listening");
    }
    Ok(())
}

pub fn build_balancer(config: &Config) -> anyhow::Result<LoadBalancer> {
    Ok(LoadBalancer::from_config(&config.upstream)?)
}
