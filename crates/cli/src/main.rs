use clap::{Parser, Subcommand};
use ferrous_doh_domain::{CliOverrides, UpstreamPolicy};
use hickory_proto::rr::RecordType;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

mod bootstrap;
mod commands;
mod server;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "ferrous-doh")]
#[command(version)]
#[command(about = "Ferrous DoH - load-balanced DNS-over-HTTPS forwarder")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// UDP listen address for `serve`
    #[arg(short = 'l', long)]
    listen: Option<String>,

    /// Upstream selection policy (random, round_robin, sequential)
    #[arg(short = 'p', long)]
    policy: Option<UpstreamPolicy>,

    /// Expose Prometheus metrics on this address
    #[arg(long, value_name = "ADDR")]
    metrics_listen: Option<SocketAddr>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a single name through the upstream pool
    Query {
        /// Domain name to look up
        name: String,

        /// Record type
        #[arg(short = 't', long = "type", default_value = "A")]
        record_type: RecordType,
    },

    /// Forward UDP DNS queries to the upstream pool (default)
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        listen: cli.listen.clone(),
        log_level: cli.log_level.clone(),
        metrics_listen: cli.metrics_listen,
        policy: cli.policy,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config);
    bootstrap::init_metrics(&config)?;

    let balancer = Arc::new(bootstrap::build_balancer(&config)?);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Query { name, record_type } => {
            commands::query::run(&balancer, &name, record_type).await?;
        }
        Command::Serve => {
            info!("Starting Ferrous DoH v{}", env!("CARGO_PKG_VERSION"));
            server::start_dns_server(&config.server.listen, balancer).await?;
            info!("Server shutdown complete");
        }
    }

    Ok(())
}
