//! Admin service entry point.
//!
//! The Admin service is authoritative for employees: it owns the
//! relational writes (out of scope here — no HTTP surface, spec §1) and
//! publishes an event after every commit. This binary's only job is to
//! stand up `admin_exchange` and hold a [`PublisherRegistry`] ready for the
//! (out-of-scope) business layer to call into, then idle until shutdown.

use dealership_broker::{BrokerClient, ExchangeKind, RetryPolicy};
use dealership_publish::{topology, PublisherRegistry};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dealership_config::load_dotenv();
    init_tracing();

    if let Err(err) = run().await {
        tracing::error!(error = %err, "admin service exited with a fatal error");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    let broker_config = dealership_config::broker_config_from_env();

    info!(host = %broker_config.host, "connecting to broker");
    let client = BrokerClient::connect(broker_config, RetryPolicy::default()).await?;

    client
        .declare_exchange(topology::ADMIN_EXCHANGE, ExchangeKind::Fanout, true)
        .await?;
    info!(exchange = topology::ADMIN_EXCHANGE, "exchange declared");

    let registry = PublisherRegistry::new(client, topology::ADMIN_EXCHANGE);
    info!("admin service ready");

    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received");

    registry.into_client().close().await?;
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}
