//! Synch service entry point.
//!
//! Hosts the insurance and model reconcilers against the Synch document
//! store (spec §4.6.3/§4.6.4), consuming `employee_exchange`. Brand and
//! color lookups read a collection this core never writes to (spec §9
//! scenario 6) — they are populated by an operator or another system.

use std::sync::Arc;

use dealership_broker::{BrokerClient, ExchangeKind, RetryPolicy};
use dealership_config::MongoConfig;
use dealership_consume::Decoded;
use dealership_publish::topology;
use dealership_reconcile::{insurance_reconciler, model_reconciler};
use dealership_store::mongo::{self, MongoBrandLookup, MongoColorLookup, MongoInsuranceStore, MongoModelStore};
use dealership_store::{BrandLookup, ColorLookup, InsuranceStore, ModelStore};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dealership_config::load_dotenv();
    init_tracing();

    if let Err(err) = run().await {
        tracing::error!(error = %err, "synch service exited with a fatal error");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    let mongo_config = MongoConfig::from_env()?;
    info!(host = %mongo_config.host, "connecting to document store");
    let db = dealership_config::retry_connect(10, std::time::Duration::from_secs(5), || {
        mongo::connect(&mongo_config.uri_as_root(), &mongo_config.name)
    })
    .await?;

    let insurances: Arc<dyn InsuranceStore> = Arc::new(MongoInsuranceStore::new(&db));
    let models: Arc<dyn ModelStore> = Arc::new(MongoModelStore::new(&db));
    let brands: Arc<dyn BrandLookup> = Arc::new(MongoBrandLookup::new(&db));
    let colors: Arc<dyn ColorLookup> = Arc::new(MongoColorLookup::new(&db));

    let broker_config = dealership_config::broker_config_from_env();
    info!(host = %broker_config.host, "connecting to broker");
    let client = BrokerClient::connect(broker_config, RetryPolicy::default()).await?;

    client
        .declare_exchange(topology::EMPLOYEE_EXCHANGE, ExchangeKind::Fanout, true)
        .await?;
    client.declare_queue(topology::SYNCH_QUEUE, true).await?;
    client
        .bind(topology::SYNCH_QUEUE, topology::EMPLOYEE_EXCHANGE)
        .await?;
    info!(queue = topology::SYNCH_QUEUE, "queue declared and bound");

    info!("synch service consuming");
    dealership_consume::run(
        &client,
        topology::SYNCH_QUEUE,
        "synch-service",
        async {
            let _ = tokio::signal::ctrl_c().await;
        },
        |routing_key, decoded| {
            let insurances = Arc::clone(&insurances);
            let models = Arc::clone(&models);
            let brands = Arc::clone(&brands);
            let colors = Arc::clone(&colors);
            async move {
                use dealership_events::RoutingKey::*;
                match (routing_key, decoded) {
                    (InsuranceCreate, Decoded::Insurance(event)) => {
                        insurance_reconciler::create(insurances.as_ref(), event)
                            .await
                            .map_err(Into::into)
                    }
                    (InsuranceUpdate, Decoded::Insurance(event)) => {
                        insurance_reconciler::update(insurances.as_ref(), event)
                            .await
                            .map_err(Into::into)
                    }
                    (ModelCreate, Decoded::Model(event)) => {
                        model_reconciler::create(
                            models.as_ref(),
                            brands.as_ref(),
                            colors.as_ref(),
                            event,
                        )
                        .await
                        .map_err(Into::into)
                    }
                    (key, _) => unreachable!(
                        "synch queue only binds insurance.*/model.* routing keys, got {key}"
                    ),
                }
            }
        },
    )
    .await?;

    client.close().await?;
    info!("synch service shut down cleanly");
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}
