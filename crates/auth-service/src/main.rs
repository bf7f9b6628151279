//! Auth service entry point.
//!
//! Hosts the employee reconciler against a MongoDB replica (spec §4.6.2).
//! Startup order follows §4.4: store connection first, then broker
//! connection + declarations, then the consume loop.

use std::sync::Arc;
use std::time::Duration;

use dealership_broker::{BrokerClient, ExchangeKind, RetryPolicy};
use dealership_config::{retry_connect, MongoConfig};
use dealership_consume::Decoded;
use dealership_publish::topology;
use dealership_reconcile::employee_reconciler;
use dealership_store::mongo::{self, MongoEmployeeStore};
use dealership_store::EmployeeStore;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dealership_config::load_dotenv();
    init_tracing();

    if let Err(err) = run().await {
        tracing::error!(error = %err, "auth service exited with a fatal error");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    let mongo_config = MongoConfig::from_env()?;
    info!(host = %mongo_config.host, "connecting to document store");
    let db = retry_connect(10, Duration::from_secs(5), || {
        mongo::connect(&mongo_config.uri_as_root(), &mongo_config.name)
    })
    .await?;
    let store: Arc<dyn EmployeeStore> = Arc::new(MongoEmployeeStore::new(&db));

    let broker_config = dealership_config::broker_config_from_env();
    info!(host = %broker_config.host, "connecting to broker");
    let client = BrokerClient::connect(broker_config, RetryPolicy::default()).await?;

    client
        .declare_exchange(topology::ADMIN_EXCHANGE, ExchangeKind::Fanout, true)
        .await?;
    client
        .declare_queue(topology::AUTH_QUEUE, true)
        .await?;
    client
        .bind(topology::AUTH_QUEUE, topology::ADMIN_EXCHANGE)
        .await?;
    info!(queue = topology::AUTH_QUEUE, "queue declared and bound");

    info!("auth service consuming");
    dealership_consume::run(
        &client,
        topology::AUTH_QUEUE,
        "auth-service",
        async {
            let _ = tokio::signal::ctrl_c().await;
        },
        |routing_key, decoded| {
            let store = Arc::clone(&store);
            async move {
                let Decoded::Employee(event) = decoded else {
                    // dispatch only ever decodes an EmployeeEvent for an
                    // employee.* routing key; any other combination is a
                    // programming error in the dispatcher, not a runtime one.
                    unreachable!("employee queue received a non-employee decode");
                };
                use dealership_events::RoutingKey::*;
                match routing_key {
                    EmployeeCreate => employee_reconciler::create(store.as_ref(), event).await,
                    EmployeeUpdate => employee_reconciler::update(store.as_ref(), event).await,
                    EmployeeDelete => employee_reconciler::delete(store.as_ref(), event).await,
                    EmployeeUndelete => employee_reconciler::undelete(store.as_ref(), event).await,
                    _ => unreachable!("auth queue only binds employee.* routing keys"),
                }
                .map_err(Into::into)
            }
        },
    )
    .await?;

    client.close().await?;
    info!("auth service shut down cleanly");
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}
