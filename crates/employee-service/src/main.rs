//! Employee service entry point.
//!
//! The Employee service plays two roles in this core: it hosts an employee
//! reconciler against its own MySQL replica (spec §4.6.2, consuming
//! `admin_exchange`), and it is authoritative for insurance/model records,
//! publishing to `employee_exchange` (the business logic that decides
//! *when* to publish is out of scope here — no HTTP surface, spec §1 — so
//! this binary only makes sure the exchange exists for that future writer
//! and for the Synch service's consumer to bind against).

use std::sync::Arc;

use dealership_broker::{BrokerClient, ExchangeKind, RetryPolicy};
use dealership_config::MySqlConfig;
use dealership_consume::Decoded;
use dealership_publish::topology;
use dealership_reconcile::employee_reconciler;
use dealership_store::mysql::{self, MySqlEmployeeStore};
use dealership_store::EmployeeStore;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dealership_config::load_dotenv();
    init_tracing();

    if let Err(err) = run().await {
        tracing::error!(error = %err, "employee service exited with a fatal error");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    let mysql_config = MySqlConfig::from_env()?;
    info!(host = %mysql_config.host, "connecting to relational store");
    let pool = mysql::connect(&mysql_config.dsn_as_root()).await?;
    mysql::ensure_employee_table(&pool).await?;
    let store: Arc<dyn EmployeeStore> = Arc::new(MySqlEmployeeStore::new(pool));

    let broker_config = dealership_config::broker_config_from_env();
    info!(host = %broker_config.host, "connecting to broker");
    let client = BrokerClient::connect(broker_config, RetryPolicy::default()).await?;

    client
        .declare_exchange(topology::ADMIN_EXCHANGE, ExchangeKind::Fanout, true)
        .await?;
    client
        .declare_exchange(topology::EMPLOYEE_EXCHANGE, ExchangeKind::Fanout, true)
        .await?;
    client
        .declare_queue(topology::EMPLOYEE_QUEUE, true)
        .await?;
    client
        .bind(topology::EMPLOYEE_QUEUE, topology::ADMIN_EXCHANGE)
        .await?;
    info!(queue = topology::EMPLOYEE_QUEUE, "queue declared and bound");

    info!("employee service consuming");
    dealership_consume::run(
        &client,
        topology::EMPLOYEE_QUEUE,
        "employee-service",
        async {
            let _ = tokio::signal::ctrl_c().await;
        },
        |routing_key, decoded| {
            let store = Arc::clone(&store);
            async move {
                let Decoded::Employee(event) = decoded else {
                    unreachable!("employee queue received a non-employee decode");
                };
                use dealership_events::RoutingKey::*;
                match routing_key {
                    EmployeeCreate => employee_reconciler::create(store.as_ref(), event).await,
                    EmployeeUpdate => employee_reconciler::update(store.as_ref(), event).await,
                    EmployeeDelete => employee_reconciler::delete(store.as_ref(), event).await,
                    EmployeeUndelete => employee_reconciler::undelete(store.as_ref(), event).await,
                    _ => unreachable!("employee queue only binds employee.* routing keys"),
                }
                .map_err(Into::into)
            }
        },
    )
    .await?;

    client.close().await?;
    info!("employee service shut down cleanly");
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}
