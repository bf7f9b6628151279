//! Short-lived publish path, §4.3's "handles may be... short-lived" option.
//! Opens a connection, publishes one event, and closes — the scoped
//! release costs a fresh connection per call but needs no process-wide
//! publisher state, which suits a one-off CLI or migration tool rather
//! than a service's hot write path.

use dealership_broker::{BrokerClient, BrokerConfig, BrokerError, ExchangeKind, RetryPolicy};
use dealership_events::encode;
use serde::Serialize;

pub async fn publish_once<T: Serialize>(
    config: BrokerConfig,
    retry: RetryPolicy,
    exchange: &str,
    routing_key: &str,
    event: &T,
) -> Result<(), BrokerError> {
    let client = BrokerClient::connect(config, retry).await?;
    client
        .declare_exchange(exchange, ExchangeKind::Fanout, true)
        .await?;

    let bytes = encode(event);
    let result = client.publish(exchange, routing_key, &bytes).await;

    client.close().await?;
    result
}
