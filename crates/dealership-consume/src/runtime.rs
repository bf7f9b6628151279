//! Consumer runtime (C4), §4.4/§5.
//!
//! One cooperative loop per bound queue: receive, decode, dispatch to the
//! caller's handler, then ack/nack-requeue/reject-no-requeue depending on
//! the outcome. Parallelism across messages from the same queue is
//! deliberately absent (§5) — the handler always runs to completion before
//! the next delivery is read.

use std::future::Future;

use dealership_broker::BrokerClient;
use dealership_reconcile::Disposition;
use futures_util::StreamExt;
use tracing::{info, warn};

use crate::dispatch::{decode, ConsumeError, Decoded};
use dealership_events::RoutingKey;

/// Run the consumer loop against `queue` until either the delivery stream
/// ends or `shutdown` resolves (spec §5: SIGINT/SIGTERM sets a shutdown
/// flag, the in-flight handler is allowed to finish, then the caller closes
/// the channel and connection).
///
/// `handle` is invoked with the parsed routing key and decoded event for
/// every well-formed delivery; its return value drives the disposition the
/// same way a [`ConsumeError`] from decoding would.
pub async fn run<F, Fut>(
    client: &BrokerClient,
    queue: &str,
    consumer_tag: &str,
    shutdown: impl Future<Output = ()>,
    mut handle: F,
) -> Result<(), dealership_broker::BrokerError>
where
    F: FnMut(RoutingKey, Decoded) -> Fut,
    Fut: Future<Output = Result<(), ConsumeError>>,
{
    let mut stream = client.consume(queue, consumer_tag).await?;
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!(queue, "shutdown signal received, stopping consumer loop");
                break;
            }
            next = stream.next() => {
                let Some(delivery) = next else {
                    info!(queue, "delivery stream ended");
                    break;
                };
                let delivery = match delivery {
                    Ok(d) => d,
                    Err(err) => {
                        warn!(queue, error = %err, "error reading delivery; dropping and continuing");
                        continue;
                    }
                };

                let outcome = match decode(&delivery.routing_key, &delivery.data) {
                    Ok((key, decoded)) => handle(key, decoded).await,
                    Err(err) => Err(err),
                };

                match outcome {
                    Ok(()) => {
                        delivery.acker.ack().await?;
                    }
                    Err(err) => {
                        warn!(
                            queue,
                            routing_key = %delivery.routing_key,
                            error = %err,
                            "handler reported failure"
                        );
                        match err.disposition() {
                            Disposition::Ack => delivery.acker.ack().await?,
                            Disposition::NackRequeue => delivery.acker.nack_requeue().await?,
                            Disposition::RejectNoRequeue => {
                                delivery.acker.reject_no_requeue().await?
                            }
                        }
                    }
                }
            }
        }
    }

    Ok(())
}
