//! Per-message acknowledger handle — spec §4.2 `Consume`.

use lapin::acker::Acker;
use lapin::options::{BasicAckOptions, BasicNackOptions, BasicRejectOptions};

use crate::error::BrokerError;

/// The three terminal dispositions a consumer callback can give a delivery
/// (spec §4.2, §4.4 state machine).
pub struct Acknowledger(Acker);

impl Acknowledger {
    pub(crate) fn new(acker: Acker) -> Self {
        Self(acker)
    }

    /// Successful apply — the message will not be redelivered.
    pub async fn ack(&self) -> Result<(), BrokerError> {
        self.0
            .ack(BasicAckOptions::default())
            .await
            .map_err(BrokerError::from)
    }

    /// Transient failure (ordering conflict, missing foreign id, store
    /// unavailable) — redeliver so upstream events can catch up.
    pub async fn nack_requeue(&self) -> Result<(), BrokerError> {
        self.0
            .nack(BasicNackOptions {
                requeue: true,
                ..BasicNackOptions::default()
            })
            .await
            .map_err(BrokerError::from)
    }

    /// Permanent failure (malformed payload, unknown routing, already in
    /// desired state) — drop the message without redelivery.
    pub async fn reject_no_requeue(&self) -> Result<(), BrokerError> {
        self.0
            .reject(BasicRejectOptions { requeue: false })
            .await
            .map_err(BrokerError::from)
    }
}
