//! Broker error taxonomy — spec §7 `BrokerUnavailable` plus the two
//! declare-time fatal conditions called out in §4.2.

use std::fmt;

/// Errors surfaced by [`crate::client::BrokerClient`].
#[derive(Debug)]
pub enum BrokerError {
    /// `Connect()` exhausted its bounded retry attempts (spec §4.2).
    ConnectionExhausted { attempts: u32 },
    /// `DeclareExchange` found an existing exchange of the same name but a
    /// different kind. This is fatal and not retried.
    ExchangeKindMismatch {
        exchange: String,
        expected: &'static str,
        existing: String,
    },
    /// Any other AMQP-layer failure (spec §7 `BrokerUnavailable`), wrapped
    /// with the lapin error it originated from.
    Amqp(lapin::Error),
}

impl fmt::Display for BrokerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrokerError::ConnectionExhausted { attempts } => {
                write!(f, "broker connection exhausted after {attempts} attempts")
            }
            BrokerError::ExchangeKindMismatch {
                exchange,
                expected,
                existing,
            } => write!(
                f,
                "exchange '{exchange}' already declared as '{existing}', expected '{expected}'"
            ),
            BrokerError::Amqp(e) => write!(f, "broker error: {e}"),
        }
    }
}

impl std::error::Error for BrokerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BrokerError::Amqp(e) => Some(e),
            _ => None,
        }
    }
}

impl From<lapin::Error> for BrokerError {
    fn from(e: lapin::Error) -> Self {
        BrokerError::Amqp(e)
    }
}
