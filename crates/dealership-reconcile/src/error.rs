//! Reconciler error taxonomy (§7) and its mapping onto the consumer
//! runtime's disposition (§4.6.5).
//!
//! Reconcilers never return `anyhow::Error` for conditions the consumer
//! needs to branch on; store-level failures (connection loss, a gateway's
//! own I/O error) pass through as [`ReconcileError::StoreUnavailable`]
//! instead of leaking the underlying error type, so the consumer's match
//! arm stays exhaustive over this one enum.

use std::fmt;

/// How the consumer runtime must dispose of the delivery that produced a
/// given [`ReconcileError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disposition {
    /// Ack — the message will never be retried.
    Ack,
    /// Nack with requeue — a transient condition, try again later.
    NackRequeue,
    /// Reject without requeue — permanently malformed input.
    RejectNoRequeue,
}

#[derive(Debug)]
pub enum ReconcileError {
    /// A different live record already holds this unique field value.
    UniqueFieldTaken { field: &'static str, value: String },
    /// A referenced brand or color id is not present in the local replica.
    MissingForeignId { kind: &'static str, id: String },
    /// The record is already in the state the event asks for, and the
    /// event is not fresher than what is stored (already-deleted /
    /// already-undeleted).
    AlreadyInDesiredState { reason: &'static str },
    /// No record with this id exists yet (delete arrived before create).
    NotFound { id: String },
    /// A store gateway call failed.
    StoreUnavailable(anyhow::Error),
}

impl ReconcileError {
    /// Failure classification table, §4.6.5.
    pub fn disposition(&self) -> Disposition {
        match self {
            ReconcileError::UniqueFieldTaken { .. } => Disposition::NackRequeue,
            ReconcileError::MissingForeignId { .. } => Disposition::NackRequeue,
            ReconcileError::NotFound { .. } => Disposition::NackRequeue,
            ReconcileError::AlreadyInDesiredState { .. } => Disposition::Ack,
            ReconcileError::StoreUnavailable(_) => Disposition::NackRequeue,
        }
    }
}

impl fmt::Display for ReconcileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconcileError::UniqueFieldTaken { field, value } => {
                write!(f, "{field} {value:?} is already taken by a different live record")
            }
            ReconcileError::MissingForeignId { kind, id } => {
                write!(f, "referenced {kind} {id} is not yet present in the replica")
            }
            ReconcileError::AlreadyInDesiredState { reason } => write!(f, "{reason}"),
            ReconcileError::NotFound { id } => write!(f, "no record with id {id}"),
            ReconcileError::StoreUnavailable(e) => write!(f, "store unavailable: {e}"),
        }
    }
}

impl std::error::Error for ReconcileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReconcileError::StoreUnavailable(e) => e.source(),
            _ => None,
        }
    }
}

impl From<anyhow::Error> for ReconcileError {
    fn from(e: anyhow::Error) -> Self {
        ReconcileError::StoreUnavailable(e)
    }
}
