//! Store gateway contracts (C7) — spec §4.7.
//!
//! Gateways expose only the write-set a reconciler needs; they carry no
//! business rules of their own (no freshness comparison, no uniqueness
//! policy — that lives in `dealership-reconcile`). Every method here is a
//! single-record operation: per spec §4.7 the reconciler is the only writer
//! for a given `(id, unique-field)` pair during the handling of one message,
//! so cross-record transactions are never required.

use async_trait::async_trait;
use dealership_events::{CanonicalTimestamp, EmployeeEvent, InsuranceEvent, ModelEvent};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Relational or document-store gateway for the employee replica, hosted by
/// both the Auth service (Mongo) and the Employee service (MySQL).
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<EmployeeEvent>>;
    async fn get_by_email(&self, email: &str) -> anyhow::Result<Option<EmployeeEvent>>;

    /// `true` if a *different* record (`id != excluding_id`) currently holds
    /// `email`, tombstoned or not (spec invariant 4: tombstones retain
    /// identity, so a tombstoned record's email still counts as occupied).
    async fn email_taken(&self, email: &str, excluding_id: Uuid) -> anyhow::Result<bool> {
        Ok(self
            .get_by_email(email)
            .await?
            .map(|existing| existing.id != excluding_id)
            .unwrap_or(false))
    }

    async fn insert(&self, event: &EmployeeEvent) -> anyhow::Result<()>;
    async fn upsert(&self, event: &EmployeeEvent) -> anyhow::Result<()>;
    async fn set_tombstone(&self, id: Uuid, at: CanonicalTimestamp) -> anyhow::Result<()>;
    async fn delete(&self, id: Uuid) -> anyhow::Result<()>;
}

/// Gateway for the insurance replica, hosted by the Synch service.
#[async_trait]
pub trait InsuranceStore: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<InsuranceEvent>>;
    async fn get_by_name(&self, name: &str) -> anyhow::Result<Option<InsuranceEvent>>;

    async fn name_taken(&self, name: &str, excluding_id: Uuid) -> anyhow::Result<bool> {
        Ok(self
            .get_by_name(name)
            .await?
            .map(|existing| existing.id != excluding_id)
            .unwrap_or(false))
    }

    async fn insert(&self, event: &InsuranceEvent) -> anyhow::Result<()>;
    async fn upsert(&self, event: &InsuranceEvent) -> anyhow::Result<()>;
}

/// Denormalized brand snapshot embedded into a stored model document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BrandSnapshot {
    pub id: Uuid,
    pub name: String,
}

/// Denormalized color snapshot embedded into a stored model document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorSnapshot {
    pub id: Uuid,
    pub name: String,
}

/// Read-only lookup for brands already present in the Synch replica. Brand
/// replication is out of this core's routing-key set (spec §3/§9 scenario
/// 6); the model reconciler only needs to ask "is it there yet".
#[async_trait]
pub trait BrandLookup: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<BrandSnapshot>>;
}

/// Read-only lookup for colors, symmetric to [`BrandLookup`].
#[async_trait]
pub trait ColorLookup: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<ColorSnapshot>>;
}

/// A model document as stored by the Synch replica: the event fields plus
/// the embedded brand/color snapshots captured at creation time (spec
/// §4.6.4 step 4).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredModel {
    pub event: ModelEvent,
    pub brand: BrandSnapshot,
    pub colors: Vec<ColorSnapshot>,
}

/// Gateway for the model replica, hosted by the Synch service.
#[async_trait]
pub trait ModelStore: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<StoredModel>>;
    async fn insert(&self, model: &StoredModel) -> anyhow::Result<()>;
}
