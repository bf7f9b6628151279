//! Insurance reconciler, §4.6.3. Hosted by the Synch service. Only
//! `create`/`update` exist; uniqueness is on `name`.

use dealership_events::InsuranceEvent;
use dealership_store::InsuranceStore;
use tracing::{info, warn};

use crate::error::ReconcileError;
use crate::primitives::is_fresher;

pub async fn create(store: &dyn InsuranceStore, event: InsuranceEvent) -> Result<(), ReconcileError> {
    if store.name_taken(&event.name, event.id).await? {
        warn!(name = %event.name, id = %event.id, "insurance not created: name already claimed by a different id");
        return Err(ReconcileError::UniqueFieldTaken {
            field: "name",
            value: event.name,
        });
    }

    match store.get_by_id(event.id).await? {
        Some(existing) if is_fresher(event.created_at, existing.updated_at) => {
            store.upsert(&event).await?;
        }
        Some(_) => {
            info!(id = %event.id, "insurance create: stale redelivery, no-op");
        }
        None => {
            store.insert(&event).await?;
            info!(id = %event.id, "insurance created");
        }
    }
    Ok(())
}

pub async fn update(store: &dyn InsuranceStore, event: InsuranceEvent) -> Result<(), ReconcileError> {
    if store.name_taken(&event.name, event.id).await? {
        warn!(name = %event.name, id = %event.id, "insurance not updated: name already claimed by a different id");
        return Err(ReconcileError::UniqueFieldTaken {
            field: "name",
            value: event.name,
        });
    }

    match store.get_by_id(event.id).await? {
        None => {
            info!(id = %event.id, "insurance update arrived before create; repairing via late update");
            store.insert(&event).await?;
        }
        Some(existing) if is_fresher(event.updated_at, existing.updated_at) => {
            store.upsert(&event).await?;
            info!(id = %event.id, "insurance updated");
        }
        Some(_) => {
            info!(id = %event.id, "insurance update: stale redelivery, no-op");
        }
    }
    Ok(())
}
