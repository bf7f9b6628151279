//! Employee reconciler, §4.6.2. Hosted by both the Auth service (Mongo
//! replica) and the Employee service (MySQL replica) against the same
//! logic — only the store gateway differs.

use dealership_events::EmployeeEvent;
use dealership_store::EmployeeStore;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ReconcileError;
use crate::primitives::is_fresher;

/// Cheap `email_taken` probe first, since the common case is no conflict at
/// all; only fetch the full record (needed to compare timestamps and to know
/// whose id to steal from) once the probe says the email is occupied.
async fn conflicting_live_email(
    store: &dyn EmployeeStore,
    email: &str,
    excluding_id: Uuid,
) -> Result<Option<EmployeeEvent>, ReconcileError> {
    if !store.email_taken(email, excluding_id).await? {
        return Ok(None);
    }
    Ok(store
        .get_by_email(email)
        .await?
        .filter(|existing| existing.id != excluding_id))
}

pub async fn create(store: &dyn EmployeeStore, event: EmployeeEvent) -> Result<(), ReconcileError> {
    if let Some(conflict) = conflicting_live_email(store, &event.email, event.id).await? {
        warn!(email = %event.email, "employee create: email already claimed by a different id");
        if is_fresher(event.created_at, conflict.updated_at) {
            info!(old_id = %conflict.id, new_id = %event.id, "stealing email from a staler record");
            store.delete(conflict.id).await?;
            store.upsert(&event).await?;
            return Ok(());
        }
        warn!(id = %event.id, "not created: conflicting record is fresher");
        return Err(ReconcileError::UniqueFieldTaken {
            field: "email",
            value: event.email,
        });
    }

    match store.get_by_id(event.id).await? {
        Some(existing) if is_fresher(event.created_at, existing.updated_at) => {
            store.upsert(&event).await?;
        }
        Some(_) => {
            info!(id = %event.id, "employee create: duplicate or stale redelivery, no-op");
        }
        None => {
            store.upsert(&event).await?;
            info!(id = %event.id, "employee created");
        }
    }
    Ok(())
}

pub async fn update(store: &dyn EmployeeStore, event: EmployeeEvent) -> Result<(), ReconcileError> {
    if let Some(conflict) = conflicting_live_email(store, &event.email, event.id).await? {
        warn!(email = %event.email, "employee update: a different employee already has this email");
        if is_fresher(event.updated_at, conflict.updated_at) {
            info!(old_id = %conflict.id, new_id = %event.id, "stealing email from a staler record");
            store.delete(conflict.id).await?;
            store.upsert(&event).await?;
            return Ok(());
        }
        warn!(id = %event.id, "not updated: conflicting record is fresher");
        return Err(ReconcileError::UniqueFieldTaken {
            field: "email",
            value: event.email,
        });
    }

    let existing = store.get_by_id(event.id).await?;
    let Some(existing) = existing else {
        info!(id = %event.id, "employee update arrived before create; repairing via late update");
        store.upsert(&event).await?;
        return Ok(());
    };

    if is_fresher(event.updated_at, existing.updated_at) {
        // updates never resurrect a tombstone: is_deleted travels with the
        // stored record, not with the update payload.
        let applied = EmployeeEvent {
            is_deleted: existing.is_deleted,
            ..event
        };
        store.upsert(&applied).await?;
        info!(id = %applied.id, "employee updated");
    } else {
        info!(id = %event.id, "employee update: stale redelivery, no-op");
    }
    Ok(())
}

pub async fn delete(store: &dyn EmployeeStore, event: EmployeeEvent) -> Result<(), ReconcileError> {
    let existing = store.get_by_id(event.id).await?.ok_or_else(|| {
        warn!(id = %event.id, "employee delete arrived before create; will retry later");
        ReconcileError::NotFound {
            id: event.id.to_string(),
        }
    })?;

    if existing.is_deleted {
        if is_fresher(event.updated_at, existing.updated_at) {
            store.set_tombstone(event.id, event.updated_at).await?;
            info!(id = %event.id, "employee tombstone timestamp advanced by a fresher redelivery");
            return Ok(());
        }
        info!(id = %event.id, "employee already deleted, no-op");
        return Err(ReconcileError::AlreadyInDesiredState {
            reason: "employee already deleted",
        });
    }

    store.set_tombstone(event.id, event.updated_at).await?;
    info!(id = %event.id, "employee deleted");
    Ok(())
}

pub async fn undelete(store: &dyn EmployeeStore, event: EmployeeEvent) -> Result<(), ReconcileError> {
    if conflicting_live_email(store, &event.email, event.id)
        .await?
        .is_some()
    {
        warn!(email = %event.email, id = %event.id, "employee not undeleted: email claimed by a different live record");
        return Err(ReconcileError::UniqueFieldTaken {
            field: "email",
            value: event.email,
        });
    }

    let resolved = EmployeeEvent {
        is_deleted: false,
        ..event
    };

    match store.get_by_id(resolved.id).await? {
        None => {
            info!(id = %resolved.id, "employee undelete arrived before create; repairing via late delivery");
            store.upsert(&resolved).await?;
        }
        Some(existing) if !existing.is_deleted => {
            if is_fresher(resolved.updated_at, existing.updated_at) {
                store.upsert(&resolved).await?;
                info!(id = %resolved.id, "employee undelete redelivery advanced updated_at, no state change");
            } else {
                info!(id = %resolved.id, "employee already undeleted, no-op");
                return Err(ReconcileError::AlreadyInDesiredState {
                    reason: "employee already undeleted",
                });
            }
        }
        Some(_tombstoned) => {
            store.upsert(&resolved).await?;
            info!(id = %resolved.id, "employee undeleted");
        }
    }
    Ok(())
}
