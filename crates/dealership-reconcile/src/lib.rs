//! Reconcilers (C6) — the heart of the core. Each reconciler converges a
//! replica's local state to match an incoming event, subject to the
//! uniqueness and tombstone invariants of the entity it handles. All three
//! share the comparison primitive in [`primitives`]; none contain any I/O
//! beyond the store gateway trait they are given.

mod employee;
mod error;
mod insurance;
mod model;
mod primitives;

pub use employee as employee_reconciler;
pub use error::{Disposition, ReconcileError};
pub use insurance as insurance_reconciler;
pub use model as model_reconciler;
pub use primitives::is_fresher;

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use dealership_events::{CanonicalTimestamp, EmployeeEvent, InsuranceEvent, Role};
    use dealership_store::EmployeeStore;
    use dealership_store::InsuranceStore;
    use uuid::Uuid;

    use super::*;

    /// In-memory employee replica double, BTreeMap-keyed by id, mirroring
    /// the shape of a paper trading broker double: deterministic, no I/O.
    #[derive(Default)]
    struct FakeEmployeeStore {
        rows: Mutex<BTreeMap<Uuid, EmployeeEvent>>,
    }

    #[async_trait]
    impl EmployeeStore for FakeEmployeeStore {
        async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<EmployeeEvent>> {
            Ok(self.rows.lock().unwrap().get(&id).cloned())
        }

        async fn get_by_email(&self, email: &str) -> anyhow::Result<Option<EmployeeEvent>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .values()
                .find(|e| e.email == email)
                .cloned())
        }

        async fn insert(&self, event: &EmployeeEvent) -> anyhow::Result<()> {
            self.rows.lock().unwrap().insert(event.id, event.clone());
            Ok(())
        }

        async fn upsert(&self, event: &EmployeeEvent) -> anyhow::Result<()> {
            self.rows.lock().unwrap().insert(event.id, event.clone());
            Ok(())
        }

        async fn set_tombstone(&self, id: Uuid, at: CanonicalTimestamp) -> anyhow::Result<()> {
            if let Some(row) = self.rows.lock().unwrap().get_mut(&id) {
                row.is_deleted = true;
                row.updated_at = at;
            }
            Ok(())
        }

        async fn delete(&self, id: Uuid) -> anyhow::Result<()> {
            self.rows.lock().unwrap().remove(&id);
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeInsuranceStore {
        rows: Mutex<BTreeMap<Uuid, InsuranceEvent>>,
    }

    #[async_trait]
    impl InsuranceStore for FakeInsuranceStore {
        async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<InsuranceEvent>> {
            Ok(self.rows.lock().unwrap().get(&id).cloned())
        }

        async fn get_by_name(&self, name: &str) -> anyhow::Result<Option<InsuranceEvent>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .values()
                .find(|e| e.name == name)
                .cloned())
        }

        async fn insert(&self, event: &InsuranceEvent) -> anyhow::Result<()> {
            self.rows.lock().unwrap().insert(event.id, event.clone());
            Ok(())
        }

        async fn upsert(&self, event: &InsuranceEvent) -> anyhow::Result<()> {
            self.rows.lock().unwrap().insert(event.id, event.clone());
            Ok(())
        }
    }

    fn ts(seconds: i64) -> CanonicalTimestamp {
        use chrono::{TimeZone, Utc};
        CanonicalTimestamp::truncate(Utc.timestamp_opt(1_700_000_000 + seconds, 0).unwrap())
    }

    fn employee(id: Uuid, email: &str, created: i64, updated: i64) -> EmployeeEvent {
        EmployeeEvent {
            id,
            email: email.into(),
            hashed_password: "hash".into(),
            first_name: "A".into(),
            last_name: "B".into(),
            role: Role::SalesPerson,
            is_deleted: false,
            created_at: ts(created),
            updated_at: ts(updated),
        }
    }

    #[tokio::test]
    async fn employee_create_is_idempotent_under_redelivery() {
        let store = FakeEmployeeStore::default();
        let id = Uuid::new_v4();
        let e = employee(id, "a@x.test", 0, 0);

        employee_reconciler::create(&store, e.clone()).await.unwrap();
        employee_reconciler::create(&store, e).await.unwrap();

        assert_eq!(store.rows.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn employee_create_rejects_email_taken_by_a_fresher_different_id() {
        let store = FakeEmployeeStore::default();
        let first = employee(Uuid::new_v4(), "shared@x.test", 10, 10);
        employee_reconciler::create(&store, first.clone()).await.unwrap();

        let second = employee(Uuid::new_v4(), "shared@x.test", 5, 5);
        let err = employee_reconciler::create(&store, second).await.unwrap_err();
        assert_eq!(err.disposition(), Disposition::NackRequeue);
    }

    #[tokio::test]
    async fn employee_create_steals_email_from_a_staler_record() {
        let store = FakeEmployeeStore::default();
        let stale = employee(Uuid::new_v4(), "shared@x.test", 1, 1);
        employee_reconciler::create(&store, stale.clone()).await.unwrap();

        let fresher = employee(Uuid::new_v4(), "shared@x.test", 99, 99);
        employee_reconciler::create(&store, fresher.clone()).await.unwrap();

        assert!(store.rows.lock().unwrap().get(&stale.id).is_none());
        assert_eq!(
            store.rows.lock().unwrap().get(&fresher.id).unwrap().email,
            "shared@x.test"
        );
    }

    #[tokio::test]
    async fn employee_update_before_create_repairs_via_late_update() {
        let store = FakeEmployeeStore::default();
        let id = Uuid::new_v4();
        let mut update_event = employee(id, "a@x.test", 0, 5);
        update_event.first_name = "Updated".into();

        employee_reconciler::update(&store, update_event).await.unwrap();

        let row = store.rows.lock().unwrap().get(&id).unwrap().clone();
        assert_eq!(row.first_name, "Updated");
    }

    #[tokio::test]
    async fn employee_update_does_not_resurrect_a_tombstone() {
        let store = FakeEmployeeStore::default();
        let id = Uuid::new_v4();
        let created = employee(id, "a@x.test", 0, 0);
        employee_reconciler::create(&store, created).await.unwrap();
        employee_reconciler::delete(&store, employee(id, "a@x.test", 0, 10))
            .await
            .unwrap();

        let mut stale_update = employee(id, "a@x.test", 0, 20);
        stale_update.first_name = "Changed".into();
        employee_reconciler::update(&store, stale_update).await.unwrap();

        let row = store.rows.lock().unwrap().get(&id).unwrap().clone();
        assert!(row.is_deleted);
        assert_eq!(row.first_name, "Changed");
    }

    #[tokio::test]
    async fn employee_delete_before_create_is_nack_requeue() {
        let store = FakeEmployeeStore::default();
        let err = employee_reconciler::delete(&store, employee(Uuid::new_v4(), "a@x.test", 0, 0))
            .await
            .unwrap_err();
        assert_eq!(err.disposition(), Disposition::NackRequeue);
    }

    #[tokio::test]
    async fn employee_delete_twice_is_ack_on_the_second_stale_delivery() {
        let store = FakeEmployeeStore::default();
        let id = Uuid::new_v4();
        employee_reconciler::create(&store, employee(id, "a@x.test", 0, 0))
            .await
            .unwrap();
        employee_reconciler::delete(&store, employee(id, "a@x.test", 0, 10))
            .await
            .unwrap();

        let err = employee_reconciler::delete(&store, employee(id, "a@x.test", 0, 1))
            .await
            .unwrap_err();
        assert_eq!(err.disposition(), Disposition::Ack);
    }

    #[tokio::test]
    async fn employee_undelete_repairs_through_late_delivery() {
        let store = FakeEmployeeStore::default();
        let id = Uuid::new_v4();
        employee_reconciler::create(&store, employee(id, "a@x.test", 0, 0))
            .await
            .unwrap();
        employee_reconciler::delete(&store, employee(id, "a@x.test", 0, 10))
            .await
            .unwrap();
        employee_reconciler::undelete(&store, employee(id, "a@x.test", 0, 20))
            .await
            .unwrap();

        let row = store.rows.lock().unwrap().get(&id).unwrap().clone();
        assert!(!row.is_deleted);
    }

    fn insurance(id: Uuid, name: &str, created: i64, updated: i64) -> InsuranceEvent {
        InsuranceEvent {
            id,
            name: name.into(),
            price: 100.0,
            created_at: ts(created),
            updated_at: ts(updated),
        }
    }

    #[tokio::test]
    async fn insurance_rename_conflict_retries_until_original_is_renamed_away() {
        let store = FakeInsuranceStore::default();
        let first = insurance(Uuid::new_v4(), "basic", 0, 0);
        let second = insurance(Uuid::new_v4(), "premium", 1, 1);
        insurance_reconciler::create(&store, first.clone()).await.unwrap();
        insurance_reconciler::create(&store, second).await.unwrap();

        let mut rename_to_taken = insurance(first.id, "premium", 0, 5);
        rename_to_taken.price = 120.0;
        let err = insurance_reconciler::update(&store, rename_to_taken)
            .await
            .unwrap_err();
        assert_eq!(err.disposition(), Disposition::NackRequeue);
    }
}
