//! Deterministic in-memory store doubles, used to test reconciler and
//! service wiring without a live MySQL/Mongo instance.
//!
//! No randomness, no real I/O. Each double is a `Mutex<BTreeMap<..>>` —
//! contention is never a concern in a test.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use dealership_events::{CanonicalTimestamp, EmployeeEvent, InsuranceEvent};
use dealership_store::{
    BrandLookup, BrandSnapshot, ColorLookup, ColorSnapshot, EmployeeStore, InsuranceStore,
    ModelStore, StoredModel,
};
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryEmployeeStore {
    rows: Mutex<BTreeMap<Uuid, EmployeeEvent>>,
}

impl InMemoryEmployeeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl EmployeeStore for InMemoryEmployeeStore {
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
pub struct InMemoryInsuranceStore {
    rows: Mutex<BTreeMap<Uuid, InsuranceEvent>>,
}

impl InMemoryInsuranceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl InsuranceStore for InMemoryInsuranceStore {
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

#[derive(Default)]
pub struct InMemoryModelStore {
    rows: Mutex<BTreeMap<Uuid, StoredModel>>,
}

impl InMemoryModelStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl ModelStore for InMemoryModelStore {
    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<StoredModel>> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn insert(&self, model: &StoredModel) -> anyhow::Result<()> {
        self.rows
            .lock()
            .unwrap()
            .insert(model.event.id, model.clone());
        Ok(())
    }
}

/// Pre-seeded brand lookup — brand replication has no routing key in this
/// core (spec §9), so a test seeds brands directly.
#[derive(Default)]
pub struct InMemoryBrandLookup {
    rows: Mutex<BTreeMap<Uuid, BrandSnapshot>>,
}

impl InMemoryBrandLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, brand: BrandSnapshot) {
        self.rows.lock().unwrap().insert(brand.id, brand);
    }
}

#[async_trait]
impl BrandLookup for InMemoryBrandLookup {
    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<BrandSnapshot>> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }
}

/// Pre-seeded color lookup, symmetric to [`InMemoryBrandLookup`].
#[derive(Default)]
pub struct InMemoryColorLookup {
    rows: Mutex<BTreeMap<Uuid, ColorSnapshot>>,
}

impl InMemoryColorLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, color: ColorSnapshot) {
        self.rows.lock().unwrap().insert(color.id, color);
    }
}

#[async_trait]
impl ColorLookup for InMemoryColorLookup {
    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<ColorSnapshot>> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn employee_store_round_trips_a_row() {
        let store = InMemoryEmployeeStore::new();
        let event = EmployeeEvent {
            id: Uuid::new_v4(),
            email: "a@x.test".into(),
            hashed_password: "hash".into(),
            first_name: "A".into(),
            last_name: "B".into(),
            role: dealership_events::Role::Admin,
            is_deleted: false,
            created_at: CanonicalTimestamp::now(),
            updated_at: CanonicalTimestamp::now(),
        };
        store.insert(&event).await.unwrap();
        assert_eq!(store.get_by_id(event.id).await.unwrap(), Some(event));
    }

    #[tokio::test]
    async fn brand_lookup_only_returns_seeded_brands() {
        let lookup = InMemoryBrandLookup::new();
        let id = Uuid::new_v4();
        assert!(lookup.get_by_id(id).await.unwrap().is_none());
        lookup.seed(BrandSnapshot {
            id,
            name: "Honda".into(),
        });
        assert_eq!(
            lookup.get_by_id(id).await.unwrap().unwrap().name,
            "Honda"
        );
    }
}
