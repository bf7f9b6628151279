use async_trait::async_trait;
use bson::doc;
use dealership_events::InsuranceEvent;
use mongodb::{options::ReplaceOptions, Collection, Database};
use uuid::Uuid;

use crate::traits::InsuranceStore;

const COLLECTION: &str = "insurances";

/// Insurance replica backed by the Synch service's document store.
pub struct MongoInsuranceStore {
    collection: Collection<InsuranceEvent>,
}

impl MongoInsuranceStore {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(COLLECTION),
        }
    }
}

#[async_trait]
impl InsuranceStore for MongoInsuranceStore {
    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<InsuranceEvent>> {
        Ok(self
            .collection
            .find_one(doc! { "id": id.to_string() }, None)
            .await?)
    }

    async fn get_by_name(&self, name: &str) -> anyhow::Result<Option<InsuranceEvent>> {
        Ok(self.collection.find_one(doc! { "name": name }, None).await?)
    }

    async fn insert(&self, event: &InsuranceEvent) -> anyhow::Result<()> {
        self.collection.insert_one(event, None).await?;
        Ok(())
    }

    async fn upsert(&self, event: &InsuranceEvent) -> anyhow::Result<()> {
        let filter = doc! { "id": event.id.to_string() };
        let options = ReplaceOptions::builder().upsert(true).build();
        self.collection.replace_one(filter, event, options).await?;
        Ok(())
    }
}
