use async_trait::async_trait;
use bson::doc;
use dealership_events::{CanonicalTimestamp, EmployeeEvent};
use mongodb::{Collection, Database};
use uuid::Uuid;

use crate::traits::EmployeeStore;

const COLLECTION: &str = "employees";

/// Employee replica backed by the Auth service's document store.
pub struct MongoEmployeeStore {
    collection: Collection<EmployeeEvent>,
}

impl MongoEmployeeStore {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(COLLECTION),
        }
    }
}

#[async_trait]
impl EmployeeStore for MongoEmployeeStore {
    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<EmployeeEvent>> {
        Ok(self
            .collection
            .find_one(doc! { "id": id.to_string() }, None)
            .await?)
    }

    async fn get_by_email(&self, email: &str) -> anyhow::Result<Option<EmployeeEvent>> {
        Ok(self
            .collection
            .find_one(doc! { "email": email }, None)
            .await?)
    }

    async fn insert(&self, event: &EmployeeEvent) -> anyhow::Result<()> {
        self.collection.insert_one(event, None).await?;
        Ok(())
    }

    async fn upsert(&self, event: &EmployeeEvent) -> anyhow::Result<()> {
        let filter = doc! { "id": event.id.to_string() };
        let options = mongodb::options::ReplaceOptions::builder()
            .upsert(true)
            .build();
        self.collection.replace_one(filter, event, options).await?;
        Ok(())
    }

    async fn set_tombstone(&self, id: Uuid, at: CanonicalTimestamp) -> anyhow::Result<()> {
        self.collection
            .update_one(
                doc! { "id": id.to_string() },
                doc! { "$set": { "is_deleted": true, "updated_at": at.to_string() } },
                None,
            )
            .await?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<()> {
        self.collection
            .delete_one(doc! { "id": id.to_string() }, None)
            .await?;
        Ok(())
    }
}
