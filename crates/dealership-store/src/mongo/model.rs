use async_trait::async_trait;
use bson::doc;
use mongodb::{Collection, Database};
use uuid::Uuid;

use crate::traits::{ModelStore, StoredModel};

const COLLECTION: &str = "models";

/// Model replica backed by the Synch service's document store. Create-only
/// (spec §4.6.4 has no update/delete path for models).
pub struct MongoModelStore {
    collection: Collection<StoredModel>,
}

impl MongoModelStore {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(COLLECTION),
        }
    }
}

#[async_trait]
impl ModelStore for MongoModelStore {
    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<StoredModel>> {
        Ok(self
            .collection
            .find_one(doc! { "event.id": id.to_string() }, None)
            .await?)
    }

    async fn insert(&self, model: &StoredModel) -> anyhow::Result<()> {
        self.collection.insert_one(model, None).await?;
        Ok(())
    }
}
