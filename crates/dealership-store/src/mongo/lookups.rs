use async_trait::async_trait;
use bson::doc;
use mongodb::{Collection, Database};
use uuid::Uuid;

use crate::traits::{BrandLookup, BrandSnapshot, ColorLookup, ColorSnapshot};

/// Read-only view over a pre-seeded `brands` collection (spec §9 scenario 6:
/// brand replication has no routing key in this core, so this side only
/// ever reads what an operator or another system placed there).
pub struct MongoBrandLookup {
    collection: Collection<BrandSnapshot>,
}

impl MongoBrandLookup {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("brands"),
        }
    }
}

#[async_trait]
impl BrandLookup for MongoBrandLookup {
    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<BrandSnapshot>> {
        Ok(self
            .collection
            .find_one(doc! { "id": id.to_string() }, None)
            .await?)
    }
}

/// Read-only view over a pre-seeded `colors` collection, symmetric to
/// [`MongoBrandLookup`].
pub struct MongoColorLookup {
    collection: Collection<ColorSnapshot>,
}

impl MongoColorLookup {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("colors"),
        }
    }
}

#[async_trait]
impl ColorLookup for MongoColorLookup {
    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<ColorSnapshot>> {
        Ok(self
            .collection
            .find_one(doc! { "id": id.to_string() }, None)
            .await?)
    }
}
