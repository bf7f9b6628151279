//! MongoDB-backed store gateways, used by the Auth service's employee
//! replica and the Synch service's insurance/model replicas.
//!
//! Every document carries the entity's `Uuid` in a plain `id` field rather
//! than as Mongo's auto-assigned `_id` — the id is owned by the
//! authoritative service, not by the replica, so queries filter on `id`
//! instead of relying on the driver's own `_id` indexing.

mod employee;
mod insurance;
mod lookups;
mod model;

pub use employee::MongoEmployeeStore;
pub use insurance::MongoInsuranceStore;
pub use lookups::{MongoBrandLookup, MongoColorLookup};
pub use model::MongoModelStore;

use anyhow::{Context, Result};
use mongodb::{Client, Database};

/// Connect using the `MONGO_DB_*`-derived URI (spec §6.2) and return the
/// named database handle.
pub async fn connect(uri: &str, db_name: &str) -> Result<Database> {
    let client = Client::with_uri_str(uri)
        .await
        .context("failed to connect to the document store")?;
    Ok(client.database(db_name))
}
