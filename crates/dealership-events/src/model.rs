use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::timestamp::CanonicalTimestamp;

/// A car model snapshot, published by the Employee service. `color_ids` may
/// be empty — a model with no colors yet assigned is a valid embed, not an
/// error; the reconciler only rejects a color id that does not resolve
/// against the replica's color lookup (`MissingForeignId`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelEvent {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub image_url: String,
    pub brand_id: Uuid,
    pub color_ids: BTreeSet<Uuid>,
    pub created_at: CanonicalTimestamp,
    pub updated_at: CanonicalTimestamp,
}
