//! Model reconciler, §4.6.4. Hosted by the Synch service. Only `create` is
//! specified; a model embeds its brand and colors as denormalized
//! snapshots captured at insert time.

use dealership_events::ModelEvent;
use dealership_store::{BrandLookup, ColorLookup, ModelStore, StoredModel};
use tracing::{info, warn};

use crate::error::ReconcileError;

pub async fn create(
    model_store: &dyn ModelStore,
    brands: &dyn BrandLookup,
    colors: &dyn ColorLookup,
    event: ModelEvent,
) -> Result<(), ReconcileError> {
    if model_store.get_by_id(event.id).await?.is_some() {
        info!(id = %event.id, "model create: duplicate message, no-op");
        return Ok(());
    }

    let brand = brands.get_by_id(event.brand_id).await?.ok_or_else(|| {
        warn!(id = %event.id, brand_id = %event.brand_id, "model create requeued: brand not yet replicated");
        ReconcileError::MissingForeignId {
            kind: "brand",
            id: event.brand_id.to_string(),
        }
    })?;

    let mut color_snapshots = Vec::with_capacity(event.color_ids.len());
    for color_id in &event.color_ids {
        let color = colors.get_by_id(*color_id).await?.ok_or_else(|| {
            warn!(id = %event.id, color_id = %color_id, "model create requeued: color not yet replicated");
            ReconcileError::MissingForeignId {
                kind: "color",
                id: color_id.to_string(),
            }
        })?;
        color_snapshots.push(color);
    }

    let stored = StoredModel {
        event,
        brand,
        colors: color_snapshots,
    };
    model_store.insert(&stored).await?;
    info!(id = %stored.event.id, "model created");
    Ok(())
}
