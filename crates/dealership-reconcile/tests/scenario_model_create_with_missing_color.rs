use std::collections::BTreeSet;

use dealership_events::{CanonicalTimestamp, ModelEvent};
use dealership_reconcile::{model_reconciler, Disposition};
use dealership_testkit::{InMemoryBrandLookup, InMemoryColorLookup, InMemoryModelStore};
use dealership_store::{BrandSnapshot, ColorSnapshot, ModelStore};
use uuid::Uuid;

fn model(brand_id: Uuid, color_ids: BTreeSet<Uuid>) -> ModelEvent {
    ModelEvent {
        id: Uuid::new_v4(),
        name: "Civic".into(),
        price: 25_000.0,
        image_url: "https://example.test/civic.png".into(),
        brand_id,
        color_ids,
        created_at: CanonicalTimestamp::now(),
        updated_at: CanonicalTimestamp::now(),
    }
}

#[tokio::test]
async fn model_create_requeues_when_color_not_yet_replicated() {
    let models = InMemoryModelStore::new();
    let brands = InMemoryBrandLookup::new();
    let colors = InMemoryColorLookup::new();

    let brand_id = Uuid::new_v4();
    brands.seed(BrandSnapshot {
        id: brand_id,
        name: "Honda".into(),
    });

    let missing_color_id = Uuid::new_v4();
    let event = model(brand_id, BTreeSet::from([missing_color_id]));

    let err = model_reconciler::create(&models, &brands, &colors, event)
        .await
        .unwrap_err();
    assert_eq!(err.disposition(), Disposition::NackRequeue);
    assert_eq!(models.len(), 0);
}

#[tokio::test]
async fn model_create_succeeds_once_brand_and_colors_are_present() {
    let models = InMemoryModelStore::new();
    let brands = InMemoryBrandLookup::new();
    let colors = InMemoryColorLookup::new();

    let brand_id = Uuid::new_v4();
    brands.seed(BrandSnapshot {
        id: brand_id,
        name: "Honda".into(),
    });
    let color_id = Uuid::new_v4();
    colors.seed(ColorSnapshot {
        id: color_id,
        name: "Red".into(),
    });

    let event = model(brand_id, BTreeSet::from([color_id]));
    let id = event.id;
    model_reconciler::create(&models, &brands, &colors, event)
        .await
        .unwrap();

    let stored = models.get_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.brand.name, "Honda");
    assert_eq!(stored.colors.len(), 1);
}

#[tokio::test]
async fn model_create_redelivery_is_a_no_op() {
    let models = InMemoryModelStore::new();
    let brands = InMemoryBrandLookup::new();
    let colors = InMemoryColorLookup::new();

    let brand_id = Uuid::new_v4();
    brands.seed(BrandSnapshot {
        id: brand_id,
        name: "Honda".into(),
    });
    let event = model(brand_id, BTreeSet::new());
    let duplicate = event.clone();

    model_reconciler::create(&models, &brands, &colors, event)
        .await
        .unwrap();
    model_reconciler::create(&models, &brands, &colors, duplicate)
        .await
        .unwrap();

    assert_eq!(models.len(), 1);
}
