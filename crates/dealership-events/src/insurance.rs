use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::timestamp::CanonicalTimestamp;

/// An insurance offering snapshot, published by the Employee service and
/// replicated onto the Synch service's customer-facing catalog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InsuranceEvent {
    pub id: Uuid,
    pub name: String,
    /// Always `> 0`; the codec does not enforce this — reconcilers and
    /// callers validate it at the boundary where it matters.
    pub price: f64,
    pub created_at: CanonicalTimestamp,
    pub updated_at: CanonicalTimestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_json() {
        let event = InsuranceEvent {
            id: Uuid::nil(),
            name: "Flat Tire".into(),
            price: 19.99,
            created_at: CanonicalTimestamp::now(),
            updated_at: CanonicalTimestamp::now(),
        };
        let bytes = serde_json::to_vec(&event).unwrap();
        let decoded: InsuranceEvent = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(event, decoded);
    }
}
