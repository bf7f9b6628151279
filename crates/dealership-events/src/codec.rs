//! Canonical JSON codec (C1) — spec §4.1/§9.
//!
//! The source repository's publishers accept a grab-bag of shapes (string,
//! bytes, dict, Pydantic model, ORM entity) and branch on `isinstance` at
//! call time. The redesign collapses that to one sum type, [`Event`]; the
//! only function that needs to know about bytes is [`encode`]/[`decode`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::employee::EmployeeEvent;
use crate::insurance::InsuranceEvent;
use crate::model::ModelEvent;

/// A decoded domain event, tagged by which entity it carries.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Employee(EmployeeEvent),
    Insurance(InsuranceEvent),
    Model(ModelEvent),
}

/// Codec-level permanent error (spec §4.1, §7 `MalformedEvent`): a required
/// field was missing or ill-typed. The dispatcher treats this as
/// non-requeue.
#[derive(Debug)]
pub struct MalformedEvent {
    pub reason: String,
}

impl fmt::Display for MalformedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed event: {}", self.reason)
    }
}

impl std::error::Error for MalformedEvent {}

fn to_malformed(err: serde_json::Error) -> MalformedEvent {
    MalformedEvent {
        reason: err.to_string(),
    }
}

/// Encode a typed event to its canonical UTF-8 JSON wire form.
pub fn encode<T: Serialize>(event: &T) -> Vec<u8> {
    // Construction of `T` already went through the typed constructors in
    // `employee`/`insurance`/`model`, so serialization of a well-formed
    // value cannot fail.
    serde_json::to_vec(event).expect("canonical event types are always serializable")
}

/// Decode an [`EmployeeEvent`] from wire bytes.
pub fn decode_employee(bytes: &[u8]) -> Result<EmployeeEvent, MalformedEvent> {
    serde_json::from_slice(bytes).map_err(to_malformed)
}

/// Decode an [`InsuranceEvent`] from wire bytes.
pub fn decode_insurance(bytes: &[u8]) -> Result<InsuranceEvent, MalformedEvent> {
    serde_json::from_slice(bytes).map_err(to_malformed)
}

/// Decode a [`ModelEvent`] from wire bytes.
pub fn decode_model(bytes: &[u8]) -> Result<ModelEvent, MalformedEvent> {
    serde_json::from_slice(bytes).map_err(to_malformed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::employee::Role;
    use crate::timestamp::CanonicalTimestamp;
    use std::collections::BTreeSet;
    use uuid::Uuid;

    #[test]
    fn decode_then_encode_employee_is_stable() {
        let event = EmployeeEvent {
            id: Uuid::new_v4(),
            email: "a@x.test".into(),
            hashed_password: "hash".into(),
            first_name: "A".into(),
            last_name: "B".into(),
            role: Role::Manager,
            is_deleted: false,
            created_at: CanonicalTimestamp::now(),
            updated_at: CanonicalTimestamp::now(),
        };
        let bytes = encode(&event);
        let decoded = decode_employee(&bytes).unwrap();
        assert_eq!(event, decoded);
        let re_encoded = encode(&decoded);
        assert_eq!(bytes, re_encoded);
    }

    #[test]
    fn missing_required_field_is_malformed() {
        let bad = serde_json::json!({ "id": Uuid::new_v4().to_string() });
        let bytes = serde_json::to_vec(&bad).unwrap();
        let err = decode_employee(&bytes).unwrap_err();
        assert!(!err.reason.is_empty());
    }

    #[test]
    fn wrong_type_for_a_field_is_malformed() {
        let bad = serde_json::json!({
            "id": Uuid::new_v4().to_string(),
            "name": 12345, // should be a string
            "price": "not-a-number",
            "created_at": CanonicalTimestamp::now().to_string(),
            "updated_at": CanonicalTimestamp::now().to_string(),
        });
        let bytes = serde_json::to_vec(&bad).unwrap();
        assert!(decode_insurance(&bytes).is_err());
    }

    #[test]
    fn model_round_trips() {
        let event = ModelEvent {
            id: Uuid::new_v4(),
            name: "Civic".into(),
            price: 1.0,
            image_url: "https://x.test/a.png".into(),
            brand_id: Uuid::new_v4(),
            color_ids: BTreeSet::from([Uuid::new_v4()]),
            created_at: CanonicalTimestamp::now(),
            updated_at: CanonicalTimestamp::now(),
        };
        let bytes = encode(&event);
        assert_eq!(decode_model(&bytes).unwrap(), event);
    }
}
