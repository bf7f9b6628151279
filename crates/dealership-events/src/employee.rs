use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::timestamp::CanonicalTimestamp;

/// An employee's access level, encoded as its string value on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Manager,
    SalesPerson,
}

/// A single employee snapshot plus its two reconciliation timestamps.
///
/// This is the authoritative shape published by the Admin service and
/// replicated verbatim (subject to §4.6.2's reconciliation policy) onto the
/// Auth and Employee-service replicas.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeEvent {
    pub id: Uuid,
    pub email: String,
    pub hashed_password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub is_deleted: bool,
    pub created_at: CanonicalTimestamp,
    pub updated_at: CanonicalTimestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> EmployeeEvent {
        EmployeeEvent {
            id: Uuid::nil(),
            email: "a@x.test".into(),
            hashed_password: "hash".into(),
            first_name: "A".into(),
            last_name: "B".into(),
            role: Role::SalesPerson,
            is_deleted: false,
            created_at: CanonicalTimestamp::now(),
            updated_at: CanonicalTimestamp::now(),
        }
    }

    #[test]
    fn role_encodes_as_snake_case_string() {
        let json = serde_json::to_value(Role::SalesPerson).unwrap();
        assert_eq!(json, serde_json::json!("sales_person"));
    }

    #[test]
    fn round_trips_through_json() {
        let event = sample();
        let bytes = serde_json::to_vec(&event).unwrap();
        let decoded: EmployeeEvent = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(event, decoded);
    }
}
