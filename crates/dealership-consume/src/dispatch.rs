//! Dispatch & decoding (C5), §4.5.
//!
//! The dispatcher looks at the routing key's topic prefix to pick a typed
//! codec, and its action suffix to pick the operation; both come out of
//! [`parse_routing_key`] as one [`RoutingKey`] value so downstream code
//! never re-parses the raw string.

use dealership_events::{
    decode_employee, decode_insurance, decode_model, parse_routing_key, EmployeeEvent,
    InsuranceEvent, ModelEvent, RoutingKey,
};
use dealership_reconcile::{Disposition, ReconcileError};

/// A decoded event, still paired with the [`RoutingKey`] that selected its
/// type so the caller knows which action to apply.
#[derive(Clone, Debug, PartialEq)]
pub enum Decoded {
    Employee(EmployeeEvent),
    Insurance(InsuranceEvent),
    Model(ModelEvent),
}

/// Everything that can go wrong handling one delivery, collapsed to the one
/// enum the consumer runtime needs to pick a [`Disposition`] from.
#[derive(Debug)]
pub enum ConsumeError {
    /// Malformed JSON, unknown topic/action, or wrong field types —
    /// permanent, per §4.6.5.
    Malformed(String),
    Reconcile(ReconcileError),
}

impl ConsumeError {
    pub fn disposition(&self) -> Disposition {
        match self {
            ConsumeError::Malformed(_) => Disposition::RejectNoRequeue,
            ConsumeError::Reconcile(e) => e.disposition(),
        }
    }
}

impl std::fmt::Display for ConsumeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConsumeError::Malformed(reason) => write!(f, "malformed delivery: {reason}"),
            ConsumeError::Reconcile(e) => write!(f, "{e}"),
        }
    }
}

impl From<ReconcileError> for ConsumeError {
    fn from(e: ReconcileError) -> Self {
        ConsumeError::Reconcile(e)
    }
}

/// Parse the routing key and decode the body into its typed event.
/// Any failure here is permanent — reject without requeue.
pub fn decode(raw_routing_key: &str, body: &[u8]) -> Result<(RoutingKey, Decoded), ConsumeError> {
    let key = parse_routing_key(raw_routing_key).map_err(|e| ConsumeError::Malformed(e.to_string()))?;

    let decoded = match key {
        RoutingKey::EmployeeCreate
        | RoutingKey::EmployeeUpdate
        | RoutingKey::EmployeeDelete
        | RoutingKey::EmployeeUndelete => decode_employee(body)
            .map(Decoded::Employee)
            .map_err(|e| ConsumeError::Malformed(e.to_string()))?,
        RoutingKey::InsuranceCreate | RoutingKey::InsuranceUpdate => decode_insurance(body)
            .map(Decoded::Insurance)
            .map_err(|e| ConsumeError::Malformed(e.to_string()))?,
        RoutingKey::ModelCreate => decode_model(body)
            .map(Decoded::Model)
            .map_err(|e| ConsumeError::Malformed(e.to_string()))?,
    };

    Ok((key, decoded))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dealership_events::{encode, CanonicalTimestamp, Role};
    use uuid::Uuid;

    #[test]
    fn decodes_a_well_formed_employee_created_message() {
        let event = EmployeeEvent {
            id: Uuid::new_v4(),
            email: "a@x.test".into(),
            hashed_password: "hash".into(),
            first_name: "A".into(),
            last_name: "B".into(),
            role: Role::Admin,
            is_deleted: false,
            created_at: CanonicalTimestamp::now(),
            updated_at: CanonicalTimestamp::now(),
        };
        let bytes = encode(&event);
        let (key, decoded) = decode("employee.created", &bytes).unwrap();
        assert_eq!(key, RoutingKey::EmployeeCreate);
        assert_eq!(decoded, Decoded::Employee(event));
    }

    #[test]
    fn unknown_routing_key_is_malformed() {
        let err = decode("accessory.created", b"{}").unwrap_err();
        assert_eq!(err.disposition(), Disposition::RejectNoRequeue);
    }

    #[test]
    fn invalid_json_body_is_malformed() {
        let err = decode("employee.created", b"not json").unwrap_err();
        assert_eq!(err.disposition(), Disposition::RejectNoRequeue);
    }
}
