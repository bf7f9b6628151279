//! Routing key parsing — spec §3/§4.5/§9.
//!
//! The wire routing key is a dotted `<topic>.<action>` string and matching is
//! substring-based on the action suffix (the source repository checks
//! `"create" in routing_key`, not an exact split). `RoutingKey` is the sum
//! type the redesign calls for: parse once at the edge, then every
//! downstream `match` is exhaustive.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoutingKey {
    EmployeeCreate,
    EmployeeUpdate,
    EmployeeDelete,
    EmployeeUndelete,
    InsuranceCreate,
    InsuranceUpdate,
    ModelCreate,
}

impl RoutingKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoutingKey::EmployeeCreate => "employee.created",
            RoutingKey::EmployeeUpdate => "employee.updated",
            RoutingKey::EmployeeDelete => "employee.deleted",
            RoutingKey::EmployeeUndelete => "employee.undeleted",
            RoutingKey::InsuranceCreate => "insurance.created",
            RoutingKey::InsuranceUpdate => "insurance.updated",
            RoutingKey::ModelCreate => "model.created",
        }
    }
}

impl fmt::Display for RoutingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dispatch-level permanent error: unknown topic or unknown action suffix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownRouting {
    pub routing_key: String,
}

impl fmt::Display for UnknownRouting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown routing key: {}", self.routing_key)
    }
}

impl std::error::Error for UnknownRouting {}

/// Parse a raw routing key into a typed [`RoutingKey`].
///
/// Topic is matched by prefix (`employee`, `insurance`, `model`); action is
/// matched by substring (`create`, `update`, `delete`, `undelete`), exactly
/// as the source dispatcher does. Unknown topic or action is a permanent
/// [`UnknownRouting`] error (non-requeue, spec §4.6.5).
pub fn parse_routing_key(raw: &str) -> Result<RoutingKey, UnknownRouting> {
    let err = || UnknownRouting {
        routing_key: raw.to_string(),
    };

    if raw.starts_with("employee") {
        if raw.contains("undelete") {
            Ok(RoutingKey::EmployeeUndelete)
        } else if raw.contains("create") {
            Ok(RoutingKey::EmployeeCreate)
        } else if raw.contains("update") {
            Ok(RoutingKey::EmployeeUpdate)
        } else if raw.contains("delete") {
            Ok(RoutingKey::EmployeeDelete)
        } else {
            Err(err())
        }
    } else if raw.starts_with("insurance") {
        if raw.contains("create") {
            Ok(RoutingKey::InsuranceCreate)
        } else if raw.contains("update") {
            Ok(RoutingKey::InsuranceUpdate)
        } else {
            Err(err())
        }
    } else if raw.starts_with("model") {
        if raw.contains("create") {
            Ok(RoutingKey::ModelCreate)
        } else {
            Err(err())
        }
    } else {
        Err(err())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_canonical_key() {
        assert_eq!(parse_routing_key("employee.created"), Ok(RoutingKey::EmployeeCreate));
        assert_eq!(parse_routing_key("employee.updated"), Ok(RoutingKey::EmployeeUpdate));
        assert_eq!(parse_routing_key("employee.deleted"), Ok(RoutingKey::EmployeeDelete));
        assert_eq!(parse_routing_key("employee.undeleted"), Ok(RoutingKey::EmployeeUndelete));
        assert_eq!(parse_routing_key("insurance.created"), Ok(RoutingKey::InsuranceCreate));
        assert_eq!(parse_routing_key("insurance.updated"), Ok(RoutingKey::InsuranceUpdate));
        assert_eq!(parse_routing_key("model.created"), Ok(RoutingKey::ModelCreate));
    }

    #[test]
    fn undelete_checked_before_delete_substring() {
        // "undeleted" contains "delete" as a substring; undelete must win.
        assert_eq!(parse_routing_key("employee.undeleted"), Ok(RoutingKey::EmployeeUndelete));
    }

    #[test]
    fn rejects_unknown_topic_and_action() {
        assert!(parse_routing_key("accessory.created").is_err());
        assert!(parse_routing_key("employee.archived").is_err());
        assert!(parse_routing_key("model.updated").is_err());
    }
}
