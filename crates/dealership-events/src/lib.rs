//! Canonical event types and wire codec for the dealership event-propagation
//! core (spec C1).
//!
//! This crate has no I/O — it only knows how to represent and (de)serialize
//! the three replicated entity snapshots and how to parse a routing key. The
//! broker, publisher, consumer and reconciler crates build on top of it.

pub mod codec;
pub mod employee;
pub mod insurance;
pub mod model;
pub mod routing;
pub mod timestamp;

pub use codec::{decode_employee, decode_insurance, decode_model, encode, Event, MalformedEvent};
pub use employee::{EmployeeEvent, Role};
pub use insurance::InsuranceEvent;
pub use model::ModelEvent;
pub use routing::{parse_routing_key, RoutingKey, UnknownRouting};
pub use timestamp::CanonicalTimestamp;
