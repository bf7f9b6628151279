//! Exchange and queue names, §3 Topology. One durable fanout exchange per
//! producing service; one durable queue per consuming service, bound to
//! whichever exchanges carry events it cares about.

/// Exchange the Admin service publishes employee events to.
pub const ADMIN_EXCHANGE: &str = "admin_exchange";
/// Exchange the Employee service publishes insurance/model events to.
pub const EMPLOYEE_EXCHANGE: &str = "employee_exchange";

/// Auth service's queue, bound to [`ADMIN_EXCHANGE`] (it replicates employees).
pub const AUTH_QUEUE: &str = "auth_microservice_queue";
/// Employee service's queue, bound to [`ADMIN_EXCHANGE`] (it also replicates
/// employees, for its own relational copy).
pub const EMPLOYEE_QUEUE: &str = "employee_microservice_queue";
/// Synch service's queue, bound to [`EMPLOYEE_EXCHANGE`] (it replicates
/// insurance and model records).
pub const SYNCH_QUEUE: &str = "synch_microservice_queue";
