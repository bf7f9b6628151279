//! Publisher registry (C3), §4.3.
//!
//! One [`PublisherRegistry`] per producing exchange, built over a shared
//! [`BrokerClient`]. Each `publish_*` method encodes its event and publishes
//! to that exchange under the matching routing key. Publish is best-effort:
//! call it *after* the local commit has already succeeded; a publish
//! failure is logged, not propagated as a reason to roll back the commit,
//! since the record will still converge on the next mutation or an
//! operator re-publish.

use dealership_broker::BrokerClient;
use dealership_events::{encode, EmployeeEvent, InsuranceEvent, ModelEvent, RoutingKey};

pub struct PublisherRegistry {
    client: BrokerClient,
    exchange: &'static str,
}

impl PublisherRegistry {
    /// Build a registry bound to a single producing exchange. Intended to be
    /// constructed once per service process and held for its lifetime.
    pub fn new(client: BrokerClient, exchange: &'static str) -> Self {
        Self { client, exchange }
    }

    async fn publish<T: serde::Serialize>(&self, routing_key: RoutingKey, event: &T) {
        let bytes = encode(event);
        if let Err(err) = self
            .client
            .publish(self.exchange, routing_key.as_str(), &bytes)
            .await
        {
            tracing::error!(
                exchange = self.exchange,
                routing_key = routing_key.as_str(),
                error = %err,
                "best-effort publish failed; record will converge on next mutation"
            );
        }
    }

    pub async fn publish_employee_created(&self, event: &EmployeeEvent) {
        self.publish(RoutingKey::EmployeeCreate, event).await;
    }

    pub async fn publish_employee_updated(&self, event: &EmployeeEvent) {
        self.publish(RoutingKey::EmployeeUpdate, event).await;
    }

    pub async fn publish_employee_deleted(&self, event: &EmployeeEvent) {
        self.publish(RoutingKey::EmployeeDelete, event).await;
    }

    pub async fn publish_employee_undeleted(&self, event: &EmployeeEvent) {
        self.publish(RoutingKey::EmployeeUndelete, event).await;
    }

    pub async fn publish_insurance_created(&self, event: &InsuranceEvent) {
        self.publish(RoutingKey::InsuranceCreate, event).await;
    }

    pub async fn publish_insurance_updated(&self, event: &InsuranceEvent) {
        self.publish(RoutingKey::InsuranceUpdate, event).await;
    }

    pub async fn publish_model_created(&self, event: &ModelEvent) {
        self.publish(RoutingKey::ModelCreate, event).await;
    }

    pub fn into_client(self) -> BrokerClient {
        self.client
    }
}
