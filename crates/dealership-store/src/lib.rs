//! Store gateways (C7) — the seam between reconcilers and the two
//! persistence technologies this core writes to. `dealership-reconcile`
//! depends only on the traits in this crate, never on `mysql`/`mongo`
//! directly, so reconciler logic can be tested against in-memory doubles.

pub mod mongo;
pub mod mysql;
mod traits;

pub use traits::{
    BrandLookup, BrandSnapshot, ColorLookup, ColorSnapshot, EmployeeStore, InsuranceStore,
    ModelStore, StoredModel,
};
