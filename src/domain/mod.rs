//! Domain entities and the pure status/aggregation rules built on them.

pub mod client;
pub mod communication;
pub mod contract;
pub mod dashboard;
pub mod delinquency;
pub mod installment;
pub mod interaction;
pub mod invoice;
pub mod lot;
pub mod price_adjustment;
pub mod trigger;
pub mod types;
pub mod user;
