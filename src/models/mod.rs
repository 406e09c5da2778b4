//! Database models shared across the loteamento repository.

pub mod client;
pub mod communication;
pub mod config;
pub mod contract;
pub mod delinquency;
pub mod interaction;
pub mod invoice;
pub mod lot;
pub mod price_adjustment;
pub mod trigger;
pub mod user;
