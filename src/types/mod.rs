//! Dealership Types
//!
//! Configuration, wire envelopes and the canonical resource records.

pub mod account;
pub mod address;
pub mod auth;
pub mod car;
pub mod common;
pub mod config;
pub mod currency_rates;
pub mod customer;
pub mod envelope;
pub mod gallerist;
pub mod inventory;
pub mod sale;

pub use account::*;
pub use address::*;
pub use auth::*;
pub use car::*;
pub use common::*;
pub use config::*;
pub use currency_rates::*;
pub use customer::*;
pub use envelope::*;
pub use gallerist::*;
pub use inventory::*;
pub use sale::*;
