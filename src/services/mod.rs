//! Backend Services
//!
//! Authentication, resource CRUD and currency rates, each built on the shared
//! [`AuthenticatedClient`](crate::core::AuthenticatedClient).

pub mod auth;
pub mod currency_rates;
pub mod gallerists;
pub mod resource;

pub use auth::{AuthService, AuthServiceImpl, AUTHENTICATE_PATH, REGISTER_PATH};
pub use currency_rates::{CurrencyRatesService, CurrencyRatesServiceImpl};
pub use resource::{
    Accounts, Addresses, Cars, Customers, Gallerists, Inventory, Resource, ResourceApi,
    ResourceService, Sales,
};
