//! Common Types
//!
//! Enumerations shared by several resources.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend resource served under `/rest/api/{resource}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Car,
    Customer,
    Gallerist,
    Account,
    Address,
    /// Completed sale (`saled-car`).
    Sale,
    /// Gallerist inventory assignment (`gallerist-car`).
    Inventory,
}

impl ResourceKind {
    /// Path segment used by the backend.
    pub fn segment(&self) -> &'static str {
        match self {
            Self::Car => "car",
            Self::Customer => "customer",
            Self::Gallerist => "gallerist",
            Self::Account => "account",
            Self::Address => "address",
            Self::Sale => "saled-car",
            Self::Inventory => "gallerist-car",
        }
    }

    /// Path prefix, e.g. `/rest/api/car`.
    pub fn prefix(&self) -> String {
        format!("{}/{}", RESOURCE_PATH_PREFIX, self.segment())
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Car => "Car",
            Self::Customer => "Customer",
            Self::Gallerist => "Gallerist",
            Self::Account => "Account",
            Self::Address => "Address",
            Self::Sale => "Sale",
            Self::Inventory => "Inventory",
        };
        f.write_str(name)
    }
}

/// CRUD operation exposed by a resource API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    List,
    GetById,
    Create,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::List => "list",
            Self::GetById => "getById",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Currency of a price or balance.
///
/// The legacy backend spells lira `TRY`; the mapping layer translates, so
/// records and inputs only ever carry `TL`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurrencyType {
    TL,
    USD,
}

/// Sale status of a car.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CarStatus {
    Salable,
    #[serde(rename = "SALED", alias = "SOLD")]
    Sold,
}

/// Base path of every resource endpoint.
pub const RESOURCE_PATH_PREFIX: &str = "/rest/api";
