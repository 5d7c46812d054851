//! Gallerist Types

use serde::{Deserialize, Serialize};

use crate::types::{Address, AddressInput};

/// Dealer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gallerist {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Fields accepted by create and update.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleristInput {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub address_id: Option<String>,
}

/// Gallerist together with a new address, created in one step.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleristWithAddressInput {
    pub first_name: String,
    pub last_name: String,
    pub address: AddressInput,
}
