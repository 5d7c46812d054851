//! Address Types

use serde::{Deserialize, Serialize};

/// Postal address.
///
/// `postal_code` is only carried by the legacy backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: String,
    pub city: String,
    pub district: String,
    pub neighborhood: String,
    pub street: String,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Fields accepted by create and update.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressInput {
    pub city: String,
    pub district: String,
    pub neighborhood: String,
    pub street: String,
    #[serde(default)]
    pub postal_code: Option<String>,
}
