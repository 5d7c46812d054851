//! Customer Types

use serde::{Deserialize, Serialize};

use crate::types::{Account, Address};

/// Customer with the address and account the backend embeds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    /// Turkish national identity number.
    pub tckn: String,
    pub birth_date: String,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub account: Option<Account>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Fields accepted by create and update. References are record ids.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInput {
    pub first_name: String,
    pub last_name: String,
    pub tckn: String,
    pub birth_date: String,
    pub address_id: String,
    pub account_id: String,
}
