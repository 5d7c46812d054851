//! Bank Account Types

use serde::{Deserialize, Serialize};

use crate::types::CurrencyType;

/// Bank account.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub account_no: String,
    pub iban: String,
    pub amount: f64,
    pub currency_type: CurrencyType,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Fields accepted by create and update.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInput {
    pub account_no: String,
    pub iban: String,
    pub amount: f64,
    pub currency_type: CurrencyType,
}
