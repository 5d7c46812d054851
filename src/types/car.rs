//! Car Types

use serde::{Deserialize, Serialize};

use crate::types::{CarStatus, CurrencyType};

/// Car as presented to callers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    pub id: String,
    pub plate: String,
    pub brand: String,
    pub model: String,
    pub production_year: i64,
    pub price: f64,
    pub currency_type: CurrencyType,
    #[serde(default)]
    pub damage_price: Option<f64>,
    pub car_status_type: CarStatus,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Fields accepted by create and update.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarInput {
    pub plate: String,
    pub brand: String,
    pub model: String,
    pub production_year: i64,
    pub price: f64,
    pub currency_type: CurrencyType,
    #[serde(default)]
    pub damage_price: Option<f64>,
    pub car_status_type: CarStatus,
}
