//! Sale Types
//!
//! A completed sale (`saled-car`).

use serde::{Deserialize, Serialize};

use crate::types::{Car, Customer, Gallerist};

/// Completed sale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    #[serde(default)]
    pub customer: Option<Customer>,
    #[serde(default)]
    pub gallerist: Option<Gallerist>,
    #[serde(default)]
    pub car: Option<Car>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Fields accepted by create and update.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleInput {
    pub customer_id: String,
    pub gallerist_id: String,
    pub car_id: String,
}
