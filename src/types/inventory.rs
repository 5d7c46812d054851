//! Inventory Types
//!
//! A car assigned to a gallerist's stock (`gallerist-car`).

use serde::{Deserialize, Serialize};

use crate::types::{Car, Gallerist};

/// Inventory assignment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleristCar {
    pub id: String,
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
pub struct GalleristCarInput {
    pub gallerist_id: String,
    pub car_id: String,
}
