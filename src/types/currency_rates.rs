//! Currency Rate Types
//!
//! USD buying rates published by the central bank, as relayed by the backend.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format of the query parameters.
pub const CURRENCY_DATE_FORMAT: &str = "%d-%m-%Y";

/// Inclusive date range to query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CurrencyRatesQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl CurrencyRatesQuery {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    /// Single-day range.
    pub fn on(date: NaiveDate) -> Self {
        Self::new(date, date)
    }

    /// Query parameters, dates as `DD-MM-YYYY`.
    pub fn to_params(&self) -> [(&'static str, String); 2] {
        [
            (
                "startDate",
                self.start_date.format(CURRENCY_DATE_FORMAT).to_string(),
            ),
            (
                "endDate",
                self.end_date.format(CURRENCY_DATE_FORMAT).to_string(),
            ),
        ]
    }
}

/// Rates for the requested range.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyRatesResponse {
    pub total_count: u64,
    pub items: Vec<CurrencyRateItem>,
}

/// Rate of one day. `usd` is absent on days without publication.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurrencyRateItem {
    pub date: String,
    pub usd: Option<String>,
}

/// Payload as sent by the backend.
#[derive(Clone, Debug, Deserialize)]
pub struct BackendCurrencyRates {
    #[serde(rename = "totalCount", default)]
    pub total_count: u64,
    #[serde(default)]
    pub items: Vec<BackendCurrencyRateItem>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct BackendCurrencyRateItem {
    #[serde(rename = "Tarih", default)]
    pub date: Option<String>,
    #[serde(rename = "TP_DK_USD_A", default)]
    pub usd: Option<serde_json::Value>,
}

impl From<BackendCurrencyRates> for CurrencyRatesResponse {
    fn from(backend: BackendCurrencyRates) -> Self {
        Self {
            total_count: backend.total_count,
            items: backend
                .items
                .into_iter()
                .map(|item| CurrencyRateItem {
                    date: item.date.unwrap_or_default(),
                    usd: match item.usd {
                        Some(serde_json::Value::String(s)) => Some(s),
                        Some(serde_json::Value::Null) | None => None,
                        Some(other) => Some(other.to_string()),
                    },
                })
                .collect(),
        }
    }
}
