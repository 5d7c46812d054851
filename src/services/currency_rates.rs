//! Currency Rates Service
//!
//! USD buying rates for a date range, `GET /rest/api/currency-rates`.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::debug;
use url::Url;

use crate::core::{AuthenticatedClient, HttpMethod, HttpRequest, HttpTransport};
use crate::error::{ConfigurationError, DealershipError};
use crate::types::{
    BackendCurrencyRates, CurrencyRatesQuery, CurrencyRatesResponse, RESOURCE_PATH_PREFIX,
};
use crate::validation::ValidationErrors;

/// Currency rates operations.
#[async_trait]
pub trait CurrencyRatesService: Send + Sync {
    /// Rates for every day of `query`.
    async fn get_currency_rates(
        &self,
        query: &CurrencyRatesQuery,
    ) -> Result<CurrencyRatesResponse, DealershipError>;

    /// Today's rate. "Today" is the UTC calendar date.
    async fn get_current_rate(&self) -> Result<CurrencyRatesResponse, DealershipError>;
}

/// Currency rates service over the shared client.
pub struct CurrencyRatesServiceImpl<T: HttpTransport> {
    client: Arc<AuthenticatedClient<T>>,
}

impl<T: HttpTransport> CurrencyRatesServiceImpl<T> {
    pub fn new(client: Arc<AuthenticatedClient<T>>) -> Self {
        Self { client }
    }

    fn build_url(&self, query: &CurrencyRatesQuery) -> Result<String, DealershipError> {
        let base = self
            .client
            .url(&format!("{}/currency-rates", RESOURCE_PATH_PREFIX));
        let mut url =
            Url::parse(&base).map_err(|_| ConfigurationError::InvalidBaseUrl { url: base.clone() })?;
        url.query_pairs_mut().extend_pairs(query.to_params());
        Ok(url.to_string())
    }
}

#[async_trait]
impl<T: HttpTransport> CurrencyRatesService for CurrencyRatesServiceImpl<T> {
    async fn get_currency_rates(
        &self,
        query: &CurrencyRatesQuery,
    ) -> Result<CurrencyRatesResponse, DealershipError> {
        if query.start_date > query.end_date {
            return Err(ValidationErrors::single(
                "endDate",
                "End date must not be before start date",
            )
            .into());
        }

        let request = HttpRequest::new(HttpMethod::Get, self.build_url(query)?);
        let payload: BackendCurrencyRates = self.client.fetch(request).await?;
        debug!(count = payload.items.len(), "Fetched currency rates");
        Ok(payload.into())
    }

    async fn get_current_rate(&self) -> Result<CurrencyRatesResponse, DealershipError> {
        let today = Utc::now().date_naive();
        self.get_currency_rates(&CurrencyRatesQuery::on(today)).await
    }
}
