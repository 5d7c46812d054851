//! Resource Services
//!
//! CRUD for the `/rest/api/{resource}` endpoints. Each call validates its
//! input, checks that the selected backend version offers the endpoint, maps
//! the canonical input to the backend shape, sends it through the
//! authenticated client and maps the reply back.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

use crate::core::{AuthenticatedClient, HttpMethod, HttpRequest, HttpTransport};
use crate::error::{create_error_from_response, DealershipError, ProtocolError};
use crate::mapping::{
    endpoints, mapping_for, numeric_id, DeleteSupport, EndpointSet, LookupStyle, RecordMapping,
    UpdateStyle,
};
use crate::types::{
    Account, AccountInput, Address, AddressInput, BackendVersion, Car, CarInput, Customer,
    CustomerInput, Gallerist, GalleristCar, GalleristCarInput, GalleristInput, Operation,
    ResourceKind, Sale, SaleInput,
};
use crate::validation::Validate;

/// A backend resource: its kind, canonical record and input types.
pub trait Resource: Send + Sync + 'static {
    const KIND: ResourceKind;
    type Record: DeserializeOwned + Send + 'static;
    type Input: Serialize + Validate + Send + Sync;
}

macro_rules! resource {
    ($(#[$doc:meta])* $name:ident, $kind:ident, $record:ty, $input:ty) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug)]
        pub struct $name;

        impl Resource for $name {
            const KIND: ResourceKind = ResourceKind::$kind;
            type Record = $record;
            type Input = $input;
        }
    };
}

resource!(/// Cars.
    Cars, Car, Car, CarInput);
resource!(/// Customers.
    Customers, Customer, Customer, CustomerInput);
resource!(/// Gallerists (dealers).
    Gallerists, Gallerist, Gallerist, GalleristInput);
resource!(/// Bank accounts.
    Accounts, Account, Account, AccountInput);
resource!(/// Addresses.
    Addresses, Address, Address, AddressInput);
resource!(/// Completed sales (`saled-car`).
    Sales, Sale, Sale, SaleInput);
resource!(/// Gallerist inventory (`gallerist-car`).
    Inventory, Inventory, GalleristCar, GalleristCarInput);

/// CRUD operations of one resource.
#[async_trait]
pub trait ResourceApi<R: Resource>: Send + Sync {
    /// All records.
    async fn get_all(&self) -> Result<Vec<R::Record>, DealershipError>;

    /// One record by id.
    async fn get_by_id(&self, id: &str) -> Result<R::Record, DealershipError>;

    /// Create a record.
    async fn create(&self, input: &R::Input) -> Result<R::Record, DealershipError>;

    /// Replace the record with `id`.
    async fn update(&self, id: &str, input: &R::Input) -> Result<R::Record, DealershipError>;

    /// Delete the record with `id`.
    async fn delete(&self, id: &str) -> Result<(), DealershipError>;
}

/// Resource service over the shared client.
pub struct ResourceService<T: HttpTransport, R: Resource> {
    client: Arc<AuthenticatedClient<T>>,
    _resource: PhantomData<fn() -> R>,
}

impl<T: HttpTransport, R: Resource> Clone for ResourceService<T, R> {
    fn clone(&self) -> Self {
        Self::new(self.client.clone())
    }
}

impl<T: HttpTransport, R: Resource> ResourceService<T, R> {
    pub fn new(client: Arc<AuthenticatedClient<T>>) -> Self {
        Self {
            client,
            _resource: PhantomData,
        }
    }

    /// Endpoints this resource has on the configured backend.
    pub fn capabilities(&self) -> EndpointSet {
        endpoints(R::KIND, self.version())
    }

    pub(crate) fn client(&self) -> &Arc<AuthenticatedClient<T>> {
        &self.client
    }

    fn version(&self) -> BackendVersion {
        self.client.config().backend_version
    }

    fn mapping(&self) -> &'static RecordMapping {
        mapping_for(R::KIND)
    }

    fn url(&self, suffix: &str) -> String {
        self.client.url(&format!("{}/{}", R::KIND.prefix(), suffix))
    }

    fn not_implemented(&self, operation: Operation) -> DealershipError {
        DealershipError::NotImplemented {
            resource: R::KIND,
            operation,
        }
    }

    fn decode(&self, raw: &Value) -> Result<R::Record, DealershipError> {
        Ok(self.mapping().decode(raw, self.version())?)
    }

    /// Validate `input` and map it to the backend body.
    fn backend_body(&self, input: &R::Input) -> Result<serde_json::Map<String, Value>, DealershipError> {
        input.validate()?;

        let canonical = serde_json::to_value(input).map_err(|e| ProtocolError::InvalidJson {
            message: e.to_string(),
        })?;
        match self.mapping().to_backend(&canonical, self.version())? {
            Value::Object(body) => Ok(body),
            _ => Err(ProtocolError::InvalidResponse {
                message: format!("{} body is not an object", R::KIND),
            }
            .into()),
        }
    }

    async fn list_raw(&self) -> Result<Vec<Value>, DealershipError> {
        let request = HttpRequest::new(HttpMethod::Get, self.url("list"));
        let payload: Option<Vec<Value>> = self.client.fetch(request).await?;
        Ok(payload.unwrap_or_default())
    }

    async fn send_record(&self, request: HttpRequest) -> Result<R::Record, DealershipError> {
        let payload: Value = self.client.fetch(request).await?;
        self.decode(&payload)
    }
}

#[async_trait]
impl<T: HttpTransport, R: Resource> ResourceApi<R> for ResourceService<T, R> {
    async fn get_all(&self) -> Result<Vec<R::Record>, DealershipError> {
        let items = self.list_raw().await?;
        debug!(resource = %R::KIND, count = items.len(), "Fetched list");
        items.iter().map(|raw| self.decode(raw)).collect()
    }

    async fn get_by_id(&self, id: &str) -> Result<R::Record, DealershipError> {
        if self.capabilities().lookup == LookupStyle::Unsupported {
            return Err(self.not_implemented(Operation::GetById));
        }

        let version = self.version();
        for raw in self.list_raw().await? {
            let canonical = self.mapping().to_canonical(&raw, version)?;
            if canonical.get("id").and_then(Value::as_str) == Some(id) {
                return serde_json::from_value(canonical).map_err(|e| {
                    DealershipError::from(ProtocolError::UnexpectedShape {
                        resource: R::KIND.segment().to_string(),
                        message: e.to_string(),
                    })
                });
            }
        }

        Err(DealershipError::NotFound {
            resource: R::KIND,
            id: id.to_string(),
        })
    }

    async fn create(&self, input: &R::Input) -> Result<R::Record, DealershipError> {
        let body = self.backend_body(input)?;
        debug!(resource = %R::KIND, "Creating record");

        let request = HttpRequest::json(HttpMethod::Post, self.url("save"), &body)?;
        self.send_record(request).await
    }

    async fn update(&self, id: &str, input: &R::Input) -> Result<R::Record, DealershipError> {
        let record_id = numeric_id("id", id)?;
        let mut body = self.backend_body(input)?;
        debug!(resource = %R::KIND, id = record_id, "Updating record");

        let request = match self.capabilities().update {
            UpdateStyle::Put => HttpRequest::json(
                HttpMethod::Put,
                self.url(&format!("update/{}", record_id)),
                &body,
            )?,
            UpdateStyle::SaveWithId => {
                body.insert("id".to_string(), Value::from(record_id));
                HttpRequest::json(HttpMethod::Post, self.url("save"), &body)?
            }
        };
        self.send_record(request).await
    }

    async fn delete(&self, id: &str) -> Result<(), DealershipError> {
        if self.capabilities().delete == DeleteSupport::Unsupported {
            return Err(self.not_implemented(Operation::Delete));
        }

        let record_id = numeric_id("id", id)?;
        debug!(resource = %R::KIND, id = record_id, "Deleting record");

        let request = HttpRequest::new(
            HttpMethod::Delete,
            self.url(&format!("delete/{}", record_id)),
        );
        let response = self.client.execute(request).await?;
        if !response.is_success() {
            return Err(create_error_from_response(response.status, &response.body));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{HttpResponse, MockHttpTransport, RecordingNavigator};
    use crate::token::TokenStore;
    use crate::types::{CarStatus, ClientConfig, CurrencyType};
    use serde_json::json;

    fn service<R: Resource>(
        version: BackendVersion,
    ) -> (ResourceService<MockHttpTransport, R>, Arc<MockHttpTransport>) {
        let config = ClientConfig::builder()
            .base_url("http://dealer.test")
            .backend_version(version)
            .build()
            .unwrap();
        let transport = Arc::new(MockHttpTransport::new());
        let client = AuthenticatedClient::new(
            config,
            transport.clone(),
            Arc::new(TokenStore::in_memory()),
            Arc::new(RecordingNavigator::new()),
        );
        (ResourceService::new(Arc::new(client)), transport)
    }

    fn car_input() -> CarInput {
        CarInput {
            plate: "34 ABC 1234".to_string(),
            brand: "Toyota".to_string(),
            model: "Corolla".to_string(),
            production_year: 2020,
            price: 850_000.0,
            currency_type: CurrencyType::TL,
            damage_price: None,
            car_status_type: CarStatus::Salable,
        }
    }

    fn body_of(request: &HttpRequest) -> Value {
        serde_json::from_str(request.body.as_deref().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_get_all_maps_records() {
        let (cars, transport) = service::<Cars>(BackendVersion::V2);
        transport.queue_payload(json!([
            {"id": 1, "plaka": "34 ABC 1234", "brand": "Toyota", "model": "Corolla",
             "productionYear": 2020, "price": 850000, "carStatusType": "SALABLE"},
            {"id": 2, "plaka": "06 AB 12", "brand": "Fiat", "model": "Egea",
             "productionYear": 2021, "price": 500000, "carStatusType": "SALED"}
        ]));

        let all = cars.get_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].plate, "34 ABC 1234");
        assert_eq!(all[1].car_status_type, CarStatus::Sold);

        let request = transport.get_last_request().unwrap();
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.url, "http://dealer.test/rest/api/car/list");
    }

    #[tokio::test]
    async fn test_get_by_id_scans_list() {
        let (addresses, transport) = service::<Addresses>(BackendVersion::V2);
        let list = json!([
            {"id": 1, "city": "Izmir", "district": "Konak", "neighborhood": "Alsancak", "street": "Kibris"},
            {"id": 2, "city": "Istanbul", "district": "Kadikoy", "neighborhood": "Moda", "street": "Bahariye"}
        ]);
        transport.queue_payload(list.clone());
        transport.queue_payload(list);

        let found = addresses.get_by_id("2").await.unwrap();
        assert_eq!(found.city, "Istanbul");

        let missing = addresses.get_by_id("9").await.unwrap_err();
        assert!(matches!(missing, DealershipError::NotFound { resource: ResourceKind::Address, .. }));
    }

    #[tokio::test]
    async fn test_get_by_id_unsupported_for_accounts() {
        let (accounts, transport) = service::<Accounts>(BackendVersion::V2);

        let err = accounts.get_by_id("1").await.unwrap_err();
        assert!(matches!(
            err,
            DealershipError::NotImplemented {
                resource: ResourceKind::Account,
                operation: Operation::GetById
            }
        ));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_create_posts_backend_shape() {
        let (cars, transport) = service::<Cars>(BackendVersion::V2);
        transport.queue_payload(json!({
            "id": 7, "plaka": "34 ABC 1234", "brand": "Toyota", "model": "Corolla",
            "productionYear": 2020, "price": 850000.0, "currencyType": "TL", "carStatusType": "SALABLE"
        }));

        let car = cars.create(&car_input()).await.unwrap();
        assert_eq!(car.id, "7");

        let request = transport.get_last_request().unwrap();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.url, "http://dealer.test/rest/api/car/save");
        let body = body_of(&request);
        assert_eq!(body["plaka"], "34 ABC 1234");
        assert!(body.get("plate").is_none());
        assert!(body.get("damagePrice").is_none());
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_network() {
        let (cars, transport) = service::<Cars>(BackendVersion::V2);
        let input = CarInput {
            plate: String::new(),
            ..car_input()
        };

        let err = cars.create(&input).await.unwrap_err();
        match err {
            DealershipError::Validation(errors) => {
                assert_eq!(errors.get("plate").unwrap(), ["Plate is required"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_update_v2_uses_put() {
        let (customers, transport) = service::<Customers>(BackendVersion::V2);
        transport.queue_payload(json!({"id": 3, "firstName": "Ayse"}));

        let input = CustomerInput {
            first_name: "Ayse".to_string(),
            last_name: "Yilmaz".to_string(),
            tckn: "10000000146".to_string(),
            birth_date: "1990-01-01".to_string(),
            address_id: "2".to_string(),
            account_id: "5".to_string(),
        };
        customers.update("3", &input).await.unwrap();

        let request = transport.get_last_request().unwrap();
        assert_eq!(request.method, HttpMethod::Put);
        assert_eq!(request.url, "http://dealer.test/rest/api/customer/update/3");
        let body = body_of(&request);
        assert_eq!(body["addressId"], 2);
        assert_eq!(body["accountId"], 5);
        assert!(body.get("id").is_none());
    }

    #[tokio::test]
    async fn test_update_v1_saves_with_numeric_id() {
        let (sales, transport) = service::<Sales>(BackendVersion::V1);
        transport.queue_payload(json!({"id": 11}));

        let input = SaleInput {
            customer_id: "1".to_string(),
            gallerist_id: "2".to_string(),
            car_id: "3".to_string(),
        };
        let sale = sales.update("11", &input).await.unwrap();
        assert_eq!(sale.id, "11");

        let request = transport.get_last_request().unwrap();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.url, "http://dealer.test/rest/api/saled-car/save");
        assert_eq!(
            body_of(&request),
            json!({"customerId": 1, "galleristId": 2, "carId": 3, "id": 11})
        );
    }

    #[tokio::test]
    async fn test_update_rejects_non_numeric_id() {
        let (cars, transport) = service::<Cars>(BackendVersion::V2);
        let err = cars.update("abc", &car_input()).await.unwrap_err();
        assert!(matches!(err, DealershipError::Validation(_)));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_unsupported_on_v1_sales() {
        let (sales, transport) = service::<Sales>(BackendVersion::V1);

        let err = sales.delete("4").await.unwrap_err();
        assert!(matches!(
            err,
            DealershipError::NotImplemented {
                resource: ResourceKind::Sale,
                operation: Operation::Delete
            }
        ));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_sends_request() {
        let (inventory, transport) = service::<Inventory>(BackendVersion::V2);
        transport.queue_payload(json!("deleted"));

        inventory.delete("8").await.unwrap();
        let request = transport.get_last_request().unwrap();
        assert_eq!(request.method, HttpMethod::Delete);
        assert_eq!(request.url, "http://dealer.test/rest/api/gallerist-car/delete/8");
    }

    #[tokio::test]
    async fn test_backend_error_message_surfaces() {
        let (accounts, transport) = service::<Accounts>(BackendVersion::V2);
        transport.queue_response(HttpResponse::json(
            400,
            &json!({
                "status": 400,
                "exception": {
                    "path": "/rest/api/account/save",
                    "createTime": "2024-01-01",
                    "hostName": "api",
                    "message": {"iban": ["IBAN already exists"]}
                }
            }),
        ));

        let input = AccountInput {
            account_no: "1001".to_string(),
            iban: "TR330006100519786457841326".to_string(),
            amount: 10.0,
            currency_type: CurrencyType::TL,
        };
        let err = accounts.create(&input).await.unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert_eq!(
            crate::error::extract_error_message(&err, "failed"),
            "iban: IBAN already exists"
        );
    }
}
