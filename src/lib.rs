//! Dealership Integration Module
//!
//! Authenticated REST client for the car dealership administration backend.
//!
//! # Features
//!
//! - Bearer token attachment on every call
//! - Single-flight token refresh on `401`, with queued callers replayed in order
//! - Token pair persisted through a pluggable key-value store
//! - CRUD for cars, customers, gallerists, accounts, addresses, inventory and sales
//! - Versioned backend field mapping (`V1` legacy, `V2` current)
//! - Client-side validation before any request is sent
//! - Currency rate lookup
//!
//! # Example
//!
//! ```rust,ignore
//! use dealership_integration::{client_config, AuthService, Credentials, DealershipClient, ResourceApi};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = client_config()
//!         .base_url("https://dealer.example.com")
//!         .token_file("/var/lib/dealer/tokens.json")
//!         .build()?;
//!
//!     let client = DealershipClient::new(config).await?;
//!     client.auth().login(&Credentials::new("admin", "secret")).await?;
//!
//!     for car in client.cars().get_all().await? {
//!         println!("{} {} {}", car.plate, car.brand, car.model);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `types`: configuration, envelopes and canonical records
//! - `error`: error hierarchy and backend error extraction
//! - `core`: HTTP transport, refresh session state, authenticated client
//! - `token`: key-value storage and the cached token pair
//! - `mapping`: backend field tables and endpoint capabilities per version
//! - `services`: auth, resource CRUD and currency rates
//! - `validation`: input schemas, identifier rules and normalisers
//! - `telemetry`: logging setup and client metrics
//! - `builders`: fluent configuration builder
//! - `client`: high-level client combining all of the above

pub mod builders;
pub mod client;
pub mod core;
pub mod error;
pub mod mapping;
pub mod services;
pub mod telemetry;
pub mod token;
pub mod types;
pub mod validation;

// Re-export main client
pub use client::{dealership_client, DealershipClient};

// Re-export builders
pub use builders::{client_config, ClientConfigBuilder};

// Re-export errors
pub use error::{
    create_error_from_response, extract_error_message, get_user_message, parse_error_response,
    ApiError, AuthError, ConfigurationError, DealershipError, NetworkError, ProtocolError,
    StorageError,
};

// Re-export types
pub use types::{
    // Config
    BackendVersion, ClientConfig,
    // Envelope
    ApiErrorResponse, ApiException, Envelope, ErrorMessage,
    // Auth
    AuthResponse, Credentials, RefreshResponse, User,
    // Common
    CarStatus, CurrencyType, Operation, ResourceKind,
    // Records
    Account, AccountInput, Address, AddressInput, Car, CarInput, Customer, CustomerInput,
    Gallerist, GalleristCar, GalleristCarInput, GalleristInput, GalleristWithAddressInput, Sale,
    SaleInput,
    // Currency rates
    CurrencyRateItem, CurrencyRatesQuery, CurrencyRatesResponse,
};

// Re-export core components
pub use core::{
    // Transport
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, MockHttpTransport,
    ReqwestHttpTransport,
    // Session
    AuthenticatedClient, AuthenticatedRequest, SessionState,
    // Navigation
    LoggingNavigator, LoginNavigator, RecordingNavigator,
};

// Re-export token management
pub use token::{
    FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore, MockKeyValueStore, TokenStore,
};

// Re-export services
pub use services::{
    Accounts, Addresses, AuthService, AuthServiceImpl, Cars, CurrencyRatesService,
    CurrencyRatesServiceImpl, Customers, Gallerists, Inventory, Resource, ResourceApi,
    ResourceService, Sales,
};

// Re-export validation
pub use validation::{Validate, ValidationErrors};

// Re-export telemetry
pub use telemetry::{
    create_in_memory_metrics, init_logging, no_op_metrics, ClientMetrics, InMemoryMetrics,
    LogConfig, LogFormat, LogLevel, NoOpMetrics,
};
