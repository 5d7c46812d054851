//! Token Management
//!
//! Persistent key-value storage and the cached token pair built on it.

pub mod storage;
pub mod store;

pub use storage::{
    FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore, MockKeyValueStore, StorageOp,
};
pub use store::{TokenStore, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
