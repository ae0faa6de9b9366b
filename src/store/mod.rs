//! Document store collaborator interface.
//!
//! The [`DocumentStore`] trait is the narrow set of write operations the
//! validating gateway delegates to once a payload has been validated. It
//! knows nothing about schemas: implementations wrap a real driver, or a
//! test double.
//!
//! # Example Implementation
//!
//! ```rust,no_run
//! use mongrove::store::{
//!     DocumentStore, InsertManyResult, InsertOneResult, Namespace, StoreError, UpdateResult,
//! };
//! use mongrove::options::{FindOneAndModifyOptions, InsertOptions, ReplaceOptions, UpdateOptions};
//! use serde_json::Value;
//!
//! struct Unavailable;
//!
//! impl DocumentStore for Unavailable {
//!     async fn insert_one(&self, _: &Namespace, _: Value, _: &InsertOptions) -> Result<InsertOneResult, StoreError> {
//!         Err(StoreError::other("offline"))
//!     }
//!     async fn insert_many(&self, _: &Namespace, _: Vec<Value>, _: &InsertOptions) -> Result<InsertManyResult, StoreError> {
//!         Err(StoreError::other("offline"))
//!     }
//!     async fn replace_one(&self, _: &Namespace, _: Value, _: Value, _: &ReplaceOptions) -> Result<UpdateResult, StoreError> {
//!         Err(StoreError::other("offline"))
//!     }
//!     async fn find_one_and_replace(&self, _: &Namespace, _: Value, _: Value, _: &FindOneAndModifyOptions) -> Result<Option<Value>, StoreError> {
//!         Err(StoreError::other("offline"))
//!     }
//!     async fn update_one(&self, _: &Namespace, _: Value, _: Value, _: &UpdateOptions) -> Result<UpdateResult, StoreError> {
//!         Err(StoreError::other("offline"))
//!     }
//!     async fn update_many(&self, _: &Namespace, _: Value, _: Value, _: &UpdateOptions) -> Result<UpdateResult, StoreError> {
//!         Err(StoreError::other("offline"))
//!     }
//!     async fn find_one_and_update(&self, _: &Namespace, _: Value, _: Value, _: &FindOneAndModifyOptions) -> Result<Option<Value>, StoreError> {
//!         Err(StoreError::other("offline"))
//!     }
//! }
//! ```

pub mod errors;

pub use errors::StoreError;

use crate::options::{FindOneAndModifyOptions, InsertOptions, ReplaceOptions, UpdateOptions};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::future::Future;

/// Database and collection a call is addressed to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace {
    database: String,
    collection: String,
}

impl Namespace {
    /// Address `collection` inside `database`.
    pub fn new(database: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            collection: collection.into(),
        }
    }

    /// Database name.
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Collection name.
    pub fn collection(&self) -> &str {
        &self.collection
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.database, self.collection)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOneResult {
    pub inserted_id: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertManyResult {
    pub inserted_ids: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_id: Option<Value>,
}

/// Write operations of a document store.
///
/// Every call is addressed by a [`Namespace`]. Payloads arrive already
/// validated (unless the caller disabled validation) and are passed through
/// unchanged.
pub trait DocumentStore: Send + Sync {
    fn insert_one(
        &self,
        namespace: &Namespace,
        document: Value,
        options: &InsertOptions,
    ) -> impl Future<Output = Result<InsertOneResult, StoreError>> + Send;

    fn insert_many(
        &self,
        namespace: &Namespace,
        documents: Vec<Value>,
        options: &InsertOptions,
    ) -> impl Future<Output = Result<InsertManyResult, StoreError>> + Send;

    fn replace_one(
        &self,
        namespace: &Namespace,
        filter: Value,
        replacement: Value,
        options: &ReplaceOptions,
    ) -> impl Future<Output = Result<UpdateResult, StoreError>> + Send;

    /// Returns the matched document before or after replacement, per
    /// `options.return_document`.
    fn find_one_and_replace(
        &self,
        namespace: &Namespace,
        filter: Value,
        replacement: Value,
        options: &FindOneAndModifyOptions,
    ) -> impl Future<Output = Result<Option<Value>, StoreError>> + Send;

    fn update_one(
        &self,
        namespace: &Namespace,
        filter: Value,
        update: Value,
        options: &UpdateOptions,
    ) -> impl Future<Output = Result<UpdateResult, StoreError>> + Send;

    fn update_many(
        &self,
        namespace: &Namespace,
        filter: Value,
        update: Value,
        options: &UpdateOptions,
    ) -> impl Future<Output = Result<UpdateResult, StoreError>> + Send;

    fn find_one_and_update(
        &self,
        namespace: &Namespace,
        filter: Value,
        update: Value,
        options: &FindOneAndModifyOptions,
    ) -> impl Future<Output = Result<Option<Value>, StoreError>> + Send;
}
