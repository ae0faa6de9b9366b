//! Schema-validated writes for MongoDB-style document stores.
//!
//! Declare a typed shape for each collection, derive a runtime validator
//! from it, and enforce that validator on every write before delegating to
//! the underlying store.
//!
//! # Core Components
//!
//! - [`schema::fields`] - field builders with mutually exclusive modifiers
//! - [`CollectionSchema`] - root validator plus single-field index metadata
//! - [`SchemaRegistry`] - collection name to schema mapping
//! - [`Collection`] - validating write gateway over a [`DocumentStore`]
//! - [`MongroveClient`] - facade with database handles and index provisioning
//!
//! # Quick Start
//!
//! ```rust
//! use mongrove::schema::{CollectionOptions, FieldOptions, define_collection, fields};
//! use mongrove::update::normalize_update;
//! use serde_json::{Value, json};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let user = define_collection(
//!     [
//!         ("email", fields::email(FieldOptions::new().unique())?),
//!         ("score", fields::number(FieldOptions::new().with_default(0))?),
//!     ],
//!     CollectionOptions::default(),
//! )?;
//!
//! // Inserts are validated in full, defaults filled in
//! assert!(user.validate(&json!({ "email": "a@b.io" })).is_ok());
//! assert!(user.validate(&json!({ "email": "not-an-email" })).is_err());
//!
//! // Updates are validated against the partial schema
//! let update = normalize_update(&json!({ "$inc": { "score": 5 } }));
//! assert!(user.validate_partial(&Value::Object(update)).is_ok());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod collection;
pub mod connection;
pub mod database;
pub mod error;
pub mod indexes;
pub mod options;
pub mod schema;
pub mod store;
pub mod update;

// Re-export commonly used types for convenience
pub use client::MongroveClient;
pub use collection::{Collection, WriteOperation};
pub use connection::{ConnectionEvent, ConnectionMonitor, ConnectionState};
pub use database::Database;
pub use error::{
    ErrorCode, MongroveError, MongroveResult, SchemaError, SchemaResult, ValidationError,
    ValidationIssue,
};
pub use indexes::{IndexModel, IndexProvisioner, IndexStore};
pub use options::{
    ClientOptions, FindOneAndModifyOptions, InsertOptions, ReplaceOptions, ReturnDocument,
    UpdateOptions,
};
pub use schema::{CollectionSchema, SchemaRegistry};
pub use store::{DocumentStore, Namespace, StoreError};
