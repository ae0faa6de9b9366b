//! Schema definitions and validation for document collections.
//!
//! Fields are built with the functions in [`fields`], composed into objects
//! and collections, and collected in a [`SchemaRegistry`].
//!
//! # Key Types
//!
//! - [`Field`] - a validator with its modifier and index options
//! - [`CollectionSchema`] - root validator plus field index metadata
//! - [`SchemaRegistry`] - collection name to schema mapping
//!
//! # Examples
//!
//! ```rust
//! use mongrove::schema::{
//!     CollectionOptions, FieldOptions, SchemaOptions, SchemaRegistry, define_collection, fields,
//! };
//! use serde_json::json;
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
//! let registry = SchemaRegistry::new([("user", user)], SchemaOptions::default())?;
//! let schema = registry.get_schema("user").unwrap();
//! let document = schema.validate(&json!({ "email": "a@b.io" })).unwrap();
//! assert_eq!(document, json!({ "email": "a@b.io", "score": 0 }));
//! # Ok(())
//! # }
//! ```

pub mod collection;
pub mod fields;
pub mod modifier;
pub mod object;
pub mod registry;
pub mod strings;
pub mod types;
pub mod validator;


// Re-export the main types for convenience
pub use collection::{CollectionOptions, CollectionSchema, define_collection};
pub use modifier::{Modifier, ObjectOptions, is_valid_default_options};
pub use object::{ObjectValidator, ParseMode, nested_object};
pub use registry::{DatabaseFilter, SchemaOptions, SchemaRegistry};
pub use strings::{IpVersion, StringFormat};
pub use types::{DefaultValue, Field, FieldOptions, IndexOptions, ObjectId};
pub use validator::{Cardinality, Validator};
