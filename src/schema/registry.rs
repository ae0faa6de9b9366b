//! Registry of collection schemas.
//!
//! The registry is built once at startup and is read-only afterwards; the
//! client, database handles and index provisioning share it behind an `Arc`.

use super::collection::CollectionSchema;
use crate::error::{SchemaError, SchemaResult};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Predicate selecting which databases receive indexes.
pub type DatabaseFilter = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Registry-wide options.
#[derive(Clone, Default)]
pub struct SchemaOptions {
    /// When set, indexes are created in every listed database the predicate
    /// accepts instead of only the default database.
    pub filter_databases: Option<DatabaseFilter>,
}

impl SchemaOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_database_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.filter_databases = Some(Arc::new(filter));
        self
    }
}

impl fmt::Debug for SchemaOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaOptions")
            .field("filter_databases", &self.filter_databases.is_some())
            .finish()
    }
}

/// Collection name to schema mapping.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    collections: BTreeMap<String, Arc<CollectionSchema>>,
    options: SchemaOptions,
}

impl SchemaRegistry {
    /// Register collection schemas under their names.
    pub fn new<I, K>(collections: I, options: SchemaOptions) -> SchemaResult<Self>
    where
        I: IntoIterator<Item = (K, CollectionSchema)>,
        K: Into<String>,
    {
        let mut registered = BTreeMap::new();
        for (name, schema) in collections {
            let name = name.into();
            if registered.contains_key(&name) {
                return Err(SchemaError::DuplicateCollection { name });
            }
            registered.insert(name, Arc::new(schema));
        }

        Ok(Self {
            collections: registered,
            options,
        })
    }

    /// All registered collections.
    pub fn schema(&self) -> &BTreeMap<String, Arc<CollectionSchema>> {
        &self.collections
    }

    pub fn get_schema(&self, name: &str) -> Option<Arc<CollectionSchema>> {
        self.collections.get(name).cloned()
    }

    pub fn collection_names(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }

    pub fn options(&self) -> &SchemaOptions {
        &self.options
    }
}
