//! Database handle handing out validating collections.

use crate::collection::Collection;
use crate::error::{MongroveError, MongroveResult};
use crate::schema::SchemaRegistry;
use crate::store::{DocumentStore, Namespace};
use std::fmt;
use std::sync::Arc;

/// A named database bound to a store and the schema registry.
pub struct Database<S> {
    name: String,
    store: Arc<S>,
    registry: Arc<SchemaRegistry>,
}

impl<S> Clone for Database<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            store: Arc::clone(&self.store),
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<S> fmt::Debug for Database<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database").field("name", &self.name).finish()
    }
}

impl<S: DocumentStore> Database<S> {
    pub fn new(name: impl Into<String>, store: Arc<S>, registry: Arc<SchemaRegistry>) -> Self {
        Self {
            name: name.into(),
            store,
            registry,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Handle for a registered collection.
    ///
    /// Fails with an invalid-argument error when no schema is registered
    /// under `name`.
    pub fn collection(&self, name: &str) -> MongroveResult<Collection<S>> {
        let schema = self.registry.get_schema(name).ok_or_else(|| {
            MongroveError::invalid_argument(format!(
                "Collection '{}' is not defined in the schema",
                name
            ))
        })?;

        Ok(Collection::new(
            Arc::clone(&self.store),
            schema,
            Namespace::new(&self.name, name),
        ))
    }
}
