//! Provisioning of the single-field indexes declared in collection schemas.
//!
//! Each field with an index specification becomes one ascending index named
//! `IDX_MG:<collection>:<field>`, created in every selected database.

use crate::error::{ErrorCode, MongroveError, MongroveResult};
use crate::schema::{IndexOptions, SchemaRegistry};
use crate::store::{Namespace, StoreError};
use log::{debug, info};
use serde_json::{Map, Value};
use std::future::Future;

/// Databases never selected for indexing.
const SYSTEM_DATABASES: [&str; 2] = ["admin", "local"];

/// A single-field ascending index to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexModel {
    pub field: String,
    pub name: String,
    pub options: IndexOptions,
}

impl IndexModel {
    pub fn new(collection: &str, field: &str, options: IndexOptions) -> Self {
        Self {
            field: field.to_string(),
            name: index_name(collection, field),
            options,
        }
    }

    /// Key document of the index (`{ <field>: 1 }`).
    pub fn keys(&self) -> Value {
        let mut keys = Map::new();
        keys.insert(self.field.clone(), Value::from(1));
        Value::Object(keys)
    }
}

/// Name given to the index on `field` of `collection`.
pub fn index_name(collection: &str, field: &str) -> String {
    format!("IDX_MG:{}:{}", collection, field)
}

/// Index management operations of the underlying store.
pub trait IndexStore: Send + Sync {
    fn list_database_names(&self) -> impl Future<Output = Result<Vec<String>, StoreError>> + Send;

    fn drop_index(
        &self,
        namespace: &Namespace,
        name: &str,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Returns the name of the created index.
    fn create_index(
        &self,
        namespace: &Namespace,
        index: &IndexModel,
    ) -> impl Future<Output = Result<String, StoreError>> + Send;
}

/// Creates the indexes of every registered collection.
pub struct IndexProvisioner<'a, S> {
    store: &'a S,
    registry: &'a SchemaRegistry,
    default_database: &'a str,
}

impl<'a, S: IndexStore> IndexProvisioner<'a, S> {
    pub fn new(store: &'a S, registry: &'a SchemaRegistry, default_database: &'a str) -> Self {
        Self {
            store,
            registry,
            default_database,
        }
    }

    /// Databases that receive indexes.
    ///
    /// With a database filter: every listed database except `admin` and
    /// `local` that the filter accepts. Without one: the default database.
    pub async fn select_databases(&self) -> Result<Vec<String>, StoreError> {
        let Some(filter) = &self.registry.options().filter_databases else {
            return Ok(vec![self.default_database.to_string()]);
        };

        let databases = self.store.list_database_names().await?;
        Ok(databases
            .into_iter()
            .filter(|name| !SYSTEM_DATABASES.contains(&name.as_str()))
            .filter(|name| filter(name.as_str()))
            .collect())
    }

    /// Create every declared index, dropping it first when `recreate` is set.
    ///
    /// Any failure other than a missing namespace while dropping aborts the
    /// run with a [`ErrorCode::CreateIndexesFailed`] error.
    pub async fn run(&self, recreate: bool) -> MongroveResult<()> {
        info!("[Mongrove Indexes] Starting creating indexes");

        match self.create_all(recreate).await {
            Ok(()) => {
                info!("[Mongrove Indexes] Successfully created indexes");
                Ok(())
            }
            Err(error) => {
                info!("[Mongrove Indexes] Failed to create indexes");
                Err(MongroveError::Common {
                    code: ErrorCode::CreateIndexesFailed,
                    message: error.to_string(),
                })
            }
        }
    }

    async fn create_all(&self, recreate: bool) -> Result<(), StoreError> {
        for database in self.select_databases().await? {
            info!("[Mongrove Indexes] Creating index for database: {}", database);
            for (collection, schema) in self.registry.schema() {
                info!("[Mongrove Indexes] Creating index for collection: {}", collection);
                let namespace = Namespace::new(&database, collection);
                for (field, options) in schema.field_indexes() {
                    let index = IndexModel::new(collection, field, options.clone());
                    self.create_one(&namespace, &index, recreate).await?;
                }
            }
        }
        Ok(())
    }

    async fn create_one(
        &self,
        namespace: &Namespace,
        index: &IndexModel,
        recreate: bool,
    ) -> Result<(), StoreError> {
        if recreate {
            match self.store.drop_index(namespace, &index.name).await {
                Ok(()) => debug!("Dropped index {} on {}", index.name, namespace),
                Err(error) if error.is_namespace_not_found() => info!(
                    "[Mongrove Indexes] Collection [{}] not exists, creating with index...",
                    namespace.collection()
                ),
                Err(error) => return Err(error),
            }
        }

        let created = self.store.create_index(namespace, index).await?;
        debug!("Created index {} on {}", created, namespace);
        Ok(())
    }
}
