//! Client facade tying a store, the schema registry and the connection
//! monitor together.

use crate::connection::ConnectionMonitor;
use crate::database::Database;
use crate::error::MongroveResult;
use crate::indexes::{IndexProvisioner, IndexStore};
use crate::options::ClientOptions;
use crate::schema::SchemaRegistry;
use crate::store::DocumentStore;
use std::sync::Arc;

/// Entry point of the library.
///
/// ```rust,ignore
/// let client = MongroveClient::new(store, registry, ClientOptions::default());
/// client.create_indexes(false).await?;
/// let users = client.db(None).collection("user")?;
/// users.insert_one(json!({ "email": "a@b.io" }), None).await?;
/// ```
pub struct MongroveClient<S> {
    store: Arc<S>,
    registry: Arc<SchemaRegistry>,
    options: ClientOptions,
    monitor: Arc<ConnectionMonitor>,
}

impl<S> Clone for MongroveClient<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            registry: Arc::clone(&self.registry),
            options: self.options.clone(),
            monitor: Arc::clone(&self.monitor),
        }
    }
}

impl<S: DocumentStore> MongroveClient<S> {
    pub fn new(store: S, registry: SchemaRegistry, options: ClientOptions) -> Self {
        Self {
            store: Arc::new(store),
            registry: Arc::new(registry),
            options,
            monitor: Arc::new(ConnectionMonitor::new()),
        }
    }

    /// Handle for the named database, or the default database for `None`.
    pub fn db(&self, name: Option<&str>) -> Database<S> {
        let name = name.unwrap_or(&self.options.default_database);
        Database::new(name, Arc::clone(&self.store), Arc::clone(&self.registry))
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Connection state shared with whatever reports driver events.
    pub fn connection(&self) -> &Arc<ConnectionMonitor> {
        &self.monitor
    }
}

impl<S: DocumentStore + IndexStore> MongroveClient<S> {
    /// Create the indexes declared by every registered collection.
    pub async fn create_indexes(&self, recreate: bool) -> MongroveResult<()> {
        IndexProvisioner::new(
            self.store.as_ref(),
            &self.registry,
            &self.options.default_database,
        )
        .run(recreate)
        .await
    }
}
