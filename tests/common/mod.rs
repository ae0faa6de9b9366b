//! Common test utilities.
//!
//! Provides a recording store double implementing both collaborator traits,
//! schema fixtures and logging setup shared by the integration tests.

pub mod fixtures;

use mongrove::indexes::{IndexModel, IndexStore};
use mongrove::options::{FindOneAndModifyOptions, InsertOptions, ReplaceOptions, UpdateOptions};
use mongrove::store::{
    DocumentStore, InsertManyResult, InsertOneResult, Namespace, StoreError, UpdateResult,
};
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Initialize logging once for the test binary.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A call received by [`RecordingStore`].
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    InsertOne {
        namespace: Namespace,
        document: Value,
    },
    InsertMany {
        namespace: Namespace,
        documents: Vec<Value>,
    },
    ReplaceOne {
        namespace: Namespace,
        filter: Value,
        replacement: Value,
    },
    FindOneAndReplace {
        namespace: Namespace,
        filter: Value,
        replacement: Value,
    },
    UpdateOne {
        namespace: Namespace,
        filter: Value,
        update: Value,
    },
    UpdateMany {
        namespace: Namespace,
        filter: Value,
        update: Value,
    },
    FindOneAndUpdate {
        namespace: Namespace,
        filter: Value,
        update: Value,
    },
    DropIndex {
        namespace: Namespace,
        name: String,
    },
    CreateIndex {
        namespace: Namespace,
        index: IndexModel,
    },
}

/// Store double that records every call and answers with canned results.
///
/// A failure can be queued per operation name (`"insertOne"`, `"dropIndex"`,
/// ...); it is returned by every subsequent call of that operation.
#[derive(Debug, Default)]
pub struct RecordingStore {
    calls: Mutex<Vec<StoreCall>>,
    failures: Mutex<HashMap<&'static str, StoreError>>,
    databases: Vec<String>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_databases<I, S>(databases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            databases: databases.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub async fn fail(&self, operation: &'static str, error: StoreError) {
        self.failures.lock().await.insert(operation, error);
    }

    pub async fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }

    async fn record(&self, operation: &'static str, call: StoreCall) -> Result<(), StoreError> {
        if let Some(error) = self.failures.lock().await.get(operation) {
            return Err(error.clone());
        }
        self.calls.lock().await.push(call);
        Ok(())
    }
}

fn inserted_id(document: &Value) -> Value {
    document.get("_id").cloned().unwrap_or(Value::Null)
}

fn updated() -> UpdateResult {
    UpdateResult {
        matched_count: 1,
        modified_count: 1,
        upserted_id: None,
    }
}

impl DocumentStore for RecordingStore {
    async fn insert_one(
        &self,
        namespace: &Namespace,
        document: Value,
        _options: &InsertOptions,
    ) -> Result<InsertOneResult, StoreError> {
        let inserted_id = inserted_id(&document);
        self.record(
            "insertOne",
            StoreCall::InsertOne {
                namespace: namespace.clone(),
                document,
            },
        )
        .await?;
        Ok(InsertOneResult { inserted_id })
    }

    async fn insert_many(
        &self,
        namespace: &Namespace,
        documents: Vec<Value>,
        _options: &InsertOptions,
    ) -> Result<InsertManyResult, StoreError> {
        let inserted_ids = documents.iter().map(inserted_id).collect();
        self.record(
            "insertMany",
            StoreCall::InsertMany {
                namespace: namespace.clone(),
                documents,
            },
        )
        .await?;
        Ok(InsertManyResult { inserted_ids })
    }

    async fn replace_one(
        &self,
        namespace: &Namespace,
        filter: Value,
        replacement: Value,
        _options: &ReplaceOptions,
    ) -> Result<UpdateResult, StoreError> {
        self.record(
            "replaceOne",
            StoreCall::ReplaceOne {
                namespace: namespace.clone(),
                filter,
                replacement,
            },
        )
        .await?;
        Ok(updated())
    }

    async fn find_one_and_replace(
        &self,
        namespace: &Namespace,
        filter: Value,
        replacement: Value,
        _options: &FindOneAndModifyOptions,
    ) -> Result<Option<Value>, StoreError> {
        let returned = replacement.clone();
        self.record(
            "findOneAndReplace",
            StoreCall::FindOneAndReplace {
                namespace: namespace.clone(),
                filter,
                replacement,
            },
        )
        .await?;
        Ok(Some(returned))
    }

    async fn update_one(
        &self,
        namespace: &Namespace,
        filter: Value,
        update: Value,
        _options: &UpdateOptions,
    ) -> Result<UpdateResult, StoreError> {
        self.record(
            "updateOne",
            StoreCall::UpdateOne {
                namespace: namespace.clone(),
                filter,
                update,
            },
        )
        .await?;
        Ok(updated())
    }

    async fn update_many(
        &self,
        namespace: &Namespace,
        filter: Value,
        update: Value,
        _options: &UpdateOptions,
    ) -> Result<UpdateResult, StoreError> {
        self.record(
            "updateMany",
            StoreCall::UpdateMany {
                namespace: namespace.clone(),
                filter,
                update,
            },
        )
        .await?;
        Ok(updated())
    }

    async fn find_one_and_update(
        &self,
        namespace: &Namespace,
        filter: Value,
        update: Value,
        _options: &FindOneAndModifyOptions,
    ) -> Result<Option<Value>, StoreError> {
        self.record(
            "findOneAndUpdate",
            StoreCall::FindOneAndUpdate {
                namespace: namespace.clone(),
                filter,
                update,
            },
        )
        .await?;
        Ok(None)
    }
}

impl IndexStore for RecordingStore {
    async fn list_database_names(&self) -> Result<Vec<String>, StoreError> {
        if let Some(error) = self.failures.lock().await.get("listDatabases") {
            return Err(error.clone());
        }
        Ok(self.databases.clone())
    }

    async fn drop_index(&self, namespace: &Namespace, name: &str) -> Result<(), StoreError> {
        self.record(
            "dropIndex",
            StoreCall::DropIndex {
                namespace: namespace.clone(),
                name: name.to_string(),
            },
        )
        .await
    }

    async fn create_index(
        &self,
        namespace: &Namespace,
        index: &IndexModel,
    ) -> Result<String, StoreError> {
        self.record(
            "createIndex",
            StoreCall::CreateIndex {
                namespace: namespace.clone(),
                index: index.clone(),
            },
        )
        .await?;
        Ok(index.name.clone())
    }
}
