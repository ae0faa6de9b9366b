//! Validating collection handle.
//!
//! A [`Collection`] wraps a [`DocumentStore`] and the collection's schema and
//! exposes only validated write operations. With validation enabled (the
//! default) a payload that fails its validator is rejected with a
//! [`ValidationError`] and the store is never called; a payload that passes
//! is forwarded in normalized form (defaults applied) for inserts and
//! replacements, and untouched for update expressions.

use crate::error::{
    ErrorCode, MongroveError, MongroveResult, ServerError, ValidationError, ValidationIssue,
};
use crate::options::{FindOneAndModifyOptions, InsertOptions, ReplaceOptions, UpdateOptions};
use crate::schema::CollectionSchema;
use crate::store::{
    DocumentStore, InsertManyResult, InsertOneResult, Namespace, StoreError, UpdateResult,
};
use crate::update::normalize_update;
use log::{debug, trace, warn};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Write operation exposed by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WriteOperation {
    InsertOne,
    InsertMany,
    ReplaceOne,
    FindOneAndReplace,
    UpdateOne,
    UpdateMany,
    FindOneAndUpdate,
}

impl WriteOperation {
    /// Driver-style operation name, e.g. `insertOne`.
    pub fn as_str(&self) -> &'static str {
        match self {
            WriteOperation::InsertOne => "insertOne",
            WriteOperation::InsertMany => "insertMany",
            WriteOperation::ReplaceOne => "replaceOne",
            WriteOperation::FindOneAndReplace => "findOneAndReplace",
            WriteOperation::UpdateOne => "updateOne",
            WriteOperation::UpdateMany => "updateMany",
            WriteOperation::FindOneAndUpdate => "findOneAndUpdate",
        }
    }

    /// Code attached to validation and server failures of this operation.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            WriteOperation::InsertOne | WriteOperation::InsertMany => ErrorCode::InsertFailed,
            WriteOperation::ReplaceOne | WriteOperation::FindOneAndReplace => {
                ErrorCode::ReplaceFailed
            }
            WriteOperation::UpdateOne
            | WriteOperation::UpdateMany
            | WriteOperation::FindOneAndUpdate => ErrorCode::UpdateFailed,
        }
    }
}

impl fmt::Display for WriteOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Collection handle enforcing its schema on every write.
pub struct Collection<S> {
    store: Arc<S>,
    schema: Arc<CollectionSchema>,
    namespace: Namespace,
}

impl<S> Clone for Collection<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            schema: Arc::clone(&self.schema),
            namespace: self.namespace.clone(),
        }
    }
}

impl<S> fmt::Debug for Collection<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("namespace", &self.namespace)
            .finish()
    }
}

impl<S: DocumentStore> Collection<S> {
    /// Bind `schema` to `namespace` on `store`.
    pub fn new(store: Arc<S>, schema: Arc<CollectionSchema>, namespace: Namespace) -> Self {
        Self {
            store,
            schema,
            namespace,
        }
    }

    /// Collection name.
    pub fn name(&self) -> &str {
        self.namespace.collection()
    }

    /// Database and collection this handle writes to.
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Schema every write is validated against.
    pub fn schema(&self) -> &CollectionSchema {
        &self.schema
    }

    /// Validate `document` and insert the normalized result.
    pub async fn insert_one(
        &self,
        document: Value,
        options: impl Into<Option<InsertOptions>>,
    ) -> MongroveResult<InsertOneResult> {
        let operation = WriteOperation::InsertOne;
        let options = options.into().unwrap_or_default();
        self.log_call(operation, options.validate);

        let document = if options.validate {
            self.checked(operation, self.schema.validate(&document))?
        } else {
            document
        };

        self.store
            .insert_one(&self.namespace, document, &options)
            .await
            .map_err(|e| self.translate(operation, e))
    }

    /// Validate every document and insert them all; nothing is written if any fails.
    pub async fn insert_many(
        &self,
        documents: Vec<Value>,
        options: impl Into<Option<InsertOptions>>,
    ) -> MongroveResult<InsertManyResult> {
        let operation = WriteOperation::InsertMany;
        let options = options.into().unwrap_or_default();
        self.log_call(operation, options.validate);

        let documents = if options.validate {
            self.checked(operation, self.schema.validate_many(&documents))?
        } else {
            documents
        };

        self.store
            .insert_many(&self.namespace, documents, &options)
            .await
            .map_err(|e| self.translate(operation, e))
    }

    /// Validate `replacement` and replace the first document matching `filter`.
    pub async fn replace_one(
        &self,
        filter: Value,
        replacement: Value,
        options: impl Into<Option<ReplaceOptions>>,
    ) -> MongroveResult<UpdateResult> {
        let operation = WriteOperation::ReplaceOne;
        let options = options.into().unwrap_or_default();
        self.log_call(operation, options.validate);

        let replacement = if options.validate {
            self.checked(operation, self.schema.validate(&replacement))?
        } else {
            replacement
        };

        self.store
            .replace_one(&self.namespace, filter, replacement, &options)
            .await
            .map_err(|e| self.translate(operation, e))
    }

    /// Validate `replacement`, replace the matched document and return one version of it.
    pub async fn find_one_and_replace(
        &self,
        filter: Value,
        replacement: Value,
        options: impl Into<Option<FindOneAndModifyOptions>>,
    ) -> MongroveResult<Option<Value>> {
        let operation = WriteOperation::FindOneAndReplace;
        let options = options.into().unwrap_or_default();
        self.log_call(operation, options.validate);

        let replacement = if options.validate {
            self.checked(operation, self.schema.validate(&replacement))?
        } else {
            replacement
        };

        self.store
            .find_one_and_replace(&self.namespace, filter, replacement, &options)
            .await
            .map_err(|e| self.translate(operation, e))
    }

    /// Validate the merged operators of `update` and apply it to one document.
    pub async fn update_one(
        &self,
        filter: Value,
        update: Value,
        options: impl Into<Option<UpdateOptions>>,
    ) -> MongroveResult<UpdateResult> {
        let operation = WriteOperation::UpdateOne;
        let options = options.into().unwrap_or_default();
        self.log_call(operation, options.validate);

        if options.validate {
            self.check_update(operation, &update)?;
        }

        self.store
            .update_one(&self.namespace, filter, update, &options)
            .await
            .map_err(|e| self.translate(operation, e))
    }

    /// Validate the merged operators of `update` and apply it to every match.
    pub async fn update_many(
        &self,
        filter: Value,
        update: Value,
        options: impl Into<Option<UpdateOptions>>,
    ) -> MongroveResult<UpdateResult> {
        let operation = WriteOperation::UpdateMany;
        let options = options.into().unwrap_or_default();
        self.log_call(operation, options.validate);

        if options.validate {
            self.check_update(operation, &update)?;
        }

        self.store
            .update_many(&self.namespace, filter, update, &options)
            .await
            .map_err(|e| self.translate(operation, e))
    }

    /// Validate `update`, apply it to the matched document and return one version of it.
    pub async fn find_one_and_update(
        &self,
        filter: Value,
        update: Value,
        options: impl Into<Option<FindOneAndModifyOptions>>,
    ) -> MongroveResult<Option<Value>> {
        let operation = WriteOperation::FindOneAndUpdate;
        let options = options.into().unwrap_or_default();
        self.log_call(operation, options.validate);

        if options.validate {
            self.check_update(operation, &update)?;
        }

        self.store
            .find_one_and_update(&self.namespace, filter, update, &options)
            .await
            .map_err(|e| self.translate(operation, e))
    }

    /// Serialize `document` and insert it.
    pub async fn insert_one_typed<T: Serialize>(
        &self,
        document: &T,
        options: impl Into<Option<InsertOptions>>,
    ) -> MongroveResult<InsertOneResult> {
        let document = serde_json::to_value(document)?;
        self.insert_one(document, options).await
    }

    /// Serialize `documents` and insert them.
    pub async fn insert_many_typed<T: Serialize>(
        &self,
        documents: &[T],
        options: impl Into<Option<InsertOptions>>,
    ) -> MongroveResult<InsertManyResult> {
        let documents = documents
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        self.insert_many(documents, options).await
    }

    /// Serialize `replacement` and replace the matched document with it.
    pub async fn replace_one_typed<T: Serialize>(
        &self,
        filter: Value,
        replacement: &T,
        options: impl Into<Option<ReplaceOptions>>,
    ) -> MongroveResult<UpdateResult> {
        let replacement = serde_json::to_value(replacement)?;
        self.replace_one(filter, replacement, options).await
    }

    fn log_call(&self, operation: WriteOperation, validate: bool) {
        debug!(
            "{} on '{}' (validate: {})",
            operation, self.namespace, validate
        );
    }

    fn check_update(&self, operation: WriteOperation, update: &Value) -> MongroveResult<()> {
        let merged = Value::Object(normalize_update(update));
        trace!("Normalized update for '{}': {}", self.namespace, merged);
        self.checked(operation, self.schema.validate_partial(&merged))
            .map(|_| ())
    }

    fn checked<T>(
        &self,
        operation: WriteOperation,
        result: Result<T, Vec<ValidationIssue>>,
    ) -> MongroveResult<T> {
        result.map_err(|issues| {
            let error = ValidationError::new(operation, self.name(), issues);
            warn!("Rejected {} on '{}': {}", operation, self.namespace, error);
            MongroveError::Validation(error)
        })
    }

    fn translate(&self, operation: WriteOperation, error: StoreError) -> MongroveError {
        debug!(
            "Store failure during {} on '{}': {}",
            operation, self.namespace, error
        );
        match error {
            StoreError::Server { .. } => {
                ServerError::new(operation, self.name(), error).into()
            }
            StoreError::Api { .. } => MongroveError::Api(error),
            StoreError::Other { .. } => MongroveError::Store(error),
        }
    }
}
