//! Collection schemas: a root object validator plus harvested index metadata.

use super::modifier::is_valid_default_options;
use super::object::{ObjectValidator, ParseMode};
use super::types::{Field, IndexOptions};
use super::validator::Context;
use crate::error::{PathSegment, ProjectionError, SchemaError, SchemaResult, ValidationIssue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Collection-level options, passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionOptions {}

/// Schema of one collection.
///
/// Immutable once built; operations share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct CollectionSchema {
    validator: ObjectValidator,
    options: CollectionOptions,
    field_indexes: BTreeMap<String, IndexOptions>,
}

/// Define a collection from its root fields.
///
/// Every field with an index specification contributes one single-field index.
pub fn define_collection<I, K>(fields: I, options: CollectionOptions) -> SchemaResult<CollectionSchema>
where
    I: IntoIterator<Item = (K, Field)>,
    K: Into<String>,
{
    let fields: Vec<(String, Field)> = fields
        .into_iter()
        .map(|(name, field)| (name.into(), field))
        .collect();

    let mut field_indexes = BTreeMap::new();
    for (name, field) in &fields {
        if !is_valid_default_options(field.options()) {
            return Err(SchemaError::InvalidFieldOptions {
                field: name.clone(),
            });
        }
        if let Some(index) = field.index() {
            field_indexes.insert(name.clone(), index.clone());
        }
    }

    Ok(CollectionSchema {
        validator: ObjectValidator::compose(fields)?,
        options,
        field_indexes,
    })
}

impl CollectionSchema {
    /// Validate a full document, filling in declared defaults.
    pub fn validate(&self, document: &Value) -> Result<Value, Vec<ValidationIssue>> {
        self.validator.parse(document, ParseMode::Full)
    }

    /// Validate several documents; issue paths start with the document index.
    pub fn validate_many(&self, documents: &[Value]) -> Result<Vec<Value>, Vec<ValidationIssue>> {
        let mut ctx = Context::new();
        let parsed: Vec<Value> = documents
            .iter()
            .enumerate()
            .map(|(i, document)| {
                ctx.enter(PathSegment::Index(i), |ctx| {
                    self.validator.parse_in(document, ParseMode::Full, ctx)
                })
            })
            .collect();
        ctx.finish(parsed)
    }

    /// Validate with every top-level field optional and no defaults applied.
    pub fn validate_partial(&self, document: &Value) -> Result<Value, Vec<ValidationIssue>> {
        self.validator.parse(document, ParseMode::Partial)
    }

    /// Validate, then deserialize the normalized document into `T`.
    pub fn parse_into<T: DeserializeOwned>(&self, document: &Value) -> Result<T, ProjectionError> {
        let normalized = self.validate(document).map_err(ProjectionError::Invalid)?;
        Ok(serde_json::from_value(normalized)?)
    }

    pub fn validator(&self) -> &ObjectValidator {
        &self.validator
    }

    pub fn options(&self) -> &CollectionOptions {
        &self.options
    }

    pub fn field_indexes(&self) -> &BTreeMap<String, IndexOptions> {
        &self.field_indexes
    }
}
