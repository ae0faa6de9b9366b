//! Composition of named fields into strict object validators.

use super::modifier::{ObjectOptions, is_valid_default_options};
use super::types::Field;
use super::validator::{Context, Validator, type_name};
use crate::error::{IssueKind, PathSegment, SchemaError, SchemaResult, ValidationIssue};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// How absent fields are treated while parsing an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    /// Modifiers apply: required fields must be present, defaults are filled
    Full,
    /// Every top-level field may be absent and no defaults are filled.
    /// Nested objects that are present are still parsed in full.
    Partial,
}

/// Ordered mapping of field names to fields. Unknown keys are rejected.
#[derive(Debug, Clone)]
pub struct ObjectValidator {
    fields: Vec<(String, Field)>,
}

impl ObjectValidator {
    /// Compose fields into a strict object validator.
    ///
    /// Every field's modifier block is checked; the first violation is
    /// reported with the offending field's name.
    pub fn compose<I, K>(fields: I) -> SchemaResult<Self>
    where
        I: IntoIterator<Item = (K, Field)>,
        K: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut composed = Vec::new();

        for (name, field) in fields {
            let name = name.into();
            if !is_valid_default_options(field.options()) {
                return Err(SchemaError::InvalidFieldOptions { field: name });
            }
            if !seen.insert(name.clone()) {
                return Err(SchemaError::DuplicateField { field: name });
            }
            composed.push((name, field));
        }

        Ok(Self { fields: composed })
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), field))
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|(candidate, _)| candidate == name)
            .map(|(_, field)| field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Parse a value in the given mode.
    pub fn parse(&self, value: &Value, mode: ParseMode) -> Result<Value, Vec<ValidationIssue>> {
        let mut ctx = Context::new();
        let parsed = self.parse_in(value, mode, &mut ctx);
        ctx.finish(parsed)
    }

    pub(crate) fn parse_in(&self, value: &Value, mode: ParseMode, ctx: &mut Context) -> Value {
        let Value::Object(input) = value else {
            ctx.report(IssueKind::InvalidType {
                expected: "object".to_string(),
                received: type_name(value).to_string(),
            });
            return value.clone();
        };

        let mut output = Map::new();
        for (name, field) in &self.fields {
            let parsed = ctx.enter(PathSegment::Key(name.clone()), |ctx| {
                field.parse_in(input.get(name), mode, ctx)
            });
            if let Some(parsed) = parsed {
                output.insert(name.clone(), parsed);
            }
        }

        let unknown: Vec<String> = input
            .keys()
            .filter(|key| self.field(key).is_none())
            .cloned()
            .collect();
        if !unknown.is_empty() {
            ctx.report(IssueKind::UnrecognizedKeys(unknown));
        }

        Value::Object(output)
    }
}

/// Compose fields into an object nested under another object's field.
///
/// The object-level modifier applies to the whole nested value. Nested objects
/// carry no index metadata.
pub fn nested_object<I, K>(fields: I, options: ObjectOptions) -> SchemaResult<Field>
where
    I: IntoIterator<Item = (K, Field)>,
    K: Into<String>,
{
    let field_options = options.into_field_options()?;
    let object = ObjectValidator::compose(fields)?;
    Ok(Field::new(Validator::Object(object), field_options))
}
