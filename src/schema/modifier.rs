//! Mutual exclusivity of the `default` / `optional` / `nullable` modifiers.

use super::types::{DefaultValue, FieldOptions};
use crate::error::{SchemaError, SchemaResult};

/// Which of the three modifiers a field carries.
#[derive(Debug, Clone)]
pub enum Modifier {
    /// Value required, `null` rejected
    Plain,
    /// Absent value replaced by the default, which is then validated
    Defaulted(DefaultValue),
    /// Absent value allowed and left absent
    Optional,
    /// `null` accepted in place of a value
    Nullable,
}

impl Modifier {
    /// Resolve the modifier from a builder's options, rejecting conflicting
    /// combinations.
    pub fn resolve(options: &FieldOptions) -> SchemaResult<Self> {
        if !is_valid_default_options(options) {
            return Err(SchemaError::ConflictingModifiers);
        }
        Ok(Self::select(options))
    }

    pub(crate) fn select(options: &FieldOptions) -> Self {
        if let Some(default) = &options.default {
            Self::Defaulted(default.clone())
        } else if options.optional == Some(true) {
            Self::Optional
        } else if options.nullable == Some(true) {
            Self::Nullable
        } else {
            Self::Plain
        }
    }

    pub fn is_plain(&self) -> bool {
        matches!(self, Self::Plain)
    }
}

/// True when zero or one of `default`, `optional`, `nullable` is present.
///
/// Presence is what counts, not the value: `optional: Some(false)` and a
/// `false` or `0` default are all present.
pub fn is_valid_default_options(options: &FieldOptions) -> bool {
    let present = [
        options.default.is_some(),
        options.optional.is_some(),
        options.nullable.is_some(),
    ]
    .into_iter()
    .filter(|set| *set)
    .count();

    present <= 1
}

/// Modifier applied to a nested object at its nesting edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObjectOptions {
    pub optional: bool,
    pub nullable: bool,
}

impl ObjectOptions {
    pub fn optional() -> Self {
        Self {
            optional: true,
            nullable: false,
        }
    }

    pub fn nullable() -> Self {
        Self {
            optional: false,
            nullable: true,
        }
    }

    pub(crate) fn into_field_options(self) -> SchemaResult<FieldOptions> {
        if self.optional && self.nullable {
            return Err(SchemaError::ConflictingObjectModifiers);
        }
        Ok(FieldOptions {
            optional: self.optional.then_some(true),
            nullable: self.nullable.then_some(true),
            ..FieldOptions::default()
        })
    }
}
