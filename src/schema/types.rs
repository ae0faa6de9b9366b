//! Core value types shared by the field builders, composers and validators.

use super::modifier::Modifier;
use super::validator::Validator;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Index specification attached to a field.
///
/// Every field carrying one becomes a single-field ascending index on its
/// collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexOptions {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub unique: bool,
}

impl IndexOptions {
    pub fn unique() -> Self {
        Self { unique: true }
    }
}

/// Value substituted for an absent field.
///
/// A `Producer` is invoked on every use, so generated values (timestamps,
/// identifiers) are fresh per document.
#[derive(Clone)]
pub enum DefaultValue {
    Literal(Value),
    Producer(Arc<dyn Fn() -> Value + Send + Sync>),
}

impl DefaultValue {
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    pub fn producer<F>(f: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Self::Producer(Arc::new(f))
    }

    /// Current UTC time as an RFC 3339 string.
    pub fn now() -> Self {
        Self::producer(|| Value::String(chrono::Utc::now().to_rfc3339()))
    }

    /// A freshly generated ObjectId.
    pub fn new_object_id() -> Self {
        Self::producer(|| Value::String(ObjectId::new().to_hex()))
    }

    pub fn resolve(&self) -> Value {
        match self {
            Self::Literal(value) => value.clone(),
            Self::Producer(f) => f(),
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Producer(_) => f.write_str("Producer(..)"),
        }
    }
}

/// Modifier block accepted by every field builder.
///
/// `default`, `optional` and `nullable` are mutually exclusive by presence:
/// `optional: Some(false)` still counts as set.
#[derive(Debug, Clone, Default)]
pub struct FieldOptions {
    pub index: Option<IndexOptions>,
    pub default: Option<DefaultValue>,
    pub optional: Option<bool>,
    pub nullable: Option<bool>,
}

impl FieldOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(DefaultValue::literal(value));
        self
    }

    pub fn with_default_fn<F>(mut self, f: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.default = Some(DefaultValue::producer(f));
        self
    }

    pub fn with_default_value(mut self, value: DefaultValue) -> Self {
        self.default = Some(value);
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = Some(true);
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = Some(true);
        self
    }

    pub fn indexed(mut self) -> Self {
        self.index = Some(IndexOptions::default());
        self
    }

    pub fn unique(mut self) -> Self {
        self.index = Some(IndexOptions::unique());
        self
    }

    pub(crate) fn has_modifier(&self) -> bool {
        self.default.is_some() || self.optional.is_some() || self.nullable.is_some()
    }
}

/// A validator paired with its modifier and index options.
///
/// Produced by the builders in [`crate::schema::fields`]; those check the
/// modifier block up front. A field assembled by hand through [`Field::new`]
/// is checked when it is composed into an object or collection.
#[derive(Debug, Clone)]
pub struct Field {
    validator: Validator,
    options: FieldOptions,
}

impl Field {
    pub fn new(validator: Validator, options: FieldOptions) -> Self {
        Self { validator, options }
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    pub fn options(&self) -> &FieldOptions {
        &self.options
    }

    pub fn index(&self) -> Option<&IndexOptions> {
        self.options.index.as_ref()
    }

    /// The modifier this field was declared with.
    ///
    /// Only meaningful once the options passed the exclusivity check.
    pub fn modifier(&self) -> Modifier {
        Modifier::select(&self.options)
    }
}

/// 12-byte document identifier: 4-byte big-endian seconds timestamp followed
/// by 8 random bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId([u8; 12]);

impl ObjectId {
    pub fn new() -> Self {
        let seconds = chrono::Utc::now().timestamp() as u32;
        let random = uuid::Uuid::new_v4();

        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&seconds.to_be_bytes());
        bytes[4..].copy_from_slice(&random.as_bytes()[..8]);
        Self(bytes)
    }

    pub fn parse_str(s: &str) -> Option<Self> {
        if s.len() != 24 {
            return None;
        }
        let mut bytes = [0u8; 12];
        hex::decode_to_slice(s, &mut bytes).ok()?;
        Some(Self(bytes))
    }

    pub fn bytes(&self) -> [u8; 12] {
        self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<ObjectId> for Value {
    fn from(id: ObjectId) -> Self {
        Value::String(id.to_hex())
    }
}
