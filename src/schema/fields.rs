//! Field builders.
//!
//! Each builder takes its primitive constraints plus a [`FieldOptions`]
//! modifier block and returns a [`Field`]. Conflicting modifiers are rejected
//! here, at build time.
//!
//! ```rust
//! use mongrove::schema::fields::{self, NumberOptions, StringOptions};
//! use mongrove::schema::FieldOptions;
//!
//! # fn main() -> Result<(), mongrove::SchemaError> {
//! let email = fields::email(FieldOptions::new().unique())?;
//! let score = fields::number(NumberOptions {
//!     int: true,
//!     field: FieldOptions::new().with_default(0),
//!     ..NumberOptions::default()
//! })?;
//! let nickname = fields::string(StringOptions {
//!     max: Some(32),
//!     field: FieldOptions::new().optional(),
//!     ..StringOptions::default()
//! })?;
//! # Ok(())
//! # }
//! ```

use super::modifier::Modifier;
use super::strings::{IpVersion, StringFormat};
use super::types::{Field, FieldOptions};
use super::validator::{ArrayRules, Cardinality, DateRules, NumberRules, StringRules, Validator};
use crate::error::{SchemaError, SchemaResult, SignClass};
use chrono::{DateTime, Utc};
use regex::Regex;

/// Options for `string` and the format-constrained string builders.
#[derive(Debug, Clone, Default)]
pub struct StringOptions {
    /// Minimum length in characters
    pub min: Option<usize>,
    /// Maximum length in characters
    pub max: Option<usize>,
    pub regex: Option<Regex>,
    pub includes: Option<String>,
    pub starts_with: Option<String>,
    pub ends_with: Option<String>,
    pub field: FieldOptions,
}

/// Options for `number`.
#[derive(Debug, Clone, Default)]
pub struct NumberOptions {
    /// Reject numbers with a fractional part
    pub int: bool,
    pub sign: Option<SignClass>,
    pub field: FieldOptions,
}

/// Options for `date`.
#[derive(Debug, Clone, Default)]
pub struct DateOptions {
    pub min: Option<DateTime<Utc>>,
    pub max: Option<DateTime<Utc>>,
    pub field: FieldOptions,
}

/// Options for `array`.
#[derive(Debug, Clone, Default)]
pub struct ArrayOptions {
    /// Require at least one element
    pub nonempty: bool,
    pub min: Option<usize>,
    pub max: Option<usize>,
    /// Exact number of elements
    pub length: Option<usize>,
    pub field: FieldOptions,
}

impl From<FieldOptions> for StringOptions {
    fn from(field: FieldOptions) -> Self {
        Self {
            field,
            ..Self::default()
        }
    }
}

impl From<FieldOptions> for NumberOptions {
    fn from(field: FieldOptions) -> Self {
        Self {
            field,
            ..Self::default()
        }
    }
}

impl From<FieldOptions> for DateOptions {
    fn from(field: FieldOptions) -> Self {
        Self {
            field,
            ..Self::default()
        }
    }
}

impl From<FieldOptions> for ArrayOptions {
    fn from(field: FieldOptions) -> Self {
        Self {
            field,
            ..Self::default()
        }
    }
}

fn build(validator: Validator, options: FieldOptions) -> SchemaResult<Field> {
    Modifier::resolve(&options)?;
    Ok(Field::new(validator, options))
}

fn string_field(options: StringOptions, format: Option<StringFormat>) -> SchemaResult<Field> {
    let rules = StringRules {
        min: options.min,
        max: options.max,
        regex: options.regex,
        includes: options.includes,
        starts_with: options.starts_with,
        ends_with: options.ends_with,
        format,
    };
    build(Validator::String(rules), options.field)
}

/// Free-form string.
pub fn string(options: impl Into<StringOptions>) -> SchemaResult<Field> {
    string_field(options.into(), None)
}

/// String holding a cuid.
pub fn cuid(options: impl Into<StringOptions>) -> SchemaResult<Field> {
    string_field(options.into(), Some(StringFormat::Cuid))
}

/// String holding a cuid2.
pub fn cuid2(options: impl Into<StringOptions>) -> SchemaResult<Field> {
    string_field(options.into(), Some(StringFormat::Cuid2))
}

/// String holding an email address.
pub fn email(options: impl Into<StringOptions>) -> SchemaResult<Field> {
    string_field(options.into(), Some(StringFormat::Email))
}

/// String made only of emoji.
pub fn emoji(options: impl Into<StringOptions>) -> SchemaResult<Field> {
    string_field(options.into(), Some(StringFormat::Emoji))
}

/// IP address string, optionally pinned to one version.
pub fn ip(version: Option<IpVersion>, options: impl Into<StringOptions>) -> SchemaResult<Field> {
    string_field(options.into(), Some(StringFormat::Ip(version)))
}

/// String holding an absolute URL.
pub fn url(options: impl Into<StringOptions>) -> SchemaResult<Field> {
    string_field(options.into(), Some(StringFormat::Url))
}

/// String holding a hyphenated UUID.
pub fn uuid(options: impl Into<StringOptions>) -> SchemaResult<Field> {
    string_field(options.into(), Some(StringFormat::Uuid))
}

/// Number, optionally integral and sign-constrained.
pub fn number(options: impl Into<NumberOptions>) -> SchemaResult<Field> {
    let options = options.into();
    let rules = NumberRules {
        int: options.int,
        sign: options.sign,
    };
    build(Validator::Number(rules), options.field)
}

/// Boolean.
pub fn boolean(options: FieldOptions) -> SchemaResult<Field> {
    build(Validator::Boolean, options)
}

/// RFC 3339 date string, optionally bounded.
pub fn date(options: impl Into<DateOptions>) -> SchemaResult<Field> {
    let options = options.into();
    let rules = DateRules {
        min: options.min,
        max: options.max,
    };
    build(Validator::Date(rules), options.field)
}

/// Fixed set of string literals. The set must not be empty.
pub fn enumeration<I, S>(values: I, options: FieldOptions) -> SchemaResult<Field>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let values: Vec<String> = values.into_iter().map(Into::into).collect();
    if values.is_empty() {
        return Err(SchemaError::EmptyEnum);
    }
    build(Validator::Enum(values), options)
}

/// ObjectId, as 24 hex characters or `{"$oid": ...}`.
pub fn object_id(options: FieldOptions) -> SchemaResult<Field> {
    build(Validator::ObjectId, options)
}

/// Array of `element` values.
///
/// The element field must not carry a modifier; `nonempty` records that the
/// array holds at least one element.
pub fn array(element: Field, options: impl Into<ArrayOptions>) -> SchemaResult<Field> {
    if element.options().has_modifier() {
        return Err(SchemaError::ModifiedArrayElement);
    }
    let options = options.into();
    let cardinality = if options.nonempty {
        Cardinality::AtLeastOne
    } else {
        Cardinality::Many
    };
    let rules = ArrayRules {
        element: Box::new(element.validator().clone()),
        min: options.min,
        max: options.max,
        length: options.length,
        cardinality,
    };
    build(Validator::Array(rules), options.field)
}
