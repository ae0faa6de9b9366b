//! Runtime validator engine.
//!
//! A [`Validator`] parses one JSON value, collecting every issue it finds
//! together with the path at which it was found, and returns the normalized
//! value (defaults applied) when no issue was raised.

use super::modifier::Modifier;
use super::object::{ObjectValidator, ParseMode};
use super::strings::StringFormat;
use super::types::{Field, ObjectId};
use crate::error::{
    IssueKind, LengthSubject, PathSegment, SignClass, StringCheck, ValidationIssue, quote_options,
};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde_json::Value;

/// Constraints of a string field.
#[derive(Debug, Clone, Default)]
pub struct StringRules {
    pub min: Option<usize>,
    pub max: Option<usize>,
    pub regex: Option<Regex>,
    pub includes: Option<String>,
    pub starts_with: Option<String>,
    pub ends_with: Option<String>,
    pub format: Option<StringFormat>,
}

/// Constraints of a number field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NumberRules {
    pub int: bool,
    pub sign: Option<SignClass>,
}

/// Bounds of a date field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRules {
    pub min: Option<DateTime<Utc>>,
    pub max: Option<DateTime<Utc>>,
}

/// Minimum number of array elements recorded at the type level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Cardinality {
    #[default]
    Many,
    AtLeastOne,
}

/// Constraints of an array field.
#[derive(Debug, Clone)]
pub struct ArrayRules {
    pub element: Box<Validator>,
    pub min: Option<usize>,
    pub max: Option<usize>,
    pub length: Option<usize>,
    pub cardinality: Cardinality,
}

/// Runtime predicate/parser for a single value.
#[derive(Debug, Clone)]
pub enum Validator {
    String(StringRules),
    Number(NumberRules),
    Boolean,
    Date(DateRules),
    Enum(Vec<String>),
    ObjectId,
    Array(ArrayRules),
    Object(ObjectValidator),
}

/// Name of a JSON value's type as it appears in issue messages.
pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Collects issues while walking a value.
pub(crate) struct Context {
    path: Vec<PathSegment>,
    issues: Vec<ValidationIssue>,
}

impl Context {
    pub(crate) fn new() -> Self {
        Self {
            path: Vec::new(),
            issues: Vec::new(),
        }
    }

    pub(crate) fn report(&mut self, kind: IssueKind) {
        self.issues.push(ValidationIssue::new(self.path.clone(), kind));
    }

    pub(crate) fn enter<T>(&mut self, segment: PathSegment, f: impl FnOnce(&mut Self) -> T) -> T {
        self.path.push(segment);
        let result = f(self);
        self.path.pop();
        result
    }

    pub(crate) fn finish<T>(self, value: T) -> Result<T, Vec<ValidationIssue>> {
        if self.issues.is_empty() {
            Ok(value)
        } else {
            Err(self.issues)
        }
    }
}

impl Validator {
    /// Parse a value, returning the normalized value or every issue found.
    pub fn parse(&self, value: &Value) -> Result<Value, Vec<ValidationIssue>> {
        let mut ctx = Context::new();
        let parsed = self.parse_in(value, &mut ctx);
        ctx.finish(parsed)
    }

    /// Human readable name of the expected type.
    pub fn expected(&self) -> String {
        match self {
            Validator::String(_) => "string".to_string(),
            Validator::Number(_) => "number".to_string(),
            Validator::Boolean => "boolean".to_string(),
            Validator::Date(_) => "date".to_string(),
            Validator::Enum(options) => quote_options(options),
            Validator::ObjectId => "ObjectId".to_string(),
            Validator::Array(_) => "array".to_string(),
            Validator::Object(_) => "object".to_string(),
        }
    }

    pub(crate) fn parse_in(&self, value: &Value, ctx: &mut Context) -> Value {
        match self {
            Validator::String(rules) => match value {
                Value::String(s) => {
                    check_string(s, rules, ctx);
                    value.clone()
                }
                other => self.invalid_type(other, ctx),
            },
            Validator::Number(rules) => match value.as_f64() {
                Some(n) if value.is_number() => {
                    check_number(n, rules, ctx);
                    value.clone()
                }
                _ => self.invalid_type(value, ctx),
            },
            Validator::Boolean => match value {
                Value::Bool(_) => value.clone(),
                other => self.invalid_type(other, ctx),
            },
            Validator::Date(rules) => match value {
                Value::String(s) => {
                    check_date(s, rules, ctx);
                    value.clone()
                }
                other => self.invalid_type(other, ctx),
            },
            Validator::Enum(options) => match value {
                Value::String(s) if options.contains(s) => value.clone(),
                Value::String(s) => {
                    ctx.report(IssueKind::InvalidEnumValue {
                        options: options.clone(),
                        received: s.clone(),
                    });
                    value.clone()
                }
                other => self.invalid_type(other, ctx),
            },
            Validator::ObjectId => {
                if !is_object_id(value) {
                    ctx.report(IssueKind::InvalidObjectId);
                }
                value.clone()
            }
            Validator::Array(rules) => match value {
                Value::Array(items) => Value::Array(parse_array(items, rules, ctx)),
                other => self.invalid_type(other, ctx),
            },
            Validator::Object(object) => object.parse_in(value, ParseMode::Full, ctx),
        }
    }

    fn invalid_type(&self, value: &Value, ctx: &mut Context) -> Value {
        ctx.report(IssueKind::InvalidType {
            expected: self.expected(),
            received: type_name(value).to_string(),
        });
        value.clone()
    }
}

impl Field {
    /// Apply the field's modifier to a possibly absent value.
    ///
    /// Returns `None` when the key should be left out of the normalized
    /// object. In partial mode absence is always accepted and no default is
    /// substituted.
    pub(crate) fn parse_in(
        &self,
        value: Option<&Value>,
        mode: ParseMode,
        ctx: &mut Context,
    ) -> Option<Value> {
        let modifier = self.modifier();
        match (value, modifier) {
            (None, _) if mode == ParseMode::Partial => None,
            (None, Modifier::Optional) => None,
            (None, Modifier::Defaulted(default)) => {
                Some(self.validator().parse_in(&default.resolve(), ctx))
            }
            (None, Modifier::Plain | Modifier::Nullable) => {
                ctx.report(IssueKind::Required);
                None
            }
            (Some(Value::Null), Modifier::Nullable) => Some(Value::Null),
            (Some(value), _) => Some(self.validator().parse_in(value, ctx)),
        }
    }
}

fn check_string(s: &str, rules: &StringRules, ctx: &mut Context) {
    let length = s.chars().count();
    if let Some(min) = rules.min {
        if length < min {
            ctx.report(IssueKind::TooSmall {
                subject: LengthSubject::String,
                minimum: min,
            });
        }
    }
    if let Some(max) = rules.max {
        if length > max {
            ctx.report(IssueKind::TooBig {
                subject: LengthSubject::String,
                maximum: max,
            });
        }
    }
    if let Some(format) = rules.format {
        if !format.matches(s) {
            ctx.report(IssueKind::InvalidString(format.check()));
        }
    }
    if let Some(regex) = &rules.regex {
        if !regex.is_match(s) {
            ctx.report(IssueKind::InvalidString(StringCheck::Regex));
        }
    }
    if let Some(needle) = &rules.includes {
        if !s.contains(needle.as_str()) {
            ctx.report(IssueKind::InvalidString(StringCheck::Includes(needle.clone())));
        }
    }
    if let Some(prefix) = &rules.starts_with {
        if !s.starts_with(prefix.as_str()) {
            ctx.report(IssueKind::InvalidString(StringCheck::StartsWith(prefix.clone())));
        }
    }
    if let Some(suffix) = &rules.ends_with {
        if !s.ends_with(suffix.as_str()) {
            ctx.report(IssueKind::InvalidString(StringCheck::EndsWith(suffix.clone())));
        }
    }
}

fn check_number(n: f64, rules: &NumberRules, ctx: &mut Context) {
    if rules.int && n.fract() != 0.0 {
        ctx.report(IssueKind::NotInteger);
    }
    if let Some(sign) = rules.sign {
        let ok = match sign {
            SignClass::Positive => n > 0.0,
            SignClass::Nonnegative => n >= 0.0,
            SignClass::Negative => n < 0.0,
            SignClass::Nonpositive => n <= 0.0,
        };
        if !ok {
            ctx.report(IssueKind::WrongSign(sign));
        }
    }
}

fn check_date(s: &str, rules: &DateRules, ctx: &mut Context) {
    let Ok(date) = DateTime::parse_from_rfc3339(s) else {
        ctx.report(IssueKind::InvalidDate);
        return;
    };
    let date = date.with_timezone(&Utc);

    if let Some(min) = rules.min {
        if date < min {
            ctx.report(IssueKind::DateTooEarly {
                minimum: min.to_rfc3339(),
            });
        }
    }
    if let Some(max) = rules.max {
        if date > max {
            ctx.report(IssueKind::DateTooLate {
                maximum: max.to_rfc3339(),
            });
        }
    }
}

fn is_object_id(value: &Value) -> bool {
    match value {
        Value::String(s) => ObjectId::parse_str(s).is_some(),
        Value::Object(map) if map.len() == 1 => map
            .get("$oid")
            .and_then(Value::as_str)
            .is_some_and(|s| ObjectId::parse_str(s).is_some()),
        _ => false,
    }
}

fn parse_array(items: &[Value], rules: &ArrayRules, ctx: &mut Context) -> Vec<Value> {
    let minimum = match rules.cardinality {
        Cardinality::AtLeastOne => Some(rules.min.unwrap_or(1).max(1)),
        Cardinality::Many => rules.min,
    };
    if let Some(min) = minimum {
        if items.len() < min {
            ctx.report(IssueKind::TooSmall {
                subject: LengthSubject::Array,
                minimum: min,
            });
        }
    }
    if let Some(max) = rules.max {
        if items.len() > max {
            ctx.report(IssueKind::TooBig {
                subject: LengthSubject::Array,
                maximum: max,
            });
        }
    }
    if let Some(length) = rules.length {
        if items.len() != length {
            ctx.report(IssueKind::WrongLength {
                subject: LengthSubject::Array,
                length,
            });
        }
    }

    items
        .iter()
        .enumerate()
        .map(|(i, item)| ctx.enter(PathSegment::Index(i), |ctx| rules.element.parse_in(item, ctx)))
        .collect()
}
