//! Error types for schema definition, document validation and store delegation.
//!
//! Errors fall into a small taxonomy:
//!
//! - [`SchemaError`] - raised while a schema is being built (fatal to startup)
//! - [`ValidationError`] - raised at write time when a payload fails its validator
//! - [`ServerError`] - a store failure translated with an operation-specific code
//!
//! All of them are carried by the top-level [`MongroveError`].

use crate::collection::WriteOperation;
use crate::store::StoreError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// Main error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum MongroveError {
    /// Invalid schema definition
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Payload rejected by the collection validator
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Store-level failure translated for the failed operation
    #[error("Server error: {0}")]
    Server(#[from] ServerError),

    /// The store rejected the call because of invalid driver usage
    #[error("Driver API error: {0}")]
    Api(#[source] StoreError),

    /// Any other store failure, passed through untranslated
    #[error("Store error: {0}")]
    Store(#[source] StoreError),

    /// Errors carrying only a code and a message (invalid arguments, index provisioning)
    #[error("[{code}] {message}")]
    Common { code: ErrorCode, message: String },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MongroveError {
    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::Common {
            code: ErrorCode::InvalidArgument,
            message: message.into(),
        }
    }

    /// Machine-readable code of this error, when it has one.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::Validation(err) => Some(err.code),
            Self::Server(err) => Some(err.code),
            Self::Common { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Issues reported by the validator, empty for every other error kind.
    pub fn issues(&self) -> &[ValidationIssue] {
        match self {
            Self::Validation(err) => &err.issues,
            _ => &[],
        }
    }
}

/// Codes attached to operation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Index provisioning failed
    CreateIndexesFailed,
    /// insertOne / insertMany failed
    InsertFailed,
    /// updateOne / updateMany / findOneAndUpdate failed
    UpdateFailed,
    /// replaceOne / findOneAndReplace failed
    ReplaceFailed,
    /// The caller passed an argument the client cannot use
    InvalidArgument,
}

impl ErrorCode {
    /// Returns the string form of the code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::CreateIndexesFailed => "M2003",
            ErrorCode::InsertFailed => "M4001",
            ErrorCode::UpdateFailed => "M4003",
            ErrorCode::ReplaceFailed => "M4004",
            ErrorCode::InvalidArgument => "M6001",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while defining fields, objects, collections and registries.
///
/// These are programming errors in the schema definition and surface at
/// startup, never at write time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// More than one of `default`, `optional`, `nullable` passed to a builder
    #[error(
        "Invalid field options. Options `optional`, `nullable`, `default` are incompatible together. Please select one of them."
    )]
    ConflictingModifiers,

    /// A composed field carries more than one modifier
    #[error(
        "Invalid schema field options for '{field}'. Options `optional`, `nullable`, `default` are incompatible together. Please select one of them."
    )]
    InvalidFieldOptions { field: String },

    /// Both `optional` and `nullable` set on a nested object
    #[error("Invalid object options. Options `optional` and `nullable` are incompatible together.")]
    ConflictingObjectModifiers,

    /// The same field name declared twice in one object
    #[error("Field '{field}' is declared more than once")]
    DuplicateField { field: String },

    /// The same collection name registered twice
    #[error("Collection '{name}' is registered more than once")]
    DuplicateCollection { name: String },

    /// Array element fields cannot carry modifiers
    #[error("Array element field must not declare `default`, `optional` or `nullable`")]
    ModifiedArrayElement,

    /// Enumerations need at least one literal
    #[error("Enum field requires at least one value")]
    EmptyEnum,
}

/// A segment of the path from the document root to an offending value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object key
    Key(String),
    /// Array index
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Sign class constraint of a number field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignClass {
    /// Strictly greater than zero
    Positive,
    /// Greater than or equal to zero
    Nonnegative,
    /// Strictly less than zero
    Negative,
    /// Less than or equal to zero
    Nonpositive,
}

/// Which kind of value a length constraint applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LengthSubject {
    String,
    Array,
}

impl LengthSubject {
    fn noun(&self) -> (&'static str, &'static str) {
        match self {
            LengthSubject::String => ("String", "character(s)"),
            LengthSubject::Array => ("Array", "element(s)"),
        }
    }
}

/// String check that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringCheck {
    Regex,
    Includes(String),
    StartsWith(String),
    EndsWith(String),
    Cuid,
    Cuid2,
    Email,
    Emoji,
    Ip,
    Url,
    Uuid,
}

/// What went wrong with a single value.
#[derive(Debug, Clone, PartialEq)]
pub enum IssueKind {
    /// Required value is absent
    Required,
    /// Value has the wrong JSON type
    InvalidType { expected: String, received: String },
    /// Length below the minimum
    TooSmall { subject: LengthSubject, minimum: usize },
    /// Length above the maximum
    TooBig { subject: LengthSubject, maximum: usize },
    /// Length differs from the exact requirement
    WrongLength { subject: LengthSubject, length: usize },
    /// String failed a format or content check
    InvalidString(StringCheck),
    /// Number is not a whole number
    NotInteger,
    /// Number violates its sign class
    WrongSign(SignClass),
    /// String is not an RFC 3339 date
    InvalidDate,
    /// Date earlier than the minimum
    DateTooEarly { minimum: String },
    /// Date later than the maximum
    DateTooLate { maximum: String },
    /// Value outside the enumeration
    InvalidEnumValue { options: Vec<String>, received: String },
    /// Value is not an ObjectId
    InvalidObjectId,
    /// Keys not declared by a strict object
    UnrecognizedKeys(Vec<String>),
}

impl IssueKind {
    /// Human readable message for this issue.
    pub fn message(&self) -> String {
        match self {
            IssueKind::Required => "Required".to_string(),
            IssueKind::InvalidType { expected, received } => {
                format!("Expected {}, received {}", expected, received)
            }
            IssueKind::TooSmall { subject, minimum } => {
                let (noun, unit) = subject.noun();
                format!("{} must contain at least {} {}", noun, minimum, unit)
            }
            IssueKind::TooBig { subject, maximum } => {
                let (noun, unit) = subject.noun();
                format!("{} must contain at most {} {}", noun, maximum, unit)
            }
            IssueKind::WrongLength { subject, length } => {
                let (noun, unit) = subject.noun();
                format!("{} must contain exactly {} {}", noun, length, unit)
            }
            IssueKind::InvalidString(check) => match check {
                StringCheck::Regex => "Invalid".to_string(),
                StringCheck::Includes(s) => format!("Invalid input: must include \"{}\"", s),
                StringCheck::StartsWith(s) => format!("Invalid input: must start with \"{}\"", s),
                StringCheck::EndsWith(s) => format!("Invalid input: must end with \"{}\"", s),
                StringCheck::Cuid => "Invalid cuid".to_string(),
                StringCheck::Cuid2 => "Invalid cuid2".to_string(),
                StringCheck::Email => "Invalid email".to_string(),
                StringCheck::Emoji => "Invalid emoji".to_string(),
                StringCheck::Ip => "Invalid ip".to_string(),
                StringCheck::Url => "Invalid url".to_string(),
                StringCheck::Uuid => "Invalid uuid".to_string(),
            },
            IssueKind::NotInteger => "Expected integer, received float".to_string(),
            IssueKind::WrongSign(sign) => match sign {
                SignClass::Positive => "Number must be greater than 0",
                SignClass::Nonnegative => "Number must be greater than or equal to 0",
                SignClass::Negative => "Number must be less than 0",
                SignClass::Nonpositive => "Number must be less than or equal to 0",
            }
            .to_string(),
            IssueKind::InvalidDate => "Invalid date".to_string(),
            IssueKind::DateTooEarly { minimum } => {
                format!("Date must be greater than or equal to {}", minimum)
            }
            IssueKind::DateTooLate { maximum } => {
                format!("Date must be smaller than or equal to {}", maximum)
            }
            IssueKind::InvalidEnumValue { options, received } => format!(
                "Invalid enum value. Expected {}, received '{}'",
                quote_options(options),
                received
            ),
            IssueKind::InvalidObjectId => "Invalid ObjectId".to_string(),
            IssueKind::UnrecognizedKeys(keys) => format!(
                "Unrecognized key(s) in object: {}",
                keys.iter()
                    .map(|k| format!("'{}'", k))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }
}

pub(crate) fn quote_options(options: &[String]) -> String {
    options
        .iter()
        .map(|o| format!("'{}'", o))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// A single validation failure located by its path in the document.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    pub path: Vec<PathSegment>,
    pub kind: IssueKind,
}

impl ValidationIssue {
    pub fn new(path: Vec<PathSegment>, kind: IssueKind) -> Self {
        Self { path, kind }
    }

    pub fn message(&self) -> String {
        self.kind.message()
    }

    /// The path rendered the way it appears in error messages (`a.b[0]["c-d"]`).
    pub fn path_string(&self) -> String {
        join_path(&self.path)
    }

    /// True when the issue is located at (or under) the given top-level key.
    pub fn is_at(&self, key: &str) -> bool {
        matches!(self.path.first(), Some(PathSegment::Key(k)) if k == key)
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.path.as_slice() {
            [] => write!(f, "{}", self.message()),
            [PathSegment::Index(i)] => write!(f, "{} at index {}", self.message(), i),
            path => write!(f, "{} at \"{}\"", self.message(), join_path(path)),
        }
    }
}

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[$_\p{XID_Start}][$\x{200C}\x{200D}\p{XID_Continue}]*$")
        .expect("identifier pattern is valid")
});

fn join_path(path: &[PathSegment]) -> String {
    if let [PathSegment::Key(key)] = path {
        return key.clone();
    }

    let mut joined = String::new();
    for segment in path {
        match segment {
            PathSegment::Index(i) => joined.push_str(&format!("[{}]", i)),
            PathSegment::Key(key) if key.contains('"') => {
                joined.push_str(&format!("[\"{}\"]", key.replace('"', "\\\"")))
            }
            PathSegment::Key(key) if !IDENTIFIER.is_match(key) => {
                joined.push_str(&format!("[\"{}\"]", key))
            }
            PathSegment::Key(key) => {
                if !joined.is_empty() {
                    joined.push('.');
                }
                joined.push_str(key);
            }
        }
    }
    joined
}

/// Render an issue list as a single message.
pub fn format_issues(issues: &[ValidationIssue]) -> String {
    if issues.is_empty() {
        return "Validation error".to_string();
    }
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A write payload failed validation.
///
/// Raised before any store call is attempted.
#[derive(Debug, Clone, thiserror::Error)]
#[error("[{code}] {} (operation: {operation}, collection: {collection})", format_issues(.issues))]
pub struct ValidationError {
    pub code: ErrorCode,
    pub operation: WriteOperation,
    pub collection: String,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationError {
    pub fn new(
        operation: WriteOperation,
        collection: impl Into<String>,
        issues: Vec<ValidationIssue>,
    ) -> Self {
        Self {
            code: operation.error_code(),
            operation,
            collection: collection.into(),
            issues,
        }
    }
}

/// A store-level failure translated for the operation that caused it.
#[derive(Debug, thiserror::Error)]
#[error("[{code}] {source} (operation: {operation}, collection: {collection})")]
pub struct ServerError {
    pub code: ErrorCode,
    pub operation: WriteOperation,
    pub collection: String,
    #[source]
    pub source: StoreError,
}

impl ServerError {
    pub fn new(operation: WriteOperation, collection: impl Into<String>, source: StoreError) -> Self {
        Self {
            code: operation.error_code(),
            operation,
            collection: collection.into(),
            source,
        }
    }
}

/// Failure to project a document onto a caller type.
#[derive(Debug, thiserror::Error)]
pub enum ProjectionError {
    #[error("{}", format_issues(.0))]
    Invalid(Vec<ValidationIssue>),

    #[error("Deserialization failed: {0}")]
    Deserialize(#[from] serde_json::Error),
}

// Result type aliases for convenience
pub type MongroveResult<T> = Result<T, MongroveError>;
pub type SchemaResult<T> = Result<T, SchemaError>;
