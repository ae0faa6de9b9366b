//! Client configuration and per-operation options.

use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

fn default_database() -> String {
    "test".to_string()
}

/// Client-wide configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientOptions {
    /// Database used when none is named, and the only one indexed when the
    /// registry has no database filter.
    #[serde(default = "default_database")]
    pub default_database: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            default_database: default_database(),
        }
    }
}

impl ClientOptions {
    pub fn with_default_database(mut self, name: impl Into<String>) -> Self {
        self.default_database = name.into();
        self
    }
}

/// Options for `insert_one` and `insert_many`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOptions {
    #[serde(default = "default_true")]
    pub validate: bool,
    /// Stop at the first failed document (`insert_many` only)
    #[serde(default = "default_true")]
    pub ordered: bool,
}

impl Default for InsertOptions {
    fn default() -> Self {
        Self {
            validate: true,
            ordered: true,
        }
    }
}

/// Options for `replace_one`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceOptions {
    #[serde(default = "default_true")]
    pub validate: bool,
    #[serde(default)]
    pub upsert: bool,
}

impl Default for ReplaceOptions {
    fn default() -> Self {
        Self {
            validate: true,
            upsert: false,
        }
    }
}

/// Options for `update_one` and `update_many`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOptions {
    #[serde(default = "default_true")]
    pub validate: bool,
    #[serde(default)]
    pub upsert: bool,
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self {
            validate: true,
            upsert: false,
        }
    }
}

/// Which version of the document a find-and-modify call returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReturnDocument {
    #[default]
    Before,
    After,
}

/// Options for `find_one_and_replace` and `find_one_and_update`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindOneAndModifyOptions {
    #[serde(default = "default_true")]
    pub validate: bool,
    #[serde(default)]
    pub upsert: bool,
    #[serde(default)]
    pub return_document: ReturnDocument,
}

impl Default for FindOneAndModifyOptions {
    fn default() -> Self {
        Self {
            validate: true,
            upsert: false,
            return_document: ReturnDocument::Before,
        }
    }
}

macro_rules! skip_validation {
    ($($options:ty),*) => {
        $(
            impl $options {
                /// Options that hand the payload to the store unvalidated.
                pub fn unvalidated() -> Self {
                    Self {
                        validate: false,
                        ..Self::default()
                    }
                }
            }
        )*
    };
}

skip_validation!(InsertOptions, ReplaceOptions, UpdateOptions, FindOneAndModifyOptions);
