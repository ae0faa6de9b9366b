//! Schema fixtures shared across integration tests.

use mongrove::schema::fields::{self, ArrayOptions, NumberOptions, StringOptions};
use mongrove::schema::{
    CollectionOptions, CollectionSchema, DefaultValue, FieldOptions, ObjectOptions, SchemaOptions,
    SchemaRegistry, define_collection, nested_object,
};
use mongrove::error::SignClass;
use serde_json::json;

/// `user`: unique email, defaulted score, optional profile, tags.
pub fn user_collection() -> CollectionSchema {
    let profile = nested_object(
        [
            (
                "displayName",
                fields::string(StringOptions {
                    min: Some(1),
                    max: Some(64),
                    ..StringOptions::default()
                })
                .expect("displayName"),
            ),
            (
                "website",
                fields::url(FieldOptions::new().nullable()).expect("website"),
            ),
        ],
        ObjectOptions::optional(),
    )
    .expect("profile");

    define_collection(
        [
            (
                "email",
                fields::email(FieldOptions::new().unique()).expect("email"),
            ),
            (
                "score",
                fields::number(NumberOptions {
                    int: true,
                    sign: Some(SignClass::Nonnegative),
                    field: FieldOptions::new().with_default(0),
                })
                .expect("score"),
            ),
            (
                "tags",
                fields::array(
                    fields::string(FieldOptions::new()).expect("tag"),
                    ArrayOptions {
                        max: Some(5),
                        field: FieldOptions::new().optional(),
                        ..ArrayOptions::default()
                    },
                )
                .expect("tags"),
            ),
            (
                "createdAt",
                fields::date(FieldOptions::new().with_default_value(DefaultValue::now()))
                    .expect("createdAt"),
            ),
            ("profile", profile),
        ],
        CollectionOptions::default(),
    )
    .expect("user collection")
}

/// `post`: indexed author id, status enumeration, nullable body.
pub fn post_collection() -> CollectionSchema {
    define_collection(
        [
            (
                "authorId",
                fields::object_id(FieldOptions::new().indexed()).expect("authorId"),
            ),
            (
                "status",
                fields::enumeration(
                    ["draft", "published"],
                    FieldOptions::new().with_default(json!("draft")),
                )
                .expect("status"),
            ),
            (
                "body",
                fields::string(FieldOptions::new().nullable()).expect("body"),
            ),
        ],
        CollectionOptions::default(),
    )
    .expect("post collection")
}

pub fn registry() -> SchemaRegistry {
    registry_with(SchemaOptions::default())
}

pub fn registry_with(options: SchemaOptions) -> SchemaRegistry {
    SchemaRegistry::new(
        [("user", user_collection()), ("post", post_collection())],
        options,
    )
    .expect("registry")
}
