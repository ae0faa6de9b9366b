//! Property-based tests for the modifier policy and the update normalizer.

use mongrove::schema::fields;
use mongrove::schema::{DefaultValue, FieldOptions, Modifier, is_valid_default_options};
use mongrove::update::normalize_update;
use proptest::prelude::*;
use serde_json::{Value, json};

fn options(default: Option<i64>, optional: Option<bool>, nullable: Option<bool>) -> FieldOptions {
    FieldOptions {
        index: None,
        default: default.map(DefaultValue::literal),
        optional,
        nullable,
    }
}

proptest! {
    #[test]
    fn prop_modifiers_are_exclusive_by_presence(
        default in proptest::option::of(any::<i64>()),
        optional in proptest::option::of(any::<bool>()),
        nullable in proptest::option::of(any::<bool>()),
    ) {
        let present = [default.is_some(), optional.is_some(), nullable.is_some()]
            .iter()
            .filter(|set| **set)
            .count();
        let field_options = options(default, optional, nullable);

        prop_assert_eq!(is_valid_default_options(&field_options), present <= 1);
        prop_assert_eq!(Modifier::resolve(&field_options).is_ok(), present <= 1);
        prop_assert_eq!(fields::string(field_options.clone()).is_ok(), present <= 1);
        prop_assert_eq!(fields::boolean(field_options).is_ok(), present <= 1);
    }

    #[test]
    fn prop_set_always_wins(inc in any::<i32>(), set in any::<i32>()) {
        let merged = normalize_update(&json!({
            "$inc": { "score": inc },
            "$max": { "score": inc },
            "$push": { "score": inc },
            "$set": { "score": set }
        }));
        prop_assert_eq!(merged.get("score"), Some(&json!(set)));
    }

    #[test]
    fn prop_push_each_is_taken_verbatim(items in proptest::collection::vec("[a-z]{1,8}", 0..6)) {
        let each: Vec<Value> = items.iter().map(|s| json!(s)).collect();
        let merged = normalize_update(&json!({ "$push": { "tags": { "$each": each.clone() } } }));
        prop_assert_eq!(merged.get("tags"), Some(&Value::Array(each)));
    }
}
