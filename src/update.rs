//! Reconstruction of a plain partial document from update operator syntax.
//!
//! Only the operators whose operands describe field values are understood.
//! The result is validated against the collection's partial schema, which
//! checks shape and modifier compatibility of the touched fields.

use serde_json::{Map, Value};

/// Operators whose operands are merged as-is, in merge order.
const VALUE_OPERATORS: [&str; 4] = ["$inc", "$max", "$min", "$mul"];

/// Operators whose operands are array elements, in merge order.
const ARRAY_OPERATORS: [&str; 2] = ["$addToSet", "$push"];

const SET: &str = "$set";

/// Merge the supported operators of an update expression into one object.
///
/// Later operators win on key collisions, so `$set` takes precedence over
/// everything else. Unsupported operators and non-operator keys contribute
/// nothing.
pub fn normalize_update(update: &Value) -> Map<String, Value> {
    let mut merged = Map::new();
    let Value::Object(operators) = update else {
        return merged;
    };

    for operator in VALUE_OPERATORS {
        if let Some(Value::Object(fields)) = operators.get(operator) {
            merged.extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
    }

    for operator in ARRAY_OPERATORS {
        if let Some(Value::Object(fields)) = operators.get(operator) {
            merged.extend(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), array_operand(v))),
            );
        }
    }

    if let Some(Value::Object(fields)) = operators.get(SET) {
        merged.extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    merged
}

/// `{ $each: [..] }` contributes its array; any other operand is one element.
fn array_operand(operand: &Value) -> Value {
    match operand.get("$each") {
        Some(each @ Value::Array(_)) => each.clone(),
        _ => Value::Array(vec![operand.clone()]),
    }
}
