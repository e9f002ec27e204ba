//! Filter evaluation for the in-memory driver.
//!
//! Supports the subset of the store's query language the ODM relies on:
//! field equality (top-level or dotted paths, with array membership) and
//! the comparison operators `$eq $ne $gt $gte $lt $lte $in $nin $exists`.
//! Multiple fields are combined with AND.

use crate::error::{DriverError, DriverResult};
use docmap_codec::{Document, Value};
use std::cmp::Ordering;

/// Returns `true` if `document` matches every condition in `filter`.
pub fn matches(document: &Document, filter: &Document) -> DriverResult<bool> {
    for (path, condition) in filter {
        if path.starts_with('$') {
            return Err(DriverError::invalid_query(format!(
                "top-level operator {path} is not supported"
            )));
        }
        if !matches_field(document.get_path(path), condition)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Checks a filter for unsupported operators without evaluating it.
pub fn validate(filter: &Document) -> DriverResult<()> {
    for (path, condition) in filter {
        if path.starts_with('$') {
            return Err(DriverError::invalid_query(format!(
                "top-level operator {path} is not supported"
            )));
        }
        if let Value::Document(ops) = condition {
            if is_operator_document(ops) {
                for (op, operand) in ops {
                    apply_operator(None, op, operand)?;
                }
            }
        }
    }
    Ok(())
}

fn matches_field(actual: Option<&Value>, condition: &Value) -> DriverResult<bool> {
    match condition {
        Value::Document(ops) if is_operator_document(ops) => {
            for (op, operand) in ops {
                if !apply_operator(actual, op, operand)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        expected => Ok(equals(actual, expected)),
    }
}

fn is_operator_document(doc: &Document) -> bool {
    !doc.is_empty() && doc.keys().all(|k| k.starts_with('$'))
}

fn apply_operator(actual: Option<&Value>, op: &str, operand: &Value) -> DriverResult<bool> {
    Ok(match op {
        "$eq" => equals(actual, operand),
        "$ne" => !equals(actual, operand),
        "$gt" => compare(actual, operand).is_some_and(Ordering::is_gt),
        "$gte" => compare(actual, operand).is_some_and(Ordering::is_ge),
        "$lt" => compare(actual, operand).is_some_and(Ordering::is_lt),
        "$lte" => compare(actual, operand).is_some_and(Ordering::is_le),
        "$in" => candidates(op, operand)?.iter().any(|c| equals(actual, c)),
        "$nin" => !candidates(op, operand)?.iter().any(|c| equals(actual, c)),
        "$exists" => {
            let wanted = operand
                .as_bool()
                .ok_or_else(|| DriverError::invalid_query("$exists expects a bool"))?;
            actual.is_some() == wanted
        }
        other => {
            return Err(DriverError::invalid_query(format!(
                "unsupported operator {other}"
            )))
        }
    })
}

fn candidates<'a>(op: &str, operand: &'a Value) -> DriverResult<&'a [Value]> {
    operand
        .as_array()
        .ok_or_else(|| DriverError::invalid_query(format!("{op} expects an array")))
}

/// Equality with the store's array semantics: a scalar condition matches an
/// array field that contains it. A missing field equals only null.
fn equals(actual: Option<&Value>, expected: &Value) -> bool {
    match actual {
        None => expected.is_null(),
        Some(value) if values_equal(value, expected) => true,
        Some(Value::Array(items)) => items.iter().any(|item| values_equal(item, expected)),
        Some(_) => false,
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Integer(_) | Value::Float(_), Value::Integer(_) | Value::Float(_)) => {
            compare_values(a, b) == Some(Ordering::Equal)
        }
        _ => a == b,
    }
}

fn compare(actual: Option<&Value>, bound: &Value) -> Option<Ordering> {
    compare_values(actual?, bound)
}

/// Orders two values of comparable types. Numbers compare across integer
/// and float; other types compare only with themselves.
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Integer(x), Value::Integer(y)) => Some(x.cmp(y)),
        (Value::Integer(_) | Value::Float(_), Value::Integer(_) | Value::Float(_)) => {
            a.as_float()?.partial_cmp(&b.as_float()?)
        }
        (Value::Text(x), Value::Text(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        (Value::ObjectId(x), Value::ObjectId(y)) => Some(x.cmp(y)),
        (Value::Bytes(x), Value::Bytes(y)) => Some(x.cmp(y)),
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        _ => None,
    }
}

/// Total order used for sorting: missing and incomparable values sort first.
pub fn sort_order(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => {
            compare_values(x, y).unwrap_or_else(|| type_rank(x).cmp(&type_rank(y)))
        }
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Integer(_) | Value::Float(_) => 1,
        Value::Text(_) => 2,
        Value::Document(_) => 3,
        Value::Array(_) => 4,
        Value::Bytes(_) => 5,
        Value::ObjectId(_) => 6,
        Value::Bool(_) => 7,
    }
}
