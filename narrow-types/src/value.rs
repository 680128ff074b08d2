//! Helpers for submitted form values.
//!
//! Hosts hand submitted state over as a JSON tree. Object keys follow the
//! [`SlotKey`] rules; arrays are treated as ordinal-keyed maps.

use crate::{Error, FormPath, SlotKey};
use serde_json::{Map, Value};

/// Whether a submitted value counts as empty.
///
/// Empty means `null`, `false`, zero, `""`, `"0"`, or an empty array/object,
/// which is how form hosts treat an untouched input.
#[must_use]
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// Returns the ordinal-keyed children of a submitted value, in key order.
///
/// Named entries (`add_more`, `_weight`, ...) are skipped. Scalars have no
/// slots.
#[must_use]
pub fn ordinal_slots(value: &Value) -> Vec<(usize, &Value)> {
    let mut slots: Vec<(usize, &Value)> = match value {
        Value::Array(items) => items.iter().enumerate().collect(),
        Value::Object(map) => map
            .iter()
            .filter_map(|(k, v)| SlotKey::parse(k).as_ordinal().map(|n| (n, v)))
            .collect(),
        _ => Vec::new(),
    };
    slots.sort_by_key(|(n, _)| *n);
    slots
}

/// Reads the value at `path`, if every step exists.
#[must_use]
pub fn lookup<'a>(root: &'a Value, path: &FormPath) -> Option<&'a Value> {
    path.keys().iter().try_fold(root, |current, key| match current {
        Value::Object(map) => map.get(&key.to_string()),
        Value::Array(items) => key.as_ordinal().and_then(|n| items.get(n)),
        _ => None,
    })
}

/// Writes `value` at `path`, creating intermediate objects as needed.
///
/// Fails when an intermediate step is an existing scalar.
pub fn insert_at(root: &mut Value, path: &FormPath, value: Value) -> Result<(), Error> {
    let Some((last, parents)) = path.keys().split_last() else {
        *root = value;
        return Ok(());
    };

    let mut current = root;
    let mut walked = FormPath::root();
    for key in parents {
        walked.push(key.clone());
        if current.is_null() {
            *current = Value::Object(Map::new());
        }
        current = match current {
            Value::Object(map) => map
                .entry(key.to_string())
                .or_insert_with(|| Value::Object(Map::new())),
            Value::Array(items) => match key.as_ordinal() {
                Some(n) if n < items.len() => &mut items[n],
                _ => return Err(Error::NotAContainer(walked)),
            },
            _ => return Err(Error::NotAContainer(walked)),
        };
    }

    if current.is_null() {
        *current = Value::Object(Map::new());
    }
    match current {
        Value::Object(map) => {
            map.insert(last.to_string(), value);
            Ok(())
        }
        Value::Array(items) => match last.as_ordinal() {
            Some(n) if n < items.len() => {
                items[n] = value;
                Ok(())
            }
            Some(n) if n == items.len() => {
                items.push(value);
                Ok(())
            }
            _ => Err(Error::NotAContainer(walked)),
        },
        _ => Err(Error::NotAContainer(walked)),
    }
}
