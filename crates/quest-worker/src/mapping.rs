//! Upstream payload to flat records.
//!
//! The query API answers in the data-API shape (`data.fields` plus rows);
//! older servers answer in the transactional shape (`results[0]`). Values in
//! either are unwrapped so callers see plain JSON.

use serde_json::{Map, Value};

/// One flat record.
pub type Record = Map<String, Value>;

/// Map an upstream payload, preferring the data-API shape.
pub fn format_records(payload: &Value) -> Vec<Record> {
    map_data_api(payload).unwrap_or_else(|| map_legacy(payload))
}

/// Unwrap driver-specific value encodings.
///
/// `{low, high}` integers keep only the low 32 bits' value; nodes reduce to
/// their properties; single-key `{value}` wrappers are removed.
pub fn normalize_value(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(normalize_value).collect()),
        Value::Object(map) => {
            if let (Some(low), Some(Value::Number(_))) = (map.get("low"), map.get("high")) {
                if low.is_number() {
                    return low.clone();
                }
            }
            if let Some(properties) = map.get("properties") {
                return normalize_value(properties);
            }
            if map.len() == 1 {
                if let Some(inner) = map.get("value") {
                    return normalize_value(inner);
                }
            }
            Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), normalize_value(v)))
                    .collect(),
            )
        }
        _ => value.clone(),
    }
}

fn map_data_api(payload: &Value) -> Option<Vec<Record>> {
    let data = payload.get("data")?;
    let fields = data.get("fields")?.as_array()?;
    let rows = data
        .get("records")
        .or_else(|| data.get("values"))?
        .as_array()?;
    if fields.is_empty() || rows.is_empty() {
        return None;
    }

    let names: Vec<String> = fields.iter().enumerate().map(field_name).collect();
    Some(
        rows.iter()
            .map(|row| {
                let values = row_values(row);
                names
                    .iter()
                    .enumerate()
                    .map(|(idx, name)| {
                        let raw = values.get(idx).map(unwrap_value).unwrap_or(&Value::Null);
                        (name.clone(), normalize_value(raw))
                    })
                    .collect()
            })
            .collect(),
    )
}

fn map_legacy(payload: &Value) -> Vec<Record> {
    let Some(result) = payload
        .get("results")
        .and_then(Value::as_array)
        .and_then(|r| r.first())
    else {
        return Vec::new();
    };

    let columns: &[Value] = result
        .get("columns")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let entries: &[Value] = result
        .get("data")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    entries
        .iter()
        .map(|entry| {
            let row = entry.get("row").unwrap_or(entry);
            columns
                .iter()
                .enumerate()
                .map(|(idx, column)| {
                    let name = column.as_str().map(String::from).unwrap_or_else(|| column.to_string());
                    let value = row.get(idx).map(normalize_value).unwrap_or(Value::Null);
                    (name, value)
                })
                .collect()
        })
        .collect()
}

fn field_name((idx, field): (usize, &Value)) -> String {
    match field {
        Value::String(name) => name.clone(),
        Value::Object(map) => ["name", "field", "key"]
            .iter()
            .find_map(|k| map.get(*k).and_then(Value::as_str))
            .map(String::from)
            .unwrap_or_else(|| format!("field_{idx}")),
        _ => format!("field_{idx}"),
    }
}

fn row_values(row: &Value) -> &[Value] {
    if let Some(values) = row.as_array() {
        return values;
    }
    ["values", "data", "row"]
        .iter()
        .find_map(|k| row.get(*k).and_then(Value::as_array))
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// `{value: X, ..}` cells carry their payload in `value`.
fn unwrap_value(cell: &Value) -> &Value {
    match cell.get("value") {
        Some(inner) if !inner.is_null() => inner,
        _ => cell,
    }
}
