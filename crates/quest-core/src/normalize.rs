//! Response normalizer: any known upstream payload shape to flat rows.
//!
//! Shapes are recognized by an ordered list of [`Recognizer`]s. The first
//! recognizer whose required fields are present decides the result; shapes
//! are never merged. Unknown shapes produce no rows.

use serde_json::Value;

use crate::query::Row;

/// Payload shapes, in recognition priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recognizer {
    /// `{records: [{keys, _fields | fields}]}`
    NativeRecords,
    /// `{data: {records: [{keys, _fields | fields}]}}`
    NestedRecords,
    /// `{results: [{columns, data: [{row}]}]}`
    LegacyResults,
    /// `{columns, data: [{row}]}`
    ColumnsData,
    /// `{data: [{..}]}`
    FlatData,
    /// `{records: [{..}]}` as answered by the guard worker.
    FlatRecords,
    /// `[{..}]`
    BareRows,
}

/// Recognizers in the order they are tried.
pub const RECOGNIZERS: [Recognizer; 7] = [
    Recognizer::NativeRecords,
    Recognizer::NestedRecords,
    Recognizer::LegacyResults,
    Recognizer::ColumnsData,
    Recognizer::FlatData,
    Recognizer::FlatRecords,
    Recognizer::BareRows,
];

impl Recognizer {
    /// Extract rows if the payload has this shape.
    pub fn extract(self, payload: &Value) -> Option<Vec<Row>> {
        match self {
            Self::NativeRecords => native_records(payload.get("records")?),
            Self::NestedRecords => native_records(payload.get("data")?.get("records")?),
            Self::LegacyResults => {
                let first = payload.get("results")?.as_array()?.first()?;
                zip_columns(first.get("columns")?, first.get("data")?)
            }
            Self::ColumnsData => zip_columns(payload.get("columns")?, payload.get("data")?),
            Self::FlatData => flat_objects(payload.get("data")?),
            Self::FlatRecords => flat_objects(payload.get("records")?),
            Self::BareRows => flat_objects(payload),
        }
    }
}

/// Normalize a payload into rows. Never fails; unknown shapes yield `[]`.
pub fn normalize(payload: &Value) -> Vec<Row> {
    recognize(payload).map(|(_, rows)| rows).unwrap_or_default()
}

/// Like [`normalize`], also reporting which shape matched.
pub fn recognize(payload: &Value) -> Option<(Recognizer, Vec<Row>)> {
    RECOGNIZERS
        .iter()
        .find_map(|r| r.extract(payload).map(|rows| (*r, rows)))
}

fn native_records(records: &Value) -> Option<Vec<Row>> {
    records.as_array()?.iter().map(native_record).collect()
}

fn native_record(record: &Value) -> Option<Row> {
    let keys = record.get("keys")?.as_array()?;
    let fields = record
        .get("_fields")
        .or_else(|| record.get("fields"))?
        .as_array()?;
    Some(zip_row(keys, fields))
}

fn zip_columns(columns: &Value, data: &Value) -> Option<Vec<Row>> {
    let columns = columns.as_array()?;
    data.as_array()?
        .iter()
        .map(|entry| {
            let row = entry.get("row")?.as_array()?;
            Some(zip_row(columns, row))
        })
        .collect()
}

fn zip_row(names: &[Value], values: &[Value]) -> Row {
    names
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let name = match name {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (name, values.get(idx).cloned().unwrap_or(Value::Null))
        })
        .collect()
}

fn flat_objects(value: &Value) -> Option<Vec<Row>> {
    value
        .as_array()?
        .iter()
        .map(|v| v.as_object().cloned())
        .collect()
}
