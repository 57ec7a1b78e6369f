//! Query and result types shared by the dispatcher and its callers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{DispatchError, DispatchResult};
use crate::trace::DebugTrace;

/// One flattened result row: column name to value, in column order.
pub type Row = Map<String, Value>;

/// Named query parameters.
pub type Params = Map<String, Value>;

/// A graph query statement plus its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    statement: String,
    #[serde(default)]
    params: Params,
}

impl Query {
    /// Build a query; empty or whitespace-only statements are rejected.
    pub fn new(statement: impl Into<String>, params: Params) -> DispatchResult<Self> {
        let statement = statement.into();
        if statement.trim().is_empty() {
            return Err(DispatchError::InvalidQuery);
        }
        Ok(Self { statement, params })
    }

    /// Query without parameters.
    pub fn statement(statement: impl Into<String>) -> DispatchResult<Self> {
        Self::new(statement, Params::new())
    }

    pub fn text(&self) -> &str {
        &self.statement
    }

    pub fn params(&self) -> &Params {
        &self.params
    }
}

/// The dispatcher's sole return contract.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedResult {
    /// Flat rows in upstream order.
    pub rows: Vec<Row>,

    /// True iff `rows` came from the mock catalog.
    pub mocked: bool,

    /// Live endpoint that answered. For mocked results this is the endpoint
    /// whose empty answer triggered the substitution, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_endpoint: Option<String>,

    /// Set when mock rows replaced an empty live answer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,

    /// Every outbound attempt, in order.
    pub trace: DebugTrace,
}

impl NormalizedResult {
    /// Column names in first-seen order across all rows.
    pub fn columns(&self) -> Vec<&str> {
        columns(&self.rows)
    }
}

/// Column names in first-seen order across `rows`.
pub fn columns(rows: &[Row]) -> Vec<&str> {
    let mut columns: Vec<&str> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !columns.contains(&key.as_str()) {
                columns.push(key);
            }
        }
    }
    columns
}
