//! Write-safety filter for caller-supplied statements.
//!
//! A syntactic keyword denylist, not a parser: statements that merely mention
//! a keyword (inside a string literal, say) are rejected too.

use once_cell::sync::Lazy;
use regex::Regex;

static LINE_BREAKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\n\s*").unwrap());

static BLOCKED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(CREATE|MERGE|DELETE|DETACH|SET|DROP|CALL|APOC)").unwrap());

/// Why a statement was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("cypher is required")]
    Empty,

    #[error("Write/Procedure queries are not allowed")]
    WriteOrProcedure,
}

/// Trim, fold line breaks into single spaces, and apply the denylist.
///
/// Returns the statement to forward upstream.
pub fn screen(raw: &str) -> Result<String, Rejection> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Rejection::Empty);
    }

    let statement = LINE_BREAKS.replace_all(trimmed, " ").into_owned();
    if BLOCKED.is_match(&statement) {
        return Err(Rejection::WriteOrProcedure);
    }
    Ok(statement)
}
