//! Plain-text rendering of result rows.

use quest_core::Row;
use serde_json::Value;

/// Render one cell: strings bare, everything else as compact JSON, missing as empty.
pub fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Aligned table with a header rule. `columns` fixes the column order.
pub fn render(columns: &[&str], rows: &[Row]) -> String {
    if columns.is_empty() {
        return "(no rows)\n".to_string();
    }

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| columns.iter().map(|c| cell(row.get(*c))).collect())
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            cells
                .iter()
                .map(|r| r[idx].chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    push_line(&mut out, columns.iter().map(|c| c.to_string()), &widths);
    push_line(&mut out, widths.iter().map(|w| "-".repeat(*w)), &widths);
    for row in cells {
        push_line(&mut out, row.into_iter(), &widths);
    }
    out
}

fn push_line(out: &mut String, cells: impl Iterator<Item = String>, widths: &[usize]) {
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_render_aligns_columns() {
        let rows = vec![
            row(json!({"name": "Alice", "age": 30})),
            row(json!({"name": "Bob", "age": 41})),
        ];
        let table = render(&["name", "age"], &rows);
        assert_eq!(
            table,
            "name   age\n-----  ---\nAlice  30\nBob    41\n"
        );
    }

    #[test]
    fn test_missing_cells_are_blank() {
        let rows = vec![row(json!({"a": 1})), row(json!({"b": {"x": true}}))];
        let table = render(&["a", "b"], &rows);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[2], "1");
        assert_eq!(lines[3], "   {\"x\":true}");
    }

    #[test]
    fn test_no_columns() {
        assert_eq!(render(&[], &[]), "(no rows)\n");
    }
}
