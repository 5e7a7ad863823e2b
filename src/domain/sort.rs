//! Column sorting for report tables.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// How a column's values compare
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Number,
    Date,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub key: Option<String>,
    pub direction: SortDirection,
}

impl SortState {
    /// Clicking the current column flips its direction; a new column starts ascending
    pub fn toggle(&mut self, key: &str) {
        if self.key.as_deref() == Some(key) {
            self.direction = match self.direction {
                SortDirection::Asc => SortDirection::Desc,
                SortDirection::Desc => SortDirection::Asc,
            };
        } else {
            self.key = Some(key.to_string());
            self.direction = SortDirection::Asc;
        }
    }
}

/// Cell text as displayed: arrays are joined with ", "
pub fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| display_value(Some(item)))
            .collect::<Vec<_>>()
            .join(", "),
        Some(other) => other.to_string(),
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_date(value: &Value) -> Option<NaiveDate> {
    let s = value.as_str()?;
    s.get(..10)
        .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(a)) => a.is_empty(),
        _ => false,
    }
}

/// Sort key of one cell. Parsed values come first, then unparsable text,
/// then blanks; cells only compare within the same rank.
#[derive(Debug)]
enum Cell {
    Number(f64),
    Date(NaiveDate),
    Text(String),
    Blank,
}

fn cell(kind: ColumnKind, value: Option<&Value>) -> Cell {
    let value = match value {
        Some(v) if !is_blank(Some(v)) => v,
        _ => return Cell::Blank,
    };
    let parsed = match kind {
        ColumnKind::Number => as_number(value).map(Cell::Number),
        ColumnKind::Date => as_date(value).map(Cell::Date),
        ColumnKind::Text => None,
    };
    parsed.unwrap_or_else(|| Cell::Text(display_value(Some(value)).to_lowercase()))
}

fn rank(cell: &Cell) -> u8 {
    match cell {
        Cell::Number(_) | Cell::Date(_) => 0,
        Cell::Text(_) => 1,
        Cell::Blank => 2,
    }
}

/// Ascending comparison of two cells; blanks sort after every value
pub fn compare_cells(kind: ColumnKind, a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let (a, b) = (cell(kind, a), cell(kind, b));
    match (&a, &b) {
        (Cell::Number(x), Cell::Number(y)) => x.total_cmp(y),
        (Cell::Date(x), Cell::Date(y)) => x.cmp(y),
        (Cell::Text(x), Cell::Text(y)) => x.cmp(y),
        _ => rank(&a).cmp(&rank(&b)),
    }
}

/// Stable sort of JSON rows by one column
pub fn sort_rows(rows: &mut [Value], key: &str, kind: ColumnKind, direction: SortDirection) {
    rows.sort_by(|a, b| {
        let ordering = compare_cells(kind, a.get(key), b.get(key));
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(rows: &[Value]) -> Vec<&str> {
        rows.iter().filter_map(|r| r["itemName"].as_str()).collect()
    }

    #[test]
    fn test_toggle_flips_direction_on_same_key() {
        let mut state = SortState::default();
        state.toggle("quantity");
        assert_eq!(state.direction, SortDirection::Asc);
        state.toggle("quantity");
        assert_eq!(state.direction, SortDirection::Desc);
        state.toggle("itemName");
        assert_eq!(state.key.as_deref(), Some("itemName"));
        assert_eq!(state.direction, SortDirection::Asc);
    }

    #[test]
    fn test_numbers_compare_numerically() {
        let mut rows = vec![
            json!({ "itemName": "a", "quantity": 10 }),
            json!({ "itemName": "b", "quantity": 9 }),
            json!({ "itemName": "c", "quantity": "100" }),
        ];
        sort_rows(&mut rows, "quantity", ColumnKind::Number, SortDirection::Asc);
        assert_eq!(names(&rows), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_blanks_last_ascending_first_descending() {
        let mut rows = vec![
            json!({ "itemName": "x", "billDate": null }),
            json!({ "itemName": "y", "billDate": "2024-02-01" }),
            json!({ "itemName": "z", "billDate": "2023-11-30T00:00:00Z" }),
        ];
        sort_rows(&mut rows, "billDate", ColumnKind::Date, SortDirection::Asc);
        assert_eq!(names(&rows), vec!["z", "y", "x"]);
        sort_rows(&mut rows, "billDate", ColumnKind::Date, SortDirection::Desc);
        assert_eq!(names(&rows), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_sort_is_stable_for_ties() {
        let mut rows = vec![
            json!({ "itemName": "first", "location": "Hostel" }),
            json!({ "itemName": "second", "location": "hostel" }),
            json!({ "itemName": "third", "location": "Admin" }),
        ];
        sort_rows(&mut rows, "location", ColumnKind::Text, SortDirection::Asc);
        assert_eq!(names(&rows), vec!["third", "first", "second"]);
    }

    #[test]
    fn test_mixed_number_cells_are_totally_ordered() {
        let (nine, ten, odd) = (json!(9), json!(10), json!("1a"));
        assert_eq!(compare_cells(ColumnKind::Number, Some(&nine), Some(&ten)), Ordering::Less);
        assert_eq!(compare_cells(ColumnKind::Number, Some(&ten), Some(&odd)), Ordering::Less);
        assert_eq!(compare_cells(ColumnKind::Number, Some(&odd), Some(&nine)), Ordering::Greater);

        let cells = [json!(9), json!(10), json!("1a"), json!("NaN"), Value::Null, json!("x"), json!(-3)];
        let mut rows: Vec<Value> = (0..2000)
            .map(|i| json!({ "itemName": i.to_string(), "quantity": cells[i % cells.len()] }))
            .collect();
        sort_rows(&mut rows, "quantity", ColumnKind::Number, SortDirection::Asc);

        let ranks: Vec<u8> = rows
            .iter()
            .map(|r| rank(&cell(ColumnKind::Number, r.get("quantity"))))
            .collect();
        assert!(ranks.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(rows[0]["quantity"], json!(-3));
        assert!(rows.last().is_some_and(|r| r["quantity"].is_null()));
    }

    #[test]
    fn test_date_toggle_keeps_tied_rows_in_order() {
        let mut rows = vec![
            json!({ "itemName": "p", "billDate": "2024-03-01" }),
            json!({ "itemName": "q", "billDate": "2024-01-05" }),
            json!({ "itemName": "r", "billDate": "2024-03-01" }),
            json!({ "itemName": "s", "billDate": "2024-02-10" }),
        ];
        let mut state = SortState::default();

        state.toggle("billDate");
        sort_rows(&mut rows, "billDate", ColumnKind::Date, state.direction);
        assert_eq!(names(&rows), vec!["q", "s", "p", "r"]);

        state.toggle("billDate");
        assert_eq!(state.direction, SortDirection::Desc);
        sort_rows(&mut rows, "billDate", ColumnKind::Date, state.direction);
        assert_eq!(names(&rows), vec!["p", "r", "s", "q"]);
    }

    #[test]
    fn test_arrays_display_joined() {
        let value = json!(["A1", "A2"]);
        assert_eq!(display_value(Some(&value)), "A1, A2");
    }
}
