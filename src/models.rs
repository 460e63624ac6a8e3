use chrono::{NaiveDate, NaiveDateTime};

/// One scalar read from an uploaded sheet, before any schema is applied.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl Cell {
    /// Text rendering used when a cell lands in a free-text field.
    pub fn to_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Cell::Number(n) => n.to_string(),
            Cell::Bool(b) => b.to_string(),
            Cell::DateTime(dt) => {
                if dt.time() == chrono::NaiveTime::MIN {
                    dt.format("%Y-%m-%d").to_string()
                } else {
                    dt.format("%Y-%m-%d %H:%M:%S").to_string()
                }
            }
        }
    }

    /// Numeric coercion; anything that is not a finite number becomes `None`.
    pub fn to_number(&self) -> Option<f64> {
        let n = match self {
            Cell::Number(n) => *n,
            Cell::Text(s) => s.trim().replace(',', "").parse::<f64>().ok()?,
            _ => return None,
        };
        n.is_finite().then_some(n)
    }
}

/// Header plus rows, exactly as found on the first worksheet.
#[derive(Debug, Clone, Default)]
pub struct RawSheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl RawSheet {
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        static EMPTY: Cell = Cell::Empty;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }
}

/// A timesheet row normalized onto the fixed schema.
#[derive(Debug, Clone, PartialEq)]
pub struct TimesheetRecord {
    pub date: NaiveDate,
    pub category: String,
    pub subcategory: String,
    pub line_item: String,
    pub planned_li: i64,
    pub actual_li: i64,
    pub planned_mins: f64,
    pub actual_mins: f64,
    pub planned_details: String,
    pub actual_details: String,
}

impl TimesheetRecord {
    /// A record with every optional field at its default.
    pub fn on(date: NaiveDate) -> Self {
        Self {
            date,
            category: String::new(),
            subcategory: String::new(),
            line_item: String::new(),
            planned_li: 0,
            actual_li: 0,
            planned_mins: 0.0,
            actual_mins: 0.0,
            planned_details: String::new(),
            actual_details: String::new(),
        }
    }
}
