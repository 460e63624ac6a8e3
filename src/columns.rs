use crate::error::{Result, SummaryError};

/// Canonical timesheet fields a sheet column can be mapped onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Date,
    Category,
    Subcategory,
    LineItem,
    PlannedLi,
    ActualLi,
    PlannedMins,
    ActualMins,
    PlannedDetails,
    ActualDetails,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Date => "Date",
            Self::Category => "Category",
            Self::Subcategory => "Subcategory",
            Self::LineItem => "Line Item",
            Self::PlannedLi => "Planned LI",
            Self::ActualLi => "Actual LI",
            Self::PlannedMins => "Planned Efforts (mins)",
            Self::ActualMins => "Actual Efforts (mins)",
            Self::PlannedDetails => "Planned Details",
            Self::ActualDetails => "Actual Details",
        }
    }
}

// ---------------------------------------------------------------------------
// Rule table. Evaluated top to bottom; a column claimed by an earlier field is
// not offered to later ones, so the specific fields sit above the broad
// needles ("cat", "planned", "li").
// ---------------------------------------------------------------------------

const RULES: &[(Field, &[&str])] = &[
    (Field::Date, &["date"]),
    (
        Field::Subcategory,
        &["sub-category", "subcategory", "sub category", "subcat"],
    ),
    (Field::Category, &["category", "cat"]),
    (
        Field::PlannedDetails,
        &["planned details", "planned detail", "plan detail", "plan desc"],
    ),
    (
        Field::ActualDetails,
        &["actual details", "actual detail", "actual desc", "done detail"],
    ),
    (
        Field::PlannedMins,
        &[
            "planned effort",
            "planned mins",
            "planned minutes",
            "plan effort",
            "plan mins",
            "plan minutes",
        ],
    ),
    (
        Field::ActualMins,
        &[
            "actual effort",
            "actual mins",
            "actual minutes",
            "done effort",
            "done mins",
            "done minutes",
        ],
    ),
    (
        Field::PlannedLi,
        &[
            "planned li",
            "planned line",
            "planned items",
            "planned count",
            "plan count",
            "planned",
        ],
    ),
    (
        Field::ActualLi,
        &[
            "actual li",
            "actual line",
            "actual items",
            "actual count",
            "done count",
            "completed",
            "actual",
        ],
    ),
    (
        Field::LineItem,
        &["line item", "line_item", "lineitem", "task", "activity", "li"],
    ),
];

/// Resolved column index per canonical field. The date column is always present.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMap {
    pub date: usize,
    pub category: Option<usize>,
    pub subcategory: Option<usize>,
    pub line_item: Option<usize>,
    pub planned_li: Option<usize>,
    pub actual_li: Option<usize>,
    pub planned_mins: Option<usize>,
    pub actual_mins: Option<usize>,
    pub planned_details: Option<usize>,
    pub actual_details: Option<usize>,
}

impl ColumnMap {
    pub fn get(&self, field: Field) -> Option<usize> {
        match field {
            Field::Date => Some(self.date),
            Field::Category => self.category,
            Field::Subcategory => self.subcategory,
            Field::LineItem => self.line_item,
            Field::PlannedLi => self.planned_li,
            Field::ActualLi => self.actual_li,
            Field::PlannedMins => self.planned_mins,
            Field::ActualMins => self.actual_mins,
            Field::PlannedDetails => self.planned_details,
            Field::ActualDetails => self.actual_details,
        }
    }
}

/// First unclaimed column matching any needle, needles tried in priority order.
pub fn find_column(lowered: &[String], needles: &[&str], claimed: &[usize]) -> Option<usize> {
    needles.iter().find_map(|needle| {
        lowered
            .iter()
            .enumerate()
            .find(|(i, label)| !claimed.contains(i) && label.contains(needle))
            .map(|(i, _)| i)
    })
}

/// Map arbitrary column labels onto the canonical schema.
///
/// Fails with [`SummaryError::MissingColumn`] when nothing looks like a date
/// column; every other field is optional.
pub fn resolve_columns<S: AsRef<str>>(headers: &[S]) -> Result<ColumnMap> {
    let lowered: Vec<String> = headers.iter().map(|h| h.as_ref().to_lowercase()).collect();
    let mut claimed: Vec<usize> = Vec::new();
    let mut resolved: Vec<(Field, usize)> = Vec::new();

    for (field, needles) in RULES {
        if let Some(idx) = find_column(&lowered, needles, &claimed) {
            claimed.push(idx);
            resolved.push((*field, idx));
        }
    }

    let lookup = |f: Field| resolved.iter().find(|(rf, _)| *rf == f).map(|(_, i)| *i);
    let date = lookup(Field::Date).ok_or(SummaryError::MissingColumn("date"))?;

    let map = ColumnMap {
        date,
        category: lookup(Field::Category),
        subcategory: lookup(Field::Subcategory),
        line_item: lookup(Field::LineItem),
        planned_li: lookup(Field::PlannedLi),
        actual_li: lookup(Field::ActualLi),
        planned_mins: lookup(Field::PlannedMins),
        actual_mins: lookup(Field::ActualMins),
        planned_details: lookup(Field::PlannedDetails),
        actual_details: lookup(Field::ActualDetails),
    };
    for (field, idx) in &resolved {
        log::debug!("column {:?} -> {}", headers[*idx].as_ref(), field.label());
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_date_column_is_schema_error() {
        let err = resolve_columns(&["Category", "Task", "Planned LI"]).unwrap_err();
        assert!(matches!(err, SummaryError::MissingColumn("date")));
    }

    #[test]
    fn test_date_match_is_case_insensitive_substring() {
        let map = resolve_columns(&["Task", "WORK DATE"]).unwrap();
        assert_eq!(map.date, 1);
        assert_eq!(map.line_item, Some(0));
    }

    #[test]
    fn test_abbreviated_headers_map_onto_schema() {
        let headers = [
            "Activity Date",
            "Cat",
            "Task",
            "Plan Count",
            "Done Count",
            "Plan Mins",
            "Done Mins",
        ];
        let map = resolve_columns(&headers).unwrap();
        assert_eq!(map.date, 0);
        assert_eq!(map.category, Some(1));
        assert_eq!(map.line_item, Some(2));
        assert_eq!(map.planned_li, Some(3));
        assert_eq!(map.actual_li, Some(4));
        assert_eq!(map.planned_mins, Some(5));
        assert_eq!(map.actual_mins, Some(6));
        assert_eq!(map.subcategory, None);
        assert_eq!(map.planned_details, None);
        assert_eq!(map.actual_details, None);
    }

    #[test]
    fn test_canonical_headers_resolve_exactly() {
        let headers = [
            "Date",
            "Category",
            "Subcategory",
            "Line Item",
            "Planned LI",
            "Actual LI",
            "Planned Efforts (mins)",
            "Actual Efforts (mins)",
            "Planned Details",
            "Actual Details",
        ];
        let map = resolve_columns(&headers).unwrap();
        let fields = [
            Field::Date,
            Field::Category,
            Field::Subcategory,
            Field::LineItem,
            Field::PlannedLi,
            Field::ActualLi,
            Field::PlannedMins,
            Field::ActualMins,
            Field::PlannedDetails,
            Field::ActualDetails,
        ];
        for (i, field) in fields.iter().enumerate() {
            assert_eq!(map.get(*field), Some(i), "{}", field.label());
            assert_eq!(field.label(), headers[i]);
        }
    }

    #[test]
    fn test_needle_priority_beats_column_position() {
        // "actual" would hit column 0 first, but "actual li" is the higher-priority needle
        let map = resolve_columns(&["Date", "Actual Notes", "Actual Line Items Completed"]).unwrap();
        assert_eq!(map.actual_li, Some(2));
    }

    #[test]
    fn test_subcategory_is_not_taken_by_category() {
        let map = resolve_columns(&["Subcategory", "Category", "Date"]).unwrap();
        assert_eq!(map.subcategory, Some(0));
        assert_eq!(map.category, Some(1));
    }

    #[test]
    fn test_claimed_column_is_not_reused() {
        // Only an efforts column: the broad "planned" needle must not grab it as a count
        let map = resolve_columns(&["Date", "Planned Efforts"]).unwrap();
        assert_eq!(map.planned_mins, Some(1));
        assert_eq!(map.planned_li, None);
    }

    #[test]
    fn test_find_column_returns_none_without_match() {
        let lowered = vec!["foo".to_string(), "bar".to_string()];
        assert_eq!(find_column(&lowered, &["date"], &[]), None);
        assert_eq!(find_column(&lowered, &["ba"], &[1]), None);
    }
}
