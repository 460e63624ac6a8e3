use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::fmt;
use crate::models::TimesheetRecord;
use crate::weeks::{week_ranges, WeekWindow};

// ---------------------------------------------------------------------------
// Table plumbing
// ---------------------------------------------------------------------------

/// A report row with a fixed header, so empty views keep their schema.
pub trait TableRow {
    const COLUMNS: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

/// Rendered-ready table: headers plus stringified cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub columns: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn from_rows<R: TableRow>(rows: &[R]) -> Self {
        Self {
            columns: R::COLUMNS.to_vec(),
            rows: rows.iter().map(TableRow::cells).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn round_to(val: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (val * factor).round() / factor
}

// ---------------------------------------------------------------------------
// Current week
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentWeekRow {
    pub date: NaiveDate,
    pub category: String,
    pub subcategory: String,
    pub line_item: String,
    pub planned_li: i64,
    pub actual_li: i64,
    pub li_match: bool,
    pub planned_mins: f64,
    pub actual_mins: f64,
    pub effort_delta: f64,
    pub planned_details: String,
    pub actual_details: String,
}

impl TableRow for CurrentWeekRow {
    const COLUMNS: &'static [&'static str] = &[
        "Date",
        "Category",
        "Subcategory",
        "Line Item",
        "Planned LI",
        "Actual LI",
        "LI Match",
        "Planned Efforts (mins)",
        "Actual Efforts (mins)",
        "Effort Δ (mins)",
        "Planned Details",
        "Actual Details",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.date.format("%Y-%m-%d").to_string(),
            self.category.clone(),
            self.subcategory.clone(),
            self.line_item.clone(),
            self.planned_li.to_string(),
            self.actual_li.to_string(),
            if self.li_match { "Match" } else { "Mismatch" }.to_string(),
            fmt::minutes(self.planned_mins),
            fmt::minutes(self.actual_mins),
            fmt::minutes(self.effort_delta),
            self.planned_details.clone(),
            self.actual_details.clone(),
        ]
    }
}

pub fn current_week_rows(records: &[&TimesheetRecord]) -> Vec<CurrentWeekRow> {
    records
        .iter()
        .map(|r| CurrentWeekRow {
            date: r.date,
            category: r.category.clone(),
            subcategory: r.subcategory.clone(),
            line_item: r.line_item.clone(),
            planned_li: r.planned_li,
            actual_li: r.actual_li,
            li_match: r.planned_li == r.actual_li,
            planned_mins: r.planned_mins,
            actual_mins: r.actual_mins,
            effort_delta: r.actual_mins - r.planned_mins,
            planned_details: r.planned_details.clone(),
            actual_details: r.actual_details.clone(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Next week (plan only; nothing has happened yet)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct NextWeekRow {
    pub date: NaiveDate,
    pub category: String,
    pub subcategory: String,
    pub line_item: String,
    pub planned_li: i64,
    pub planned_mins: f64,
    pub planned_details: String,
}

impl TableRow for NextWeekRow {
    const COLUMNS: &'static [&'static str] = &[
        "Date",
        "Category",
        "Subcategory",
        "Line Item",
        "Planned LI",
        "Planned Efforts (mins)",
        "Planned Details",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.date.format("%Y-%m-%d").to_string(),
            self.category.clone(),
            self.subcategory.clone(),
            self.line_item.clone(),
            self.planned_li.to_string(),
            fmt::minutes(self.planned_mins),
            self.planned_details.clone(),
        ]
    }
}

pub fn next_week_rows(records: &[&TimesheetRecord]) -> Vec<NextWeekRow> {
    records
        .iter()
        .map(|r| NextWeekRow {
            date: r.date,
            category: r.category.clone(),
            subcategory: r.subcategory.clone(),
            line_item: r.line_item.clone(),
            planned_li: r.planned_li,
            planned_mins: r.planned_mins,
            planned_details: r.planned_details.clone(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Plan vs actual deviation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct DeviationRow {
    pub category: String,
    pub subcategory: String,
    pub line_item: String,
    pub planned_li: i64,
    pub actual_li: i64,
    pub li_delta: i64,
    pub planned_mins: f64,
    pub actual_mins: f64,
    pub effort_delta: f64,
    pub effort_delta_pct: f64,
}

impl TableRow for DeviationRow {
    const COLUMNS: &'static [&'static str] = &[
        "Category",
        "Subcategory",
        "Line Item",
        "Planned LI",
        "Actual LI",
        "LI Δ",
        "Planned Efforts (mins)",
        "Actual Efforts (mins)",
        "Effort Δ (mins)",
        "Effort Δ %",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.category.clone(),
            self.subcategory.clone(),
            self.line_item.clone(),
            self.planned_li.to_string(),
            self.actual_li.to_string(),
            self.li_delta.to_string(),
            fmt::minutes(self.planned_mins),
            fmt::minutes(self.actual_mins),
            fmt::minutes(self.effort_delta),
            fmt::percent(self.effort_delta_pct),
        ]
    }
}

#[derive(Default)]
struct GroupTotals {
    planned_li: i64,
    actual_li: i64,
    planned_mins: f64,
    actual_mins: f64,
}

/// Group by (Category, Subcategory, Line Item) and compare plan with actuals.
/// Groups with no planned minutes report a 0% deviation.
pub fn deviation_summary(records: &[&TimesheetRecord]) -> Vec<DeviationRow> {
    let mut groups: BTreeMap<(&str, &str, &str), GroupTotals> = BTreeMap::new();
    for r in records {
        let totals = groups
            .entry((r.category.as_str(), r.subcategory.as_str(), r.line_item.as_str()))
            .or_default();
        totals.planned_li = totals.planned_li.saturating_add(r.planned_li);
        totals.actual_li = totals.actual_li.saturating_add(r.actual_li);
        totals.planned_mins += r.planned_mins;
        totals.actual_mins += r.actual_mins;
    }

    groups
        .into_iter()
        .map(|((category, subcategory, line_item), t)| {
            let delta = t.actual_mins - t.planned_mins;
            let pct = if t.planned_mins != 0.0 {
                delta / t.planned_mins * 100.0
            } else {
                0.0
            };
            DeviationRow {
                category: category.to_string(),
                subcategory: subcategory.to_string(),
                line_item: line_item.to_string(),
                planned_li: t.planned_li,
                actual_li: t.actual_li,
                li_delta: t.actual_li.saturating_sub(t.planned_li),
                planned_mins: t.planned_mins,
                actual_mins: t.actual_mins,
                effort_delta: round_to(delta, 2),
                effort_delta_pct: round_to(pct, 1),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Whole report
// ---------------------------------------------------------------------------

pub struct WeeklySummary {
    pub current_week: WeekWindow,
    pub next_week: WeekWindow,
    pub current: Vec<CurrentWeekRow>,
    pub next: Vec<NextWeekRow>,
    pub deviation: Vec<DeviationRow>,
}

pub fn summarize(records: &[TimesheetRecord], today: NaiveDate) -> WeeklySummary {
    let (current_week, next_week) = week_ranges(today);
    let this_week = current_week.select(records);
    let upcoming = next_week.select(records);

    WeeklySummary {
        current_week,
        next_week,
        current: current_week_rows(&this_week),
        next: next_week_rows(&upcoming),
        deviation: deviation_summary(&this_week),
    }
}
