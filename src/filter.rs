use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::models::SalesTable;

/// Label shown for a filter control with no selection.
pub const ALL_LABEL: &str = "Tudo";

/// Year/month/day selection. `None` means "Tudo" (no filter on that part).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DateFilter {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

impl DateFilter {
    pub fn new(year: Option<i32>, month: Option<u32>, day: Option<u32>) -> Self {
        Self { year, month, day }
    }

    pub fn matches(&self, date: NaiveDate) -> bool {
        self.year.map_or(true, |y| date.year() == y)
            && self.month.map_or(true, |m| date.month() == m)
            && self.day.map_or(true, |d| date.day() == d)
    }

    pub fn is_unfiltered(&self) -> bool {
        self.year.is_none() && self.month.is_none() && self.day.is_none()
    }

    /// Human-readable description, e.g. "Ano 2025 · Mês 3 · Dia Tudo".
    pub fn describe(&self) -> String {
        fn part<T: std::fmt::Display>(v: Option<T>) -> String {
            v.map_or_else(|| ALL_LABEL.to_string(), |v| v.to_string())
        }
        format!(
            "Ano {} \u{b7} Mês {} \u{b7} Dia {}",
            part(self.year),
            part(self.month),
            part(self.day)
        )
    }
}

impl SalesTable {
    /// Rows whose date matches every set part of the filter, in original order.
    pub fn filter(&self, filter: &DateFilter) -> SalesTable {
        if filter.is_unfiltered() {
            return self.clone();
        }
        let rows = self
            .rows()
            .iter()
            .filter(|r| filter.matches(r.date))
            .cloned()
            .collect();
        SalesTable::new(rows)
    }
}

/// Values offered by the year/month/day controls, taken from the full table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    pub years: Vec<i32>,
    pub months: Vec<u32>,
    pub days: Vec<u32>,
}

impl FilterOptions {
    pub fn from_table(table: &SalesTable) -> Self {
        let mut years = BTreeSet::new();
        let mut months = BTreeSet::new();
        let mut days = BTreeSet::new();
        for row in table.rows() {
            years.insert(row.date.year());
            months.insert(row.date.month());
            days.insert(row.date.day());
        }
        Self {
            years: years.into_iter().collect(),
            months: months.into_iter().collect(),
            days: days.into_iter().collect(),
        }
    }
}

/// Step a selection through `[Tudo, values...]`, wrapping at both ends.
pub fn cycle<T: Copy + PartialEq>(current: Option<T>, values: &[T], delta: i32) -> Option<T> {
    let len = values.len() as i32 + 1;
    let pos = match current {
        None => 0,
        Some(v) => values.iter().position(|x| *x == v).map_or(0, |i| i as i32 + 1),
    };
    let next = (pos + delta).rem_euclid(len);
    if next == 0 {
        None
    } else {
        values.get((next - 1) as usize).copied()
    }
}
