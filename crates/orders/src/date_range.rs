//! Date-window filter behind `GET /orders/by-date-range/`.

use chrono::NaiveDate;
use serde::Deserialize;

use orderdesk_core::{DomainResult, FieldErrors, ValueObject};

use crate::payload::{parse_date, BAD_DATE};
use crate::Order;

/// Requested window: orders must start on/after `start` and embargo on/before `embargo`.
///
/// `start <= embargo` is not checked; an inverted window simply matches
/// whatever satisfies both bounds (usually nothing).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub embargo: NaiveDate,
}

impl ValueObject for DateRange {}

impl DateRange {
    pub fn new(start: NaiveDate, embargo: NaiveDate) -> Self {
        Self { start, embargo }
    }

    /// `start_date >= start AND embargo_date <= embargo`.
    pub fn contains(&self, order: &Order) -> bool {
        order.start_date >= self.start && order.embargo_date <= self.embargo
    }
}

/// Raw query string of the date-range endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DateRangeQuery {
    pub start_date: Option<String>,
    pub embargo_date: Option<String>,
}

impl DateRangeQuery {
    /// Resolve the query into a window.
    ///
    /// Returns `Ok(None)` when either parameter is missing or empty: the
    /// endpoint then answers with an empty list instead of every order.
    pub fn resolve(&self) -> DomainResult<Option<DateRange>> {
        let start = self.start_date.as_deref().filter(|s| !s.is_empty());
        let embargo = self.embargo_date.as_deref().filter(|s| !s.is_empty());
        let (Some(start), Some(embargo)) = (start, embargo) else {
            return Ok(None);
        };

        let mut errors = FieldErrors::new();
        let start = parse_date(start);
        if start.is_none() {
            errors.add("start_date", BAD_DATE);
        }
        let embargo = parse_date(embargo);
        if embargo.is_none() {
            errors.add("embargo_date", BAD_DATE);
        }
        errors.into_result()?;

        Ok(start.zip(embargo).map(|(start, embargo)| DateRange::new(start, embargo)))
    }
}
