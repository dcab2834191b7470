//! Date and date-range coercion
//!
//! Accepted values (months and days may be one or two digits):
//!
//! | form                     | meaning                                  |
//! |--------------------------|------------------------------------------|
//! | `YYYY`                   | the whole year                           |
//! | `YYYY-MM`                | the whole month                          |
//! | `YYYY-MM-DD`             | one day                                  |
//! | `YYYY-YYYY`              | first day of year one to last of year two |
//! | `YYYY-MM-YYYY-MM`        | month span                               |
//! | `YYYY-MM-DD-YYYY-MM-DD`  | day span                                 |
//! | `MM`                     | that month, every year                   |
//! | `MM-MM`                  | month span, every year                   |
//! | `MM-DD-MM-DD`            | day span, every year                     |
//!
//! Annual spans may wrap the new year (`12-02` is December to February).

use super::{range_input, Coercer, FieldInput, FilterValue, FormValue, RangeInput, Span};
use crate::error::CoerceError;
use crate::schema::Kind;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::fmt;

/// One end of a date span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DateBound {
    /// A calendar day
    Date(NaiveDate),
    /// A day that recurs every year
    MonthDay { month: u32, day: u32 },
}

impl DateBound {
    fn is_annual(&self) -> bool {
        matches!(self, DateBound::MonthDay { .. })
    }
}

impl fmt::Display for DateBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateBound::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            DateBound::MonthDay { month, day } => write!(f, "{:02}-{:02}", month, day),
        }
    }
}

/// Days in `month`, allowing February 29 for annual dates
fn annual_days_in_month(month: u32) -> Option<u32> {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => Some(31),
        4 | 6 | 9 | 11 => Some(30),
        2 => Some(29),
        _ => None,
    }
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

fn month_day(month: u32, day: u32) -> Option<DateBound> {
    let max = annual_days_in_month(month)?;
    (1..=max)
        .contains(&day)
        .then_some(DateBound::MonthDay { month, day })
}

fn ymd(year: i32, month: u32, day: u32) -> Option<DateBound> {
    NaiveDate::from_ymd_opt(year, month, day).map(DateBound::Date)
}

fn month_start(year: i32, month: u32) -> Option<DateBound> {
    ymd(year, month, 1)
}

fn month_end(year: i32, month: u32) -> Option<DateBound> {
    last_day_of_month(year, month).map(DateBound::Date)
}

fn annual_month_end(month: u32) -> Option<DateBound> {
    month_day(month, annual_days_in_month(month)?)
}

/// Parse one value of the grammar above into its full span
pub(crate) fn parse_date_token(value: &str) -> Result<(DateBound, DateBound), CoerceError> {
    let groups: Vec<&str> = value.split('-').collect();
    if groups
        .iter()
        .any(|g| g.is_empty() || !g.bytes().all(|b| b.is_ascii_digit()))
    {
        return Err(CoerceError::invalid_date(value));
    }
    token_span(&groups).ok_or_else(|| CoerceError::invalid_date(value))
}

fn token_span(groups: &[&str]) -> Option<(DateBound, DateBound)> {
    let lengths: Vec<usize> = groups.iter().map(|g| g.len()).collect();
    let year = |i: usize| groups[i].parse::<i32>().ok();
    let num = |i: usize| groups[i].parse::<u32>().ok();

    match lengths.as_slice() {
        [4] => {
            let y = year(0)?;
            Some((ymd(y, 1, 1)?, ymd(y, 12, 31)?))
        }
        [4, 1..=2] => {
            let (y, m) = (year(0)?, num(1)?);
            Some((month_start(y, m)?, month_end(y, m)?))
        }
        [4, 1..=2, 1..=2] => {
            let day = ymd(year(0)?, num(1)?, num(2)?)?;
            Some((day, day))
        }
        [4, 4] => Some((ymd(year(0)?, 1, 1)?, ymd(year(1)?, 12, 31)?)),
        [4, 1..=2, 4, 1..=2] => Some((
            month_start(year(0)?, num(1)?)?,
            month_end(year(2)?, num(3)?)?,
        )),
        [4, 1..=2, 1..=2, 4, 1..=2, 1..=2] => Some((
            ymd(year(0)?, num(1)?, num(2)?)?,
            ymd(year(3)?, num(4)?, num(5)?)?,
        )),
        [1..=2] => {
            let m = num(0)?;
            Some((month_day(m, 1)?, annual_month_end(m)?))
        }
        [1..=2, 1..=2] => Some((month_day(num(0)?, 1)?, annual_month_end(num(1)?)?)),
        [1..=2, 1..=2, 1..=2, 1..=2] => Some((
            month_day(num(0)?, num(1)?)?,
            month_day(num(2)?, num(3)?)?,
        )),
        _ => None,
    }
}

/// Resolve date input into a span whose ends are both absolute or both annual
pub(crate) fn parse_date_span(shape: RangeInput<'_>) -> Result<Span<DateBound>, CoerceError> {
    let (span, source) = match shape {
        RangeInput::Single(value) => {
            let (start, end) = parse_date_token(value)?;
            (Span::new(Some(start), Some(end)), value.to_string())
        }
        RangeInput::Ends(start, end) => {
            let start_bound = start.map(parse_date_token).transpose()?.map(|(s, _)| s);
            let end_bound = end.map(parse_date_token).transpose()?.map(|(_, e)| e);
            let source = format!("{}..{}", start.unwrap_or(""), end.unwrap_or(""));
            (Span::new(start_bound, end_bound), source)
        }
    };

    if let (Some(start), Some(end)) = (span.start, span.end) {
        if start.is_annual() != end.is_annual() {
            return Err(CoerceError::invalid_date(source));
        }
    }
    Ok(span)
}

/// Token that parses back to exactly `bound` as either end of a span
fn bound_token(bound: &DateBound) -> String {
    match bound {
        DateBound::Date(_) => bound.to_string(),
        DateBound::MonthDay { .. } => format!("{}-{}", bound, bound),
    }
}

fn format_date_span(span: &Span<DateBound>) -> Option<String> {
    match (&span.start, &span.end) {
        (Some(DateBound::Date(s)), Some(DateBound::Date(e))) if s == e => {
            Some(s.format("%Y-%m-%d").to_string())
        }
        (Some(DateBound::Date(s)), Some(DateBound::Date(e)))
            if (s.month(), s.day()) == (1, 1) && (e.month(), e.day()) == (12, 31) =>
        {
            if s.year() == e.year() {
                Some(s.year().to_string())
            } else {
                Some(format!("{}-{}", s.year(), e.year()))
            }
        }
        (Some(start), Some(end)) => Some(format!("{}-{}", start, end)),
        (Some(start), None) => Some(format!("{}..", bound_token(start))),
        (None, Some(end)) => Some(format!("..{}", bound_token(end))),
        (None, None) => None,
    }
}

/// Coercer for `date` and `date_range` fields
pub struct DateCoercer(pub Kind);

impl Coercer for DateCoercer {
    fn kind(&self) -> Kind {
        self.0
    }

    fn parse(&self, input: &FieldInput<'_>) -> Result<Option<FilterValue>, CoerceError> {
        let Some(shape) = range_input(input)? else {
            return Ok(None);
        };
        parse_date_span(shape).map(|span| Some(FilterValue::Dates(span)))
    }

    fn format(&self, value: &FilterValue) -> FormValue {
        match value {
            FilterValue::Dates(span) => FormValue {
                primary: format_date_span(span),
                companion: None,
            },
            _ => FormValue::default(),
        }
    }
}
