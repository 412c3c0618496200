//! Helpers for building SQL condition fragments.

use core::fmt::Display;

use chrono::{Datelike, NaiveDate};

/// Quote a literal for use in a condition, doubling embedded single quotes.
pub fn sql_quote(value: impl Display) -> String {
    format!("'{}'", value.to_string().replace('\'', "''"))
}

/// Comma-separated list for an `IN (...)` clause.
pub fn in_list<I, T>(values: I) -> String
where
    I: IntoIterator<Item = T>,
    T: Display,
{
    values
        .into_iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Combine conditions with `AND`.
pub fn all_of<I, S>(conditions: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    conditions
        .into_iter()
        .map(|c| c.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(" AND ")
}

/// Encode a date the way the ERP stores it: `CYYMMDD` with century digit 1 for 20xx.
pub fn softm_date(date: NaiveDate) -> u32 {
    let century = (date.year() / 100 - 19).max(0) as u32;
    let yy = (date.year() % 100) as u32;
    century * 1_000_000 + yy * 10_000 + date.month() * 100 + date.day()
}
