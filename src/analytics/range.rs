/// Date range resolution for calendar-day and calendar-month selectors
///
/// Selectors are treated as UTC wall-clock; no timezone conversion happens
/// here. Each resolver returns an inclusive interval whose end is the last
/// millisecond of the period, matching the storage layer's millisecond
/// timestamp precision.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::analytics::AnalyticsError;

/// An inclusive UTC time interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// Span a period starting at midnight of `first_day`, ending one
    /// millisecond before midnight of `day_after_last`
    fn from_days(first_day: NaiveDate, day_after_last: NaiveDate) -> Self {
        let start = Utc.from_utc_datetime(&first_day.and_time(NaiveTime::MIN));
        let end = Utc.from_utc_datetime(&day_after_last.and_time(NaiveTime::MIN))
            - Duration::milliseconds(1);
        Self { start, end }
    }
}

/// Resolve a `dd-mm-yyyy` selector into the inclusive range
/// `00:00:00.000`..=`23:59:59.999` of that calendar day
pub fn day_range(selector: &str) -> Result<DateRange, AnalyticsError> {
    let date = parse_day_selector(selector)?;
    Ok(DateRange::from_days(date, date + Duration::days(1)))
}

/// Resolve a month (1-12) and year into the inclusive range from the first
/// instant of the month to the last millisecond of its last day
///
/// The end is derived from the first day of the following month rather than
/// a hardcoded day count, so leap Februaries come out right for free.
pub fn month_range(month: u32, year: i32) -> Result<DateRange, AnalyticsError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        AnalyticsError::InvalidDateSelector(format!(
            "'{:02}-{}' is not a valid month selector",
            month, year
        ))
    })?;

    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| {
        AnalyticsError::InvalidDateSelector(format!(
            "month following '{:02}-{}' is out of range",
            month, year
        ))
    })?;

    Ok(DateRange::from_days(first, next_first))
}

/// Parse a `dd-mm-yyyy` selector into a calendar date
fn parse_day_selector(selector: &str) -> Result<NaiveDate, AnalyticsError> {
    let invalid = || {
        AnalyticsError::InvalidDateSelector(format!(
            "'{}' is not a valid dd-mm-yyyy date",
            selector
        ))
    };

    let mut parts = selector.split('-');
    let day: u32 = parts
        .next()
        .and_then(|p| p.parse().ok())
        .ok_or_else(invalid)?;
    let month: u32 = parts
        .next()
        .and_then(|p| p.parse().ok())
        .ok_or_else(invalid)?;
    let year: i32 = parts
        .next()
        .and_then(|p| p.parse().ok())
        .ok_or_else(invalid)?;

    if parts.next().is_some() {
        return Err(invalid());
    }

    // A yyyy-mm-dd string parses numerically but swaps day and year; the
    // four-digit check rejects it before from_ymd_opt gets a chance to
    // accept something like year 26.
    if year < 1000 {
        return Err(invalid());
    }

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}
