use crate::core::source::CitationSource;
use crate::domain::model::CitationRecord;
use crate::utils::error::{EtlError, Result};
use chrono::NaiveDate;
use regex::Regex;
use std::fs::File;
use std::path::Path;
use std::sync::OnceLock;

/// `10/31/2018`; month and day may omit the leading zero.
pub const DATE_FORMAT: &str = "%m/%d/%Y";

pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|source| EtlError::DateParseError {
        value: value.to_string(),
        source,
    })
}

/// Strict issue-date parse: chrono alone accepts padding and signed years.
fn parse_issue_date(raw: &str) -> Option<NaiveDate> {
    static DATE_SHAPE: OnceLock<Option<Regex>> = OnceLock::new();
    let shape = DATE_SHAPE.get_or_init(|| Regex::new(r"^[0-9]{1,2}/[0-9]{1,2}/[0-9]{4}$").ok());
    match shape {
        Some(re) if re.is_match(raw) => NaiveDate::parse_from_str(raw, DATE_FORMAT).ok(),
        _ => None,
    }
}

/// Outcome of testing a record's issue date against a [`DateRange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateCheck {
    InRange,
    OutOfRange,
    /// Field missing, empty, or not in month/day/year form.
    Unparseable,
}

/// Inclusive `[start, end]` window on the `Issue Date` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(EtlError::ConfigValidationError {
                field: "date_range".to_string(),
                message: format!("start date {} is after end date {}", start, end),
            });
        }
        Ok(Self { start, end })
    }

    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn includes(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn check(&self, record: &CitationRecord) -> DateCheck {
        let Some(raw) = record.issue_date() else {
            return DateCheck::Unparseable;
        };
        match parse_issue_date(raw) {
            Some(date) if self.includes(date) => DateCheck::InRange,
            Some(_) => DateCheck::OutOfRange,
            None => DateCheck::Unparseable,
        }
    }

    pub fn contains(&self, record: &CitationRecord) -> bool {
        self.check(record) == DateCheck::InRange
    }
}

/// Lazy adapter yielding only records whose issue date falls in the range.
pub struct DateFilter<I> {
    inner: I,
    range: DateRange,
    out_of_range: usize,
    unparseable: usize,
    reported: bool,
}

impl<I> DateFilter<I> {
    pub fn out_of_range(&self) -> usize {
        self.out_of_range
    }

    pub fn unparseable(&self) -> usize {
        self.unparseable
    }

    /// Unwraps the filter, returning the underlying record stream.
    pub fn into_inner(self) -> I {
        self.inner
    }
}

impl<I: Iterator<Item = CitationRecord>> Iterator for DateFilter<I> {
    type Item = CitationRecord;

    fn next(&mut self) -> Option<Self::Item> {
        for record in self.inner.by_ref() {
            match self.range.check(&record) {
                DateCheck::InRange => return Some(record),
                DateCheck::OutOfRange => self.out_of_range += 1,
                DateCheck::Unparseable => self.unparseable += 1,
            }
        }

        if !self.reported {
            self.reported = true;
            tracing::debug!(
                "Date filter excluded {} out-of-range and {} unparseable records",
                self.out_of_range,
                self.unparseable
            );
        }
        None
    }
}

pub fn filter_by_date_range<I>(records: I, range: DateRange) -> DateFilter<I::IntoIter>
where
    I: IntoIterator<Item = CitationRecord>,
{
    DateFilter {
        inner: records.into_iter(),
        range,
        out_of_range: 0,
        unparseable: 0,
        reported: false,
    }
}

/// Opens `path` and returns the filtered record stream. Every call starts a
/// fresh read of the file. Once drained, check
/// `into_inner().finish()` for read failures.
pub fn open_filtered<P: AsRef<Path>>(
    path: P,
    range: DateRange,
) -> Result<DateFilter<CitationSource<File>>> {
    Ok(filter_by_date_range(CitationSource::open(path)?, range))
}
