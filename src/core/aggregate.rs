use crate::domain::model::{AggregationTable, CitationRecord};
use std::borrow::Borrow;
use std::fmt;

/// What the per-violation table accumulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AggregationMode {
    /// Sum of `Fine amount` per violation.
    #[default]
    FineAmount,
    /// Number of citations per violation.
    NumberCount,
}

impl fmt::Display for AggregationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregationMode::FineAmount => write!(f, "fine_amount"),
            AggregationMode::NumberCount => write!(f, "number_count"),
        }
    }
}

/// Whole-currency fine, `None` when missing or not an integer.
pub fn parse_fine_amount(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
}

/// Groups `records` by violation description.
///
/// In [`AggregationMode::FineAmount`] a missing or malformed amount
/// contributes `0`, but the violation still gets a key. In
/// [`AggregationMode::NumberCount`] every record counts once.
pub fn aggregate<I>(records: I, mode: AggregationMode) -> AggregationTable
where
    I: IntoIterator,
    I::Item: Borrow<CitationRecord>,
{
    let mut table = AggregationTable::new();
    let mut seen = 0usize;
    let mut malformed = 0usize;
    let mut grand_total = 0i64;

    for record in records {
        let record: &CitationRecord = record.borrow();
        let violation = record.violation_description().unwrap_or_default();
        seen += 1;

        let value = match mode {
            AggregationMode::FineAmount => match parse_fine_amount(record.fine_amount()) {
                Some(amount) => {
                    grand_total = grand_total.saturating_add(amount);
                    amount
                }
                None => {
                    malformed += 1;
                    0
                }
            },
            AggregationMode::NumberCount => 1,
        };
        table.add(violation, value);
    }

    match mode {
        AggregationMode::FineAmount => tracing::debug!(
            "Aggregated {} citations into {} violations ({} total, {} malformed amounts)",
            seen,
            table.len(),
            grand_total,
            malformed
        ),
        AggregationMode::NumberCount => tracing::debug!(
            "Counted {} citations across {} violations",
            seen,
            table.len()
        ),
    }

    table
}
