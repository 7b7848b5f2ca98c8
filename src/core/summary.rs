use crate::core::filter::DateRange;
use crate::core::top_n::select_top;
use crate::domain::model::{AggregationTable, CitationSummary};

fn saturating_total(table: &AggregationTable) -> i64 {
    table.values().fold(0i64, i64::saturating_add)
}

/// Total dollars across a fine-amount table.
pub fn total_fine(fine_by_violation: &AggregationTable) -> i64 {
    saturating_total(fine_by_violation)
}

/// Total citations across a count table.
pub fn total_citations(count_by_violation: &AggregationTable) -> i64 {
    saturating_total(count_by_violation)
}

pub fn summarize(
    range: DateRange,
    fine_by_violation: AggregationTable,
    count_by_violation: AggregationTable,
    top_n: usize,
) -> CitationSummary {
    // both tables come from the same filtered file; a mismatch means it changed between passes
    if !fine_by_violation
        .categories()
        .eq(count_by_violation.categories())
    {
        tracing::warn!(
            "Fine and count tables disagree on violations ({} vs {})",
            fine_by_violation.len(),
            count_by_violation.len()
        );
    }

    let top_violations = select_top(&fine_by_violation, top_n);

    CitationSummary {
        start_date: range.start(),
        end_date: range.end(),
        total_fine: total_fine(&fine_by_violation),
        total_citations: total_citations(&count_by_violation),
        fine_by_violation,
        count_by_violation,
        top_violations,
    }
}
