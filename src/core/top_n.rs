use crate::domain::model::{AggregationTable, TopEntry, TopSelection};

pub const DEFAULT_TOP_N: usize = 5;

/// Picks the `n` highest-valued violations.
///
/// The cutoff is the value ranked `n`-th; every violation at or above it is
/// kept, so ties at the cutoff can return more than `n` entries. Tables with
/// fewer than `n` violations return all of them.
pub fn select_top(table: &AggregationTable, n: usize) -> TopSelection {
    if n == 0 || table.is_empty() {
        return TopSelection::default();
    }

    let mut values: Vec<i64> = table.values().collect();
    values.sort_unstable_by(|a, b| b.cmp(a));
    let cutoff = values[n.min(values.len()) - 1];

    let mut entries: Vec<TopEntry> = table
        .iter()
        .filter(|(_, value)| *value >= cutoff)
        .map(|(category, value)| TopEntry {
            category: category.to_string(),
            value,
        })
        .collect();
    entries.sort_by(|a, b| {
        b.value
            .cmp(&a.value)
            .then_with(|| a.category.cmp(&b.category))
    });

    TopSelection {
        cutoff: Some(cutoff),
        entries,
    }
}
