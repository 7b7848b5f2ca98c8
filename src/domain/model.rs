use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

pub const ISSUE_DATE_FIELD: &str = "Issue Date";
pub const VIOLATION_DESCRIPTION_FIELD: &str = "Violation Description";
pub const FINE_AMOUNT_FIELD: &str = "Fine amount";

/// One row of the citations CSV, keyed by header name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationRecord {
    pub data: HashMap<String, String>,
}

impl CitationRecord {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.data.get(field).map(String::as_str)
    }

    pub fn issue_date(&self) -> Option<&str> {
        self.get(ISSUE_DATE_FIELD)
    }

    pub fn violation_description(&self) -> Option<&str> {
        self.get(VIOLATION_DESCRIPTION_FIELD)
    }

    pub fn fine_amount(&self) -> Option<&str> {
        self.get(FINE_AMOUNT_FIELD)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CitationRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            data: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Category (violation description) to accumulated value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregationTable {
    entries: BTreeMap<String, i64>,
}

impl AggregationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `value` to `category`, inserting the key when first seen.
    /// Totals saturate at the `i64` bounds.
    pub fn add(&mut self, category: &str, value: i64) {
        match self.entries.get_mut(category) {
            Some(total) => *total = total.saturating_add(value),
            None => {
                self.entries.insert(category.to_string(), value);
            }
        }
    }

    pub fn get(&self, category: &str) -> Option<i64> {
        self.entries.get(category).copied()
    }

    pub fn contains(&self, category: &str) -> bool {
        self.entries.contains_key(category)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = i64> + '_ {
        self.entries.values().copied()
    }
}

impl<K: Into<String>> FromIterator<(K, i64)> for AggregationTable {
    fn from_iter<I: IntoIterator<Item = (K, i64)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (category, value) in iter {
            let category: String = category.into();
            table.add(&category, value);
        }
        table
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopEntry {
    pub category: String,
    pub value: i64,
}

/// Highest-valued categories, ordered by value descending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopSelection {
    pub cutoff: Option<i64>,
    pub entries: Vec<TopEntry>,
}

impl TopSelection {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Output of the transform phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitationSummary {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub fine_by_violation: AggregationTable,
    pub count_by_violation: AggregationTable,
    pub total_fine: i64,
    pub total_citations: i64,
    pub top_violations: TopSelection,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_field_accessors() {
        let record: CitationRecord = [
            (ISSUE_DATE_FIELD, "1/1/2018"),
            (VIOLATION_DESCRIPTION_FIELD, "NO PARK/STREET CLEAN"),
        ]
        .into_iter()
        .collect();

        assert_eq!(record.issue_date(), Some("1/1/2018"));
        assert_eq!(record.violation_description(), Some("NO PARK/STREET CLEAN"));
        assert_eq!(record.fine_amount(), None);
    }

    #[test]
    fn test_table_add_accumulates_per_key() {
        let mut table = AggregationTable::new();
        table.add("A", 50);
        table.add("A", 25);
        table.add("B", 0);

        assert_eq!(table.len(), 2);
        assert_eq!(table.get("A"), Some(75));
        assert_eq!(table.get("B"), Some(0));
        assert!(!table.contains("C"));
    }

    #[test]
    fn test_table_add_saturates_instead_of_overflowing() {
        let mut table = AggregationTable::new();
        table.add("A", i64::MAX);
        table.add("A", 1);
        table.add("B", i64::MIN);
        table.add("B", -1);

        assert_eq!(table.get("A"), Some(i64::MAX));
        assert_eq!(table.get("B"), Some(i64::MIN));
    }

    #[test]
    fn test_table_serializes_as_plain_object() {
        let table: AggregationTable = [("B", 10), ("A", 75)].into_iter().collect();
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"A":75,"B":10}"#);
    }
}
