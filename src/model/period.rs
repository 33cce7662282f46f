//! Calendar-aligned aggregation containers: periods, per-category buckets
//! and the dataset that holds a full load's month and week sequences.

use crate::model::{Amount, Transaction};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The running total and transaction list for one category within one period.
///
/// Owned exclusively by its parent [`Period`]. The only append path is
/// [`CategoryBucket::add`], which keeps `total_spend` equal to the sum of
/// `amount` over `transactions` at all times.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CategoryBucket {
    pub total_spend: Amount,
    /// Insertion order is processing order, not necessarily date order.
    pub transactions: Vec<Transaction>,
}

impl CategoryBucket {
    /// Appends a transaction and updates the running total.
    pub fn add(&mut self, transaction: Transaction) {
        self.total_spend += transaction.amount;
        self.transactions.push(transaction);
    }
}

/// A closed calendar-aligned date interval with per-category buckets.
///
/// `end` is the last day of the period, inclusive: a date `d` belongs to the
/// period when `start <= d <= end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub categories: BTreeMap<String, CategoryBucket>,
}

impl Period {
    /// Creates an empty period spanning `[start, end]`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            categories: BTreeMap::new(),
        }
    }

    /// Returns true if `date` falls within this period, both ends inclusive.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// The total spend across all categories in this period.
    pub fn total_spend(&self) -> Amount {
        self.categories.values().map(|b| b.total_spend).sum()
    }
}

/// A full data load organized for reporting: the ordered month periods and
/// ordered week periods covering the same underlying transaction set.
///
/// Created once per load and read-only downstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Dataset {
    pub months: Vec<Period>,
    pub weeks: Vec<Period>,
}

impl Dataset {
    /// Returns true if the dataset holds no periods at all.
    pub fn is_empty(&self) -> bool {
        self.months.is_empty() && self.weeks.is_empty()
    }

    /// All category labels present anywhere in the month periods, sorted.
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self
            .months
            .iter()
            .flat_map(|p| p.categories.keys().cloned())
            .collect();
        categories.sort();
        categories.dedup();
        categories
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{date, tx};

    #[test]
    fn bucket_total_tracks_appends() {
        let mut bucket = CategoryBucket::default();
        bucket.add(tx(0, "2024-01-01", "a", "Groceries", "10.50"));
        bucket.add(tx(1, "2024-01-02", "b", "Groceries", "-2.50"));
        assert_eq!(bucket.total_spend, "8.00".parse().unwrap());
        assert_eq!(bucket.transactions.len(), 2);
    }

    #[test]
    fn period_containment_is_inclusive() {
        let period = Period::new(date("2024-02-01"), date("2024-02-29"));
        assert!(period.contains(date("2024-02-01")));
        assert!(period.contains(date("2024-02-29")));
        assert!(!period.contains(date("2024-01-31")));
        assert!(!period.contains(date("2024-03-01")));
    }

    #[test]
    fn empty_dataset_reports_no_categories() {
        let dataset = Dataset::default();
        assert!(dataset.is_empty());
        assert!(dataset.categories().is_empty());
    }
}
