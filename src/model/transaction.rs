//! The transaction record: a dated, categorized, amount-bearing entry parsed
//! from a credit-card CSV export.

use crate::model::Amount;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fmt::{Display, Formatter};

/// Identifies a transaction within one loaded dataset.
///
/// Ids are assigned sequentially at ingestion. Copies of a transaction held
/// in the month and week period trees share the same id, so a single outlier
/// annotation map covers both granularities.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct TransactionId(pub u64);

impl Display for TransactionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single credit-card transaction.
///
/// Records are immutable once created. Outlier status is never stored on the
/// record; the filters in [`crate::outlier`] return annotations keyed by
/// [`TransactionId`] instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Transaction {
    pub id: TransactionId,
    pub date: NaiveDate,
    pub description: String,
    /// Free-text label. Grouping is case-sensitive exact match; categories
    /// are not a closed set.
    pub category: String,
    pub amount: Amount,
    /// The originating account or card.
    pub source: String,
}

/// Groups transactions by their category label.
///
/// Exact-match keys, no filtering, no validation. Input order is preserved
/// within each group.
pub fn group_by_category(transactions: &[Transaction]) -> BTreeMap<String, Vec<Transaction>> {
    let mut groups: BTreeMap<String, Vec<Transaction>> = BTreeMap::new();
    for transaction in transactions {
        groups
            .entry(transaction.category.clone())
            .or_default()
            .push(transaction.clone());
    }
    groups
}
