//! Outlier filtering.
//!
//! Three deliberately distinct threshold rules live here. The call sites they
//! serve depend on their specific formulas, so they are kept as separately
//! named operations rather than unified:
//!
//! - [`flag_outliers`] — mean-relative limit over a category's flat
//!   transaction list; returns the partition plus per-transaction flags.
//! - [`percentile_filter`] — interpolated percentile cutoff applied to one
//!   period bucket at a time while charting; `>= 100` disables.
//! - [`filter_with_sums`] — the mean-relative limit with a `>= 100` disable
//!   convention and kept/outlier sums, used by the monthly-average table.
//!
//! Outlier status is never written onto a transaction. [`flag_outliers`]
//! returns an annotation map keyed by [`TransactionId`] instead, so records
//! shared between the month and week period trees cannot disagree about
//! their status and re-running a filter is idempotent by construction.

use crate::model::{Amount, Transaction, TransactionId};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outlier annotations for one filter pass: transaction id -> is-outlier.
pub type OutlierFlags = BTreeMap<TransactionId, bool>;

/// The result of [`flag_outliers`]: the kept and outlier lists (relative
/// order preserved) and the flag annotations for every input transaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OutlierPartition {
    pub kept: Vec<Transaction>,
    pub outliers: Vec<Transaction>,
    pub flags: OutlierFlags,
}

/// The result of [`filter_with_sums`]: kept and outlier lists plus their
/// respective amount totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FilteredSums {
    pub kept: Vec<Transaction>,
    pub outliers: Vec<Transaction>,
    pub kept_total: Amount,
    pub outlier_total: Amount,
}

fn mean(transactions: &[Transaction]) -> Decimal {
    let sum: Decimal = transactions.iter().map(|t| t.amount.value()).sum();
    sum / Decimal::from(transactions.len())
}

/// The mean-relative limit shared by [`flag_outliers`] and
/// [`filter_with_sums`]: `mean * (1 + percent / 100)`.
fn mean_relative_limit(transactions: &[Transaction], threshold_percent: u32) -> Decimal {
    mean(transactions) * (Decimal::from(100 + threshold_percent) / Decimal::from(100))
}

/// Partitions a category's transactions into kept and outliers by the
/// mean-relative rule, annotating every transaction.
///
/// `threshold_percent` is an offset above the mean: with a mean of `m`, any
/// transaction whose amount exceeds `m * (1 + threshold_percent / 100)` is an
/// outlier. An empty input returns an empty partition.
///
/// # Examples
///
/// ```
/// # use spendtrack::model::{Transaction, TransactionId};
/// # use spendtrack::outlier::flag_outliers;
/// let tx = |id: u64, amount: &str| Transaction {
///     id: TransactionId(id),
///     date: "2024-01-01".parse().unwrap(),
///     description: String::new(),
///     category: "Groceries".into(),
///     amount: amount.parse().unwrap(),
///     source: String::new(),
/// };
/// // mean = 32.5, limit = 48.75
/// let txs = vec![tx(0, "10"), tx(1, "10"), tx(2, "10"), tx(3, "100")];
/// let partition = flag_outliers(&txs, 50);
/// assert_eq!(partition.kept.len(), 3);
/// assert_eq!(partition.outliers.len(), 1);
/// ```
pub fn flag_outliers(transactions: &[Transaction], threshold_percent: u32) -> OutlierPartition {
    if transactions.is_empty() {
        return OutlierPartition::default();
    }

    let limit = mean_relative_limit(transactions, threshold_percent);
    let mut partition = OutlierPartition::default();
    for transaction in transactions {
        let is_outlier = transaction.amount.value() > limit;
        partition.flags.insert(transaction.id, is_outlier);
        if is_outlier {
            partition.outliers.push(transaction.clone());
        } else {
            partition.kept.push(transaction.clone());
        }
    }
    partition
}

/// Keeps the transactions whose amounts are at or below the interpolated
/// `percentile` of the input's amounts.
///
/// Uses the standard linear-interpolation percentile over the order
/// statistics. A `percentile` of 100 or more disables filtering and returns
/// the input unchanged. Produces no annotations and discards the dropped set.
pub fn percentile_filter(transactions: &[Transaction], percentile: u32) -> Vec<Transaction> {
    if percentile >= 100 {
        return transactions.to_vec();
    }
    if transactions.is_empty() {
        return Vec::new();
    }

    let cutoff = percentile_value(transactions, percentile);
    transactions
        .iter()
        .filter(|t| t.amount.value() <= cutoff)
        .cloned()
        .collect()
}

/// The interpolated `percentile` of the input's amounts. Callers guarantee a
/// non-empty input and `percentile < 100`.
fn percentile_value(transactions: &[Transaction], percentile: u32) -> Decimal {
    let mut amounts: Vec<Decimal> = transactions.iter().map(|t| t.amount.value()).collect();
    amounts.sort();

    // Fractional rank into the sorted order statistics
    let position =
        Decimal::from(percentile) * Decimal::from(amounts.len() - 1) / Decimal::from(100);
    let lower = position.floor().to_usize().unwrap_or(0);
    let fraction = position - position.floor();
    match amounts.get(lower + 1).copied() {
        Some(upper_value) => amounts[lower] + (upper_value - amounts[lower]) * fraction,
        None => amounts[lower],
    }
}

/// Applies the mean-relative limit and reports both partitions with their
/// sums, for computing a monthly average net of outliers.
///
/// Unlike [`flag_outliers`], a `threshold_percent` of 100 or more disables
/// filtering entirely: everything is kept and the outlier side is empty. The
/// keep rule is `amount <= limit`. No annotations are produced.
pub fn filter_with_sums(transactions: &[Transaction], threshold_percent: u32) -> FilteredSums {
    if transactions.is_empty() {
        return FilteredSums::default();
    }

    let mut result = FilteredSums::default();
    if threshold_percent >= 100 {
        result.kept = transactions.to_vec();
        result.kept_total = result.kept.iter().map(|t| t.amount).sum();
        return result;
    }

    let limit = mean_relative_limit(transactions, threshold_percent);
    for transaction in transactions {
        if transaction.amount.value() <= limit {
            result.kept_total += transaction.amount;
            result.kept.push(transaction.clone());
        } else {
            result.outlier_total += transaction.amount;
            result.outliers.push(transaction.clone());
        }
    }
    result
}
