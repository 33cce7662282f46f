//! Aggregate queries over a [`Dataset`]: per-period spending series for
//! charting and per-category monthly averages for the summary table.
//!
//! Two different averages live here on purpose. [`monthly_averages`]
//! normalizes by the count of distinct months in the whole dataset, so a
//! category present in 2 of 12 months still divides by 12, and omits
//! categories with no transactions. [`period_averages`] divides by the count
//! of periods that actually contain data for the category after filtering,
//! and reports zero for categories with none. Callers depend on the
//! difference.

use crate::model::{Amount, Dataset, Period, Transaction};
use crate::outlier::{filter_with_sums, percentile_filter};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// The threshold value that disables outlier filtering.
pub const NO_FILTERING: u32 = 100;

/// Which period sequence of a [`Dataset`] a query runs over.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    serde::Serialize,
    serde::Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Month,
    Week,
}

serde_plain::derive_display_from_serialize!(Granularity);
serde_plain::derive_fromstr_from_deserialize!(Granularity);

/// User-driven view configuration for the charting queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ViewOptions {
    pub granularity: Granularity,
    /// Percentile cutoff applied per period bucket; `>= 100` disables.
    pub threshold: u32,
    /// Restricts the visible categories. `None` means all are visible.
    pub categories: Option<BTreeSet<String>>,
    /// Restricts periods to those starting in this year.
    pub year: Option<i32>,
    /// Restricts periods to those starting in this month of the year (1-12).
    pub month: Option<u32>,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            granularity: Granularity::default(),
            threshold: NO_FILTERING,
            categories: None,
            year: None,
            month: None,
        }
    }
}

impl ViewOptions {
    fn periods_of<'a>(&self, dataset: &'a Dataset) -> &'a [Period] {
        match self.granularity {
            Granularity::Month => &dataset.months,
            Granularity::Week => &dataset.weeks,
        }
    }

    /// Applies the year and month-of-year filters to a period sequence.
    fn filter_periods<'a>(&self, periods: &'a [Period]) -> Vec<&'a Period> {
        periods
            .iter()
            .filter(|p| self.year.is_none_or(|y| p.start.year() == y))
            .filter(|p| self.month.is_none_or(|m| p.start.month() == m))
            .collect()
    }

    fn is_visible(&self, category: &str) -> bool {
        self.categories
            .as_ref()
            .is_none_or(|set| set.contains(category))
    }

    fn visible_categories(&self, dataset: &Dataset) -> Vec<String> {
        dataset
            .categories()
            .into_iter()
            .filter(|c| self.is_visible(c))
            .collect()
    }
}

/// One charted point: a period's start date and its filtered total.
pub type SeriesPoint = (NaiveDate, Amount);

/// Per-category per-period spending totals for charting.
///
/// Each visible category maps to its (period start, filtered total) points in
/// ascending period order. The percentile filter runs per bucket; periods
/// where a category has no transactions left after filtering contribute no
/// point.
pub fn category_series(dataset: &Dataset, options: &ViewOptions) -> BTreeMap<String, Vec<SeriesPoint>> {
    let periods = options.filter_periods(options.periods_of(dataset));
    let mut series: BTreeMap<String, Vec<SeriesPoint>> = BTreeMap::new();
    for category in options.visible_categories(dataset) {
        let mut points = Vec::new();
        for period in &periods {
            let Some(bucket) = period.categories.get(&category) else {
                continue;
            };
            let kept = percentile_filter(&bucket.transactions, options.threshold);
            if kept.is_empty() {
                continue;
            }
            let total: Amount = kept.iter().map(|t| t.amount).sum();
            points.push((period.start, total));
        }
        series.insert(category, points);
    }
    series
}

/// Combined spending across all visible categories, one point per period.
///
/// Periods whose filtered total is not positive contribute no point.
pub fn total_series(dataset: &Dataset, options: &ViewOptions) -> Vec<SeriesPoint> {
    let periods = options.filter_periods(options.periods_of(dataset));
    let mut points = Vec::new();
    for period in periods {
        let mut total = Amount::default();
        for (category, bucket) in &period.categories {
            if !options.is_visible(category) {
                continue;
            }
            let kept = percentile_filter(&bucket.transactions, options.threshold);
            total += kept.iter().map(|t| t.amount).sum();
        }
        if total.value() > Decimal::ZERO {
            points.push((period.start, total));
        }
    }
    points
}

/// Average filtered spend per period-with-data for each visible category.
///
/// This is the chart calling context: the divisor is the number of periods
/// that contain data for the category after filtering, and categories with no
/// remaining data report zero rather than being omitted.
pub fn period_averages(dataset: &Dataset, options: &ViewOptions) -> BTreeMap<String, Amount> {
    let periods = options.filter_periods(options.periods_of(dataset));
    let mut averages = BTreeMap::new();
    for category in options.visible_categories(dataset) {
        let mut total = Decimal::ZERO;
        let mut count: u64 = 0;
        for period in &periods {
            let Some(bucket) = period.categories.get(&category) else {
                continue;
            };
            let kept = percentile_filter(&bucket.transactions, options.threshold);
            if kept.is_empty() {
                continue;
            }
            total += kept.iter().map(|t| t.amount.value()).sum::<Decimal>();
            count += 1;
        }
        let average = if count > 0 {
            Amount::new(total / Decimal::from(count))
        } else {
            Amount::default()
        };
        averages.insert(category, average);
    }
    averages
}

/// The count of distinct (year, month) pairs among the month periods,
/// minimum 1 so average computations never divide by zero.
pub fn distinct_month_count(dataset: &Dataset) -> u64 {
    let unique: BTreeSet<(i32, u32)> = dataset
        .months
        .iter()
        .map(|p| (p.start.year(), p.start.month()))
        .collect();
    unique.len().max(1) as u64
}

/// Summary statistics for one category in the monthly-average table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CategoryStats {
    /// Filtered total divided by the dataset's distinct month count.
    pub monthly_average: Amount,
    /// Total spend net of outliers.
    pub total: Amount,
    /// The transactions included in the average.
    pub transactions: Vec<Transaction>,
    /// The transactions excluded as outliers.
    pub outliers: Vec<Transaction>,
}

/// Per-category monthly averages with outlier filtering.
///
/// This is the table calling context: transactions for a category are
/// gathered across all month buckets, filtered by the mean-relative rule
/// ([`filter_with_sums`], `threshold >= 100` disables), and the kept total is
/// divided by [`distinct_month_count`] — not by the number of months the
/// category appears in. Categories with no transactions are omitted.
pub fn monthly_averages(
    dataset: &Dataset,
    threshold: u32,
    categories: Option<&BTreeSet<String>>,
) -> BTreeMap<String, CategoryStats> {
    let total_months = distinct_month_count(dataset);
    let mut result = BTreeMap::new();

    for category in dataset.categories() {
        if !categories.is_none_or(|set| set.contains(&category)) {
            continue;
        }
        let transactions: Vec<Transaction> = dataset
            .months
            .iter()
            .filter_map(|p| p.categories.get(&category))
            .flat_map(|b| b.transactions.iter().cloned())
            .collect();
        if transactions.is_empty() {
            continue;
        }

        let filtered = filter_with_sums(&transactions, threshold);
        let monthly_average =
            Amount::new(filtered.kept_total.value() / Decimal::from(total_months));
        result.insert(
            category,
            CategoryStats {
                monthly_average,
                total: filtered.kept_total,
                transactions: filtered.kept,
                outliers: filtered.outliers,
            },
        );
    }
    result
}

/// The total monthly spend: the sum of every category's monthly average.
pub fn total_monthly_spend(stats: &BTreeMap<String, CategoryStats>) -> Amount {
    stats.values().map(|s| s.monthly_average).sum()
}

/// Projects a monthly total to a full year.
pub fn yearly_projection(monthly_total: Amount) -> Amount {
    Amount::new(monthly_total.value() * Decimal::from(12))
}
