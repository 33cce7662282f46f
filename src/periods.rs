//! Period construction and transaction-to-period assignment.
//!
//! Builds the ordered, contiguous, calendar-aligned month and week period
//! sequences covering a transaction set's date range, then buckets each
//! transaction into the one period of each granularity that contains it.

use crate::calendar::{month_end, month_start, next_month_start, week_monday};
use crate::model::{Dataset, Period, Transaction};
use chrono::{Days, NaiveDate};
use tracing::{debug, warn};

/// The earliest and latest transaction dates, or `None` for an empty list.
pub fn date_range(transactions: &[Transaction]) -> Option<(NaiveDate, NaiveDate)> {
    let min = transactions.iter().map(|t| t.date).min()?;
    let max = transactions.iter().map(|t| t.date).max()?;
    Some((min, max))
}

/// Builds one period per calendar month from `min`'s month through `max`'s
/// month.
///
/// The first period starts on day 1 of `min`'s month; each period ends on the
/// last day of its month (proper 28/29/30/31 handling). The result is
/// ascending, contiguous and exhaustive over `[min, max]`. An inverted range
/// yields no periods.
pub fn build_month_periods(min: NaiveDate, max: NaiveDate) -> Vec<Period> {
    let mut periods = Vec::new();
    let mut start = month_start(min);
    while start <= max {
        periods.push(Period::new(start, month_end(start)));
        start = next_month_start(start);
    }
    periods
}

/// Builds Monday-aligned week periods from the Monday on or before `min`.
///
/// Each period spans exactly seven days, Monday through Sunday inclusive.
/// The result is ascending, contiguous and exhaustive over `[min, max]`.
pub fn build_week_periods(min: NaiveDate, max: NaiveDate) -> Vec<Period> {
    let mut periods = Vec::new();
    let mut start = week_monday(min);
    while start <= max {
        let end = start + Days::new(6);
        periods.push(Period::new(start, end));
        start = start + Days::new(7);
    }
    periods
}

/// Assigns each transaction to the first period whose interval contains its
/// date, accumulating it into that period's category bucket.
///
/// Periods built by this module never overlap, so "first containing" is
/// unambiguous. A transaction contained by no period is dropped with a
/// diagnostic; given the builders' exhaustiveness guarantee this only happens
/// when the caller supplies a foreign period set.
pub fn assign_to_periods(periods: &mut [Period], transactions: &[Transaction]) {
    for transaction in transactions {
        let Some(period) = periods.iter_mut().find(|p| p.contains(transaction.date)) else {
            warn!(
                "No period contains transaction {} dated {}; dropping it",
                transaction.id, transaction.date
            );
            continue;
        };
        period
            .categories
            .entry(transaction.category.clone())
            .or_default()
            .add(transaction.clone());
    }
}

/// Organizes a flat transaction list into month and week period sequences.
///
/// The month and week assignments are independent passes over the same
/// transaction list. An empty list yields an empty [`Dataset`] without
/// building any periods, so period construction never depends on the
/// wall clock.
pub fn build_dataset(transactions: &[Transaction]) -> Dataset {
    let Some((min, max)) = date_range(transactions) else {
        return Dataset::default();
    };

    let mut dataset = Dataset {
        months: build_month_periods(min, max),
        weeks: build_week_periods(min, max),
    };
    assign_to_periods(&mut dataset.months, transactions);
    assign_to_periods(&mut dataset.weeks, transactions);
    debug!(
        "Built dataset: {} transactions across {} months and {} weeks",
        transactions.len(),
        dataset.months.len(),
        dataset.weeks.len()
    );
    dataset
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    use crate::test::{date, tx};

    #[test]
    fn month_periods_are_contiguous_and_aligned() {
        let periods = build_month_periods(date("2023-11-15"), date("2024-03-02"));
        assert_eq!(periods.len(), 5);
        assert_eq!(periods[0].start, date("2023-11-01"));
        assert_eq!(periods[4].start, date("2024-03-01"));
        for period in &periods {
            assert_eq!(period.start.day(), 1);
        }
        for pair in periods.windows(2) {
            assert_eq!(pair[0].end + Days::new(1), pair[1].start);
        }
    }

    #[test]
    fn month_period_ends_handle_leap_years() {
        let periods = build_month_periods(date("2024-02-10"), date("2024-02-20"));
        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].end, date("2024-02-29"));

        let periods = build_month_periods(date("2023-02-10"), date("2023-02-20"));
        assert_eq!(periods[0].end, date("2023-02-28"));
    }

    #[test]
    fn week_periods_span_seven_days_from_monday() {
        // 2024-01-03 is a Wednesday
        let periods = build_week_periods(date("2024-01-03"), date("2024-01-20"));
        assert_eq!(periods[0].start, date("2024-01-01"));
        for period in &periods {
            assert_eq!(period.end, period.start + Days::new(6));
            assert_eq!(period.start.weekday(), chrono::Weekday::Mon);
        }
        for pair in periods.windows(2) {
            assert_eq!(pair[0].end + Days::new(1), pair[1].start);
        }
    }

    #[test]
    fn exhaustiveness_over_a_scattered_range() {
        let transactions = vec![
            tx(0, "2023-12-31", "a", "Groceries", "10.00"),
            tx(1, "2024-02-29", "b", "Dining", "20.00"),
            tx(2, "2024-03-01", "c", "Groceries", "30.00"),
        ];
        let dataset = build_dataset(&transactions);
        for transaction in &transactions {
            let month_hits = dataset
                .months
                .iter()
                .filter(|p| p.contains(transaction.date))
                .count();
            let week_hits = dataset
                .weeks
                .iter()
                .filter(|p| p.contains(transaction.date))
                .count();
            assert_eq!(month_hits, 1, "date {}", transaction.date);
            assert_eq!(week_hits, 1, "date {}", transaction.date);
        }
    }

    #[test]
    fn leap_day_lands_in_a_29_day_february() {
        let transactions = vec![tx(0, "2024-02-29", "leap", "Groceries", "5.00")];
        let dataset = build_dataset(&transactions);
        assert_eq!(dataset.months.len(), 1);
        let february = &dataset.months[0];
        assert_eq!(february.start, date("2024-02-01"));
        assert_eq!(february.end, date("2024-02-29"));
        assert_eq!(february.categories["Groceries"].transactions.len(), 1);
    }

    #[test]
    fn bucket_totals_equal_transaction_sums_after_assignment() {
        let transactions = vec![
            tx(0, "2024-01-05", "a", "Groceries", "10.00"),
            tx(1, "2024-01-20", "b", "Groceries", "15.25"),
            tx(2, "2024-01-07", "c", "Dining", "-3.75"),
            tx(3, "2024-02-01", "d", "Groceries", "40.00"),
        ];
        let dataset = build_dataset(&transactions);
        for period in dataset.months.iter().chain(dataset.weeks.iter()) {
            for bucket in period.categories.values() {
                let sum = bucket.transactions.iter().map(|t| t.amount).sum();
                assert_eq!(bucket.total_spend, sum);
            }
        }
    }

    #[test]
    fn month_and_week_assignments_are_independent() {
        let transactions = vec![
            tx(0, "2024-01-05", "a", "Groceries", "10.00"),
            tx(1, "2024-01-29", "b", "Groceries", "20.00"),
        ];
        let dataset = build_dataset(&transactions);
        let month_total: crate::Amount = dataset.months.iter().map(|p| p.total_spend()).sum();
        let week_total: crate::Amount = dataset.weeks.iter().map(|p| p.total_spend()).sum();
        assert_eq!(month_total, "30.00".parse().unwrap());
        assert_eq!(week_total, "30.00".parse().unwrap());
    }

    #[test]
    fn transaction_outside_all_periods_is_dropped() {
        let mut periods = build_month_periods(date("2024-01-01"), date("2024-01-31"));
        let transactions = vec![tx(0, "2024-06-01", "late", "Groceries", "10.00")];
        assign_to_periods(&mut periods, &transactions);
        assert!(periods[0].categories.is_empty());
    }

    #[test]
    fn empty_input_yields_empty_dataset() {
        let dataset = build_dataset(&[]);
        assert!(dataset.is_empty());
        assert!(dataset.months.is_empty());
        assert!(dataset.weeks.is_empty());
    }

    #[test]
    fn empty_range_for_no_transactions() {
        assert!(date_range(&[]).is_none());
    }
}
