//! Shared test utilities for building sample data.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::model::{Transaction, TransactionId};
use chrono::NaiveDate;
use std::str::FromStr;

/// Parses a `YYYY-MM-DD` date.
pub(crate) fn date(s: &str) -> NaiveDate {
    NaiveDate::from_str(s).unwrap()
}

/// Builds a transaction from literals.
pub(crate) fn tx(
    id: u64,
    date_str: &str,
    description: &str,
    category: &str,
    amount: &str,
) -> Transaction {
    Transaction {
        id: TransactionId(id),
        date: date(date_str),
        description: description.to_string(),
        category: category.to_string(),
        amount: amount.parse().unwrap(),
        source: "Test Card".to_string(),
    }
}
