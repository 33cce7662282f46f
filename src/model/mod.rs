//! Data model types: transactions, amounts, and the period containers that
//! organize a load for reporting.

mod amount;
mod period;
mod transaction;

pub use amount::{Amount, AmountError};
pub use period::{CategoryBucket, Dataset, Period};
pub use transaction::{group_by_category, Transaction, TransactionId};
