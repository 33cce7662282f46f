//! Tolerant CSV ingestion.
//!
//! Reads a credit-card export with `Date`, `Description`, `Category`,
//! `Amount` and `Source` columns. Malformed rows are skipped with a
//! diagnostic and the file still counts as successfully read; a missing or
//! unreadable file yields an empty transaction list rather than an error, so
//! no failure here ever propagates past this module.

use crate::model::{Amount, Transaction, TransactionId};
use crate::Result;
use anyhow::anyhow;
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

// Date,Description,Category,Amount,Source
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CsvRow {
    date: String,
    description: String,
    category: String,
    amount: String,
    source: String,
}

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Reads all valid transactions from the CSV file at `path`.
///
/// Rows with a bad date, a bad amount or a missing column are skipped with a
/// `warn!`. A file that cannot be opened produces an empty list with a
/// `warn!`. Ids are assigned sequentially in row order.
pub fn read_transactions(path: impl AsRef<Path>) -> Vec<Transaction> {
    let path = path.as_ref();
    let mut reader = match csv::Reader::from_path(path) {
        Ok(reader) => reader,
        Err(e) => {
            warn!("Unable to read {}: {e}", path.display());
            return Vec::new();
        }
    };

    let mut transactions = Vec::new();
    let mut skipped: usize = 0;
    for (row_ix, result) in reader.deserialize().enumerate() {
        // Row numbers in diagnostics are 1-based and count the header.
        let row_number = row_ix + 2;
        let row: CsvRow = match result {
            Ok(row) => row,
            Err(e) => {
                warn!("Skipping row {row_number}: {e}");
                skipped += 1;
                continue;
            }
        };
        match parse_row(&row, TransactionId(transactions.len() as u64)) {
            Ok(transaction) => transactions.push(transaction),
            Err(reason) => {
                warn!("Skipping row {row_number}: {reason}");
                skipped += 1;
            }
        }
    }

    debug!(
        "Read {} transactions from {} ({} skipped)",
        transactions.len(),
        path.display(),
        skipped
    );
    transactions
}

fn parse_row(row: &CsvRow, id: TransactionId) -> Result<Transaction> {
    let date = NaiveDate::parse_from_str(row.date.trim(), DATE_FORMAT)
        .map_err(|e| anyhow!("bad date {:?}: {e}", row.date))?;
    let amount =
        Amount::from_str(&row.amount).map_err(|e| anyhow!("bad amount {:?}: {e}", row.amount))?;
    Ok(Transaction {
        id,
        date,
        description: row.description.trim().to_string(),
        category: row.category.trim().to_string(),
        amount,
        source: row.source.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::date;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn reads_valid_rows() {
        let file = write_csv(
            "Date,Description,Category,Amount,Source\n\
             2024-01-15,COFFEE SHOP,Dining,4.50,Visa\n\
             2024-01-16,GROCERY STORE,Groceries,-12.00,Amex\n",
        );
        let transactions = read_transactions(file.path());
        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].id, TransactionId(0));
        assert_eq!(transactions[0].date, date("2024-01-15"));
        assert_eq!(transactions[0].description, "COFFEE SHOP");
        assert_eq!(transactions[0].amount, "4.50".parse().unwrap());
        assert_eq!(transactions[1].id, TransactionId(1));
        assert!(transactions[1].amount.is_negative());
        assert_eq!(transactions[1].source, "Amex");
    }

    #[test]
    fn skips_malformed_rows_and_keeps_the_rest() {
        let file = write_csv(
            "Date,Description,Category,Amount,Source\n\
             2024-01-15,OK,Dining,4.50,Visa\n\
             01/16/2024,BAD DATE,Dining,4.50,Visa\n\
             2024-01-17,BAD AMOUNT,Dining,four,Visa\n\
             2024-01-18,SHORT ROW,Dining\n\
             2024-01-19,ALSO OK,Dining,10.00,Visa\n",
        );
        let transactions = read_transactions(file.path());
        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].description, "OK");
        assert_eq!(transactions[1].description, "ALSO OK");
        // Ids stay sequential over accepted rows only
        assert_eq!(transactions[1].id, TransactionId(1));
    }

    #[test]
    fn accepts_dollar_signs_and_commas_in_amounts() {
        let file = write_csv(
            "Date,Description,Category,Amount,Source\n\
             2024-01-15,RENT,Housing,\"$1,850.00\",Visa\n",
        );
        let transactions = read_transactions(file.path());
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].amount, "1850".parse().unwrap());
    }

    #[test]
    fn missing_file_yields_empty_list() {
        let transactions = read_transactions("/nonexistent/spend.csv");
        assert!(transactions.is_empty());
    }

    #[test]
    fn empty_file_yields_empty_list() {
        let file = write_csv("Date,Description,Category,Amount,Source\n");
        assert!(read_transactions(file.path()).is_empty());
    }
}
