//! Lists the categories present in a file with counts and totals.

use crate::commands::Out;
use crate::ingest;
use crate::model::{group_by_category, Amount};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::path::Path;

/// One category's line in the listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CategorySummary {
    pub name: String,
    pub transaction_count: usize,
    pub total: Amount,
}

/// Lists every category in `file` with its transaction count and total spend.
pub fn categories(file: &Path) -> Out<Vec<CategorySummary>> {
    let transactions = ingest::read_transactions(file);
    let groups = group_by_category(&transactions);
    if groups.is_empty() {
        return Out::new("No data to display.", Vec::new());
    }

    let summaries: Vec<CategorySummary> = groups
        .into_iter()
        .map(|(name, transactions)| CategorySummary {
            name,
            transaction_count: transactions.len(),
            total: transactions.iter().map(|t| t.amount).sum(),
        })
        .collect();

    let name_width = summaries
        .iter()
        .map(|s| s.name.len())
        .max()
        .unwrap_or(0);
    let mut message = String::new();
    for summary in &summaries {
        writeln!(
            message,
            "{:<name_width$}  {:>12}  ({} transactions)",
            summary.name,
            summary.total.to_string(),
            summary.transaction_count
        )
        .expect("writing to a String");
    }
    Out::new(message.trim_end().to_string(), summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as IoWrite;

    #[test]
    fn lists_categories_with_counts_and_totals() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"Date,Description,Category,Amount,Source\n\
              2024-01-05,MARKET,Groceries,10.00,Visa\n\
              2024-01-06,MARKET,Groceries,15.00,Visa\n\
              2024-01-07,BISTRO,Dining,35.00,Visa\n",
        )
        .unwrap();
        let out = categories(file.path());
        let summaries = out.structure().unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].name, "Dining");
        assert_eq!(summaries[1].transaction_count, 2);
        assert_eq!(summaries[1].total, "25".parse().unwrap());
        assert!(out.message().contains("Groceries"));
        assert!(out.message().contains("$25.00"));
    }

    #[test]
    fn missing_file_reports_no_data() {
        let out = categories(Path::new("/nonexistent/spend.csv"));
        assert_eq!(out.message(), "No data to display.");
        assert!(out.structure().unwrap().is_empty());
    }
}
