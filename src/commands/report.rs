//! The monthly-average table, the terminal counterpart of the table view:
//! one row per category, sorted by descending average, with a monthly total
//! and a yearly projection underneath.

use crate::args::ReportArgs;
use crate::commands::{visibility, Out};
use crate::report::{monthly_averages, total_monthly_spend, yearly_projection, CategoryStats};
use crate::{ingest, periods};
use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::Path;

/// Builds the monthly-average table for the transactions in `file`.
pub fn report(file: &Path, args: &ReportArgs) -> Out<BTreeMap<String, CategoryStats>> {
    let transactions = ingest::read_transactions(file);
    let dataset = periods::build_dataset(&transactions);
    let visible = visibility(args.categories());
    let stats = monthly_averages(&dataset, args.threshold(), visible.as_ref());
    if stats.is_empty() {
        return Out::new("No data to display.", stats);
    }
    let message = render_table(&stats);
    Out::new(message, stats)
}

fn render_table(stats: &BTreeMap<String, CategoryStats>) -> String {
    let name_width = stats
        .keys()
        .map(|name| name.len())
        .max()
        .unwrap_or(0)
        .max("YEARLY PROJECTION".len());

    let mut rows: Vec<(&String, &CategoryStats)> = stats.iter().collect();
    rows.sort_by(|a, b| b.1.monthly_average.cmp(&a.1.monthly_average));

    let mut table = String::new();
    for (name, category) in rows {
        let mut detail = format!("{} transactions", category.transactions.len());
        if !category.outliers.is_empty() {
            write!(detail, ", {} outliers", category.outliers.len()).expect("writing to a String");
        }
        writeln!(
            table,
            "{name:<name_width$}  {:>12}  ({detail})",
            category.monthly_average.to_string()
        )
        .expect("writing to a String");
    }

    let total = total_monthly_spend(stats);
    writeln!(
        table,
        "{:<name_width$}  {:>12}",
        "MONTHLY TOTAL",
        total.to_string()
    )
    .expect("writing to a String");
    write!(
        table,
        "{:<name_width$}  {:>12}",
        "YEARLY PROJECTION",
        yearly_projection(total).to_string()
    )
    .expect("writing to a String");
    table
}
