//! These structs provide the CLI interface for the spendtrack CLI.

use crate::report::{Granularity, NO_FILTERING};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::filter::LevelFilter;

/// spendtrack: summarize credit-card spending from a CSV export.
///
/// Reads a CSV of transactions (Date, Description, Category, Amount, Source),
/// groups them into calendar months and Monday-aligned weeks, and reports
/// per-category totals and averages with optional outlier filtering.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show the monthly-average table: one row per category with its average
    /// monthly spend net of outliers, plus the monthly total and a yearly
    /// projection.
    Report(ReportArgs),

    /// Show per-period spending totals for charting, one series per category
    /// (or a single combined series with --total).
    Series(SeriesArgs),

    /// List the categories present in the file with their transaction counts
    /// and totals.
    Categories,
}

#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::WARN)]
    log_level: LevelFilter,

    /// The CSV file holding the transaction history.
    #[arg(long, short = 'f', env = "SPENDTRACK_FILE")]
    file: PathBuf,
}

impl Common {
    pub fn new(log_level: LevelFilter, file: PathBuf) -> Self {
        Self { log_level, file }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn file(&self) -> &Path {
        &self.file
    }
}

#[derive(Debug, Parser, Clone)]
pub struct ReportArgs {
    /// Outlier threshold as a percentage above the category's mean; any
    /// transaction above mean * (1 + threshold/100) is excluded from the
    /// average. 100 disables filtering.
    #[arg(long, default_value_t = NO_FILTERING, value_parser = parse_threshold)]
    threshold: u32,

    /// Restrict the table to these categories. Repeatable. All categories
    /// are shown when omitted.
    #[arg(long, short = 'c')]
    category: Vec<String>,
}

impl ReportArgs {
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn categories(&self) -> &[String] {
        &self.category
    }
}

#[derive(Debug, Parser, Clone)]
pub struct SeriesArgs {
    /// The period granularity to bucket by.
    #[arg(long, short = 'g', default_value_t = Granularity::Month, value_enum)]
    granularity: Granularity,

    /// Percentile cutoff applied within each period bucket; transactions
    /// above the cutoff are dropped from that bucket's total. 100 disables
    /// filtering.
    #[arg(long, default_value_t = NO_FILTERING, value_parser = parse_threshold)]
    threshold: u32,

    /// Restrict the series to these categories. Repeatable.
    #[arg(long, short = 'c')]
    category: Vec<String>,

    /// Only include periods starting in this year.
    #[arg(long)]
    year: Option<i32>,

    /// Only include periods starting in this month of the year (1-12).
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: Option<u32>,

    /// Show one combined series across all selected categories instead of
    /// one series per category.
    #[arg(long)]
    total: bool,
}

impl SeriesArgs {
    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn categories(&self) -> &[String] {
        &self.category
    }

    pub fn year(&self) -> Option<i32> {
        self.year
    }

    pub fn month(&self) -> Option<u32> {
        self.month
    }

    pub fn total(&self) -> bool {
        self.total
    }
}

/// Parses an outlier threshold, clamping rather than rejecting bad input.
///
/// Non-numeric or out-of-range values reset to the "no filtering" default of
/// 100 with a diagnostic. This parser never fails: a bad threshold should
/// soften a filter, not kill the run.
fn parse_threshold(s: &str) -> Result<u32, String> {
    match s.trim().parse::<u32>() {
        Ok(value) if value <= NO_FILTERING => Ok(value),
        Ok(value) => {
            tracing::warn!("Threshold {value} is above 100; using 100 (no filtering)");
            Ok(NO_FILTERING)
        }
        Err(_) => {
            tracing::warn!("Invalid threshold {s:?}; using 100 (no filtering)");
            Ok(NO_FILTERING)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_parses_in_range_values() {
        assert_eq!(parse_threshold("0"), Ok(0));
        assert_eq!(parse_threshold("42"), Ok(42));
        assert_eq!(parse_threshold(" 100 "), Ok(100));
    }

    #[test]
    fn threshold_clamps_rather_than_rejecting() {
        assert_eq!(parse_threshold("250"), Ok(NO_FILTERING));
        assert_eq!(parse_threshold("-5"), Ok(NO_FILTERING));
        assert_eq!(parse_threshold("abc"), Ok(NO_FILTERING));
        assert_eq!(parse_threshold(""), Ok(NO_FILTERING));
    }

    #[test]
    fn args_parse_report_with_defaults() {
        let args =
            Args::try_parse_from(["spendtrack", "--file", "spend.csv", "report"]).unwrap();
        match args.command() {
            Command::Report(report) => {
                assert_eq!(report.threshold(), NO_FILTERING);
                assert!(report.categories().is_empty());
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert_eq!(args.common().file(), Path::new("spend.csv"));
    }

    #[test]
    fn args_parse_series_flags() {
        let args = Args::try_parse_from([
            "spendtrack",
            "--file",
            "spend.csv",
            "series",
            "--granularity",
            "week",
            "--threshold",
            "75",
            "--year",
            "2024",
            "--month",
            "3",
            "-c",
            "Groceries",
            "--total",
        ])
        .unwrap();
        match args.command() {
            Command::Series(series) => {
                assert_eq!(series.granularity(), Granularity::Week);
                assert_eq!(series.threshold(), 75);
                assert_eq!(series.year(), Some(2024));
                assert_eq!(series.month(), Some(3));
                assert_eq!(series.categories(), ["Groceries".to_string()]);
                assert!(series.total());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn month_out_of_range_is_rejected() {
        let result = Args::try_parse_from([
            "spendtrack",
            "--file",
            "spend.csv",
            "series",
            "--month",
            "13",
        ]);
        assert!(result.is_err());
    }
}
