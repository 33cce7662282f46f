//! Per-period spending series, the terminal counterpart of the chart view.

use crate::args::SeriesArgs;
use crate::commands::{visibility, Out};
use crate::report::{
    category_series, period_averages, total_series, Granularity, SeriesPoint, ViewOptions,
};
use crate::{ingest, periods};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::Path;

/// Series data in the requested shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Series {
    /// One series per category.
    PerCategory(BTreeMap<String, Vec<SeriesPoint>>),
    /// A single combined series across the selected categories.
    Total(Vec<SeriesPoint>),
}

/// Builds per-period totals for the transactions in `file`.
pub fn series(file: &Path, args: &SeriesArgs) -> Out<Series> {
    let transactions = ingest::read_transactions(file);
    let dataset = periods::build_dataset(&transactions);
    let options = ViewOptions {
        granularity: args.granularity(),
        threshold: args.threshold(),
        categories: visibility(args.categories()),
        year: args.year(),
        month: args.month(),
    };

    if args.total() {
        let points = total_series(&dataset, &options);
        if points.is_empty() {
            return Out::new("No data to display.", Series::Total(points));
        }
        let mut message = String::from("Total:\n");
        render_points(&mut message, &points, options.granularity);
        return Out::new(message.trim_end().to_string(), Series::Total(points));
    }

    let averages = period_averages(&dataset, &options);
    let all_series = category_series(&dataset, &options);
    if all_series.values().all(|points| points.is_empty()) {
        return Out::new("No data to display.", Series::PerCategory(all_series));
    }

    let mut message = String::new();
    for (category, points) in &all_series {
        if points.is_empty() {
            continue;
        }
        let average = averages.get(category).copied().unwrap_or_default();
        writeln!(message, "{category} (avg {average} per period with data):")
            .expect("writing to a String");
        render_points(&mut message, points, options.granularity);
    }
    Out::new(
        message.trim_end().to_string(),
        Series::PerCategory(all_series),
    )
}

fn render_points(message: &mut String, points: &[SeriesPoint], granularity: Granularity) {
    for (start, total) in points {
        writeln!(message, "  {}  {:>12}", format_start(*start, granularity), total.to_string())
            .expect("writing to a String");
    }
}

/// Month points label like the chart's month axis; week points keep the full
/// date.
fn format_start(start: NaiveDate, granularity: Granularity) -> String {
    match granularity {
        Granularity::Month => start.format("%b %Y").to_string(),
        Granularity::Week => start.format("%Y-%m-%d").to_string(),
    }
}
