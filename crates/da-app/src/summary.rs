//! Text rendering of an analysis summary

use std::fmt::Write as _;

use da_core::Dataset;
use da_data::charts::{default_charts, scatter, time_series, top_categories, ChartSpec};
use da_data::insights::query_suggestions;
use da_data::stats::{AnalysisSummary, Bin};
use da_data::AnalysisConfig;

const BAR_WIDTH: usize = 40;

fn format_stat(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

/// `#` bar proportional to `count / max`
fn bar(count: usize, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let width = (count * BAR_WIDTH).div_ceil(max);
    "#".repeat(width)
}

fn render_histogram(out: &mut String, bins: &[Bin]) {
    let max = bins.iter().map(|b| b.count).max().unwrap_or(0);
    for b in bins {
        let _ = writeln!(out, "  {:>20} | {:<width$} {}", b.label(), bar(b.count, max), b.count, width = BAR_WIDTH);
    }
}

fn render_chart(out: &mut String, chart: &ChartSpec, summary: &AnalysisSummary, dataset: &Dataset) {
    let _ = writeln!(out, "\n{}", chart.title());
    match chart {
        ChartSpec::TimeSeries { date_column, value_column } => {
            let points = time_series(dataset, date_column, value_column);
            match (points.first(), points.last()) {
                (Some(first), Some(last)) => {
                    let _ = writeln!(
                        out,
                        "  {} over {}: {} points from {} to {}",
                        value_column,
                        date_column,
                        points.len(),
                        first.time,
                        last.time
                    );
                }
                _ => {
                    let _ = writeln!(out, "  no plottable points");
                }
            }
        }
        ChartSpec::Correlation { x_column, y_column } => {
            let points = scatter(dataset, x_column, y_column);
            let _ = writeln!(out, "  {} vs {}: {} points", x_column, y_column, points.len());
        }
        ChartSpec::CategoryBar { column, top } => {
            if let Some(category) = summary.categorical().find(|c| &c.name == column) {
                let counts = top_categories(category, *top);
                let max = counts.first().map_or(0, |c| c.count);
                for c in &counts {
                    let _ = writeln!(out, "  {:>20} | {:<width$} {}", c.value, bar(c.count, max), c.count, width = BAR_WIDTH);
                }
            }
        }
        ChartSpec::Histogram { column, bins } => {
            if let Some(numeric) = summary.numeric().find(|n| &n.name == column) {
                render_histogram(out, &numeric.histogram(*bins));
            }
        }
    }
}

/// Render metric lines, default charts and suggested questions
pub fn render(summary: &AnalysisSummary, dataset: &Dataset, config: &AnalysisConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Records: {}  Columns: {}", summary.total_records, summary.column_count());

    for n in summary.numeric() {
        let _ = writeln!(
            out,
            "  [numeric]     {}: min {}, max {}, avg {}, sum {}",
            n.name,
            format_stat(n.min),
            format_stat(n.max),
            format_stat(n.mean),
            format_stat(n.sum)
        );
    }
    for c in summary.categorical() {
        let _ = writeln!(out, "  [categorical] {}: {} unique values", c.name, c.unique_count);
    }
    for name in summary.datetime() {
        let _ = writeln!(out, "  [datetime]    {}", name);
    }

    for chart in default_charts(summary, config.top_categories, config.bin_count) {
        render_chart(&mut out, &chart, summary, dataset);
    }

    let _ = writeln!(out, "\nTry asking:");
    for suggestion in query_suggestions(summary) {
        let _ = writeln!(out, "  - {}", suggestion);
    }
    let _ = writeln!(out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use da_data::{analyze, parse_csv};

    #[test]
    fn test_bar_scaling() {
        assert_eq!(bar(0, 10), "");
        assert_eq!(bar(10, 10).len(), BAR_WIDTH);
        assert_eq!(bar(5, 10).len(), BAR_WIDTH / 2);
        assert_eq!(bar(1, 0), "");
    }

    #[test]
    fn test_render_sections() {
        let ds = parse_csv(
            "date,region,units\n\
             2021-01-01,North,5\n\
             2021-02-01,South,3\n\
             2021-03-01,North,4\n",
        );
        let config = AnalysisConfig::default();
        let summary = analyze(&ds, &config);
        let text = render(&summary, &ds, &config);

        assert!(text.starts_with("Records: 3  Columns: 3"));
        assert!(text.contains("[numeric]     units: min 3.00, max 5.00, avg 4.00, sum 12.00"));
        assert!(text.contains("[categorical] region: 2 unique values"));
        assert!(text.contains("[datetime]    date"));
        assert!(text.contains("Time Series Analysis"));
        assert!(text.contains("units over date: 3 points"));
        assert!(text.contains("Category Distribution"));
        assert!(text.contains("Value Distribution"));
        assert!(text.contains("What is the average units?"));
    }
}
