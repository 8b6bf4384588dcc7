// benchtrend - Release-over-release benchmark trend analysis
// Copyright (c) 2025 Oliver Seifert
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Markdown reports for a single run and for a two-run comparison.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use chrono::Local;

use crate::align::RunSet;
use crate::changes::{ChangeRecord, ChangeSummary};
use crate::chart::{AGGREGATED_CHART, chart_file_name};
use crate::error::{Error, Result};
use crate::metric::{MEAN_LATENCY, QPS, RECALL_AT_10};
use crate::store::MetricStore;
use crate::system::HostInfo;

pub const REPORT_FILE: &str = "benchmark_report.md";
pub const COMPARISON_FILE: &str = "comparison_summary.md";

pub fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

fn join<'a>(items: impl IntoIterator<Item = &'a str>) -> String {
    items.into_iter().collect::<Vec<_>>().join(", ")
}

fn change_table(out: &mut String, changes: &[&ChangeRecord]) {
    out.push_str("| Dataset | Metric | Releases | Previous | Current | Change |\n");
    out.push_str("|---------|--------|----------|----------|---------|--------|\n");
    for change in changes {
        let _ = writeln!(
            out,
            "| {} | {} | {} → {} | {:.4} | {:.4} | {:+.2}% |",
            change.dataset,
            change.metric,
            change.previous_release,
            change.current_release,
            change.previous_value,
            change.current_value,
            change.change_pct
        );
    }
    out.push('\n');
}

fn significant_changes(out: &mut String, changes: &[ChangeRecord], heading: &str) {
    let summary = ChangeSummary::from_changes(changes);

    let _ = writeln!(out, "{} Significant Changes\n", heading);
    let _ = writeln!(out, "- Total improvements: {}", summary.improvements.len());
    let _ = writeln!(out, "- Total regressions: {}", summary.regressions.len());
    if !summary.unknown.is_empty() {
        let _ = writeln!(
            out,
            "- Changes in metrics without a direction: {}",
            summary.unknown.len()
        );
    }
    out.push('\n');

    if !summary.improvements.is_empty() {
        let _ = writeln!(out, "{}# Improvements\n", heading);
        change_table(out, &summary.improvements);
    }
    if !summary.regressions.is_empty() {
        let _ = writeln!(out, "{}# Regressions\n", heading);
        change_table(out, &summary.regressions);
    }
}

fn latest_results(out: &mut String, store: &MetricStore) {
    out.push_str("## Latest Results\n\n");
    let latest = store.latest_release().unwrap_or("N/A");
    let _ = writeln!(out, "### Release: {}\n", latest);

    out.push_str("| Dataset | QPS | Mean Latency | Recall@10 |\n");
    out.push_str("|---------|-----|--------------|-----------|\n");

    for dataset in store.datasets() {
        if !store.has_dataset_in(latest, dataset) {
            continue;
        }
        let cell = |metric: &str, precision: usize| {
            store
                .value(latest, dataset, metric)
                .map(|v| format!("{:.*}", precision, v))
                .unwrap_or_else(|| "N/A".to_string())
        };
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} |",
            dataset,
            cell(QPS, 2),
            cell(MEAN_LATENCY, 4),
            cell(RECALL_AT_10, 4)
        );
    }
    out.push('\n');
}

/// Report for a single run: summary, significant changes, latest release
/// and links to the charts.
pub fn render_report(store: &MetricStore, changes: &[ChangeRecord], generated_at: &str) -> String {
    let mut out = String::new();

    out.push_str("# Benchmark Performance Report\n\n");
    let _ = writeln!(out, "_Generated {}_\n", generated_at);

    out.push_str("## Summary\n\n");
    let _ = writeln!(out, "- Total releases analyzed: {}", store.releases().len());
    let _ = writeln!(
        out,
        "- Datasets: {}",
        join(store.datasets().iter().map(String::as_str))
    );
    let _ = writeln!(
        out,
        "- Metrics: {}\n",
        join(store.metrics().iter().map(String::as_str))
    );

    significant_changes(&mut out, changes, "##");
    latest_results(&mut out, store);

    out.push_str("## Performance Graphs\n\n");
    for metric in store.metrics() {
        let _ = writeln!(out, "![{}]({})\n", metric, chart_file_name(metric, false));
    }
    let _ = writeln!(out, "![Aggregated Comparison]({})", AGGREGATED_CHART);

    out
}

/// Summary of a two-run comparison. `changes` holds the significant changes
/// of each run, in run order.
pub fn render_comparison(
    set: &RunSet,
    changes: &[Vec<ChangeRecord>],
    host: Option<&HostInfo>,
    generated_at: &str,
) -> String {
    let mut out = String::new();
    let labels: Vec<&str> = set.runs().iter().map(|r| r.label.as_str()).collect();

    let _ = writeln!(out, "# Benchmark Comparison Report: {}\n", labels.join(" vs "));
    let _ = writeln!(out, "_Generated {}_\n", generated_at);

    if let Some(host) = host {
        out.push_str("**System Information:**\n");
        let _ = writeln!(out, "- CPU: {}", host.cpu);
        let _ = writeln!(out, "- Cores: {}", host.cores);
        let _ = writeln!(out, "- Memory: {:.2} GB", host.memory_gb);
        let _ = writeln!(out, "- Platform: {}\n", host.platform);
    }

    out.push_str("**Comparison Summary:**\n");
    for run in set.runs() {
        let _ = writeln!(
            out,
            "- {}: {} releases, {} datasets",
            run.label,
            run.store.releases().len(),
            run.store.datasets().len()
        );
    }
    let _ = writeln!(out, "- Metrics compared: {}\n", join(set.metrics()));

    out.push_str("## Datasets\n\n");
    for dataset in set.datasets() {
        let present = set.runs_with_dataset(dataset);
        let status = if present.len() == set.runs().len() {
            "✓ Both runs".to_string()
        } else {
            format!("✓ {} only", present.join(", "))
        };
        let _ = writeln!(out, "- **{}**: {}", dataset, status);
    }

    out.push_str("\n## Releases\n\n");
    for run in set.runs() {
        let _ = writeln!(
            out,
            "**{}**: {}\n",
            run.label,
            join(run.store.releases().iter().map(String::as_str))
        );
    }
    let _ = writeln!(out, "Combined axis: {}\n", join(set.axis().iter().map(String::as_str)));

    for (run, run_changes) in set.runs().iter().zip(changes) {
        let _ = writeln!(out, "## {}\n", run.label);
        significant_changes(&mut out, run_changes, "###");
    }

    out.push_str("## Performance Graphs\n\n");
    for metric in set.metrics() {
        let _ = writeln!(out, "![{}]({})\n", metric, chart_file_name(metric, true));
    }

    out.push_str("Generated plots show the comparison of both runs with:\n");
    if let [first, second, ..] = labels.as_slice() {
        let _ = writeln!(out, "- Solid lines with circle markers for {}", first);
        let _ = writeln!(out, "- Dashed lines with square markers for {}", second);
    }

    out
}

pub fn write_report(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })
}
