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

use anyhow::{Context, Result};
use benchtrend::chart::{self, ChartOptions};
use benchtrend::report::{self, COMPARISON_FILE, REPORT_FILE};
use benchtrend::system::HostInfo;
use benchtrend::{
    ChangeRecord, ChangeStatus, DEFAULT_THRESHOLD_PCT, IngestOptions, LoadOutcome, LoadPolicy,
    Run, RunSet, detect_changes, load_directory, load_files,
};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "benchtrend")]
#[command(about = "Track benchmark results across releases", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze result files from successive releases, in the order given
    Report {
        /// CSV result files; the release is taken from each file name
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Directory for charts and the report
        #[arg(short, long, default_value = "benchmark_reports")]
        output_dir: PathBuf,
        /// Minimum absolute change (percent) reported as significant
        #[arg(
            short,
            long,
            default_value_t = DEFAULT_THRESHOLD_PCT,
            value_parser = parse_threshold
        )]
        threshold: f64,
        /// Abort on the first file that cannot be loaded
        #[arg(long)]
        strict: bool,
    },
    /// Overlay two runs, each a directory of CSV result files
    Compare {
        /// Directory with the first run's result files
        dir1: PathBuf,
        /// Directory with the second run's result files
        dir2: PathBuf,
        /// Directory for comparison charts and the summary
        #[arg(short, long, default_value = "benchmark_comparison")]
        output_dir: PathBuf,
        /// Minimum absolute change (percent) reported as significant
        #[arg(
            short,
            long,
            default_value_t = DEFAULT_THRESHOLD_PCT,
            value_parser = parse_threshold
        )]
        threshold: f64,
        /// Label for the first run
        #[arg(long, default_value = "Run 1")]
        run1_label: String,
        /// Label for the second run
        #[arg(long, default_value = "Run 2")]
        run2_label: String,
        /// Abort on the first file that cannot be loaded
        #[arg(long)]
        strict: bool,
    },
}

fn parse_threshold(raw: &str) -> std::result::Result<f64, String> {
    let value: f64 = raw
        .parse()
        .map_err(|_| format!("'{}' is not a number", raw))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("threshold must be a non-negative percentage, got {}", value));
    }
    Ok(value)
}

fn policy(strict: bool) -> LoadPolicy {
    if strict {
        LoadPolicy::Abort
    } else {
        LoadPolicy::SkipFailed
    }
}

fn prepare_output_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output dir: {}", dir.display()))
}

fn report_failures(outcome: &LoadOutcome) {
    for failed in &outcome.failed {
        eprintln!(
            "{} {} contributed no data: {}",
            "warning:".yellow(),
            failed.path.display(),
            failed.error
        );
    }
}

fn print_changes(label: &str, changes: &[ChangeRecord]) {
    let improvements = changes
        .iter()
        .filter(|c| c.status == ChangeStatus::Improvement)
        .count();
    let regressions: Vec<&ChangeRecord> = changes
        .iter()
        .filter(|c| c.status == ChangeStatus::Regression)
        .collect();

    println!("\n{}", label.bold());
    println!("  {} {} improvements", "✓".green(), improvements);
    println!("  {} {} regressions", "✗".red(), regressions.len());
    for change in regressions {
        println!(
            "    {} / {}: {} → {} {}",
            change.dataset,
            change.metric,
            change.previous_release,
            change.current_release,
            format!("{:+.2}%", change.change_pct).red()
        );
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let chart_options = ChartOptions::default();

    match cli.command {
        Commands::Report {
            files,
            output_dir,
            threshold,
            strict,
        } => {
            prepare_output_dir(&output_dir)?;

            let outcome = load_files(&files, &IngestOptions::default(), policy(strict))
                .context("Failed to load benchmark results")?;
            report_failures(&outcome);
            if outcome.loaded.is_empty() {
                log::warn!("None of the {} input files could be loaded", files.len());
            }

            let changes = detect_changes(&outcome.store, threshold);
            let set = RunSet::single(Run::new("Run", outcome.store));
            let host = HostInfo::collect();

            let charts = chart::write_charts(&set, &output_dir, Some(&host), &chart_options)?;

            let report_path = output_dir.join(REPORT_FILE);
            let content =
                report::render_report(&set.runs()[0].store, &changes, &report::timestamp());
            report::write_report(&report_path, &content)?;

            print_changes("Significant changes", &changes);
            println!("\nBenchmark analysis complete. Report saved to {}", report_path.display());
            println!("{} charts saved to {}", charts.len(), output_dir.display());
        }
        Commands::Compare {
            dir1,
            dir2,
            output_dir,
            threshold,
            run1_label,
            run2_label,
            strict,
        } => {
            let options = IngestOptions::tolerant();

            log::info!("Loading benchmark data from {}...", dir1.display());
            let first = load_directory(&dir1, &options, policy(strict))?;
            report_failures(&first);

            log::info!("Loading benchmark data from {}...", dir2.display());
            let second = load_directory(&dir2, &options, policy(strict))?;
            report_failures(&second);

            prepare_output_dir(&output_dir)?;

            let set = RunSet::pair(
                Run::new(run1_label, first.store),
                Run::new(run2_label, second.store),
            );
            let changes: Vec<Vec<ChangeRecord>> = set
                .runs()
                .iter()
                .map(|run| detect_changes(&run.store, threshold))
                .collect();
            let host = HostInfo::collect();

            log::info!("Generating comparison charts...");
            let charts = chart::write_charts(&set, &output_dir, Some(&host), &chart_options)?;

            let summary_path = output_dir.join(COMPARISON_FILE);
            let content =
                report::render_comparison(&set, &changes, Some(&host), &report::timestamp());
            report::write_report(&summary_path, &content)?;

            for (run, run_changes) in set.runs().iter().zip(&changes) {
                print_changes(&run.label, run_changes);
            }
            println!(
                "\nComparison complete! {} charts saved to {}",
                charts.len(),
                output_dir.display()
            );
            println!("Summary report: {}", summary_path.display());
        }
    }

    Ok(())
}
