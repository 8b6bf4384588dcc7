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

//! Release-over-release change detection.
//!
//! Each `(dataset, metric)` series is walked independently. A step from one
//! observed release to the next is reported when its relative change reaches
//! the threshold; the metric's [`Direction`] decides whether it counts as an
//! improvement or a regression.

use std::fmt;

use crate::metric::Direction;
use crate::store::MetricStore;

pub const DEFAULT_THRESHOLD_PCT: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeStatus {
    Improvement,
    Regression,
    Unknown,
}

impl ChangeStatus {
    pub fn classify(direction: Direction, change_pct: f64) -> Self {
        match direction {
            Direction::HigherIsBetter if change_pct > 0.0 => ChangeStatus::Improvement,
            Direction::HigherIsBetter => ChangeStatus::Regression,
            Direction::LowerIsBetter if change_pct < 0.0 => ChangeStatus::Improvement,
            Direction::LowerIsBetter => ChangeStatus::Regression,
            Direction::Unknown => ChangeStatus::Unknown,
        }
    }
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeStatus::Improvement => write!(f, "improvement"),
            ChangeStatus::Regression => write!(f, "regression"),
            ChangeStatus::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChangeRecord {
    pub dataset: String,
    pub metric: String,
    pub previous_release: String,
    pub current_release: String,
    pub previous_value: f64,
    pub current_value: f64,
    pub change_pct: f64,
    pub status: ChangeStatus,
}

/// Percentage change from `previous` to `current`, or `None` when
/// `previous` is zero.
pub fn percent_change(previous: f64, current: f64) -> Option<f64> {
    if previous == 0.0 {
        return None;
    }
    Some((current - previous) / previous * 100.0)
}

/// All significant changes in `store`, sorted by dataset, metric and then
/// series position.
pub fn detect_changes(store: &MetricStore, threshold_pct: f64) -> Vec<ChangeRecord> {
    let mut changes = Vec::new();

    for dataset in store.datasets() {
        for metric in store.metrics() {
            let direction = Direction::of(metric);
            let series = store.metric_series(metric, dataset);

            for step in series.windows(2) {
                let (previous, current) = (step[0], step[1]);
                let Some(change_pct) = percent_change(previous.value, current.value) else {
                    log::debug!(
                        "{}/{}: zero value at {}, skipping step to {}",
                        dataset,
                        metric,
                        previous.release,
                        current.release
                    );
                    continue;
                };

                // NaN never reaches the threshold.
                let significant = change_pct.abs() >= threshold_pct;
                if !significant {
                    continue;
                }

                changes.push(ChangeRecord {
                    dataset: dataset.clone(),
                    metric: metric.clone(),
                    previous_release: previous.release.to_string(),
                    current_release: current.release.to_string(),
                    previous_value: previous.value,
                    current_value: current.value,
                    change_pct,
                    status: ChangeStatus::classify(direction, change_pct),
                });
            }
        }
    }

    changes
}

/// Changes split by status for presentation.
#[derive(Debug, Clone, Default)]
pub struct ChangeSummary<'a> {
    pub improvements: Vec<&'a ChangeRecord>,
    pub regressions: Vec<&'a ChangeRecord>,
    pub unknown: Vec<&'a ChangeRecord>,
}

impl<'a> ChangeSummary<'a> {
    pub fn from_changes(changes: &'a [ChangeRecord]) -> Self {
        let mut summary = ChangeSummary::default();
        for change in changes {
            match change.status {
                ChangeStatus::Improvement => summary.improvements.push(change),
                ChangeStatus::Regression => summary.regressions.push(change),
                ChangeStatus::Unknown => summary.unknown.push(change),
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series_store(metric: &str, values: &[f64]) -> MetricStore {
        let mut store = MetricStore::new();
        for (i, &value) in values.iter().enumerate() {
            store.insert(&format!("r{}", i + 1), "glove", metric, value);
        }
        store
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn test_higher_is_better_series() {
        let store = series_store("QPS", &[10.0, 10.6, 9.0]);
        let changes = detect_changes(&store, DEFAULT_THRESHOLD_PCT);

        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].previous_release, "r1");
        assert_eq!(changes[0].current_release, "r2");
        assert!(close(changes[0].change_pct, 6.0));
        assert_eq!(changes[0].status, ChangeStatus::Improvement);

        assert_eq!(changes[1].previous_release, "r2");
        assert_eq!(changes[1].current_release, "r3");
        assert!(close(changes[1].change_pct, -15.09));
        assert_eq!(changes[1].status, ChangeStatus::Regression);
    }

    #[test]
    fn test_lower_is_better_reverses_classification() {
        let store = series_store("Mean Latency", &[10.0, 10.6, 9.0]);
        let changes = detect_changes(&store, DEFAULT_THRESHOLD_PCT);

        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].status, ChangeStatus::Regression);
        assert_eq!(changes[1].status, ChangeStatus::Improvement);
    }

    #[test]
    fn test_unclassified_metric_is_unknown() {
        let store = series_store("Nodes Visited", &[100.0, 200.0]);
        let changes = detect_changes(&store, DEFAULT_THRESHOLD_PCT);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].status, ChangeStatus::Unknown);
    }

    #[test]
    fn test_zero_previous_value_is_skipped() {
        let store = series_store("QPS", &[0.0, 100.0, 0.0, 50.0]);
        let changes = detect_changes(&store, DEFAULT_THRESHOLD_PCT);

        // r1->r2 and r3->r4 start from zero; only r2->r3 remains.
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].previous_release, "r2");
        assert!(close(changes[0].change_pct, -100.0));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let store = series_store("QPS", &[100.0, 105.0, 109.0]);
        let changes = detect_changes(&store, 5.0);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].current_release, "r2");

        assert_eq!(detect_changes(&store, 0.0).len(), 2);
    }

    #[test]
    fn test_nan_and_infinite_steps_are_not_reported() {
        let store = series_store("QPS", &[f64::NAN, 10.0, f64::INFINITY, 12.0]);
        let changes = detect_changes(&store, DEFAULT_THRESHOLD_PCT);

        // r1->r2 is NaN, r3->r4 is (12 - inf) / inf = NaN; only r2->r3 is kept.
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].previous_release, "r2");
        assert_eq!(changes[0].current_release, "r3");
        assert!(changes.iter().all(|c| c.change_pct.abs() >= DEFAULT_THRESHOLD_PCT));
    }

    #[test]
    fn test_gaps_pair_adjacent_observations() {
        let mut store = MetricStore::new();
        store.insert("1.0", "glove", "QPS", 100.0);
        store.insert("1.1", "sift", "QPS", 1.0);
        store.insert("1.2", "glove", "QPS", 80.0);

        let changes = detect_changes(&store, DEFAULT_THRESHOLD_PCT);
        let glove: Vec<_> = changes.iter().filter(|c| c.dataset == "glove").collect();
        assert_eq!(glove.len(), 1);
        assert_eq!(glove[0].previous_release, "1.0");
        assert_eq!(glove[0].current_release, "1.2");
    }

    #[test]
    fn test_output_is_deterministic() {
        let mut a = MetricStore::new();
        let mut b = MetricStore::new();
        let rows = [
            ("1.0", "sift", "QPS", 10.0),
            ("1.0", "glove", "Recall@10", 0.5),
            ("1.1", "sift", "QPS", 20.0),
            ("1.1", "glove", "Recall@10", 0.9),
        ];
        for &(r, d, m, v) in &rows {
            a.insert(r, d, m, v);
        }
        // Same releases first, datasets and metrics discovered in another order.
        b.add_release("1.0");
        b.add_release("1.1");
        for &(r, d, m, v) in rows.iter().rev() {
            b.insert(r, d, m, v);
        }
        assert_eq!(detect_changes(&a, 5.0), detect_changes(&b, 5.0));
    }

    #[test]
    fn test_summary_splits_by_status() {
        let store = series_store("QPS", &[10.0, 10.6, 9.0]);
        let changes = detect_changes(&store, DEFAULT_THRESHOLD_PCT);
        let summary = ChangeSummary::from_changes(&changes);
        assert_eq!(summary.improvements.len(), 1);
        assert_eq!(summary.regressions.len(), 1);
        assert!(summary.unknown.is_empty());
    }

    #[test]
    fn test_percent_change() {
        assert_eq!(percent_change(0.0, 5.0), None);
        assert_eq!(percent_change(50.0, 75.0), Some(50.0));
    }
}
