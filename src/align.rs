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

//! Alignment of independently loaded runs onto one release axis.
//!
//! Runs are only ever drawn side by side. Values from different runs are
//! never combined.

use std::collections::BTreeSet;

use crate::store::{MetricStore, SeriesPoint};

#[derive(Debug, Clone)]
pub struct Run {
    pub label: String,
    pub store: MetricStore,
}

impl Run {
    pub fn new(label: impl Into<String>, store: MetricStore) -> Self {
        Self {
            label: label.into(),
            store,
        }
    }
}

/// One run's contribution to an overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSeries<'a> {
    pub run_index: usize,
    pub run_label: &'a str,
    pub points: Vec<SeriesPoint<'a>>,
}

/// Append the releases of `other` that `axis` does not contain yet, keeping
/// `other`'s order for the appended tail.
pub fn merge_release_axis(axis: &mut Vec<String>, other: &[String]) {
    for release in other {
        if !axis.contains(release) {
            axis.push(release.clone());
        }
    }
}

/// One or more runs sharing a release axis. A single run is the plain
/// report view; two runs are the comparison view.
#[derive(Debug, Clone)]
pub struct RunSet {
    runs: Vec<Run>,
    axis: Vec<String>,
}

impl RunSet {
    pub fn new(runs: Vec<Run>) -> Self {
        let mut axis = Vec::new();
        for run in &runs {
            merge_release_axis(&mut axis, run.store.releases());
        }
        Self { runs, axis }
    }

    pub fn single(run: Run) -> Self {
        Self::new(vec![run])
    }

    pub fn pair(first: Run, second: Run) -> Self {
        Self::new(vec![first, second])
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    pub fn axis(&self) -> &[String] {
        &self.axis
    }

    pub fn axis_position(&self, release: &str) -> Option<usize> {
        self.axis.iter().position(|r| r == release)
    }

    pub fn is_comparison(&self) -> bool {
        self.runs.len() > 1
    }

    pub fn datasets(&self) -> BTreeSet<&str> {
        self.runs
            .iter()
            .flat_map(|run| run.store.datasets())
            .map(String::as_str)
            .collect()
    }

    pub fn metrics(&self) -> BTreeSet<&str> {
        self.runs
            .iter()
            .flat_map(|run| run.store.metrics())
            .map(String::as_str)
            .collect()
    }

    /// Per-run series of `metric` for `dataset`. Runs without data for the
    /// pair are left out.
    pub fn overlay(&self, metric: &str, dataset: &str) -> Vec<RunSeries<'_>> {
        self.runs
            .iter()
            .enumerate()
            .filter_map(|(run_index, run)| {
                let points = run.store.metric_series(metric, dataset);
                (!points.is_empty()).then(|| RunSeries {
                    run_index,
                    run_label: run.label.as_str(),
                    points,
                })
            })
            .collect()
    }

    /// Labels of the runs in which `dataset` appears.
    pub fn runs_with_dataset(&self, dataset: &str) -> Vec<&str> {
        self.runs
            .iter()
            .filter(|run| run.store.datasets().contains(dataset))
            .map(|run| run.label.as_str())
            .collect()
    }
}
