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

//! Longitudinal store of `(release, dataset, metric)` measurements.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use crate::error::Result;
use crate::ingest::{self, IngestOptions, ParsedFile};

/// Three-level `release -> dataset -> metric -> value` table.
///
/// Inner maps are created on the first insert that needs them; a repeated
/// insert of the same triple replaces the stored value.
#[derive(Debug, Clone, Default)]
pub struct MeasurementTable {
    inner: HashMap<String, HashMap<String, HashMap<String, f64>>>,
}

impl MeasurementTable {
    /// Returns the value previously stored for the triple, if any.
    pub fn insert(
        &mut self,
        release: &str,
        dataset: &str,
        metric: &str,
        value: f64,
    ) -> Option<f64> {
        self.inner
            .entry(release.to_string())
            .or_default()
            .entry(dataset.to_string())
            .or_default()
            .insert(metric.to_string(), value)
    }

    pub fn get(&self, release: &str, dataset: &str, metric: &str) -> Option<f64> {
        self.inner.get(release)?.get(dataset)?.get(metric).copied()
    }

    pub fn dataset(&self, release: &str, dataset: &str) -> Option<&HashMap<String, f64>> {
        self.inner.get(release)?.get(dataset)
    }

    pub fn len(&self) -> usize {
        self.inner
            .values()
            .flat_map(HashMap::values)
            .map(HashMap::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One observation in a per-(dataset, metric) series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint<'a> {
    pub release: &'a str,
    pub value: f64,
}

/// What a single file contributed to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSummary {
    pub release: String,
    pub rows: usize,
    pub values: usize,
    pub omitted_cells: usize,
    pub skipped_rows: usize,
}

#[derive(Debug, Clone, Default)]
pub struct MetricStore {
    releases: Vec<String>,
    table: MeasurementTable,
    datasets: BTreeSet<String>,
    metrics: BTreeSet<String>,
}

impl MetricStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a release label; returns `false` if it was already known.
    pub fn add_release(&mut self, release: &str) -> bool {
        if self.releases.iter().any(|r| r == release) {
            return false;
        }
        self.releases.push(release.to_string());
        true
    }

    pub fn add_dataset(&mut self, dataset: &str) {
        if !self.datasets.contains(dataset) {
            self.datasets.insert(dataset.to_string());
        }
    }

    /// Store one measurement, registering its release, dataset and metric.
    pub fn insert(
        &mut self,
        release: &str,
        dataset: &str,
        metric: &str,
        value: f64,
    ) -> Option<f64> {
        self.add_release(release);
        self.add_dataset(dataset);
        if !self.metrics.contains(metric) {
            self.metrics.insert(metric.to_string());
        }
        self.table.insert(release, dataset, metric, value)
    }

    /// Fold an already parsed file into the store under `release`.
    pub fn absorb(&mut self, parsed: &ParsedFile, release: &str) -> FileSummary {
        self.add_release(release);

        let mut values = 0;
        for row in &parsed.rows {
            self.add_dataset(&row.dataset);
        }
        for (dataset, metric, value) in parsed.measurements() {
            if let Some(previous) = self.insert(release, dataset, metric, value) {
                log::debug!(
                    "{}/{}/{}: {} replaced by {}",
                    release,
                    dataset,
                    metric,
                    previous,
                    value
                );
            }
            values += 1;
        }

        FileSummary {
            release: release.to_string(),
            rows: parsed.rows.len(),
            values,
            omitted_cells: parsed.omitted_cells(),
            skipped_rows: parsed.skipped_rows,
        }
    }

    /// Load a result file as `release`.
    ///
    /// On error nothing from the file is stored and the release is not
    /// registered; the caller decides whether to continue with other files.
    pub fn add_file(
        &mut self,
        path: &Path,
        release: &str,
        options: &IngestOptions,
    ) -> Result<FileSummary> {
        let parsed = ingest::read_file(path, options)?;
        Ok(self.absorb(&parsed, release))
    }

    /// Values of `metric` for `dataset` in release insertion order.
    ///
    /// Releases without a stored value are skipped, never filled.
    pub fn metric_series(&self, metric: &str, dataset: &str) -> Vec<SeriesPoint<'_>> {
        self.releases
            .iter()
            .filter_map(|release| {
                self.table
                    .get(release, dataset, metric)
                    .map(|value| SeriesPoint {
                        release: release.as_str(),
                        value,
                    })
            })
            .collect()
    }

    pub fn value(&self, release: &str, dataset: &str, metric: &str) -> Option<f64> {
        self.table.get(release, dataset, metric)
    }

    pub fn has_dataset_in(&self, release: &str, dataset: &str) -> bool {
        self.table.dataset(release, dataset).is_some()
    }

    pub fn releases(&self) -> &[String] {
        &self.releases
    }

    pub fn latest_release(&self) -> Option<&str> {
        self.releases.last().map(String::as_str)
    }

    /// Sorted lexicographically; callers must not read meaning into the order.
    pub fn datasets(&self) -> &BTreeSet<String> {
        &self.datasets
    }

    /// Sorted lexicographically; callers must not read meaning into the order.
    pub fn metrics(&self) -> &BTreeSet<String> {
        &self.metrics
    }

    pub fn measurement_count(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(entries: &[(&str, &str, &str, f64)]) -> MetricStore {
        let mut store = MetricStore::new();
        for &(release, dataset, metric, value) in entries {
            store.insert(release, dataset, metric, value);
        }
        store
    }

    #[test]
    fn test_release_list_has_no_duplicates() {
        let mut store = MetricStore::new();
        assert!(store.add_release("1.0"));
        assert!(store.add_release("1.1"));
        assert!(!store.add_release("1.0"));
        assert_eq!(store.releases(), ["1.0", "1.1"]);
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let store = store_with(&[
            ("2.0", "glove", "QPS", 1.0),
            ("10.0", "glove", "QPS", 2.0),
            ("1.0", "glove", "QPS", 3.0),
        ]);
        assert_eq!(store.releases(), ["2.0", "10.0", "1.0"]);
        assert_eq!(store.latest_release(), Some("1.0"));
    }

    #[test]
    fn test_reinsert_overwrites_only_that_triple() {
        let mut store = store_with(&[
            ("1.0", "glove", "QPS", 100.0),
            ("1.0", "glove", "Recall@10", 0.9),
        ]);
        let previous = store.insert("1.0", "glove", "QPS", 120.0);
        assert_eq!(previous, Some(100.0));
        assert_eq!(store.value("1.0", "glove", "QPS"), Some(120.0));
        assert_eq!(store.value("1.0", "glove", "Recall@10"), Some(0.9));
        assert_eq!(store.releases().len(), 1);
        assert_eq!(store.measurement_count(), 2);
    }

    #[test]
    fn test_series_skips_releases_without_value() {
        let store = store_with(&[
            ("1.0", "glove", "QPS", 100.0),
            ("1.1", "sift", "QPS", 50.0),
            ("1.2", "glove", "Recall@10", 0.9),
            ("1.3", "glove", "QPS", 110.0),
        ]);
        let series = store.metric_series("QPS", "glove");
        assert_eq!(
            series,
            vec![
                SeriesPoint { release: "1.0", value: 100.0 },
                SeriesPoint { release: "1.3", value: 110.0 },
            ]
        );
        assert!(store.metric_series("QPS", "missing").is_empty());
        assert!(store.metric_series("Latency", "glove").is_empty());
    }

    #[test]
    fn test_absorb_counts_and_registers() {
        let parsed = ingest::parse(
            "dataset,QPS,Recall@10\nglove,10,x\nnyt,,\n".as_bytes(),
            Path::new("r.csv"),
            &IngestOptions::default(),
        )
        .unwrap();
        let mut store = MetricStore::new();
        let summary = store.absorb(&parsed, "1.0");

        assert_eq!(summary.rows, 2);
        assert_eq!(summary.values, 1);
        assert_eq!(summary.omitted_cells, 3);
        // nyt is a known dataset even though it carried no values.
        assert!(store.datasets().contains("nyt"));
        assert!(store.has_dataset_in("1.0", "glove"));
        assert!(!store.has_dataset_in("1.0", "nyt"));
        assert_eq!(store.metrics().iter().collect::<Vec<_>>(), ["QPS"]);
    }

    #[test]
    fn test_table_insert_if_absent_then_overwrite() {
        let mut table = MeasurementTable::default();
        assert!(table.is_empty());
        assert_eq!(table.insert("r", "d", "m", 1.0), None);
        assert_eq!(table.insert("r", "d", "m", 2.0), Some(1.0));
        assert_eq!(table.get("r", "d", "m"), Some(2.0));
        assert_eq!(table.get("r", "d", "other"), None);
        assert_eq!(table.len(), 1);
    }
}
