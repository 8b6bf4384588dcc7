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

//! Metric names and whether a larger value is desirable.

pub const QPS: &str = "QPS";
pub const QPS_STDDEV: &str = "QPS StdDev";
pub const MEAN_LATENCY: &str = "Mean Latency";
pub const RECALL_AT_10: &str = "Recall@10";
pub const INDEX_BUILD_TIME: &str = "Index Build Time";

pub const HIGHER_IS_BETTER: &[&str] = &[QPS, RECALL_AT_10];
pub const LOWER_IS_BETTER: &[&str] = &[MEAN_LATENCY, INDEX_BUILD_TIME];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    HigherIsBetter,
    LowerIsBetter,
    Unknown,
}

impl Direction {
    /// Metric names are matched exactly; `qps` is not `QPS`.
    pub fn of(metric: &str) -> Self {
        if HIGHER_IS_BETTER.contains(&metric) {
            Direction::HigherIsBetter
        } else if LOWER_IS_BETTER.contains(&metric) {
            Direction::LowerIsBetter
        } else {
            Direction::Unknown
        }
    }
}

/// File-system friendly form of a metric name: `Recall@10` -> `Recall_at_10`.
pub fn safe_metric_name(metric: &str) -> String {
    metric.replace('@', "_at_").replace(' ', "_")
}
