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

use benchtrend::{MetricStore, Run, RunSet, detect_changes, normalize_to_baseline};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

// ============================================================================
// SYNTHETIC HISTORY
// ============================================================================

const DATASETS: &[&str] = &["ada002-100k", "cohere-english-v3-100k", "glove-100", "nytimes-256"];
const METRICS: &[&str] = &["QPS", "Mean Latency", "Recall@10", "Index Build Time", "Visited"];

/// Deterministic store with `releases` releases and a slow drift plus a
/// periodic jump in every series.
fn history(releases: usize, offset: usize) -> MetricStore {
    let mut store = MetricStore::new();
    for r in 0..releases {
        let release = format!("{}.{}.0", (r + offset) / 10, (r + offset) % 10);
        for (d, dataset) in DATASETS.iter().enumerate() {
            for (m, metric) in METRICS.iter().enumerate() {
                let base = 100.0 * (d + 1) as f64 + 10.0 * m as f64;
                let drift = 1.0 + 0.01 * r as f64;
                let jump = if r % 7 == 3 { 0.85 } else { 1.0 };
                store.insert(&release, dataset, metric, base * drift * jump);
            }
        }
    }
    store
}

// ============================================================================
// BENCHMARKS
// ============================================================================

fn bench_detect_changes(c: &mut Criterion) {
    let mut group = c.benchmark_group("detect_changes");
    for releases in [10, 50, 200] {
        let store = history(releases, 0);
        group.bench_with_input(BenchmarkId::from_parameter(releases), &store, |b, store| {
            b.iter(|| detect_changes(black_box(store), 5.0))
        });
    }
    group.finish();
}

fn bench_align_and_normalize(c: &mut Criterion) {
    let set = RunSet::pair(Run::new("a", history(100, 0)), Run::new("b", history(100, 50)));

    c.bench_function("overlay_all_series", |b| {
        b.iter(|| {
            let mut points = 0;
            for metric in set.metrics() {
                for dataset in set.datasets() {
                    for series in set.overlay(metric, dataset) {
                        if let Some(normalized) = normalize_to_baseline(&series.points) {
                            points += normalized.len();
                        }
                    }
                }
            }
            black_box(points)
        })
    });
}

criterion_group!(benches, bench_detect_changes, bench_align_and_normalize);
criterion_main!(benches);
