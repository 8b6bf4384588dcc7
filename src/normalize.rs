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

//! Rescaling of a series against its first observation.

use crate::store::SeriesPoint;

/// `value / first_value` for every point, or `None` when the series is empty
/// or starts at zero.
pub fn normalize_to_baseline<'a>(series: &[SeriesPoint<'a>]) -> Option<Vec<SeriesPoint<'a>>> {
    let baseline = series.first()?.value;
    if baseline == 0.0 {
        return None;
    }
    Some(
        series
            .iter()
            .map(|point| SeriesPoint {
                release: point.release,
                value: point.value / baseline,
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[f64]) -> Vec<SeriesPoint<'static>> {
        const RELEASES: [&str; 4] = ["r1", "r2", "r3", "r4"];
        values
            .iter()
            .zip(RELEASES)
            .map(|(&value, release)| SeriesPoint { release, value })
            .collect()
    }

    #[test]
    fn test_normalize() {
        let normalized = normalize_to_baseline(&series(&[5.0, 10.0, 2.5])).unwrap();
        let values: Vec<f64> = normalized.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![1.0, 2.0, 0.5]);
        let releases: Vec<&str> = normalized.iter().map(|p| p.release).collect();
        assert_eq!(releases, vec!["r1", "r2", "r3"]);
    }

    #[test]
    fn test_zero_baseline_is_excluded() {
        assert_eq!(normalize_to_baseline(&series(&[0.0, 5.0, 10.0])), None);
    }

    #[test]
    fn test_empty_series() {
        assert_eq!(normalize_to_baseline(&[]), None);
    }

    #[test]
    fn test_later_zero_is_kept() {
        let normalized = normalize_to_baseline(&series(&[4.0, 0.0])).unwrap();
        assert_eq!(normalized[1].value, 0.0);
    }
}
