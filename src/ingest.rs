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

//! CSV ingestion: one header row, a dataset column and any number of metric
//! columns.
//!
//! A file is parsed completely before anything reaches a
//! [`MetricStore`](crate::store::MetricStore), so a file that fails halfway
//! contributes nothing.

use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// How the dataset column is located in the header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderMode {
    /// Only a column named exactly `dataset`.
    #[default]
    Strict,
    /// `Dataset`, falling back to `dataset`.
    Tolerant,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IngestOptions {
    pub header: HeaderMode,
}

impl IngestOptions {
    pub fn tolerant() -> Self {
        Self {
            header: HeaderMode::Tolerant,
        }
    }

    fn is_dataset_column(&self, name: &str) -> bool {
        match self.header {
            HeaderMode::Strict => name == "dataset",
            HeaderMode::Tolerant => name.eq_ignore_ascii_case("dataset"),
        }
    }
}

/// Why a metric cell produced no measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Omission {
    Empty,
    NotNumeric,
}

/// Outcome of reading one metric cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    Value(f64),
    Omitted(Omission),
}

impl Cell {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Cell::Omitted(Omission::Empty);
        }
        match trimmed.parse::<f64>() {
            Ok(value) => Cell::Value(value),
            Err(_) => Cell::Omitted(Omission::NotNumeric),
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Cell::Value(v) => Some(*v),
            Cell::Omitted(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParsedRow {
    pub dataset: String,
    pub cells: Vec<(String, Cell)>,
}

#[derive(Debug, Clone)]
pub struct ParsedFile {
    pub path: PathBuf,
    pub rows: Vec<ParsedRow>,
    /// Rows dropped because they had no dataset name.
    pub skipped_rows: usize,
}

impl ParsedFile {
    /// Every stored measurement as `(dataset, metric, value)`, in file order.
    pub fn measurements(&self) -> impl Iterator<Item = (&str, &str, f64)> + '_ {
        self.rows.iter().flat_map(|row| {
            row.cells.iter().filter_map(move |(metric, cell)| {
                cell.value()
                    .map(|v| (row.dataset.as_str(), metric.as_str(), v))
            })
        })
    }

    pub fn omitted_cells(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|row| row.cells.iter())
            .filter(|(_, cell)| matches!(cell, Cell::Omitted(_)))
            .count()
    }
}

/// Read and parse a result file from disk.
pub fn read_file(path: &Path, options: &IngestOptions) -> Result<ParsedFile> {
    let file = std::fs::File::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(file, path, options)
}

/// Parse CSV content; `path` is only used for diagnostics.
pub fn parse<R: Read>(input: R, path: &Path, options: &IngestOptions) -> Result<ParsedFile> {
    let csv_err = |source: csv::Error| Error::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);
    let headers = reader.headers().map_err(csv_err)?.clone();

    let dataset_index = match options.header {
        HeaderMode::Strict => vec![headers.iter().position(|h| h == "dataset")],
        HeaderMode::Tolerant => vec![
            headers.iter().position(|h| h == "Dataset"),
            headers.iter().position(|h| h == "dataset"),
        ],
    };
    if dataset_index.iter().all(Option::is_none) {
        log::warn!("{}: no dataset column in header, rows ignored", path.display());
    }

    let mut parsed = ParsedFile {
        path: path.to_path_buf(),
        rows: Vec::new(),
        skipped_rows: 0,
    };

    for record in reader.records() {
        let record = record.map_err(csv_err)?;

        let dataset = dataset_index
            .iter()
            .flatten()
            .filter_map(|&i| record.get(i))
            .map(str::trim)
            .find(|name| !name.is_empty());
        let Some(dataset) = dataset else {
            parsed.skipped_rows += 1;
            continue;
        };

        let cells = headers
            .iter()
            .zip(record.iter())
            .filter(|(name, _)| !options.is_dataset_column(name))
            .map(|(name, raw)| {
                let cell = Cell::parse(raw);
                if let Cell::Omitted(reason) = cell {
                    log::debug!(
                        "{}: dropping {:?} cell {:?} for {}/{}",
                        path.display(),
                        reason,
                        raw,
                        dataset,
                        name
                    );
                }
                (name.to_string(), cell)
            })
            .collect();

        parsed.rows.push(ParsedRow {
            dataset: dataset.to_string(),
            cells,
        });
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_str(content: &str, options: IngestOptions) -> ParsedFile {
        parse(content.as_bytes(), Path::new("test.csv"), &options).unwrap()
    }

    #[test]
    fn test_cell_parse() {
        assert_eq!(Cell::parse("1.5"), Cell::Value(1.5));
        assert_eq!(Cell::parse(" 42 "), Cell::Value(42.0));
        assert_eq!(Cell::parse("0"), Cell::Value(0.0));
        assert_eq!(Cell::parse(""), Cell::Omitted(Omission::Empty));
        assert_eq!(Cell::parse("   "), Cell::Omitted(Omission::Empty));
        assert_eq!(Cell::parse("fast"), Cell::Omitted(Omission::NotNumeric));
    }

    #[test]
    fn test_zero_is_a_value_not_an_omission() {
        assert_eq!(Cell::parse("0.0").value(), Some(0.0));
        assert_eq!(Cell::parse("n/a").value(), None);
    }

    #[test]
    fn test_parse_rows_and_drop_bad_cells() {
        let parsed = parse_str(
            "dataset,QPS,Mean Latency,Notes\nglove,1000,0.5,ok\nsift,abc,0.7,\n",
            IngestOptions::default(),
        );
        assert_eq!(parsed.rows.len(), 2);
        let values: Vec<_> = parsed.measurements().collect();
        assert_eq!(
            values,
            vec![
                ("glove", "QPS", 1000.0),
                ("glove", "Mean Latency", 0.5),
                ("sift", "Mean Latency", 0.7),
            ]
        );
        // glove/Notes, sift/QPS, sift/Notes
        assert_eq!(parsed.omitted_cells(), 3);
    }

    #[test]
    fn test_strict_mode_ignores_capitalised_dataset() {
        let parsed = parse_str("Dataset,QPS\nglove,10\n", IngestOptions::default());
        assert!(parsed.rows.is_empty());
        assert_eq!(parsed.skipped_rows, 1);
    }

    #[test]
    fn test_tolerant_mode_accepts_either_column() {
        let upper = parse_str("Dataset,QPS\nglove,10\n", IngestOptions::tolerant());
        assert_eq!(upper.rows[0].dataset, "glove");

        let lower = parse_str("dataset,QPS\nsift,10\n", IngestOptions::tolerant());
        assert_eq!(lower.rows[0].dataset, "sift");
        assert_eq!(lower.rows[0].cells.len(), 1);
    }

    #[test]
    fn test_tolerant_mode_falls_back_when_dataset_cell_empty() {
        let parsed = parse_str(
            "Dataset,dataset,QPS\n,sift,10\n,,11\n",
            IngestOptions::tolerant(),
        );
        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.rows[0].dataset, "sift");
        assert_eq!(parsed.skipped_rows, 1);
    }

    #[test]
    fn test_short_rows_do_not_fail_the_file() {
        let parsed = parse_str("dataset,QPS,Recall@10\nglove,10\n", IngestOptions::default());
        let values: Vec<_> = parsed.measurements().collect();
        assert_eq!(values, vec![("glove", "QPS", 10.0)]);
    }

    #[test]
    fn test_invalid_utf8_is_a_file_error() {
        let bytes: &[u8] = b"dataset,QPS\nglove,\xff\xfe\n";
        let err = parse(bytes, Path::new("bad.csv"), &IngestOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Csv { .. }));
    }
}
