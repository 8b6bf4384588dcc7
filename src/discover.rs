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

//! Locating result files and folding them into a [`MetricStore`].

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::ingest::IngestOptions;
use crate::release::{extract_release, sort_by_release};
use crate::store::{FileSummary, MetricStore};

pub const RESULT_EXTENSION: &str = ".csv";

/// What to do when a single result file cannot be loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPolicy {
    /// Log the failure and continue; the file contributes nothing.
    #[default]
    SkipFailed,
    /// Stop at the first failing file.
    Abort,
}

#[derive(Debug)]
pub struct LoadedFile {
    pub path: PathBuf,
    pub summary: FileSummary,
}

#[derive(Debug)]
pub struct FailedFile {
    pub path: PathBuf,
    pub error: Error,
}

#[derive(Debug, Default)]
pub struct LoadOutcome {
    pub store: MetricStore,
    pub loaded: Vec<LoadedFile>,
    pub failed: Vec<FailedFile>,
}

impl LoadOutcome {
    pub fn all_loaded(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Result files directly inside `dir`, ordered by release label.
pub fn result_files_in(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::MissingDirectory(dir.to_path_buf()));
    }

    let io_err = |source: std::io::Error| Error::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let path = entry.path();
        let is_result = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(RESULT_EXTENSION));
        if is_result && path.is_file() {
            files.push(path);
        }
    }

    if files.is_empty() {
        return Err(Error::NoInputFiles(dir.to_path_buf()));
    }

    sort_by_release(&mut files);
    Ok(files)
}

/// Load `files` in the given order, each under the release named by its file.
pub fn load_files(
    files: &[PathBuf],
    options: &IngestOptions,
    policy: LoadPolicy,
) -> Result<LoadOutcome> {
    let mut outcome = LoadOutcome::default();

    for path in files {
        let release = extract_release(path);
        log::info!("Loading {} as release {}", path.display(), release);

        match outcome.store.add_file(path, &release, options) {
            Ok(summary) => {
                log::debug!(
                    "{}: {} rows, {} values, {} cells dropped",
                    path.display(),
                    summary.rows,
                    summary.values,
                    summary.omitted_cells
                );
                outcome.loaded.push(LoadedFile {
                    path: path.clone(),
                    summary,
                });
            }
            Err(error) if policy == LoadPolicy::Abort => return Err(error),
            Err(error) => {
                log::warn!("Skipping {}: {}", path.display(), error);
                outcome.failed.push(FailedFile {
                    path: path.clone(),
                    error,
                });
            }
        }
    }

    Ok(outcome)
}

/// Load every result file in `dir`. A missing directory or one without
/// result files is an error regardless of `policy`.
pub fn load_directory(
    dir: &Path,
    options: &IngestOptions,
    policy: LoadPolicy,
) -> Result<LoadOutcome> {
    let files = result_files_in(dir)?;
    log::info!("Found {} result files in {}", files.len(), dir.display());
    load_files(&files, options, policy)
}
