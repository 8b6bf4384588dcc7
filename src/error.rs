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

//! Error types for loading and analysing benchmark results.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("directory {} does not exist", .0.display())]
    MissingDirectory(PathBuf),

    #[error("no CSV files found in {}", .0.display())]
    NoInputFiles(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Path of the file or directory the error refers to.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Error::MissingDirectory(path) | Error::NoInputFiles(path) => path,
            Error::Io { path, .. } | Error::Csv { path, .. } | Error::Write { path, .. } => path,
        }
    }

    /// Setup errors end the run; everything else is scoped to one file.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::MissingDirectory(_) | Error::NoInputFiles(_) | Error::Write { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_errors_are_fatal() {
        assert!(Error::MissingDirectory(PathBuf::from("runs/a")).is_fatal());
        assert!(Error::NoInputFiles(PathBuf::from("runs/b")).is_fatal());
    }

    #[test]
    fn test_file_errors_are_not_fatal() {
        let err = Error::Io {
            path: PathBuf::from("results-1.0.csv"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(!err.is_fatal());
        assert_eq!(err.path(), std::path::Path::new("results-1.0.csv"));
        assert!(err.to_string().contains("results-1.0.csv"));
    }
}
