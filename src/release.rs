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

//! Release labels derived from result file names, and the ordering used when
//! a whole directory of result files is loaded.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

/// Label of the development branch; always ordered after every versioned release.
pub const MAIN_RELEASE: &str = "main";

static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:v|release[-_])?(\d+\.\d+(?:\.\d+)?)").expect("version pattern is valid")
});

/// Extract the release label from a result file name.
///
/// The first `major.minor[.patch]` occurrence wins, with any `v`, `release-` or
/// `release_` prefix stripped. Names without a version fall back to the file
/// stem, so `main.csv` yields `main`. Only the final path component is
/// inspected.
pub fn extract_release(filename: impl AsRef<Path>) -> String {
    let path = filename.as_ref();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_else(|| path.to_string_lossy());

    if let Some(version) = VERSION_PATTERN
        .captures(&name)
        .and_then(|caps| caps.get(1))
    {
        return version.as_str().to_string();
    }

    let stem = Path::new(&*name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned());
    stem.unwrap_or_else(|| name.into_owned())
}

/// Sort key for release labels: `main` (any case) last, everything else by
/// plain string comparison. `"10.0.0"` therefore sorts before `"2.0.0"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReleaseKey {
    is_main: bool,
    label: String,
}

pub fn release_sort_key(label: &str) -> ReleaseKey {
    ReleaseKey {
        is_main: label.eq_ignore_ascii_case(MAIN_RELEASE),
        label: label.to_string(),
    }
}

pub fn compare_releases(a: &str, b: &str) -> Ordering {
    release_sort_key(a).cmp(&release_sort_key(b))
}

/// Order result files by the release extracted from their names.
///
/// Files sharing a release label fall back to file-name order so the
/// last-write-wins outcome does not depend on directory listing order.
pub fn sort_by_release(files: &mut [PathBuf]) {
    files.sort_by(|a, b| {
        compare_releases(&extract_release(a), &extract_release(b))
            .then_with(|| a.file_name().cmp(&b.file_name()))
    });
}
