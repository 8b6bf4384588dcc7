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

//! # benchtrend
//!
//! Tracks benchmark results across releases. Per-release CSV files are folded
//! into a [`MetricStore`], consecutive releases are compared per
//! `(dataset, metric)` series to find regressions and improvements, and
//! independently loaded runs can be aligned on one release axis for overlay
//! charts.
//!
//! ```no_run
//! use benchtrend::{IngestOptions, LoadPolicy, detect_changes, load_directory};
//!
//! let outcome = load_directory(
//!     "results".as_ref(),
//!     &IngestOptions::tolerant(),
//!     LoadPolicy::SkipFailed,
//! )?;
//! for change in detect_changes(&outcome.store, 5.0) {
//!     println!(
//!         "{} {} {:+.2}% ({})",
//!         change.dataset, change.metric, change.change_pct, change.status
//!     );
//! }
//! # Ok::<(), benchtrend::Error>(())
//! ```

pub mod align;
pub mod changes;
pub mod chart;
pub mod discover;
pub mod error;
pub mod ingest;
pub mod metric;
pub mod normalize;
pub mod release;
pub mod report;
pub mod store;
pub mod system;

pub use align::{Run, RunSeries, RunSet};
pub use changes::{ChangeRecord, ChangeStatus, DEFAULT_THRESHOLD_PCT, detect_changes};
pub use discover::{LoadOutcome, LoadPolicy, load_directory, load_files, result_files_in};
pub use error::{Error, Result};
pub use ingest::{Cell, HeaderMode, IngestOptions, Omission};
pub use metric::Direction;
pub use normalize::normalize_to_baseline;
pub use release::{extract_release, release_sort_key};
pub use store::{MetricStore, SeriesPoint};
