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

//! Description of the machine the analysis ran on, printed under the
//! aggregated chart and in the comparison summary.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct HostInfo {
    pub cpu: String,
    pub cores: usize,
    pub memory_gb: f64,
    pub platform: String,
}

impl HostInfo {
    pub fn collect() -> Self {
        let mut sys = sysinfo::System::new_all();
        sys.refresh_all();

        let platform = match (sysinfo::System::name(), sysinfo::System::kernel_version()) {
            (Some(name), Some(kernel)) => format!("{} {}", name, kernel),
            (Some(name), None) => name,
            _ => std::env::consts::OS.to_string(),
        };

        Self {
            cpu: sys
                .cpus()
                .first()
                .map(|c| c.brand().trim().to_string())
                .filter(|brand| !brand.is_empty())
                .unwrap_or_else(|| std::env::consts::ARCH.to_string()),
            cores: core_count(sysinfo::System::physical_core_count(), sys.cpus().len()),
            memory_gb: sys.total_memory() as f64 / 1024.0 / 1024.0 / 1024.0,
            platform,
        }
    }
}

/// Physical cores when the platform reports them, logical CPUs otherwise.
fn core_count(physical: Option<usize>, logical: usize) -> usize {
    physical.filter(|&n| n > 0).unwrap_or(logical)
}

impl fmt::Display for HostInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CPU: {}, Cores: {}, Memory: {:.2} GB",
            self.cpu, self.cores, self.memory_gb
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_count_prefers_physical() {
        assert_eq!(core_count(Some(4), 8), 4);
        assert_eq!(core_count(None, 8), 8);
        assert_eq!(core_count(Some(0), 8), 8);
    }

    #[test]
    fn test_display() {
        let host = HostInfo {
            cpu: "Test CPU".into(),
            cores: 8,
            memory_gb: 15.5,
            platform: "Linux 6.1".into(),
        };
        assert_eq!(host.to_string(), "CPU: Test CPU, Cores: 8, Memory: 15.50 GB");
    }
}
