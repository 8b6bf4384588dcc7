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

//! SVG line charts: one per metric and one stacked chart of baseline
//! normalized series.
//!
//! Releases are categorical x positions taken from the run set's merged
//! axis. Each dataset keeps one colour; the first run is drawn solid with
//! circle markers, later runs dashed with square markers.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::align::RunSet;
use crate::error::{Error, Result};
use crate::metric::{QPS, QPS_STDDEV, safe_metric_name};
use crate::normalize::normalize_to_baseline;
use crate::system::HostInfo;

pub const AGGREGATED_CHART: &str = "aggregated_comparison.svg";

const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 240.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 80.0;

#[derive(Debug, Clone, Copy)]
pub struct ChartOptions {
    pub width: u32,
    pub panel_height: u32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: 1000,
            panel_height: 600,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Circle,
    Square,
}

#[derive(Debug, Clone)]
pub struct Line {
    pub label: String,
    pub color: &'static str,
    pub style: LineStyle,
    pub marker: Marker,
    /// `(axis index, value)` pairs in drawing order.
    pub points: Vec<(usize, f64)>,
    /// Half-height of an error bar per point.
    pub errors: Option<Vec<f64>>,
}

#[derive(Debug, Clone)]
pub struct Panel {
    pub title: String,
    pub y_label: String,
    pub lines: Vec<Line>,
}

/// Name of the chart file written for `metric`.
pub fn chart_file_name(metric: &str, comparison: bool) -> String {
    if comparison {
        format!("{}_comparison.svg", safe_metric_name(metric))
    } else {
        format!("{}.svg", safe_metric_name(metric))
    }
}

fn dataset_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

fn run_style(run_index: usize) -> (LineStyle, Marker) {
    if run_index == 0 {
        (LineStyle::Solid, Marker::Circle)
    } else {
        (LineStyle::Dashed, Marker::Square)
    }
}

fn line_label(set: &RunSet, dataset: &str, run_label: &str) -> String {
    if set.is_comparison() {
        format!("{} ({})", dataset, run_label)
    } else {
        dataset.to_string()
    }
}

/// Lines for one metric: every dataset, every run that has data for it.
pub fn metric_panel(set: &RunSet, metric: &str) -> Panel {
    let mut lines = Vec::new();

    for (dataset_index, dataset) in set.datasets().into_iter().enumerate() {
        for series in set.overlay(metric, dataset) {
            let (style, marker) = run_style(series.run_index);
            let points: Vec<(usize, f64)> = series
                .points
                .iter()
                .filter_map(|p| set.axis_position(p.release).map(|x| (x, p.value)))
                .collect();

            let errors = (metric == QPS).then(|| {
                let store = &set.runs()[series.run_index].store;
                series
                    .points
                    .iter()
                    .map(|p| store.value(p.release, dataset, QPS_STDDEV).unwrap_or(0.0))
                    .collect::<Vec<f64>>()
            });
            let errors = errors.filter(|e| e.iter().any(|&v| v != 0.0));

            lines.push(Line {
                label: line_label(set, dataset, series.run_label),
                color: dataset_color(dataset_index),
                style,
                marker,
                points,
                errors,
            });
        }
    }

    let title = if set.is_comparison() {
        format!("{} Over Time - Comparison", metric)
    } else {
        format!("{} Over Time", metric)
    };

    Panel {
        title,
        y_label: metric.to_string(),
        lines,
    }
}

/// Normalized lines for one metric; datasets whose series starts at zero
/// are left out.
pub fn aggregated_panel(set: &RunSet, metric: &str) -> Panel {
    let mut lines = Vec::new();

    for (dataset_index, dataset) in set.datasets().into_iter().enumerate() {
        for series in set.overlay(metric, dataset) {
            let Some(normalized) = normalize_to_baseline(&series.points) else {
                log::debug!(
                    "{}/{}: first value is zero, left out of aggregated view",
                    dataset,
                    metric
                );
                continue;
            };
            let (style, marker) = run_style(series.run_index);
            lines.push(Line {
                label: line_label(set, dataset, series.run_label),
                color: dataset_color(dataset_index),
                style,
                marker,
                points: normalized
                    .iter()
                    .filter_map(|p| set.axis_position(p.release).map(|x| (x, p.value)))
                    .collect(),
                errors: None,
            });
        }
    }

    Panel {
        title: format!("Aggregated {}", metric),
        y_label: "Relative Change".to_string(),
        lines,
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn format_tick(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude >= 1000.0 {
        format!("{:.0}", value)
    } else if magnitude >= 1.0 {
        format!("{:.2}", value)
    } else {
        format!("{:.4}", value)
    }
}

fn value_range(panel: &Panel) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for line in &panel.lines {
        for (i, &(_, v)) in line.points.iter().enumerate() {
            if !v.is_finite() {
                continue;
            }
            let err = line
                .errors
                .as_ref()
                .and_then(|e| e.get(i))
                .copied()
                .unwrap_or(0.0);
            lo = lo.min(v - err);
            hi = hi.max(v + err);
        }
    }
    if !lo.is_finite() {
        return (0.0, 1.0);
    }
    if lo == hi {
        let pad = if lo == 0.0 { 1.0 } else { lo.abs() * 0.1 };
        return (lo - pad, hi + pad);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad, hi + pad)
}

fn draw_marker(svg: &mut String, marker: Marker, x: f64, y: f64, color: &str) {
    match marker {
        Marker::Circle => {
            let _ = writeln!(
                svg,
                r#"<circle cx="{:.1}" cy="{:.1}" r="4" fill="{}"/>"#,
                x, y, color
            );
        }
        Marker::Square => {
            let _ = writeln!(
                svg,
                r#"<rect x="{:.1}" y="{:.1}" width="8" height="8" fill="{}"/>"#,
                x - 4.0,
                y - 4.0,
                color
            );
        }
    }
}

/// Draw one panel with its top edge at `top`.
fn draw_panel(svg: &mut String, panel: &Panel, axis: &[String], top: f64, options: &ChartOptions) {
    let width = options.width as f64;
    let plot_w = width - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = options.panel_height as f64 - MARGIN_TOP - MARGIN_BOTTOM;
    let plot_top = top + MARGIN_TOP;
    let plot_bottom = plot_top + plot_h;
    let slots = axis.len().max(1) as f64;
    let (lo, hi) = value_range(panel);

    let x_at = |i: usize| MARGIN_LEFT + plot_w * (i as f64 + 0.5) / slots;
    let y_at = |v: f64| plot_bottom - (v - lo) / (hi - lo) * plot_h;

    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" font-size="16" text-anchor="middle">{}</text>"#,
        MARGIN_LEFT + plot_w / 2.0,
        top + 24.0,
        escape(&panel.title)
    );
    let _ = writeln!(
        svg,
        r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="none" stroke="black"/>"#,
        MARGIN_LEFT, plot_top, plot_w, plot_h
    );

    for step in 0..=4 {
        let v = lo + (hi - lo) * step as f64 / 4.0;
        let y = y_at(v);
        let _ = writeln!(
            svg,
            r##"<line x1="{:.1}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="#cccccc" stroke-dasharray="4 3"/>"##,
            MARGIN_LEFT,
            MARGIN_LEFT + plot_w
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" font-size="11" text-anchor="end">{}</text>"#,
            MARGIN_LEFT - 6.0,
            y + 4.0,
            format_tick(v)
        );
    }

    for (i, release) in axis.iter().enumerate() {
        let x = x_at(i);
        let y = plot_bottom + 14.0;
        let _ = writeln!(
            svg,
            r#"<text x="{x:.1}" y="{y:.1}" font-size="11" text-anchor="end" transform="rotate(-45 {x:.1} {y:.1})">{}</text>"#,
            escape(release)
        );
    }

    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" font-size="12" text-anchor="middle" transform="rotate(-90 {:.1} {:.1})">{}</text>"#,
        20.0,
        plot_top + plot_h / 2.0,
        20.0,
        plot_top + plot_h / 2.0,
        escape(&panel.y_label)
    );

    for (index, line) in panel.lines.iter().enumerate() {
        let dash = match line.style {
            LineStyle::Solid => "",
            LineStyle::Dashed => r#" stroke-dasharray="8 4""#,
        };
        let path: Vec<String> = line
            .points
            .iter()
            .filter(|(_, v)| v.is_finite())
            .map(|&(x, v)| format!("{:.1},{:.1}", x_at(x), y_at(v)))
            .collect();
        let _ = writeln!(
            svg,
            r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="2"{}/>"#,
            path.join(" "),
            line.color,
            dash
        );

        for (i, &(x, v)) in line.points.iter().enumerate() {
            if !v.is_finite() {
                continue;
            }
            if let Some(err) = line.errors.as_ref().and_then(|e| e.get(i)).copied() {
                let cx = x_at(x);
                let _ = writeln!(
                    svg,
                    r#"<line x1="{cx:.1}" y1="{:.1}" x2="{cx:.1}" y2="{:.1}" stroke="{}"/>"#,
                    y_at(v - err),
                    y_at(v + err),
                    line.color
                );
            }
            draw_marker(svg, line.marker, x_at(x), y_at(v), line.color);
        }

        let legend_x = MARGIN_LEFT + plot_w + 16.0;
        let legend_y = plot_top + 10.0 + index as f64 * 18.0;
        let _ = writeln!(
            svg,
            r#"<line x1="{:.1}" y1="{legend_y:.1}" x2="{:.1}" y2="{legend_y:.1}" stroke="{}" stroke-width="2"{}/>"#,
            legend_x,
            legend_x + 24.0,
            line.color,
            dash
        );
        draw_marker(svg, line.marker, legend_x + 12.0, legend_y, line.color);
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" font-size="11">{}</text>"#,
            legend_x + 30.0,
            legend_y + 4.0,
            escape(&line.label)
        );
    }
}

/// Render panels stacked vertically, with an optional footer line.
pub fn render(
    panels: &[Panel],
    axis: &[String],
    footer: Option<&str>,
    options: &ChartOptions,
) -> String {
    let footer_h = if footer.is_some() { 30.0 } else { 0.0 };
    let height = options.panel_height as f64 * panels.len().max(1) as f64 + footer_h;

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{:.0}" font-family="sans-serif">"#,
        options.width, height
    );
    let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);

    for (i, panel) in panels.iter().enumerate() {
        draw_panel(&mut svg, panel, axis, i as f64 * options.panel_height as f64, options);
    }

    if let Some(text) = footer {
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" font-size="11" text-anchor="middle">{}</text>"#,
            options.width as f64 / 2.0,
            height - 10.0,
            escape(text)
        );
    }

    svg.push_str("</svg>\n");
    svg
}

fn write_svg(path: PathBuf, content: &str) -> Result<PathBuf> {
    fs::write(&path, content).map_err(|source| Error::Write {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// Write one chart per metric and the aggregated chart into `output_dir`.
pub fn write_charts(
    set: &RunSet,
    output_dir: &Path,
    host: Option<&HostInfo>,
    options: &ChartOptions,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    for metric in set.metrics() {
        let panel = metric_panel(set, metric);
        let svg = render(std::slice::from_ref(&panel), set.axis(), None, options);
        let path = output_dir.join(chart_file_name(metric, set.is_comparison()));
        written.push(write_svg(path, &svg)?);
        log::info!("Generated chart for {}", metric);
    }

    let panels: Vec<Panel> = set
        .metrics()
        .into_iter()
        .map(|metric| aggregated_panel(set, metric))
        .collect();
    if !panels.is_empty() {
        let footer = host.map(ToString::to_string);
        let svg = render(&panels, set.axis(), footer.as_deref(), options);
        written.push(write_svg(output_dir.join(AGGREGATED_CHART), &svg)?);
    }

    Ok(written)
}
