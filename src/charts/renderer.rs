//! Static Chart Renderer
//! Generates PNG chart grids with plotters.
//!
//! Layout:
//! 1. Title centered across the image
//! 2. Panels in a grid, three per row
//!    - Histograms: equal-width bins with a density curve, annotated with
//!      mean / median / skew
//!    - Bar charts: horizontal, one bar per category, largest on top, with
//!      count and percentage beside each bar

use super::{BarChartData, HistogramBin, HistogramData};
use crate::error::{EdaError, Result};
use crate::stats::report::fmt_count;
use plotters::coord::Shift;
use plotters::prelude::*;
use statrs::distribution::{Continuous, Normal};
use statrs::statistics::Statistics;
use std::path::Path;

pub const GRID_COLS: usize = 3;
const PANEL_HEIGHT: u32 = 400;
const TITLE_HEIGHT: u32 = 60;
const KDE_POINTS: usize = 200;

const BAR_COLOR: RGBColor = RGBColor(70, 130, 180);
const KDE_COLOR: RGBColor = RGBColor(25, 60, 110);
const STATS_BG: RGBColor = RGBColor(245, 222, 179); // Wheat

fn chart_err<E: std::fmt::Display>(e: E) -> EdaError {
    EdaError::Chart(e.to_string())
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Equal-width bins over the finite values; the last bin is closed.
    pub fn histogram_bins(values: &[f64], bins: usize) -> Vec<HistogramBin> {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() || bins == 0 {
            return Vec::new();
        }

        let (mut min, mut max) = finite
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if min == max {
            min -= 0.5;
            max += 0.5;
        }

        let width = (max - min) / bins as f64;
        let mut counts = vec![0u32; bins];
        for v in finite {
            let idx = (((v - min) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                start: min + i as f64 * width,
                end: min + (i + 1) as f64 * width,
                count,
            })
            .collect()
    }

    /// Gaussian kernel density over the span of `bins`, scaled so the curve
    /// sits on the bar heights. Bandwidth follows Scott's rule.
    ///
    /// Empty when there are fewer than two values or no spread.
    pub fn kde_curve(values: &[f64], bins: &[HistogramBin]) -> Vec<(f64, f64)> {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        let n = finite.len();
        let (Some(first), Some(last)) = (bins.first(), bins.last()) else {
            return Vec::new();
        };
        if n < 2 {
            return Vec::new();
        }
        let std = finite.iter().std_dev();
        if !std.is_finite() || std <= 0.0 {
            return Vec::new();
        }

        let bandwidth = std * (n as f64).powf(-0.2);
        let Ok(kernel) = Normal::new(0.0, 1.0) else {
            return Vec::new();
        };
        let bin_width = first.end - first.start;
        let scale = bin_width / bandwidth;
        let step = (last.end - first.start) / (KDE_POINTS - 1) as f64;

        (0..KDE_POINTS)
            .map(|i| {
                let x = first.start + i as f64 * step;
                let density: f64 = finite
                    .iter()
                    .map(|v| kernel.pdf((x - v) / bandwidth))
                    .sum();
                (x, density * scale)
            })
            .collect()
    }

    /// Axis row for the `index`-th of `n` bars. Row 0 is the bottom, so the
    /// first (largest) entry lands on top. Mapping a row back gives the
    /// entry index; out-of-range input yields `n`.
    pub fn bar_row(index: usize, n: u32) -> u32 {
        (index as u32)
            .checked_add(1)
            .and_then(|i| n.checked_sub(i))
            .unwrap_or(n)
    }

    /// Rows needed to lay out `panels` in the grid.
    pub fn grid_rows(panels: usize) -> usize {
        panels.div_ceil(GRID_COLS)
    }

    pub fn render_histogram_grid(
        path: &Path,
        title: &str,
        panels: &[HistogramData],
        width: u32,
    ) -> Result<()> {
        if panels.is_empty() {
            return Ok(());
        }
        let rows = Self::grid_rows(panels.len());
        let height = rows as u32 * PANEL_HEIGHT + TITLE_HEIGHT;

        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;
        let body = root.titled(title, ("sans-serif", 28)).map_err(chart_err)?;

        for (area, panel) in body.split_evenly((rows, GRID_COLS)).iter().zip(panels) {
            Self::draw_histogram(area, panel)?;
        }

        root.present().map_err(chart_err)?;
        log::info!("Saved histogram grid to {}", path.display());
        Ok(())
    }

    pub fn render_bar_grid(
        path: &Path,
        title: &str,
        panels: &[BarChartData],
        width: u32,
    ) -> Result<()> {
        if panels.is_empty() {
            return Ok(());
        }
        let rows = Self::grid_rows(panels.len());
        let height = rows as u32 * PANEL_HEIGHT + TITLE_HEIGHT;

        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;
        let body = root.titled(title, ("sans-serif", 28)).map_err(chart_err)?;

        for (area, panel) in body.split_evenly((rows, GRID_COLS)).iter().zip(panels) {
            Self::draw_bar_chart(area, panel)?;
        }

        root.present().map_err(chart_err)?;
        log::info!("Saved bar chart grid to {}", path.display());
        Ok(())
    }

    fn draw_histogram<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        data: &HistogramData,
    ) -> Result<()> {
        let x_min = data.bins.first().map(|b| b.start).unwrap_or(0.0);
        let x_max = data.bins.last().map(|b| b.end).unwrap_or(1.0);
        let peak = data
            .bins
            .iter()
            .map(|b| b.count as f64)
            .chain(data.kde.iter().map(|&(_, y)| y))
            .fold(0.0, f64::max);
        let y_max = peak * 1.1 + 1.0;

        let mut chart = ChartBuilder::on(area)
            .caption(format!("Distribution of {}", data.column), ("sans-serif", 18))
            .margin(10)
            .x_label_area_size(35)
            .y_label_area_size(50)
            .build_cartesian_2d(x_min..x_max, 0f64..y_max)
            .map_err(chart_err)?;

        chart
            .configure_mesh()
            .x_desc(data.column.as_str())
            .y_desc("Frequency")
            .x_labels(6)
            .y_label_formatter(&|y| format!("{:.0}", y))
            .draw()
            .map_err(chart_err)?;

        chart
            .draw_series(data.bins.iter().map(|bin| {
                Rectangle::new(
                    [(bin.start, 0.0), (bin.end, bin.count as f64)],
                    BAR_COLOR.mix(0.7).filled(),
                )
            }))
            .map_err(chart_err)?;

        if !data.kde.is_empty() {
            chart
                .draw_series(LineSeries::new(
                    data.kde.iter().copied(),
                    KDE_COLOR.stroke_width(2),
                ))
                .map_err(chart_err)?;
        }

        // Stats box, top right
        let (w, _) = area.dim_in_pixel();
        let box_x = w as i32 - 130;
        area.draw(&Rectangle::new(
            [(box_x - 5, 35), (w as i32 - 15, 92)],
            STATS_BG.mix(0.5).filled(),
        ))
        .map_err(chart_err)?;
        let lines = [
            format!("Mean: {:.2}", data.mean),
            format!("Median: {:.2}", data.median),
            format!("Skew: {:.2}", data.skew),
        ];
        for (i, line) in lines.iter().enumerate() {
            area.draw(&Text::new(
                line.clone(),
                (box_x, 40 + i as i32 * 17),
                ("sans-serif", 13).into_font(),
            ))
            .map_err(chart_err)?;
        }
        Ok(())
    }

    /// Horizontal bars, most frequent category on top.
    fn draw_bar_chart<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        data: &BarChartData,
    ) -> Result<()> {
        if data.entries.is_empty() {
            return Ok(());
        }
        let n = data.entries.len() as u32;
        let max_count = data.entries.iter().map(|e| e.count).max().unwrap_or(0) as u64;
        // room right of the bars for the value labels
        let x_max = max_count + max_count / 3 + 1;

        let mut chart = ChartBuilder::on(area)
            .caption(format!("{} Distribution", data.column), ("sans-serif", 18))
            .margin(10)
            .x_label_area_size(35)
            .y_label_area_size(120)
            .build_cartesian_2d(0u64..x_max, (0u32..n).into_segmented())
            .map_err(chart_err)?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(n as usize)
            .y_label_formatter(&|v| match v {
                SegmentValue::Exact(row) | SegmentValue::CenterOf(row) => data
                    .entries
                    .get(Self::bar_row(*row as usize, n) as usize)
                    .map(|e| e.label.clone())
                    .unwrap_or_default(),
                SegmentValue::Last => String::new(),
            })
            .x_desc("Count")
            .draw()
            .map_err(chart_err)?;

        chart
            .draw_series(data.entries.iter().enumerate().map(|(i, entry)| {
                let row = Self::bar_row(i, n);
                let mut bar = Rectangle::new(
                    [
                        (0u64, SegmentValue::Exact(row)),
                        (entry.count as u64, SegmentValue::Exact(row + 1)),
                    ],
                    Palette99::pick(i).mix(0.8).filled(),
                );
                bar.set_margin(3, 3, 0, 0);
                bar
            }))
            .map_err(chart_err)?;

        chart
            .draw_series(data.entries.iter().enumerate().map(|(i, entry)| {
                Text::new(
                    format!(" {} ({:.1}%)", fmt_count(entry.count), entry.pct),
                    (entry.count as u64, SegmentValue::CenterOf(Self::bar_row(i, n))),
                    ("sans-serif", 11).into_font(),
                )
            }))
            .map_err(chart_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_bins() {
        let bins = StaticChartRenderer::histogram_bins(&[0.0, 1.0, 2.0, 3.0, 4.0], 4);
        let counts: Vec<u32> = bins.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 1, 1, 2]);
        assert_eq!(bins[0].start, 0.0);
        assert_eq!(bins[3].end, 4.0);
    }

    #[test]
    fn test_histogram_bins_constant_values() {
        let bins = StaticChartRenderer::histogram_bins(&[7.0, 7.0, 7.0], 3);
        assert_eq!(bins.len(), 3);
        assert_eq!(bins.iter().map(|b| b.count).sum::<u32>(), 3);
        assert_eq!(bins[0].start, 6.5);
        assert_eq!(bins[2].end, 7.5);
    }

    #[test]
    fn test_histogram_bins_empty() {
        assert!(StaticChartRenderer::histogram_bins(&[], 30).is_empty());
        assert!(StaticChartRenderer::histogram_bins(&[f64::NAN], 30).is_empty());
    }

    #[test]
    fn test_kde_curve_peaks_at_center() {
        let values = [1.0, 2.0, 2.0, 3.0, 3.0, 3.0, 4.0, 4.0, 5.0];
        let bins = StaticChartRenderer::histogram_bins(&values, 4);
        let curve = StaticChartRenderer::kde_curve(&values, &bins);

        assert_eq!(curve.len(), KDE_POINTS);
        assert_eq!(curve[0].0, 1.0);
        assert!((curve[KDE_POINTS - 1].0 - 5.0).abs() < 1e-9);

        let (peak_x, _) = curve
            .iter()
            .copied()
            .fold((f64::NAN, f64::NEG_INFINITY), |best, p| if p.1 > best.1 { p } else { best });
        assert!((peak_x - 3.0).abs() < 0.1);
        assert!(curve.iter().all(|&(_, y)| y > 0.0));
    }

    #[test]
    fn test_kde_curve_area_matches_counts() {
        let values: Vec<f64> = (0..50).map(|i| (i % 10) as f64).collect();
        let bins = StaticChartRenderer::histogram_bins(&values, 10);
        let curve = StaticChartRenderer::kde_curve(&values, &bins);

        // trapezoid area over the bin span in bin-width units; the tails
        // beyond the outer bins are lost
        let width = bins[0].end - bins[0].start;
        let area: f64 = curve
            .windows(2)
            .map(|w| (w[1].0 - w[0].0) * (w[0].1 + w[1].1) / 2.0)
            .sum::<f64>()
            / width;
        assert!(area > 35.0 && area < 50.0, "area {}", area);
    }

    #[test]
    fn test_kde_curve_degenerate_input() {
        let single = [4.0];
        let bins = StaticChartRenderer::histogram_bins(&single, 5);
        assert!(StaticChartRenderer::kde_curve(&single, &bins).is_empty());

        let constant = [2.0, 2.0, 2.0];
        let bins = StaticChartRenderer::histogram_bins(&constant, 5);
        assert!(StaticChartRenderer::kde_curve(&constant, &bins).is_empty());

        assert!(StaticChartRenderer::kde_curve(&[1.0, 2.0], &[]).is_empty());
    }

    #[test]
    fn test_bar_rows_put_largest_on_top() {
        let n = 4;
        let rows: Vec<u32> = (0..4).map(|i| StaticChartRenderer::bar_row(i, n)).collect();
        assert_eq!(rows, vec![3, 2, 1, 0]);
        // a row maps back to its entry
        assert_eq!(StaticChartRenderer::bar_row(3, n), 0);
        assert_eq!(StaticChartRenderer::bar_row(0, n), 3);
        assert_eq!(StaticChartRenderer::bar_row(4, n), n);
    }

    #[test]
    fn test_grid_rows() {
        assert_eq!(StaticChartRenderer::grid_rows(1), 1);
        assert_eq!(StaticChartRenderer::grid_rows(3), 1);
        assert_eq!(StaticChartRenderer::grid_rows(4), 2);
    }
}
