use std::ops::Range;
use std::path::Path;

use plotters::prelude::*;

use crate::model::config::MarkerShape;
use crate::report::ReportError;

pub const PALETTE: [RGBColor; 4] = [
    RGBColor(0xFF, 0x5A, 0x5F),
    RGBColor(0x00, 0x79, 0x91),
    RGBColor(0xB7, 0x9C, 0xED),
    RGBColor(0xFF, 0xD2, 0x75),
];

const GRID: RGBColor = RGBColor(0xCC, 0xCC, 0xCC);
const FONT: &str = "sans-serif";

pub fn palette_color(idx: usize) -> RGBColor {
    PALETTE[idx % PALETTE.len()]
}

/// One curve with vertical error bars.
#[derive(Debug, Clone)]
pub struct SeriesView<'a> {
    pub label: String,
    pub color_idx: usize,
    pub time_s: &'a [f64],
    pub values: &'a [f64],
    pub errors: &'a [f64],
}

impl SeriesView<'_> {
    /// `(t, value, error)` triples with a finite value; non-finite errors draw no bar.
    fn points(&self) -> Vec<(f64, f64, f64)> {
        self.time_s
            .iter()
            .zip(self.values)
            .zip(self.errors)
            .filter(|((t, v), _)| t.is_finite() && v.is_finite())
            .map(|((&t, &v), &e)| (t, v, if e.is_finite() { e } else { 0.0 }))
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct PanelView<'a> {
    pub title: String,
    pub series: Vec<SeriesView<'a>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlotBounds {
    pub x: Range<f64>,
    pub y: Range<f64>,
}

/// Axis ranges covering every finite point and its error bar, padded by 5%.
pub fn plot_bounds(series: &[SeriesView<'_>]) -> PlotBounds {
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for s in series {
        for (t, v, e) in s.points() {
            x_min = x_min.min(t);
            x_max = x_max.max(t);
            y_min = y_min.min(v - e);
            y_max = y_max.max(v + e);
        }
    }
    PlotBounds {
        x: padded(x_min, x_max),
        y: padded(y_min, y_max),
    }
}

fn padded(lo: f64, hi: f64) -> Range<f64> {
    if !lo.is_finite() || !hi.is_finite() {
        return 0.0..1.0;
    }
    if hi - lo <= f64::EPSILON {
        let half = if lo == 0.0 { 0.5 } else { lo.abs() * 0.05 };
        return (lo - half)..(hi + half);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad)..(hi + pad)
}

fn plot_err<E: std::fmt::Display>(err: E) -> ReportError {
    ReportError::Plot(err.to_string())
}

/// Grid of panels, one per group, two per row.
pub fn render_group_panels(
    path: &Path,
    title: &str,
    panels: &[PanelView<'_>],
    marker: MarkerShape,
) -> Result<(), ReportError> {
    let root = SVGBackend::new(path, (1400, 800)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;
    let root = root.titled(title, (FONT, 28)).map_err(plot_err)?;

    let cols = if panels.len() > 1 { 2 } else { 1 };
    let rows = panels.len().div_ceil(cols).max(1);
    let areas = root.split_evenly((rows, cols));
    for (area, panel) in areas.iter().zip(panels) {
        draw_chart(area, &panel.title, &panel.series, marker, 1, 12)?;
    }

    root.present().map_err(plot_err)?;
    Ok(())
}

/// All groups overlaid on one axis.
pub fn render_overlay(
    path: &Path,
    title: &str,
    series: &[SeriesView<'_>],
    marker: MarkerShape,
) -> Result<(), ReportError> {
    let root = SVGBackend::new(path, (1000, 500)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;
    draw_chart(&root, title, series, marker, 2, 14)?;
    root.present().map_err(plot_err)?;
    Ok(())
}

fn draw_chart<DB: DrawingBackend>(
    area: &DrawingArea<DB, plotters::coord::Shift>,
    title: &str,
    series: &[SeriesView<'_>],
    marker: MarkerShape,
    line_width: u32,
    legend_font: u32,
) -> Result<(), ReportError> {
    let bounds = plot_bounds(series);
    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT, 18))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(bounds.x, bounds.y)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("Time [s]")
        .y_desc("Contrast")
        .bold_line_style(&GRID)
        .light_line_style(&WHITE)
        .draw()
        .map_err(plot_err)?;

    for s in series {
        let color = palette_color(s.color_idx);
        let points = s.points();

        chart
            .draw_series(LineSeries::new(
                points.iter().map(|&(t, v, _)| (t, v)),
                color.stroke_width(line_width),
            ))
            .map_err(plot_err)?
            .label(s.label.clone())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });

        chart
            .draw_series(points.iter().map(|&(t, v, e)| {
                ErrorBar::new_vertical(t, v - e, v, v + e, color.stroke_width(1), 0)
            }))
            .map_err(plot_err)?;

        match marker {
            MarkerShape::Triangle => {
                chart
                    .draw_series(
                        points
                            .iter()
                            .map(|&(t, v, _)| TriangleMarker::new((t, v), 4, color.filled())),
                    )
                    .map_err(plot_err)?;
            }
            MarkerShape::Circle => {
                chart
                    .draw_series(
                        points
                            .iter()
                            .map(|&(t, v, _)| Circle::new((t, v), 3, color.filled())),
                    )
                    .map_err(plot_err)?;
            }
        }
    }

    if !series.is_empty() {
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .label_font((FONT, legend_font))
            .draw()
            .map_err(plot_err)?;
    }

    Ok(())
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/figure.rs"]
mod tests;
