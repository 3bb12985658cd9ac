use crate::chart::{Chart, Scale};
use crate::error::PlotError;
use crate::fmt::PlotFmt;
use crate::plot::{Renderer, SaveOptions};
use crate::style::Marker;
use color_eyre::eyre::eyre;
use color_eyre::Report;
use plotters::coord::combinators::IntoLogRange;
use plotters::coord::ranged1d::{AsRangedCoord, Ranged, ValueFormatter};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;
use std::path::Path;

const FONT: &str = "sans-serif";

// matplotlib's default figure is 6.4x4.8 inches
const PIXELS_PER_INCH: f64 = 100.0;
const DEFAULT_FIGSIZE: (f64, f64) = (6.4, 4.8);

/// Writes charts as SVG images with `plotters`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SvgRenderer;

impl SvgRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for SvgRenderer {
    fn name(&self) -> &'static str {
        "svg"
    }

    fn default_format(&self) -> &'static str {
        "svg"
    }

    fn save(
        &self,
        chart: &Chart,
        path: &Path,
        options: &SaveOptions,
    ) -> Result<(), Report> {
        if options.format != "svg" {
            return Err(PlotError::usage(format!(
                "the svg renderer can't write {:?} images; enable the pyo3 \
                 feature for other formats",
                options.format
            ))
            .into());
        }

        let (width, height) = chart.figsize().unwrap_or(DEFAULT_FIGSIZE);
        let size = (
            (width * PIXELS_PER_INCH).round() as u32,
            (height * PIXELS_PER_INCH).round() as u32,
        );
        let root = SVGBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(draw_error)?;

        let ((x_min, x_max), (y_min, y_max)) =
            chart.bounds().unwrap_or(((0.0, 1.0), (0.0, 1.0)));
        let x_range = linear_range(x_min, x_max);
        match chart.y_scale() {
            Scale::Linear => {
                draw(&root, chart, x_range, linear_range(y_min, y_max))?
            }
            Scale::Log => {
                let y_range = log_range(chart);
                draw(&root, chart, x_range, y_range.log_scale())?
            }
        }

        root.present().map_err(draw_error)?;
        Ok(())
    }
}

fn draw<Y>(
    root: &DrawingArea<SVGBackend<'_>, Shift>,
    chart: &Chart,
    x_range: Range<f64>,
    y_range: Y,
) -> Result<(), Report>
where
    Y: AsRangedCoord<Value = f64>,
    Y::CoordDescType: Ranged<ValueType = f64> + ValueFormatter<f64>,
{
    let log_scale = chart.y_scale() == Scale::Log;
    let label_font = (FONT, chart.label_font_size());

    let mut builder = ChartBuilder::on(root);
    builder.margin(15).x_label_area_size(50).y_label_area_size(80);
    if let Some(title) = chart.title() {
        builder.caption(title, label_font);
    }
    let mut ctx = builder
        .build_cartesian_2d(x_range, y_range)
        .map_err(draw_error)?;

    // axes
    {
        let mut mesh = ctx.configure_mesh();
        mesh.disable_mesh()
            .label_style((FONT, chart.axis_font_size()))
            .axis_desc_style(label_font);
        if let Some(label) = chart.x_label() {
            mesh.x_desc(label);
        }
        if let Some(label) = chart.y_label() {
            mesh.y_desc(label);
        }
        mesh.draw().map_err(draw_error)?;
    }

    for line in chart.lines() {
        let color = rgb(line.style.line_color)?;
        let fill = rgb(line.style.fill_color)?;

        // points that can't be placed on the axes are skipped
        let points: Vec<_> = line
            .x
            .iter()
            .copied()
            .zip(line.y.iter().copied())
            .filter(|(x, y)| {
                x.is_finite() && y.is_finite() && (!log_scale || *y > 0.0)
            })
            .collect();

        ctx.draw_series(LineSeries::new(
            points.iter().copied(),
            color.stroke_width(2),
        ))
        .map_err(draw_error)?
        .label(line.label.clone())
        .legend(move |(x, y)| {
            PathElement::new(
                vec![(x - 10, y), (x + 10, y)],
                color.stroke_width(2),
            )
        });

        // matplotlib's marker size is a diameter
        let radius = (line.style.marker_size / 2).max(1) as i32;
        match line.style.marker {
            Marker::Circle => {
                ctx.draw_series(points.iter().map(|point| {
                    EmptyElement::at(*point)
                        + Circle::new((0, 0), radius, fill.filled())
                        + Circle::new((0, 0), radius, color.stroke_width(1))
                }))
                .map_err(draw_error)?;
            }
            marker => {
                let vertices = vertices(marker, radius);
                let mut outline = vertices.clone();
                outline.push(vertices[0]);
                ctx.draw_series(points.iter().map(|point| {
                    EmptyElement::at(*point)
                        + Polygon::new(vertices.clone(), fill.filled())
                        + PathElement::new(
                            outline.clone(),
                            color.stroke_width(1),
                        )
                }))
                .map_err(draw_error)?;
            }
        }
    }

    for annotation in chart.annotations() {
        ctx.draw_series(std::iter::once(PathElement::new(
            vec![annotation.point, annotation.anchor],
            BLACK.mix(0.3).stroke_width(1),
        )))
        .map_err(draw_error)?;
        ctx.draw_series(std::iter::once(Text::new(
            annotation.text.clone(),
            annotation.anchor,
            (FONT, annotation.font_size),
        )))
        .map_err(draw_error)?;
    }

    if let Some(font_size) = chart.legend_font_size() {
        ctx.configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .label_font((FONT, font_size))
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(draw_error)?;
    }
    Ok(())
}

// Vertices of a marker of the given radius, in pixels relative to the point.
fn vertices(marker: Marker, radius: i32) -> Vec<(i32, i32)> {
    let r = radius;
    match marker {
        Marker::Square => vec![(-r, -r), (r, -r), (r, r), (-r, r)],
        // y grows downwards
        Marker::TriangleDown => vec![(-r, -r), (r, -r), (0, r)],
        Marker::Diamond => vec![(0, -r), (r, 0), (0, r), (-r, 0)],
        Marker::Circle => unreachable!("circles are drawn as circles"),
    }
}

fn linear_range(min: f64, max: f64) -> Range<f64> {
    if min == max {
        return (min - 1.0)..(max + 1.0);
    }
    let margin = (max - min) * 0.05;
    (min - margin)..(max + margin)
}

fn log_range(chart: &Chart) -> Range<f64> {
    let positive = chart
        .lines()
        .iter()
        .flat_map(|line| line.y.iter().copied())
        .chain(chart.annotations().iter().map(|annotation| annotation.anchor.1))
        .filter(|y| y.is_finite() && *y > 0.0);
    let (min, max) = positive.fold((f64::INFINITY, 0.0f64), |(min, max), y| {
        (min.min(y), max.max(y))
    });
    if max == 0.0 {
        return 1.0..10.0;
    }
    (min / 2.0)..(max * 2.0)
}

fn rgb(color: &str) -> Result<RGBColor, PlotError> {
    let (r, g, b) = PlotFmt::rgb(color)?;
    Ok(RGBColor(r, g, b))
}

fn draw_error<E: std::fmt::Debug>(e: E) -> Report {
    eyre!("svg rendering failed: {:?}", e)
}
