#[cfg(feature = "pyo3")]
pub mod axes;
#[cfg(feature = "pyo3")]
pub mod figure;
#[cfg(feature = "pyo3")]
pub mod pyplot;
pub mod svg;

use crate::chart::Chart;
use crate::error::PlotError;
use color_eyre::eyre::WrapErr;
use color_eyre::Report;
use std::path::{Path, PathBuf};
use tracing::info;

// folder where all plots will be stored
pub const PLOT_DIR: &str = "figures";

pub const DEFAULT_DPI: u32 = 1000;

/// A chart-rendering backend.
pub trait Renderer {
    fn name(&self) -> &'static str;

    /// Image format used when none is requested.
    fn default_format(&self) -> &'static str;

    /// Whether `show` can open a window.
    fn interactive(&self) -> bool {
        false
    }

    fn show(&self, _chart: &Chart) -> Result<(), Report> {
        Err(PlotError::usage(format!(
            "the {} renderer cannot display charts",
            self.name()
        ))
        .into())
    }

    fn save(
        &self,
        chart: &Chart,
        path: &Path,
        options: &SaveOptions,
    ) -> Result<(), Report>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaveOptions {
    pub output_dir: PathBuf,
    pub format: String,
    pub dpi: u32,
}

impl SaveOptions {
    pub fn new(
        output_dir: impl Into<PathBuf>,
        format: impl Into<String>,
    ) -> Self {
        Self {
            output_dir: output_dir.into(),
            format: format.into(),
            dpi: DEFAULT_DPI,
        }
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    /// `<output_dir>/<name>.<format>`
    pub fn path(&self, name: &str) -> PathBuf {
        self.output_dir.join(format!("{}.{}", name, self.format))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Show,
    Save(SaveOptions),
}

/// Finalizes `chart`: either displays it or writes it to
/// `<output_dir>/<name>.<format>`, returning the written path.
pub fn finish(
    name: &str,
    chart: Chart,
    renderer: &dyn Renderer,
    output: &Output,
) -> Result<Option<PathBuf>, Report> {
    match output {
        Output::Show => {
            renderer.show(&chart).wrap_err("show chart")?;
            Ok(None)
        }
        Output::Save(options) => {
            std::fs::create_dir_all(&options.output_dir).wrap_err_with(|| {
                format!("create {}", options.output_dir.display())
            })?;
            let path = options.path(name);
            renderer
                .save(&chart, &path, options)
                .wrap_err_with(|| format!("save {}", path.display()))?;
            info!(
                path = %path.display(),
                renderer = renderer.name(),
                "saved chart"
            );
            Ok(Some(path))
        }
    }
}

/// matplotlib when built with the `pyo3` feature, SVG output otherwise.
pub fn default_renderer() -> Box<dyn Renderer> {
    #[cfg(feature = "pyo3")]
    {
        Box::new(pyplot::PyPlotRenderer::new())
    }
    #[cfg(not(feature = "pyo3"))]
    {
        Box::new(svg::SvgRenderer::new())
    }
}
