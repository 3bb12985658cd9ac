use crate::chart::Chart;
use crate::error::PlotError;
use crate::fmt::PlotFmt;
use crate::plot::axes::Axes;
use crate::plot::figure::Figure;
use crate::plot::{Renderer, SaveOptions};
use color_eyre::Report;
use pyo3::prelude::*;
use pyo3::types::PyDict;
use std::path::Path;

// matplotlib formats numbers according to the locale
const LOCALE: &str = "en_US.UTF-8";

/// Unwraps a `PyResult`, printing the python traceback and returning a
/// `Report` on error.
#[macro_export]
macro_rules! pytry {
    ($py:expr, $e:expr) => {{
        match $e {
            Ok(value) => value,
            Err(e) => {
                e.print($py);
                color_eyre::eyre::bail!("{:?}", e)
            }
        }
    }};
}

/// Builds a `PyResult<&PyDict>` from `(key, value)` pairs.
#[macro_export]
macro_rules! pydict {
    ($py:expr, $($pair:expr),+ $(,)?) => {{
        let dict = pyo3::types::PyDict::new($py);
        let mut result = Ok(dict);
        $(
            let (key, value) = $pair;
            if let Err(e) = dict.set_item(key, value) {
                result = Err(e);
            }
        )+
        result
    }};
}

pub struct PyPlot<'p> {
    plt: &'p PyModule,
}

impl<'p> PyPlot<'p> {
    pub fn new(py: Python<'p>) -> PyResult<Self> {
        let plt = PyModule::import(py, "matplotlib.pyplot")?;
        Ok(Self { plt })
    }

    pub fn subplots(
        &self,
        kwargs: Option<&PyDict>,
    ) -> PyResult<(Figure<'p>, Axes<'p>)> {
        let result = self.plt.call_method("subplots", (), kwargs)?;
        let (fig, ax): (&PyAny, &PyAny) = result.extract()?;
        Ok((Figure::new(fig), Axes::new(ax)))
    }

    pub fn savefig(&self, path: &str, kwargs: Option<&PyDict>) -> PyResult<()> {
        self.plt.call_method("savefig", (path,), kwargs)?;
        Ok(())
    }

    pub fn show(&self) -> PyResult<()> {
        self.plt.call_method0("show")?;
        Ok(())
    }

    pub fn close(&self, figure: Figure<'_>) -> PyResult<()> {
        self.plt.call_method1("close", (figure.fig(),))?;
        Ok(())
    }
}

/// Renders charts with matplotlib.
#[derive(Debug, Clone, Copy)]
pub struct PyPlotRenderer;

impl Default for PyPlotRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PyPlotRenderer {
    pub fn new() -> Self {
        std::env::set_var("LC_ALL", LOCALE);
        std::env::set_var("LANG", LOCALE);
        Self
    }
}

impl Renderer for PyPlotRenderer {
    fn name(&self) -> &'static str {
        "matplotlib"
    }

    fn default_format(&self) -> &'static str {
        "pdf"
    }

    fn interactive(&self) -> bool {
        true
    }

    fn show(&self, chart: &Chart) -> Result<(), Report> {
        let gil = Python::acquire_gil();
        let py = gil.python();
        let plt = pytry!(py, PyPlot::new(py));
        let fig = draw(py, &plt, chart)?;
        pytry!(py, plt.show());
        pytry!(py, plt.close(fig));
        Ok(())
    }

    fn save(
        &self,
        chart: &Chart,
        path: &Path,
        options: &SaveOptions,
    ) -> Result<(), Report> {
        let path = path.to_str().ok_or_else(|| {
            PlotError::usage(format!("{} is not valid UTF-8", path.display()))
        })?;

        let gil = Python::acquire_gil();
        let py = gil.python();
        let plt = pytry!(py, PyPlot::new(py));
        let fig = draw(py, &plt, chart)?;

        let kwargs = pytry!(
            py,
            pydict!(
                py,
                ("format", options.format.as_str()),
                ("dpi", options.dpi),
            )
        );
        // eps output keeps the whole figure
        if options.format != "eps" {
            pytry!(py, kwargs.set_item("bbox_inches", "tight"));
        }
        pytry!(py, plt.savefig(path, Some(kwargs)));
        pytry!(py, plt.close(fig));
        Ok(())
    }
}

fn draw<'p>(
    py: Python<'p>,
    plt: &PyPlot<'p>,
    chart: &Chart,
) -> Result<Figure<'p>, Report> {
    let (fig, ax) = pytry!(py, plt.subplots(None));
    if let Some((width, height)) = chart.figsize() {
        pytry!(py, fig.set_size_inches(width, height));
    }
    let kwargs = pytry!(py, pydict!(py, ("labelsize", chart.axis_font_size())));
    pytry!(py, ax.tick_params(Some(kwargs)));

    for line in chart.lines() {
        let kwargs = pytry!(
            py,
            pydict!(
                py,
                ("label", line.label.as_str()),
                ("color", line.style.line_color),
                ("mfc", line.style.fill_color),
                ("marker", PlotFmt::marker(line.style.marker)),
                ("markersize", line.style.marker_size),
            )
        );
        pytry!(
            py,
            ax.plot(line.x.clone(), line.y.clone(), Some("-"), Some(kwargs))
        );
    }

    for annotation in chart.annotations() {
        let kwargs = pytry!(
            py,
            pydict!(
                py,
                ("xycoords", "data"),
                ("textcoords", "data"),
                ("fontsize", annotation.font_size),
            )
        );
        pytry!(
            py,
            ax.annotate(
                &annotation.text,
                annotation.point,
                annotation.anchor,
                Some(kwargs)
            )
        );
    }

    if let Some(font_size) = chart.legend_font_size() {
        let kwargs = pytry!(py, pydict!(py, ("fontsize", font_size)));
        pytry!(py, ax.legend(Some(kwargs)));
    }

    let label_font = || pydict!(py, ("fontsize", chart.label_font_size()));
    if let Some(label) = chart.y_label() {
        pytry!(py, ax.set_ylabel(label, Some(pytry!(py, label_font()))));
    }
    if let Some(label) = chart.x_label() {
        pytry!(py, ax.set_xlabel(label, Some(pytry!(py, label_font()))));
    }
    if let Some(title) = chart.title() {
        pytry!(py, ax.set_title(title, Some(pytry!(py, label_font()))));
    }
    pytry!(py, ax.set_yscale(chart.y_scale().name()));
    Ok(fig)
}
