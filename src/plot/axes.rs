use pyo3::prelude::*;
use pyo3::types::PyDict;

pub struct Axes<'a> {
    ax: &'a PyAny,
}

impl<'a> Axes<'a> {
    pub fn new(ax: &'a PyAny) -> Self {
        Self { ax }
    }

    pub fn set_title(
        &self,
        title: &str,
        kwargs: Option<&PyDict>,
    ) -> PyResult<()> {
        self.ax.call_method("set_title", (title,), kwargs)?;
        Ok(())
    }

    pub fn set_xlabel(
        &self,
        label: &str,
        kwargs: Option<&PyDict>,
    ) -> PyResult<()> {
        self.ax.call_method("set_xlabel", (label,), kwargs)?;
        Ok(())
    }

    pub fn set_ylabel(
        &self,
        label: &str,
        kwargs: Option<&PyDict>,
    ) -> PyResult<()> {
        self.ax.call_method("set_ylabel", (label,), kwargs)?;
        Ok(())
    }

    pub fn set_yscale(&self, value: &str) -> PyResult<()> {
        self.ax.call_method1("set_yscale", (value,))?;
        Ok(())
    }

    pub fn tick_params(&self, kwargs: Option<&PyDict>) -> PyResult<()> {
        self.ax.call_method("tick_params", (), kwargs)?;
        Ok(())
    }

    pub fn legend(&self, kwargs: Option<&PyDict>) -> PyResult<()> {
        self.ax.call_method("legend", (), kwargs)?;
        Ok(())
    }

    pub fn plot<X, Y>(
        &self,
        x: Vec<X>,
        y: Vec<Y>,
        fmt: Option<&str>,
        kwargs: Option<&PyDict>,
    ) -> PyResult<()>
    where
        X: IntoPy<PyObject>,
        Y: IntoPy<PyObject>,
    {
        if let Some(fmt) = fmt {
            self.ax.call_method("plot", (x, y, fmt), kwargs)?;
        } else {
            self.ax.call_method("plot", (x, y), kwargs)?;
        };
        Ok(())
    }

    /// Draws `text` at `xytext`, pointing at `xy`.
    pub fn annotate(
        &self,
        text: &str,
        xy: (f64, f64),
        xytext: (f64, f64),
        kwargs: Option<&PyDict>,
    ) -> PyResult<()> {
        let kwargs = match kwargs {
            Some(kwargs) => kwargs,
            None => PyDict::new(self.ax.py()),
        };
        kwargs.set_item("xy", xy)?;
        kwargs.set_item("xytext", xytext)?;
        self.ax.call_method("annotate", (text,), Some(kwargs))?;
        Ok(())
    }
}
