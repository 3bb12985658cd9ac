use pyo3::prelude::*;

pub struct Figure<'a> {
    fig: &'a PyAny,
}

impl<'a> Figure<'a> {
    pub fn new(fig: &'a PyAny) -> Self {
        Self { fig }
    }

    pub fn fig(&self) -> &PyAny {
        self.fig
    }

    /// Figure size in inches.
    pub fn set_size_inches(&self, width: f64, height: f64) -> PyResult<()> {
        self.fig.call_method1("set_size_inches", (width, height))?;
        Ok(())
    }
}
