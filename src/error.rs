use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort a chart rendering run.
///
/// Library functions return `color_eyre::Report`; the variant can be recovered
/// with `report.downcast_ref::<PlotError>()`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlotError {
    /// No input was supplied, the configuration is inconsistent, or the
    /// operator declined to supply a required label.
    #[error("usage error: {0}")]
    Usage(String),

    /// A data file is missing or cannot be parsed as delimited tabular data.
    #[error("cannot load {}: {reason}", path.display())]
    Load { path: PathBuf, reason: String },

    /// A column declared constant across a file holds a different value.
    #[error(
        "{}: column {column:?} should be {expected} on every row but row {row} \
         is {found} (mean = {mean})",
        path.display()
    )]
    Validation {
        path: PathBuf,
        column: String,
        expected: f64,
        found: f64,
        row: usize,
        mean: f64,
    },

    /// More series requested a style than the palette provides.
    #[error("palette exhausted: only {size} styles available")]
    PaletteExhausted { size: usize },
}

impl PlotError {
    pub fn usage(reason: impl Into<String>) -> Self {
        Self::Usage(reason.into())
    }

    pub fn load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Load {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
