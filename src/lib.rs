// This module contains the definition of `PlotError`.
pub mod error;

// This module contains the definition of `DataDB` and `DataSet`.
pub mod db;

// This module contains the definition of `Transform`.
pub mod transform;

// This module contains the definition of `Style` and `StyleAllocator`.
pub mod style;

// This module contains the definition of `PlotFmt`.
pub mod fmt;

// This module contains the definition of `Chart`.
pub mod chart;

// This module contains the placement of value annotations.
pub mod annotate;

// This module contains the definition of `ChartConfig`.
pub mod config;

// This module contains the chart rendering backends.
pub mod plot;

// This module contains the rendering of a `ChartConfig`.
pub mod assembler;

// This module contains the catalogue of charts.
pub mod charts;

// Re-exports.
pub use assembler::{render, LabelPrompt, StdinPrompt};
pub use chart::{Chart, Scale};
pub use config::{ChartConfig, LabelPolicy, SeriesSpec};
pub use db::{DataDB, DataSet};
pub use error::PlotError;
pub use plot::{Output, Renderer, SaveOptions, PLOT_DIR};
pub use transform::Transform;
