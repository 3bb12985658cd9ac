use crate::annotate::Offset;
use crate::chart::{Scale, DEFAULT_AXIS_FONT_SIZE, DEFAULT_LABEL_FONT_SIZE};
use crate::error::PlotError;
use crate::fmt::PlotFmt;
use crate::transform::Transform;
use color_eyre::eyre::WrapErr;
use color_eyre::Report;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Column holding the number of nodes of each benchmark run.
pub const DEFAULT_X_COLUMN: &str = "totalNbOfNodes";

fn default_x_column() -> String {
    DEFAULT_X_COLUMN.to_string()
}

fn default_font_size() -> f64 {
    DEFAULT_LABEL_FONT_SIZE
}

fn default_axis_font_size() -> f64 {
    DEFAULT_AXIS_FONT_SIZE
}

fn default_legend() -> Option<f64> {
    Some(DEFAULT_LABEL_FONT_SIZE)
}

/// What to do with a series that has no label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelPolicy {
    /// Fail before anything is loaded.
    Reject,
    /// Ask the operator.
    Prompt,
}

impl Default for LabelPolicy {
    fn default() -> Self {
        LabelPolicy::Reject
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnnotationSpec {
    pub offset: Offset,
    /// printf-style format applied to the annotated value, e.g. `"%d ms"`.
    pub format: String,
}

/// One line of a chart: which file and columns it is drawn from and how.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeriesSpec {
    pub path: PathBuf,
    #[serde(default = "default_x_column")]
    pub x: String,
    pub y: String,
    #[serde(default)]
    pub x_transform: Transform,
    #[serde(default)]
    pub y_transform: Transform,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub annotation: Option<AnnotationSpec>,
}

impl SeriesSpec {
    /// Plots column `y` of `path` against the node count.
    pub fn new(path: impl Into<PathBuf>, y: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            x: default_x_column(),
            y: y.into(),
            x_transform: Transform::Identity,
            y_transform: Transform::Identity,
            label: None,
            annotation: None,
        }
    }

    pub fn x(mut self, column: impl Into<String>) -> Self {
        self.x = column.into();
        self
    }

    pub fn x_transform(mut self, transform: Transform) -> Self {
        self.x_transform = transform;
        self
    }

    pub fn y_transform(mut self, transform: Transform) -> Self {
        self.y_transform = transform;
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn annotate(
        mut self,
        offset: Offset,
        format: impl Into<String>,
    ) -> Self {
        self.annotation = Some(AnnotationSpec {
            offset,
            format: format.into(),
        });
        self
    }

    /// The label, if one was given and it's not blank.
    pub fn given_label(&self) -> Option<&str> {
        self.label
            .as_deref()
            .filter(|label| !label.trim().is_empty())
    }
}

/// A column expected to hold the same value on every row of every file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Constant {
    pub column: String,
    pub value: f64,
}

impl Constant {
    pub fn new(column: impl Into<String>, value: f64) -> Self {
        Self {
            column: column.into(),
            value,
        }
    }
}

/// Declarative description of a chart.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChartConfig {
    /// Also the output file name.
    pub name: String,
    pub series: Vec<SeriesSpec>,
    #[serde(default)]
    pub x_label: Option<String>,
    #[serde(default)]
    pub y_label: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub y_scale: Scale,
    /// `None` disables the legend.
    #[serde(default = "default_legend")]
    pub legend_font_size: Option<f64>,
    #[serde(default = "default_font_size")]
    pub label_font_size: f64,
    #[serde(default = "default_axis_font_size")]
    pub axis_font_size: f64,
    /// In inches.
    #[serde(default)]
    pub figsize: Option<(f64, f64)>,
    #[serde(default)]
    pub constants: Vec<Constant>,
    #[serde(default)]
    pub label_policy: LabelPolicy,
}

impl ChartConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            series: Vec::new(),
            x_label: None,
            y_label: None,
            title: None,
            y_scale: Scale::Linear,
            legend_font_size: default_legend(),
            label_font_size: DEFAULT_LABEL_FONT_SIZE,
            axis_font_size: DEFAULT_AXIS_FONT_SIZE,
            figsize: None,
            constants: Vec::new(),
            label_policy: LabelPolicy::Reject,
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, Report> {
        let path = path.as_ref();
        let file = File::open(path)
            .wrap_err_with(|| format!("open config {}", path.display()))?;
        let config: Self = serde_json::from_reader(BufReader::new(file))
            .wrap_err_with(|| format!("parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self, Report> {
        let config: Self =
            serde_json::from_str(json).wrap_err("parse chart config")?;
        config.validate()?;
        Ok(config)
    }

    /// Checks everything that can be checked before any file is read.
    pub fn validate(&self) -> Result<(), PlotError> {
        if self.name.trim().is_empty() {
            return Err(PlotError::usage("chart name is empty"));
        }
        if self.series.is_empty() {
            return Err(PlotError::usage(format!(
                "chart {:?} has no series",
                self.name
            )));
        }
        for series in &self.series {
            if let Some(annotation) = &series.annotation {
                // surface bad formats now rather than mid-render
                PlotFmt::value(&annotation.format, 0.0)?;
            }
        }
        Ok(())
    }

    /// Distinct data files, in declaration order.
    pub fn paths(&self) -> Vec<&Path> {
        let mut paths: Vec<&Path> = Vec::with_capacity(self.series.len());
        for series in &self.series {
            if !paths.contains(&series.path.as_path()) {
                paths.push(&series.path);
            }
        }
        paths
    }

    pub fn series(mut self, series: SeriesSpec) -> Self {
        self.series.push(series);
        self
    }

    pub fn x_label(mut self, label: impl Into<String>) -> Self {
        self.x_label = Some(label.into());
        self
    }

    pub fn y_label(mut self, label: impl Into<String>) -> Self {
        self.y_label = Some(label.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn y_scale(mut self, scale: Scale) -> Self {
        self.y_scale = scale;
        self
    }

    pub fn legend_font_size(mut self, font_size: Option<f64>) -> Self {
        self.legend_font_size = font_size;
        self
    }

    pub fn label_font_size(mut self, font_size: f64) -> Self {
        self.label_font_size = font_size;
        self
    }

    pub fn figsize(mut self, width: f64, height: f64) -> Self {
        self.figsize = Some((width, height));
        self
    }

    pub fn constant(mut self, column: impl Into<String>, value: f64) -> Self {
        self.constants.push(Constant::new(column, value));
        self
    }

    pub fn label_policy(mut self, policy: LabelPolicy) -> Self {
        self.label_policy = policy;
        self
    }
}
