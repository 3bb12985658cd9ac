use crate::annotate::Annotation;
use crate::error::PlotError;
use crate::style::Style;
use serde::Deserialize;

pub const DEFAULT_LABEL_FONT_SIZE: f64 = 15.0;
pub const DEFAULT_AXIS_FONT_SIZE: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scale {
    Linear,
    Log,
}

impl Default for Scale {
    fn default() -> Self {
        Scale::Linear
    }
}

impl Scale {
    pub fn name(&self) -> &'static str {
        match self {
            Scale::Linear => "linear",
            Scale::Log => "log",
        }
    }
}

/// One plotted series.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub style: Style,
    pub label: String,
}

/// Everything drawn on a figure, accumulated until the chart is finished by
/// a `Renderer`.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    lines: Vec<Line>,
    annotations: Vec<Annotation>,
    x_label: Option<String>,
    y_label: Option<String>,
    title: Option<String>,
    y_scale: Scale,
    // `None` means no legend
    legend_font_size: Option<f64>,
    label_font_size: f64,
    axis_font_size: f64,
    figsize: Option<(f64, f64)>,
}

impl Default for Chart {
    fn default() -> Self {
        Self::new()
    }
}

impl Chart {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            annotations: Vec::new(),
            x_label: None,
            y_label: None,
            title: None,
            y_scale: Scale::Linear,
            legend_font_size: None,
            label_font_size: DEFAULT_LABEL_FONT_SIZE,
            axis_font_size: DEFAULT_AXIS_FONT_SIZE,
            figsize: None,
        }
    }

    /// Adds a connected line with markers. Points are kept in the given order.
    pub fn plot(
        &mut self,
        x: Vec<f64>,
        y: Vec<f64>,
        style: Style,
        label: impl Into<String>,
    ) -> Result<(), PlotError> {
        let label = label.into();
        if x.len() != y.len() {
            return Err(PlotError::usage(format!(
                "series {:?}: {} x values but {} y values",
                label,
                x.len(),
                y.len()
            )));
        }
        self.lines.push(Line { x, y, style, label });
        Ok(())
    }

    pub fn annotate(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
    }

    pub fn set_xlabel(&mut self, label: impl Into<String>) {
        self.x_label = Some(label.into());
    }

    pub fn set_ylabel(&mut self, label: impl Into<String>) {
        self.y_label = Some(label.into());
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn set_yscale(&mut self, scale: Scale) {
        self.y_scale = scale;
    }

    pub fn legend(&mut self, font_size: f64) {
        self.legend_font_size = Some(font_size);
    }

    pub fn set_label_font_size(&mut self, font_size: f64) {
        self.label_font_size = font_size;
    }

    pub fn set_axis_font_size(&mut self, font_size: f64) {
        self.axis_font_size = font_size;
    }

    pub fn set_figsize(&mut self, width: f64, height: f64) {
        self.figsize = Some((width, height));
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn x_label(&self) -> Option<&str> {
        self.x_label.as_deref()
    }

    pub fn y_label(&self) -> Option<&str> {
        self.y_label.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn y_scale(&self) -> Scale {
        self.y_scale
    }

    pub fn legend_font_size(&self) -> Option<f64> {
        self.legend_font_size
    }

    pub fn label_font_size(&self) -> f64 {
        self.label_font_size
    }

    pub fn axis_font_size(&self) -> f64 {
        self.axis_font_size
    }

    pub fn figsize(&self) -> Option<(f64, f64)> {
        self.figsize
    }

    /// Labels shown in the legend, in plotting order. Empty if the legend is
    /// disabled.
    pub fn legend_entries(&self) -> Vec<&str> {
        if self.legend_font_size.is_none() {
            return Vec::new();
        }
        self.lines.iter().map(|line| line.label.as_str()).collect()
    }

    /// Smallest and largest finite coordinates over all lines and annotation
    /// anchors: `((x_min, x_max), (y_min, y_max))`.
    pub fn bounds(&self) -> Option<((f64, f64), (f64, f64))> {
        let points = self
            .lines
            .iter()
            .flat_map(|line| line.x.iter().copied().zip(line.y.iter().copied()))
            .chain(self.annotations.iter().map(|annotation| annotation.anchor))
            .filter(|(x, y)| x.is_finite() && y.is_finite());

        let mut bounds: Option<((f64, f64), (f64, f64))> = None;
        for (x, y) in points {
            bounds = Some(match bounds {
                None => ((x, x), (y, y)),
                Some(((x_min, x_max), (y_min, y_max))) => (
                    (x_min.min(x), x_max.max(x)),
                    (y_min.min(y), y_max.max(y)),
                ),
            });
        }
        bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{GREEN, YELLOW};

    #[test]
    fn plot_keeps_point_order() {
        let mut chart = Chart::new();
        chart
            .plot(vec![3.0, 1.0, 2.0], vec![30.0, 10.0, 20.0], GREEN, "handel")
            .unwrap();
        let line = &chart.lines()[0];
        assert_eq!(line.x, [3.0, 1.0, 2.0]);
        assert_eq!(line.y, [30.0, 10.0, 20.0]);
        assert_eq!(line.style, GREEN);
    }

    #[test]
    fn plot_rejects_unequal_lengths() {
        let mut chart = Chart::new();
        let err = chart.plot(vec![1.0], vec![], GREEN, "handel").unwrap_err();
        assert!(matches!(err, PlotError::Usage(_)));
        assert!(chart.lines().is_empty());
    }

    #[test]
    fn legend_entries() {
        let mut chart = Chart::new();
        chart.plot(vec![1.0], vec![1.0], GREEN, "handel").unwrap();
        chart.plot(vec![1.0], vec![2.0], YELLOW, "complete").unwrap();
        assert!(chart.legend_entries().is_empty());

        chart.legend(15.0);
        assert_eq!(chart.legend_entries(), vec!["handel", "complete"]);
    }

    #[test]
    fn bounds() {
        let mut chart = Chart::new();
        assert_eq!(chart.bounds(), None);

        chart
            .plot(vec![100.0, 400.0], vec![f64::NAN, 50.0], GREEN, "a")
            .unwrap();
        chart.plot(vec![200.0], vec![5.0], YELLOW, "b").unwrap();
        assert_eq!(chart.bounds(), Some(((200.0, 400.0), (5.0, 50.0))));
    }
}
