use crate::annotate;
use crate::chart::Chart;
use crate::config::{ChartConfig, LabelPolicy, SeriesSpec};
use crate::db::DataDB;
use crate::error::PlotError;
use crate::plot::{self, Output, Renderer};
use crate::style::StyleAllocator;
use color_eyre::eyre::WrapErr;
use color_eyre::Report;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{debug, info};

/// Source of labels for series configured without one.
pub trait LabelPrompt {
    /// Returns `None` if no label was given.
    fn ask(&mut self, series: &SeriesSpec) -> Result<Option<String>, Report>;
}

/// Asks the operator on the terminal.
#[derive(Debug, Default)]
pub struct StdinPrompt;

impl LabelPrompt for StdinPrompt {
    fn ask(&mut self, series: &SeriesSpec) -> Result<Option<String>, Report> {
        let mut stdout = io::stdout();
        write!(
            stdout,
            "missing label for {} ({}): ",
            series.path.display(),
            series.y
        )?;
        stdout.flush()?;

        let mut line = String::new();
        let read = io::stdin()
            .lock()
            .read_line(&mut line)
            .wrap_err("read label")?;
        // end of input
        if read == 0 {
            return Ok(None);
        }
        let label = line.trim();
        if label.is_empty() {
            Ok(None)
        } else {
            Ok(Some(label.to_string()))
        }
    }
}

/// Label of every series, in declaration order. Runs before any file is read.
pub fn resolve_labels(
    config: &ChartConfig,
    prompt: &mut dyn LabelPrompt,
) -> Result<Vec<String>, Report> {
    let mut labels = Vec::with_capacity(config.series.len());
    for series in &config.series {
        if let Some(label) = series.given_label() {
            labels.push(label.to_string());
            continue;
        }
        let missing = || {
            PlotError::usage(format!(
                "missing label for column {:?} of {}",
                series.y,
                series.path.display()
            ))
        };
        match config.label_policy {
            LabelPolicy::Reject => return Err(missing().into()),
            LabelPolicy::Prompt => {
                let label = prompt.ask(series)?.ok_or_else(missing)?;
                debug!(
                    path = %series.path.display(),
                    %label,
                    "label from prompt"
                );
                labels.push(label);
            }
        }
    }
    Ok(labels)
}

/// Fails with `PlotError::Validation` on the first row of a loaded file whose
/// value differs from the one declared in `config.constants`.
pub fn check_constants(
    config: &ChartConfig,
    db: &DataDB,
) -> Result<(), PlotError> {
    for dataset in db.iter() {
        for constant in &config.constants {
            let values = dataset.numbers(&constant.column)?;
            let mismatch = values
                .iter()
                .enumerate()
                .find(|(_, value)| **value != constant.value);
            if let Some((row, found)) = mismatch {
                return Err(PlotError::Validation {
                    path: dataset.path().to_path_buf(),
                    column: constant.column.clone(),
                    expected: constant.value,
                    found: *found,
                    row,
                    mean: dataset.mean(&constant.column)?,
                });
            }
            debug!(
                path = %dataset.path().display(),
                column = %constant.column,
                value = constant.value,
                "constant checked"
            );
        }
    }
    Ok(())
}

/// Builds the chart described by `config` from already loaded data.
pub fn assemble(
    config: &ChartConfig,
    labels: &[String],
    db: &DataDB,
) -> Result<Chart, Report> {
    if labels.len() != config.series.len() {
        return Err(PlotError::usage(format!(
            "{} labels for {} series",
            labels.len(),
            config.series.len()
        ))
        .into());
    }

    let mut chart = Chart::new();
    let mut styles = StyleAllocator::new();
    for (series, label) in config.series.iter().zip(labels) {
        let dataset = db.get(&series.path).ok_or_else(|| {
            let path = series.path.display();
            PlotError::usage(format!("{} was not loaded", path))
        })?;
        let x = series
            .x_transform
            .apply(dataset, &series.x)
            .wrap_err_with(|| format!("x values of {:?}", label))?;
        let y = series
            .y_transform
            .apply(dataset, &series.y)
            .wrap_err_with(|| format!("y values of {:?}", label))?;
        let style = styles.allocate()?;
        debug!(
            %label,
            points = x.len(),
            color = style.line_color,
            "plot series"
        );

        if let Some(annotation) = &series.annotation {
            annotate::place(
                &mut chart,
                &x,
                &y,
                annotation.offset,
                &annotation.format,
                config.label_font_size,
            )?;
        }
        chart.plot(x, y, style, label.as_str())?;
    }

    // chart-wide decorations
    if let Some(font_size) = config.legend_font_size {
        chart.legend(font_size);
    }
    if let Some(label) = &config.y_label {
        chart.set_ylabel(label.as_str());
    }
    if let Some(label) = &config.x_label {
        chart.set_xlabel(label.as_str());
    }
    if let Some(title) = &config.title {
        chart.set_title(title.as_str());
    }
    chart.set_yscale(config.y_scale);
    chart.set_label_font_size(config.label_font_size);
    chart.set_axis_font_size(config.axis_font_size);
    if let Some((width, height)) = config.figsize {
        chart.set_figsize(width, height);
    }
    Ok(chart)
}

/// Renders `config` end to end. Nothing reaches `renderer` unless every step
/// before it succeeded.
pub fn render(
    config: &ChartConfig,
    renderer: &dyn Renderer,
    output: &Output,
    prompt: &mut dyn LabelPrompt,
) -> Result<Option<PathBuf>, Report> {
    config.validate()?;
    let labels = resolve_labels(config, prompt)?;
    let db = DataDB::load(&config.paths())?;
    check_constants(config, &db)?;
    let chart = assemble(config, &labels, &db)
        .wrap_err_with(|| format!("assemble chart {}", config.name))?;
    info!(
        chart = %config.name,
        series = chart.lines().len(),
        annotations = chart.annotations().len(),
        "assembled chart"
    );
    plot::finish(&config.name, chart, renderer, output)
}
