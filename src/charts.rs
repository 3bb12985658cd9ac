//! The charts of the Handel paper, as declarative configurations.

use crate::annotate::Offset;
use crate::chart::Scale;
use crate::config::{ChartConfig, SeriesSpec, DEFAULT_X_COLUMN};
use crate::error::PlotError;
use crate::transform::Transform;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::warn;

// folder where benchmark results are stored
pub const CSV_DIR: &str = "csv";

const SIGEN_WALL_AVG: &str = "sigen_wall_avg";
const SIGEN_WALL_MAX: &str = "sigen_wall_max";
const NET_SENT_BYTES_AVG: &str = "net_sentBytes_avg";
const SIGS_CHECKED_AVG: &str = "sigs_sigCheckedCt_avg";
const FAILING: &str = "failing";

const TIME_MS: &str = "signature generation (ms)";
const KBYTES: &str = "KBytes";

/// A data file given on the command line as `FILE` or `FILE=LABEL`.
#[derive(Debug, Clone, PartialEq)]
pub struct FileArg {
    pub path: PathBuf,
    pub label: Option<String>,
}

impl FromStr for FileArg {
    type Err = PlotError;

    fn from_str(arg: &str) -> Result<Self, Self::Err> {
        let (path, label) = match arg.rsplit_once('=') {
            Some((path, label)) => (path, Some(label.to_string())),
            None => (arg, None),
        };
        if path.is_empty() {
            return Err(PlotError::usage(format!("no file in {:?}", arg)));
        }
        Ok(Self {
            path: PathBuf::from(path),
            label,
        })
    }
}

enum Source {
    /// Reads the files listed in the configuration.
    Fixed(fn() -> ChartConfig),
    /// Reads the files given on the command line.
    Files(fn(&[FileArg]) -> ChartConfig),
}

pub struct ChartEntry {
    pub name: &'static str,
    pub description: &'static str,
    source: Source,
}

impl ChartEntry {
    /// Whether the chart plots the files given on the command line.
    pub fn takes_files(&self) -> bool {
        matches!(self.source, Source::Files(_))
    }

    pub fn config(&self, files: &[FileArg]) -> Result<ChartConfig, PlotError> {
        match self.source {
            Source::Fixed(build) => {
                if !files.is_empty() {
                    warn!(
                        chart = self.name,
                        ignored = files.len(),
                        "chart reads its own data files"
                    );
                }
                Ok(build())
            }
            Source::Files(build) => {
                if files.is_empty() {
                    return Err(PlotError::usage("expect csv file arguments"));
                }
                Ok(build(files))
            }
        }
    }
}

pub const CATALOGUE: &[ChartEntry] = &[
    ChartEntry {
        name: "comparison_time",
        description: "signature generation time of handel vs complete graph",
        source: Source::Fixed(comparison_time),
    },
    ChartEntry {
        name: "comparison_network",
        description: "outgoing network of handel vs complete graph",
        source: Source::Fixed(comparison_network),
    },
    ChartEntry {
        name: "comparison_nodes",
        description: "comparison_time without annotations",
        source: Source::Fixed(comparison_nodes),
    },
    ChartEntry {
        name: "failing_time",
        description: "average and maximum time with failing nodes",
        source: Source::Fixed(failing_time),
    },
    ChartEntry {
        name: "failing_network",
        description: "outgoing network with failing nodes",
        source: Source::Fixed(failing_network),
    },
    ChartEntry {
        name: "threshold_time",
        description: "signature generation time for various thresholds",
        source: Source::Fixed(threshold_time),
    },
    ChartEntry {
        name: "threshold_network",
        description: "outgoing network for various thresholds",
        source: Source::Fixed(threshold_network),
    },
    ChartEntry {
        name: "timeout_time",
        description: "signature generation time for various timeouts",
        source: Source::Fixed(timeout_time),
    },
    ChartEntry {
        name: "timeout_network",
        description: "outgoing network for various timeouts",
        source: Source::Fixed(timeout_network),
    },
    ChartEntry {
        name: "period_time",
        description: "signature generation time for various periods",
        source: Source::Fixed(period_time),
    },
    ChartEntry {
        name: "reallike",
        description: "75% threshold with 25% failing nodes",
        source: Source::Fixed(reallike),
    },
    ChartEntry {
        name: "sigchecked",
        description: "signatures checked, one line per file",
        source: Source::Files(sigchecked),
    },
    ChartEntry {
        name: "network",
        description: "bytes sent, one line per file",
        source: Source::Files(network),
    },
    ChartEntry {
        name: "periods",
        description: "signature generation time, one line per file",
        source: Source::Files(periods),
    },
    ChartEntry {
        name: "inc_nodes",
        description: "signature generation time of the first file",
        source: Source::Files(inc_nodes),
    },
];

pub fn by_name(name: &str) -> Result<&'static ChartEntry, PlotError> {
    CATALOGUE
        .iter()
        .find(|entry| entry.name == name)
        .ok_or_else(|| {
            PlotError::usage(format!(
                "unknown chart {:?}; available: {}",
                name,
                names().collect::<Vec<_>>().join(", ")
            ))
        })
}

pub fn names() -> impl Iterator<Item = &'static str> {
    CATALOGUE.iter().map(|entry| entry.name)
}

fn csv(file: &str) -> PathBuf {
    Path::new(CSV_DIR).join(file)
}

/// One series per `(file, label)`, all drawing `y` against the node count.
fn labeled(
    config: ChartConfig,
    files: &[(&str, &str)],
    y: &str,
    transform: Transform,
) -> ChartConfig {
    files.iter().fold(config, |config, (file, label)| {
        config.series(
            SeriesSpec::new(csv(file), y)
                .y_transform(transform.clone())
                .label(*label),
        )
    })
}

const COMPARISON: &[(&str, &str)] = &[
    ("handel_0failing_99thr.csv", "handel"),
    ("n2_4000_99thr.csv", "complete"),
];

const THRESHOLDS: &[(&str, &str)] = &[
    ("handel_0failing_51thr.csv", "51% threshold"),
    ("handel_0failing_75thr.csv", "75% threshold"),
    ("handel_0failing_99thr.csv", "99% threshold"),
];

const TIMEOUTS: &[(&str, &str)] = &[
    ("handel_2000_50timeout_99thr.csv", "50ms timeout"),
    ("handel_2000_100timeout_99thr.csv", "100ms timeout"),
    ("handel_2000_200timeout_99thr.csv", "200ms timeout"),
];

const FAILING_FILE: &str = "handel_4000_failing.csv";
const FAILING_NODES: f64 = 4000.0;

fn comparison_time() -> ChartConfig {
    let config = ChartConfig::new("comparison_time")
        .x_label("Handel nodes")
        .y_label(TIME_MS)
        .title("Signature generation time - comparative baseline");
    COMPARISON.iter().fold(config, |config, (file, label)| {
        config.series(
            SeriesSpec::new(csv(file), SIGEN_WALL_AVG)
                .y_transform(Transform::SECONDS_TO_MILLIS)
                .label(*label)
                .annotate(Offset::new(0.07, 0.02), "%d ms"),
        )
    })
}

fn comparison_network() -> ChartConfig {
    let offsets = [Offset::new(0.15, 0.09), Offset::new(0.20, 0.01)];
    let config = ChartConfig::new("comparison_network")
        .x_label("Handel nodes")
        .y_label("KBytes (log)")
        .y_scale(Scale::Log);
    COMPARISON
        .iter()
        .zip(offsets)
        .fold(config, |config, ((file, label), offset)| {
            config.series(
                SeriesSpec::new(csv(file), NET_SENT_BYTES_AVG)
                    .y_transform(Transform::BYTES_TO_KILOBYTES)
                    .label(*label)
                    .annotate(offset, "%d KB"),
            )
        })
}

fn comparison_nodes() -> ChartConfig {
    let config = ChartConfig::new("comparison_nodes")
        .x_label("nodes")
        .y_label(TIME_MS);
    labeled(config, COMPARISON, SIGEN_WALL_AVG, Transform::SECONDS_TO_MILLIS)
}

fn failing_series(y: &str) -> SeriesSpec {
    SeriesSpec::new(csv(FAILING_FILE), y)
        .x(FAILING)
        .x_transform(Transform::percentage_of_max(DEFAULT_X_COLUMN))
}

fn failing_time() -> ChartConfig {
    // small figure, large fonts
    let font_size = 35.0;
    ChartConfig::new("failing_time")
        .series(failing_series(SIGEN_WALL_AVG).label("Average"))
        .series(failing_series(SIGEN_WALL_MAX).label("Maximum"))
        .x_label("failing nodes in %")
        .y_label("signature generation")
        .legend_font_size(Some(font_size))
        .label_font_size(font_size)
        .figsize(4.0, 2.0)
        .constant(DEFAULT_X_COLUMN, FAILING_NODES)
}

fn failing_network() -> ChartConfig {
    ChartConfig::new("failing_network")
        .series(
            failing_series(NET_SENT_BYTES_AVG)
                .y_transform(Transform::BYTES_TO_KILOBYTES)
                .label("handel"),
        )
        .x_label("failing nodes in %")
        .y_label(KBYTES)
        .constant(DEFAULT_X_COLUMN, FAILING_NODES)
}

fn threshold_time() -> ChartConfig {
    let config = ChartConfig::new("threshold_time")
        .x_label("nodes")
        .y_label(TIME_MS)
        .title("signature generation time with various thresholds");
    labeled(config, THRESHOLDS, SIGEN_WALL_AVG, Transform::SECONDS_TO_MILLIS)
}

fn threshold_network() -> ChartConfig {
    let config = ChartConfig::new("threshold_network")
        .x_label("nodes")
        .y_label(KBYTES)
        .title("Outgoing network consumption with various thresholds");
    labeled(
        config,
        THRESHOLDS,
        NET_SENT_BYTES_AVG,
        Transform::BYTES_TO_KILOBYTES,
    )
}

fn timeout_time() -> ChartConfig {
    let config = ChartConfig::new("timeout_time")
        .x_label("nodes")
        .y_label(TIME_MS)
        .title("signature generation time with various timeouts");
    labeled(config, TIMEOUTS, SIGEN_WALL_AVG, Transform::SECONDS_TO_MILLIS)
}

fn timeout_network() -> ChartConfig {
    let config = ChartConfig::new("timeout_network")
        .x_label("nodes")
        .y_label(KBYTES)
        .legend_font_size(Some(18.0));
    labeled(
        config,
        TIMEOUTS,
        NET_SENT_BYTES_AVG,
        Transform::BYTES_TO_KILOBYTES,
    )
}

fn period_time() -> ChartConfig {
    let config = ChartConfig::new("period_time")
        .x_label("nodes")
        .y_label("signature generation")
        .title("Signature generation time with various periods");
    [10, 20, 50, 100].iter().fold(config, |config, period| {
        let file = format!("handel_2000_{}period_25fail_99thr.csv", period);
        config.series(
            SeriesSpec::new(csv(&file), SIGEN_WALL_AVG)
                .y_transform(Transform::SECONDS_TO_MILLIS)
                .label(format!("{}ms period", period)),
        )
    })
}

fn reallike() -> ChartConfig {
    let config = ChartConfig::new("reallike")
        .x_label("nodes")
        .y_label(TIME_MS)
        .title("Handel: 75% threshold signature with 25% failings");
    labeled(
        config,
        &[("handel_4000_real.csv", "handel")],
        SIGEN_WALL_AVG,
        Transform::SECONDS_TO_MILLIS,
    )
}

/// One series per command line file; labels come from `FILE=LABEL`.
fn per_file(config: ChartConfig, files: &[FileArg], y: &str) -> ChartConfig {
    files.iter().fold(config, |config, file| {
        let mut series = SeriesSpec::new(&file.path, y);
        series.label = file.label.clone();
        config.series(series)
    })
}

fn sigchecked(files: &[FileArg]) -> ChartConfig {
    let config = ChartConfig::new("sigchecked")
        .x_label("nodes")
        .y_label("signatures checked (avg)")
        .y_scale(Scale::Log);
    per_file(config, files, SIGS_CHECKED_AVG)
}

fn network(files: &[FileArg]) -> ChartConfig {
    let config = ChartConfig::new("network")
        .x_label("nodes")
        .y_label("bytes sent (avg)")
        .y_scale(Scale::Log);
    per_file(config, files, NET_SENT_BYTES_AVG)
}

fn periods(files: &[FileArg]) -> ChartConfig {
    let config = ChartConfig::new("periods")
        .x_label("nodes")
        .y_label("signature generation")
        .y_scale(Scale::Log);
    per_file(config, files, SIGEN_WALL_AVG)
}

fn inc_nodes(files: &[FileArg]) -> ChartConfig {
    // only the first file is plotted, without a legend
    let first = &files[..1];
    let mut config = per_file(
        ChartConfig::new("inc_nodes")
            .x_label("nodes")
            .y_label(TIME_MS)
            .legend_font_size(None),
        first,
        SIGEN_WALL_AVG,
    );
    for series in &mut config.series {
        series.y_transform = Transform::SECONDS_TO_MILLIS;
        if series.given_label().is_none() {
            series.label = Some(series.path.display().to_string());
        }
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LabelPolicy;
    use std::collections::HashSet;

    fn file(arg: &str) -> FileArg {
        arg.parse().unwrap()
    }

    #[test]
    fn parse_file_args() {
        assert_eq!(
            file("csv/a.csv=51% threshold"),
            FileArg {
                path: PathBuf::from("csv/a.csv"),
                label: Some("51% threshold".to_string()),
            }
        );
        assert_eq!(file("csv/a.csv").label, None);
        assert_eq!(file("a=b.csv=label").path, PathBuf::from("a=b.csv"));
        assert!("=label".parse::<FileArg>().is_err());
    }

    #[test]
    fn every_chart_is_valid() {
        let files = vec![file("a.csv=a"), file("b.csv=b")];
        let mut seen = HashSet::new();
        for entry in CATALOGUE {
            assert!(seen.insert(entry.name), "duplicate chart {}", entry.name);
            let config = entry.config(&files).unwrap();
            assert_eq!(config.name, entry.name);
            config.validate().unwrap();
            assert_eq!(config.label_policy, LabelPolicy::Reject);
            // the palette has four entries
            assert!(config.series.len() <= 4, "{} is too crowded", entry.name);
        }
    }

    #[test]
    fn fixed_charts_read_csv_dir() {
        let config = by_name("threshold_time").unwrap().config(&[]).unwrap();
        let paths: Vec<_> =
            config.paths().into_iter().map(Path::to_path_buf).collect();
        assert_eq!(
            paths,
            vec![
                csv("handel_0failing_51thr.csv"),
                csv("handel_0failing_75thr.csv"),
                csv("handel_0failing_99thr.csv"),
            ]
        );
        let labels: Vec<_> = config
            .series
            .iter()
            .map(|series| series.given_label().unwrap())
            .collect();
        assert_eq!(
            labels,
            vec!["51% threshold", "75% threshold", "99% threshold"]
        );
    }

    #[test]
    fn failing_time() {
        let config = by_name("failing_time").unwrap().config(&[]).unwrap();
        assert_eq!(config.paths(), vec![csv(FAILING_FILE).as_path()]);
        assert_eq!(config.series.len(), 2);
        assert_eq!(config.series[0].x, FAILING);
        assert_eq!(config.constants[0].column, DEFAULT_X_COLUMN);
        assert_eq!(config.constants[0].value, 4000.0);
        assert_eq!(config.figsize, Some((4.0, 2.0)));
        assert_eq!(config.legend_font_size, Some(35.0));
    }

    #[test]
    fn file_charts() {
        let entry = by_name("network").unwrap();
        assert!(entry.takes_files());
        let err = entry.config(&[]).unwrap_err();
        assert_eq!(err, PlotError::usage("expect csv file arguments"));

        let files = [file("a.csv=handel"), file("b.csv")];
        let config = entry.config(&files).unwrap();
        assert_eq!(config.y_scale, Scale::Log);
        assert_eq!(config.series[0].given_label(), Some("handel"));
        assert_eq!(config.series[1].given_label(), None);
        assert_eq!(config.series[1].y, NET_SENT_BYTES_AVG);
    }

    #[test]
    fn inc_nodes_plots_first_file() {
        let config = by_name("inc_nodes")
            .unwrap()
            .config(&[file("a.csv"), file("b.csv")])
            .unwrap();
        assert_eq!(config.series.len(), 1);
        assert_eq!(config.series[0].given_label(), Some("a.csv"));
        assert_eq!(config.legend_font_size, None);
    }

    #[test]
    fn unknown_chart() {
        assert!(matches!(by_name("nope"), Err(PlotError::Usage(_))));
        assert!(!by_name("reallike").unwrap().takes_files());
    }
}
