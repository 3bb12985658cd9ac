use clap::{App, AppSettings, Arg, ArgMatches};
use color_eyre::Report;
use handel_plot::assembler::{self, StdinPrompt};
use handel_plot::charts::{self, FileArg};
use handel_plot::config::{ChartConfig, LabelPolicy};
use handel_plot::plot::{self, Output, SaveOptions, DEFAULT_DPI, PLOT_DIR};
use handel_plot::PlotError;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

// reserved first positional value: render to a file instead of a window
const NOSHOW: &str = "noshow";

const DEFAULT_LOG_FILTER: &str = "info";

enum Target {
    List,
    Chart(String),
    Config(PathBuf),
}

struct Args {
    target: Target,
    files: Vec<FileArg>,
    show: bool,
    prompt: bool,
    output_dir: PathBuf,
    format: Option<String>,
    dpi: u32,
}

fn main() -> Result<(), Report> {
    color_eyre::install()?;

    // init tracing subscriber
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let (args, usage) = parse_args()?;
    let config = match args.target {
        Target::List => {
            for entry in charts::CATALOGUE {
                let source =
                    if entry.takes_files() { " [FILE]..." } else { "" };
                println!("{:<20}{}{}", entry.name, entry.description, source);
            }
            return Ok(());
        }
        Target::Chart(ref name) => {
            let entry = charts::by_name(name)?;
            if entry.takes_files() && args.files.is_empty() {
                eprintln!("expect csv file arguments\n\n{}", usage);
                std::process::exit(1);
            }
            entry.config(&args.files)?
        }
        Target::Config(ref path) => ChartConfig::load(path)?,
    };
    let config = if args.prompt {
        config.label_policy(LabelPolicy::Prompt)
    } else {
        config
    };

    let renderer = plot::default_renderer();
    let output = if args.show && renderer.interactive() {
        Output::Show
    } else {
        let format = args
            .format
            .unwrap_or_else(|| renderer.default_format().to_string());
        Output::Save(SaveOptions::new(args.output_dir, format).dpi(args.dpi))
    };
    info!(chart = %config.name, renderer = renderer.name(), "rendering");

    if let Some(path) =
        assembler::render(&config, &*renderer, &output, &mut StdinPrompt)?
    {
        println!("{}", path.display());
    }
    Ok(())
}

fn parse_args() -> Result<(Args, String), Report> {
    let app = App::new("handel_plot")
        .version("0.1")
        .about("Renders the charts of Handel benchmark runs.")
        .setting(AppSettings::ArgRequiredElseHelp)
        .arg(
            Arg::with_name("files")
                .value_name("FILE[=LABEL]")
                .help(
                    "data files for charts that read them from the command \
                     line; a leading `noshow` writes the chart to a file",
                )
                .multiple(true),
        )
        .arg(
            Arg::with_name("chart")
                .long("chart")
                .short("c")
                .value_name("NAME")
                .help("chart to render (see --list)")
                .takes_value(true)
                .required_unless_one(&["config", "list"])
                .conflicts_with_all(&["config", "list"]),
        )
        .arg(
            Arg::with_name("config")
                .long("config")
                .value_name("CONFIG")
                .help("JSON chart configuration to render")
                .takes_value(true)
                .conflicts_with("list"),
        )
        .arg(
            Arg::with_name("list")
                .long("list")
                .help("lists available charts"),
        )
        .arg(
            Arg::with_name("prompt")
                .long("prompt")
                .help("asks for the labels of unlabeled files"),
        )
        .arg(
            Arg::with_name("output_dir")
                .long("output-dir")
                .value_name("OUTPUT_DIR")
                .help("folder where charts are written; default: figures")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("format")
                .long("format")
                .value_name("FORMAT")
                .help(
                    "image format; default: pdf with matplotlib, svg \
                     otherwise",
                )
                .takes_value(true),
        )
        .arg(
            Arg::with_name("dpi")
                .long("dpi")
                .value_name("DPI")
                .help("resolution of written images; default: 1000")
                .takes_value(true),
        );
    let matches = app.get_matches();
    let usage = matches.usage().to_string();

    // parse arguments
    let target = parse_target(&matches);
    let (show, files) = parse_files(matches.values_of("files"))?;
    let output_dir = matches
        .value_of("output_dir")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(PLOT_DIR));
    let dpi = parse_dpi(matches.value_of("dpi"))?;
    let args = Args {
        target,
        files,
        show,
        prompt: matches.is_present("prompt"),
        output_dir,
        format: matches.value_of("format").map(String::from),
        dpi,
    };
    Ok((args, usage))
}

fn parse_target(matches: &ArgMatches<'_>) -> Target {
    if matches.is_present("list") {
        Target::List
    } else if let Some(path) = matches.value_of("config") {
        Target::Config(PathBuf::from(path))
    } else {
        let name = matches.value_of("chart").unwrap_or_default();
        Target::Chart(name.to_string())
    }
}

fn parse_files<'a>(
    values: Option<impl Iterator<Item = &'a str>>,
) -> Result<(bool, Vec<FileArg>), PlotError> {
    let mut values = values.into_iter().flatten().peekable();
    let show = values.peek() != Some(&NOSHOW);
    if !show {
        values.next();
    }
    let files = values
        .map(str::parse::<FileArg>)
        .collect::<Result<Vec<_>, _>>()?;
    Ok((show, files))
}

fn parse_dpi(dpi: Option<&str>) -> Result<u32, PlotError> {
    dpi.map(|dpi| {
        dpi.parse::<u32>()
            .map_err(|e| {
                PlotError::usage(format!("invalid dpi {:?}: {}", dpi, e))
            })
    })
    .unwrap_or(Ok(DEFAULT_DPI))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noshow_is_only_reserved_first() {
        let (show, files) =
            parse_files(Some(vec!["noshow", "a.csv=a"].into_iter())).unwrap();
        assert!(!show);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].label.as_deref(), Some("a"));

        let (show, files) =
            parse_files(Some(vec!["a.csv", "noshow"].into_iter())).unwrap();
        assert!(show);
        assert_eq!(files[1].path, PathBuf::from("noshow"));

        let none = None::<std::vec::IntoIter<&str>>;
        let (show, files) = parse_files(none).unwrap();
        assert!(show);
        assert!(files.is_empty());
    }

    #[test]
    fn dpi() {
        assert_eq!(parse_dpi(None), Ok(DEFAULT_DPI));
        assert_eq!(parse_dpi(Some("300")), Ok(300));
        assert!(matches!(parse_dpi(Some("high")), Err(PlotError::Usage(_))));
    }
}
