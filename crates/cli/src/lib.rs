//! Neuron Features Command Line
//!
//! Loads SWC neuron collections, fits a feature extractor on a training set
//! and prints the resulting feature tables.

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use feature_engine::{
    features, Diagnostic, ExtractorConfig, FeatureInput, FeatureSource, FeatureTable, NeuralFeatures,
};
use morphology::{swc, Morphology, TreeNeuron};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Environment variable prefix for settings overrides
pub const ENV_PREFIX: &str = "NEURON_FEATURES";

/// Extract ML features from SWC neuron collections
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory of SWC files to fit on
    #[arg(long)]
    pub train: PathBuf,

    /// Directory of SWC files to transform with the fitted extractor
    #[arg(long)]
    pub test: Option<PathBuf>,

    /// Settings file (TOML, YAML or JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Feature as NAME=SOURCE; SOURCE is an attribute name or lib:<function>
    #[arg(long = "feature", value_name = "NAME=SOURCE", value_parser = parse_feature_arg)]
    pub features: Vec<(String, String)>,

    /// Add every library feature function
    #[arg(long)]
    pub library: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Csv,
}

fn parse_feature_arg(arg: &str) -> std::result::Result<(String, String), String> {
    match arg.split_once('=') {
        Some((name, source)) if !name.is_empty() && !source.is_empty() => {
            Ok((name.to_string(), source.to_string()))
        }
        _ => Err(format!("expected NAME=SOURCE, got {}", arg)),
    }
}

/// Log line format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// One entry of the `features` list in a settings file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureEntry {
    pub name: String,
    /// Attribute name, `lib:<function>`, or anything else (rejected at fit)
    pub source: serde_json::Value,
}

impl FeatureEntry {
    fn to_source<N: Morphology + 'static>(&self) -> Result<FeatureSource<N>> {
        match &self.source {
            serde_json::Value::String(text) => parse_source(text),
            other => Ok(FeatureSource::Unsupported(json_kind(other).to_string())),
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "table",
    }
}

/// Command settings, from an optional file plus environment overrides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
    pub log_format: LogFormat,
    pub extractor: ExtractorConfig,
    /// Features appended after those given on the command line
    pub features: Vec<FeatureEntry>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            extractor: ExtractorConfig::default(),
            features: Vec::new(),
        }
    }
}

impl Settings {
    /// Load settings. Environment variables such as
    /// `NEURON_FEATURES_LOG_LEVEL` or `NEURON_FEATURES_EXTRACTOR__ENCODING`
    /// override file values.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        );

        let settings = builder
            .build()
            .context("failed to read settings")?
            .try_deserialize()
            .context("invalid settings")?;
        Ok(settings)
    }

    /// Effective log level; every `-v` raises it one step
    pub fn level(&self, verbose: u8) -> Result<Level> {
        let base = Level::from_str(&self.log_level)
            .map_err(|_| anyhow::anyhow!("invalid log level {}", self.log_level))?;
        Ok(match verbose {
            0 => base,
            1 => base.max(Level::DEBUG),
            _ => Level::TRACE,
        })
    }
}

/// Initialize logging on stderr; stdout carries the feature tables
pub fn init_logging(level: Level, format: LogFormat) -> Result<()> {
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    let result = match format {
        LogFormat::Text => tracing::subscriber::set_global_default(builder.finish()),
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish()),
    };
    result.context("failed to set tracing subscriber")
}

fn parse_source<N: Morphology + 'static>(text: &str) -> Result<FeatureSource<N>> {
    match text.strip_prefix("lib:") {
        Some(function) => match features::lookup(function) {
            Some(source) => Ok(source),
            None => bail!(
                "unknown library function {}; available: {}",
                function,
                features::LIBRARY.join(", ")
            ),
        },
        None => Ok(FeatureSource::attribute(text)),
    }
}

/// Assemble the feature specification: command line features, then settings
/// features, then the library when requested
pub fn build_input<N: Morphology + 'static>(
    cli_features: &[(String, String)],
    entries: &[FeatureEntry],
    with_library: bool,
) -> Result<FeatureInput<N>> {
    let mut named: Vec<(String, FeatureSource<N>)> = Vec::new();
    for (name, source) in cli_features {
        named.push((name.clone(), parse_source(source)?));
    }
    for entry in entries {
        named.push((entry.name.clone(), entry.to_source()?));
    }
    if with_library {
        for function in features::LIBRARY {
            named.push((function.to_string(), parse_source(&format!("lib:{}", function))?));
        }
    }

    if named.is_empty() {
        bail!("no features given; use --feature, --library or a features list in the settings file");
    }
    Ok(FeatureInput::Named(named))
}

#[derive(Debug, Serialize)]
struct TableOutput<'a> {
    columns: &'a [String],
    index: Option<&'a [String]>,
    /// NaN cells serialize as null
    rows: Vec<Vec<Option<f64>>>,
    diagnostics: &'a [Diagnostic],
}

impl<'a> From<&'a FeatureTable> for TableOutput<'a> {
    fn from(table: &'a FeatureTable) -> Self {
        Self {
            columns: table.columns(),
            index: table.index(),
            rows: table
                .rows()
                .into_iter()
                .map(|row| row.into_iter().map(|v| (!v.is_nan()).then_some(v)).collect())
                .collect(),
            diagnostics: table.diagnostics(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Output<'a> {
    train: TableOutput<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    test: Option<TableOutput<'a>>,
}

/// Render tables; CSV output separates the test table with a blank line
pub fn render(format: OutputFormat, train: &FeatureTable, test: Option<&FeatureTable>) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let output = Output {
                train: train.into(),
                test: test.map(Into::into),
            };
            serde_json::to_string_pretty(&output).context("failed to serialize feature tables")
        }
        OutputFormat::Csv => {
            let mut out = train.to_csv()?;
            if let Some(test) = test {
                out.push('\n');
                out.push_str(&test.to_csv()?);
            }
            Ok(out)
        }
    }
}

/// Fit on the training directory, transform train and test, render
pub fn run(cli: &Cli, settings: &Settings) -> Result<String> {
    let input = build_input::<TreeNeuron>(&cli.features, &settings.features, cli.library)?;
    let mut extractor = NeuralFeatures::new(input, None)?.with_config(settings.extractor.clone());

    let train = swc::read_dir(&cli.train)
        .with_context(|| format!("failed to load training neurons from {}", cli.train.display()))?;
    info!("Loaded {} training neurons", train.len());
    let train_table = extractor
        .fit_transform(&train)
        .context("failed to extract training features")?;

    let test_table = match &cli.test {
        Some(dir) => {
            let test = swc::read_dir(dir)
                .with_context(|| format!("failed to load test neurons from {}", dir.display()))?;
            info!("Loaded {} test neurons", test.len());
            Some(
                extractor
                    .transform(&test)
                    .context("failed to extract test features")?,
            )
        }
        None => None,
    };

    render(cli.format, &train_table, test_table.as_ref())
}
