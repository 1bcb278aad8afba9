//! CLI entry point for column exploration.

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use column_explore::{
    ColumnExplorer, ColumnKind, ExploreConfig, LoadMode, PngChartRenderer, ReportDocument,
    ReportGenerator, Reporter, TextReporter, load_column,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// CLI-compatible column kind enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliColumnKind {
    /// Numeric primary or foreign keys
    NumericalId,
    /// Textual primary or foreign keys
    StringId,
    /// Entries encoding true/false
    Boolean,
    /// Entries drawn from a set of categories
    Categorical,
    /// Numeric measurements
    Numerical,
}

impl From<CliColumnKind> for ColumnKind {
    fn from(cli: CliColumnKind) -> Self {
        match cli {
            CliColumnKind::NumericalId => ColumnKind::NumericalId,
            CliColumnKind::StringId => ColumnKind::StringId,
            CliColumnKind::Boolean => ColumnKind::Boolean,
            CliColumnKind::Categorical => ColumnKind::Categorical,
            CliColumnKind::Numerical => ColumnKind::Numerical,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Exploratory checks for a single dataset column",
    long_about = "Explores one column of a CSV file according to its kind and reports\n\
                  notes, tables and charts.\n\n\
                  EXAMPLES:\n  \
                  # Check an id column for non-numbers and duplicates\n  \
                  column-explore -i data.csv -c PassengerId -k numerical-id\n\n  \
                  # Write HTML and JSON reports for a numeric column\n  \
                  column-explore -i data.csv -c Age -k numerical -r -o reports/\n\n  \
                  # Print the report as JSON\n  \
                  column-explore -i data.csv -c Sex -k categorical --json"
)]
struct Args {
    /// Path to the CSV file to read
    #[arg(short, long)]
    input: String,

    /// Name of the column to explore
    #[arg(short, long)]
    column: String,

    /// Kind of the column, selecting the exploration
    #[arg(short, long, value_enum)]
    kind: CliColumnKind,

    /// Output directory for report files
    ///
    /// Defaults to output_dir of the config file, else ./outputs
    #[arg(short, long)]
    output: Option<String>,

    /// Custom report file name (without extension)
    ///
    /// If not specified, the column name is used
    #[arg(long)]
    output_name: Option<String>,

    /// JSON file with an exploration config; flags below override it
    #[arg(long)]
    config: Option<String>,

    /// Maximum number of duplicated values listed
    #[arg(long)]
    duplicate_limit: Option<usize>,

    /// Decimal places for statistics notes
    #[arg(long)]
    decimal_places: Option<u32>,

    /// Let polars infer one type per column instead of parsing each cell
    #[arg(long)]
    typed: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of the text report
    ///
    /// Disables all progress logs; only outputs the final JSON report.
    #[arg(long)]
    json: bool,

    /// Write HTML and JSON report files to the output directory
    ///
    /// The files are saved as <name>_report.html and <name>_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Build the exploration config from an optional file plus CLI overrides.
fn build_config(args: &Args) -> Result<ExploreConfig> {
    let base = match &args.config {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Could not read config file {path}"))?;
            let config: ExploreConfig = serde_json::from_str(&content)
                .with_context(|| format!("Invalid config file {path}"))?;
            debug!("Loaded config from {}", path);
            config
        }
        None => ExploreConfig::default(),
    };

    let mut builder = ExploreConfig::builder()
        .duplicate_display_limit(args.duplicate_limit.unwrap_or(base.duplicate_display_limit))
        .decimal_places(args.decimal_places.unwrap_or(base.decimal_places))
        .chart_style(base.chart_style)
        .output_dir(args.output.as_deref().map_or(base.output_dir, PathBuf::from));

    if let Some(name) = args.output_name.as_ref().or(base.output_name.as_ref()) {
        builder = builder.output_name(name);
    }

    Ok(builder.build()?)
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    let input = Path::new(&args.input);
    if !input.exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    let config = build_config(&args)?;
    let mode = if args.typed { LoadMode::Typed } else { LoadMode::Raw };
    let column = load_column(input, &args.column, mode)?;
    info!("Column loaded: {} entries", column.len());

    let kind = ColumnKind::from(args.kind);
    let explorer = ColumnExplorer::new(config.clone());
    let report = explorer.explore(kind, &column);
    info!(
        "{} exploration finished with {} notes and {} blocks",
        kind.display_name(),
        report.notes.len(),
        report.blocks.len()
    );

    if args.emit_report {
        let files = ReportGenerator::from_config(&config).generate(
            &report,
            Some(input),
            PngChartRenderer::new(config.chart_style.clone()),
        )?;
        info!("HTML report: {}", files.html.display());
        info!("JSON report: {}", files.json.display());
    }

    if args.json {
        let document = ReportDocument::new(report, Some(input));
        println!("{}", serde_json::to_string_pretty(&document)?);
    } else {
        TextReporter::new(std::io::stdout().lock()).present(&report)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(extra: &[&str]) -> Args {
        let base = ["column-explore", "-i", "data.csv", "-c", "age", "-k", "numerical"];
        Args::parse_from(base.iter().chain(extra))
    }

    fn config_file(dir: &Path) -> String {
        let path = dir.join("config.json");
        let config = ExploreConfig::builder()
            .output_dir(dir.join("from_file"))
            .decimal_places(1)
            .build()
            .unwrap();
        std::fs::write(&path, serde_json::to_string(&config).unwrap()).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_default_output_dir() {
        let config = build_config(&args(&[])).unwrap();
        assert_eq!(config.output_dir, PathBuf::from(column_explore::DEFAULT_OUTPUT_DIR));
    }

    #[test]
    fn test_config_file_output_dir_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file(dir.path());

        let config = build_config(&args(&["--config", &path])).unwrap();
        assert_eq!(config.output_dir, dir.path().join("from_file"));
        assert_eq!(config.decimal_places, 1);
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file(dir.path());

        let config =
            build_config(&args(&["--config", &path, "-o", "reports", "--decimal-places", "2"]))
                .unwrap();
        assert_eq!(config.output_dir, PathBuf::from("reports"));
        assert_eq!(config.decimal_places, 2);
    }
}
