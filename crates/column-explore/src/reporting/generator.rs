use super::chart::ChartRenderer;
use super::html::HtmlGridReporter;
use crate::config::{DEFAULT_OUTPUT_DIR, ExploreConfig};
use crate::error::{ExploreError, Result, ResultExt};
use crate::types::ExplorationReport;
use crate::utils::escape_html;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Serializable envelope written as the JSON report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDocument {
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Path to the input file, when the column came from one
    pub input_file: Option<String>,
    pub report: ExplorationReport,
}

impl ReportDocument {
    pub fn new(report: ExplorationReport, input_file: Option<&Path>) -> Self {
        Self {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_file: input_file.map(|p| p.display().to_string()),
            report,
        }
    }
}

/// Paths of the files written by [`ReportGenerator::generate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFiles {
    pub html: PathBuf,
    pub json: PathBuf,
}

/// Writes exploration reports into an output directory.
pub struct ReportGenerator {
    output_dir: PathBuf,
    output_name: Option<String>,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            output_name: None,
        }
    }
}

impl ReportGenerator {
    /// Create a new ReportGenerator with custom output settings.
    pub fn new(output_dir: PathBuf, output_name: Option<String>) -> Self {
        Self { output_dir, output_name }
    }

    /// Use the output settings of an exploration config.
    pub fn from_config(config: &ExploreConfig) -> Self {
        Self::new(config.output_dir.clone(), config.output_name.clone())
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Base file name: the configured name, else the column name with path
    /// separators replaced.
    pub fn base_name(&self, report: &ExplorationReport) -> String {
        match &self.output_name {
            Some(name) => name.clone(),
            None => report
                .variable_name()
                .chars()
                .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
                .collect(),
        }
    }

    /// Write `<base>_report.html` and `<base>_report.json`.
    pub fn generate<R: ChartRenderer>(
        &self,
        report: &ExplorationReport,
        input_file: Option<&Path>,
        renderer: R,
    ) -> Result<ReportFiles> {
        let base = self.base_name(report);
        let fragment = HtmlGridReporter::new(renderer)
            .render(report)
            .context("Failed to render HTML report")?;
        let html = self.write_html(&fragment, report, &base)?;

        let document = ReportDocument::new(report.clone(), input_file);
        let json = self.write_report_to_file(&document, &base)?;

        Ok(ReportFiles { html, json })
    }

    /// Wrap a grid fragment in a standalone document and write it.
    pub fn write_html(
        &self,
        fragment: &str,
        report: &ExplorationReport,
        report_base_name: &str,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)
            .context(format!("Failed to create {}", self.output_dir.display()))?;

        let title = format!(
            "{}: {}",
            escape_html(report.variable_name()),
            report.kind.display_name()
        );
        let document = format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n<body>\n<h3>{title}</h3>\n{fragment}\n</body>\n</html>\n"
        );

        let report_path = self.output_dir.join(format!("{}_report.html", report_base_name));
        let mut file = File::create(&report_path)?;
        file.write_all(document.as_bytes())?;
        debug!("Wrote {} bytes of HTML", document.len());

        info!("Report saved: {}", report_path.display());
        Ok(report_path)
    }

    /// Write a report document to a JSON file.
    ///
    /// For example, if `report_base_name` is "age", the file will be "age_report.json".
    pub fn write_report_to_file(
        &self,
        document: &ReportDocument,
        report_base_name: &str,
    ) -> Result<PathBuf> {
        if report_base_name.is_empty() {
            return Err(ExploreError::ReportGenerationFailed(
                "report base name is empty".to_string(),
            ));
        }
        fs::create_dir_all(&self.output_dir)?;

        let report_path = self.output_dir.join(format!("{}_report.json", report_base_name));
        let mut file = File::create(&report_path)?;
        file.write_all(serde_json::to_string_pretty(document)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());
        Ok(report_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ColumnExplorer;
    use crate::column::{Column, Value};
    use crate::reporting::PngChartRenderer;

    fn report(name: &str) -> ExplorationReport {
        let column = Column::named(name, vec![Value::Int(1), Value::from("x")]);
        ColumnExplorer::default().explore_numerical(&column)
    }

    #[test]
    fn test_default_matches_config_default() {
        let from_config = ReportGenerator::from_config(&ExploreConfig::default());
        assert_eq!(ReportGenerator::default().output_dir(), from_config.output_dir());
    }

    #[test]
    fn test_base_name() {
        let generator = ReportGenerator::default();
        assert_eq!(generator.base_name(&report("age")), "age");
        assert_eq!(generator.base_name(&report("a/b c")), "a_b_c");

        let named = ReportGenerator::new(PathBuf::from("out"), Some("custom".to_string()));
        assert_eq!(named.base_name(&report("age")), "custom");
    }

    #[test]
    fn test_generate_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let generator = ReportGenerator::new(dir.path().join("nested"), None);
        let report = report("age");

        let files = generator
            .generate(&report, Some(Path::new("data.csv")), PngChartRenderer::default())
            .unwrap();
        assert_eq!(files.html.file_name().unwrap(), "age_report.html");
        assert_eq!(files.json.file_name().unwrap(), "age_report.json");

        let html = fs::read_to_string(&files.html).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>age: Numerical Attribute</title>"));

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&files.json).unwrap()).unwrap();
        assert_eq!(json["input_file"], "data.csv");
        assert_eq!(json["report"]["kind"], "numerical");
        assert_eq!(json["report"]["column_name"], "age");
    }

    #[test]
    fn test_empty_base_name_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let generator = ReportGenerator::new(dir.path().to_path_buf(), None);
        let document = ReportDocument::new(report("age"), None);
        let err = generator.write_report_to_file(&document, "").unwrap_err();
        assert_eq!(err.error_code(), "REPORT_GENERATION_FAILED");
    }
}
