mod document;
mod spreadsheet;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::costing::Evaluation;
use crate::models::Project;

pub const COLUMNS: [&str; 6] = ["Name", "Duration", "Sales Price", "Total Cost", "Profit", "Margin"];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("could not write export: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not build spreadsheet: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    #[error("could not build document: {0}")]
    Document(String),
}

/// One exported line: a project and its recomputed figures.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    pub name: String,
    pub duration: i32,
    pub sales_price: f64,
    pub total_cost: f64,
    pub profit: f64,
    pub margin: f64,
}

impl ExportRow {
    pub fn new(project: &Project, evaluation: &Evaluation) -> Self {
        Self {
            name: project.name.clone(),
            duration: project.duration,
            sales_price: project.sales_price,
            total_cost: evaluation.total_cost,
            profit: evaluation.profit,
            margin: evaluation.margin_percent,
        }
    }

    /// Cell texts in column order, money rounded to cents.
    pub fn cells(&self) -> [String; 6] {
        [
            self.name.clone(),
            self.duration.to_string(),
            format!("{:.2}", self.sales_price),
            format!("{:.2}", self.total_cost),
            format!("{:.2}", self.profit),
            format!("{:.2}", self.margin),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Spreadsheet,
    Document,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Spreadsheet => "xlsx",
            ExportFormat::Document => "pdf",
        }
    }
}

/// Writes spreadsheet and document exports into one output directory
pub struct Exporter {
    output_dir: PathBuf,
}

impl Exporter {
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self, ExportError> {
        let output_dir = output_dir.as_ref();
        if !output_dir.exists() {
            fs::create_dir_all(output_dir)?;
        }

        Ok(Self {
            output_dir: output_dir.to_path_buf(),
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Export `rows` to `<stem>.<extension>` and return the written path.
    pub fn export(&self, rows: &[ExportRow], stem: &str, format: ExportFormat) -> Result<PathBuf, ExportError> {
        let path = self
            .output_dir
            .join(format!("{}.{}", file_stem(stem), format.extension()));

        match format {
            ExportFormat::Spreadsheet => spreadsheet::write(rows, &path)?,
            ExportFormat::Document => document::write(rows, &path)?,
        }

        tracing::info!(path = %path.display(), rows = rows.len(), "exported projects");
        Ok(path)
    }
}

/// Project names are free text; keep them usable as file names.
fn file_stem(name: &str) -> String {
    let stem: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let stem = stem.trim_matches('.').trim();

    if stem.is_empty() {
        "project".to_string()
    } else {
        stem.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Assignment;

    fn rows() -> Vec<ExportRow> {
        let project = Project {
            id: 1,
            name: "Market entry".to_string(),
            duration: 30,
            sales_price: 10000.0,
            assignment: Assignment::new().with("Strategy Consultant", 2),
        };
        let evaluation = Evaluation::from_cost(10000.0, 8363.636363636364);
        vec![ExportRow::new(&project, &evaluation)]
    }

    #[test]
    fn cells_follow_column_order() {
        assert_eq!(
            rows()[0].cells(),
            [
                "Market entry".to_string(),
                "30".to_string(),
                "10000.00".to_string(),
                "8363.64".to_string(),
                "1636.36".to_string(),
                "16.36".to_string(),
            ]
        );
    }

    #[test]
    fn file_stem_replaces_path_characters() {
        assert_eq!(file_stem("Q3/Q4 roll-out"), "Q3_Q4 roll-out");
        assert_eq!(file_stem("../../etc"), "_.._etc");
        assert_eq!(file_stem("  "), "project");
    }

    #[test]
    fn creates_missing_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("exports").join("today");

        let exporter = Exporter::new(&nested).unwrap();
        assert!(exporter.output_dir().is_dir());
    }

    #[test]
    fn writes_spreadsheet() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::new(dir.path()).unwrap();

        let path = exporter.export(&rows(), "Market entry", ExportFormat::Spreadsheet).unwrap();

        assert_eq!(path, dir.path().join("Market entry.xlsx"));
        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn writes_document() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::new(dir.path()).unwrap();

        let path = exporter.export(&rows(), "all_projects", ExportFormat::Document).unwrap();

        assert_eq!(path, dir.path().join("all_projects.pdf"));
        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[..5], b"%PDF-");
    }

    #[test]
    fn empty_export_still_has_header() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::new(dir.path()).unwrap();

        for format in [ExportFormat::Spreadsheet, ExportFormat::Document] {
            let path = exporter.export(&[], "empty", format).unwrap();
            assert!(fs::metadata(path).unwrap().len() > 0);
        }
    }
}
