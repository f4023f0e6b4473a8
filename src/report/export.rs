//! Downloadable renditions of a [DashboardReport].

use csv::{QuoteStyle, WriterBuilder};
use serde::{Deserialize, Serialize};

use crate::{Error, report::metrics::DashboardReport};

/// The file formats a report can be exported as.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// The whole report as JSON.
    #[default]
    Json,
    /// The metric cards as CSV.
    Csv,
    /// A printable document. Not supported yet.
    Pdf,
}

impl ExportFormat {
    /// The file extension for the format.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
        }
    }

    /// The MIME type of the format.
    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Pdf => "application/pdf",
        }
    }
}

/// A rendered report, ready to be sent as a file download.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportFile {
    /// The suggested name for the downloaded file.
    pub file_name: String,
    /// The MIME type of `body`.
    pub content_type: &'static str,
    /// The file contents.
    pub body: Vec<u8>,
}

/// Renders `report` as `format`.
///
/// # Errors
///
/// Returns [Error::UnsupportedExportFormat] for PDF, and
/// [Error::ExportError] or [Error::JSONSerializationError] if the report
/// could not be written.
pub fn export_report(report: &DashboardReport, format: ExportFormat) -> Result<ExportFile, Error> {
    let body = match format {
        ExportFormat::Json => serde_json::to_vec_pretty(report)
            .map_err(|error| Error::JSONSerializationError(error.to_string()))?,
        ExportFormat::Csv => cards_to_csv(report)?,
        ExportFormat::Pdf => {
            return Err(Error::UnsupportedExportFormat(
                format.extension().to_owned(),
            ));
        }
    };

    let file_name = format!(
        "payments-report-{}-{}.{}",
        report.period.as_query_value(),
        report.generated_at.date(),
        format.extension()
    );

    tracing::debug!("exported {file_name} ({} bytes)", body.len());

    Ok(ExportFile {
        file_name,
        content_type: format.content_type(),
        body,
    })
}

fn cards_to_csv(report: &DashboardReport) -> Result<Vec<u8>, Error> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .from_writer(Vec::new());

    for card in &report.cards {
        writer
            .serialize(card)
            .map_err(|error| Error::ExportError(error.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|error| Error::ExportError(error.to_string()))
}
