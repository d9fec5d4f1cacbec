//! Record formatting for files and stdout.

use std::fs;
use std::path::Path;

use csec_core::models::config;
use csec_core::{CanonicalField, ProductRecord};

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// CSV with the canonical header row
    Csv,
    /// JSON array of records
    Json,
    /// Plain text summary
    Text,
}

impl From<config::OutputFormat> for OutputFormat {
    fn from(format: config::OutputFormat) -> Self {
        match format {
            config::OutputFormat::Csv => OutputFormat::Csv,
            config::OutputFormat::Json => OutputFormat::Json,
        }
    }
}

pub fn format_records(records: &[ProductRecord], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Csv => format_csv(records),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(records)?),
        OutputFormat::Text => Ok(format_text(records)),
    }
}

/// Write `records` to `path`, creating parent directories as needed.
pub fn write_records(path: &Path, records: &[ProductRecord], format: OutputFormat) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, format_records(records, format)?)?;
    Ok(())
}

fn format_csv(records: &[ProductRecord]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(CanonicalField::headers())?;
    for record in records {
        wtr.write_record(record.to_row())?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(records: &[ProductRecord]) -> String {
    let width = CanonicalField::ALL
        .iter()
        .map(|f| f.header().len())
        .max()
        .unwrap_or(0);

    let mut output = String::new();
    for (i, record) in records.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        for field in CanonicalField::ALL {
            output.push_str(&format!("{:<width$}  {}\n", field.header(), record.get(field), width = width));
        }
    }
    output
}
