//! Persistence: a flat CSV projection and a lossless JSON dump.

use crate::error::OutputError;
use crate::model::{truncate_chars, EndpointRecord, HttpMethod, TABULAR_DESCRIPTION_CAP};
use regex::Regex;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::info;

static CODE_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<code>(.*?)</code>").expect("valid code span regex"));

const SCOPE_MARKER: &str = "Scope:";

/// Column order of the tabular output.
pub const TABULAR_COLUMNS: [&str; 7] = [
    "resource",
    "name",
    "http_method",
    "path",
    "description",
    "scope",
    "parameter_count",
];

/// One CSV row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabularRow {
    pub resource: String,
    pub name: String,
    pub http_method: HttpMethod,
    pub path: String,
    pub description: String,
    pub scope: String,
    pub parameter_count: usize,
}

impl From<&EndpointRecord> for TabularRow {
    fn from(record: &EndpointRecord) -> Self {
        Self {
            resource: record.resource.clone(),
            name: record.name.clone(),
            http_method: record.http_method,
            path: record.path.clone(),
            description: truncate_chars(&record.description, TABULAR_DESCRIPTION_CAP),
            scope: extract_scope(&record.description),
            parameter_count: record.parameters.len(),
        }
    }
}

/// OAuth scope mentioned in a description, or an empty string.
///
/// Takes the text after the first `Scope:` marker: the contents of a
/// `<code>` span if there is one, otherwise everything up to the first
/// period (or newline when there is no period).
pub fn extract_scope(description: &str) -> String {
    let Some(after) = description.split(SCOPE_MARKER).nth(1) else {
        return String::new();
    };

    if let Some(caps) = CODE_SPAN.captures(after) {
        return caps[1].to_string();
    }

    let end = after.find('.').or_else(|| after.find('\n'));
    match end {
        Some(pos) => after[..pos].trim().to_string(),
        None => after.trim().to_string(),
    }
}

/// Write the CSV projection, header first, one row per record.
pub fn write_tabular<W: Write>(records: &[EndpointRecord], writer: W) -> Result<(), OutputError> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv.write_record(TABULAR_COLUMNS)?;
    for record in records {
        csv.serialize(TabularRow::from(record))?;
    }
    csv.flush()?;
    Ok(())
}

/// Write every record with all optional fields as pretty-printed JSON.
pub fn write_structured<W: Write>(records: &[EndpointRecord], mut writer: W) -> Result<(), OutputError> {
    serde_json::to_writer_pretty(&mut writer, records)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Where [`save_outputs`] put its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub csv: PathBuf,
    pub json: PathBuf,
}

/// Write `<dir>/<stem>.csv` and `<dir>/<stem>.json`, creating `dir` if needed.
pub fn save_outputs(
    records: &[EndpointRecord],
    dir: &Path,
    stem: &str,
) -> Result<OutputPaths, OutputError> {
    std::fs::create_dir_all(dir)?;
    let paths = OutputPaths {
        csv: dir.join(format!("{}.csv", stem)),
        json: dir.join(format!("{}.json", stem)),
    };

    write_tabular(records, BufWriter::new(File::create(&paths.csv)?))?;
    info!(count = records.len(), path = %paths.csv.display(), "saved endpoints");

    write_structured(records, BufWriter::new(File::create(&paths.json)?))?;
    info!(path = %paths.json.display(), "saved detailed endpoint data");

    Ok(paths)
}

/// Save a fetched page as `<dir>/debug_<label>.html` for later inspection.
pub fn dump_html(dir: &Path, label: &str, html: &str) -> Result<PathBuf, OutputError> {
    std::fs::create_dir_all(dir)?;
    let file_label = label.to_lowercase().replace(' ', "_");
    let path = dir.join(format!("debug_{}.html", file_label));
    std::fs::write(&path, html)?;
    Ok(path)
}
