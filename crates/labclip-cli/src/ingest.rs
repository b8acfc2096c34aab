//! Record, config, and template file loading.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

use labclip_core::PipelineConfig;
use labclip_model::{FormatTemplate, RawLabRecord};

/// Load raw records from a file: CSV when the extension says so, JSON
/// otherwise.
pub fn load_records(path: &Path) -> Result<Vec<RawLabRecord>> {
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    let file = File::open(path).with_context(|| format!("open records file {}", path.display()))?;
    if is_csv {
        records_from_csv(file)
            .with_context(|| format!("parse CSV records from {}", path.display()))
    } else {
        serde_json::from_reader(file)
            .with_context(|| format!("parse JSON records from {}", path.display()))
    }
}

/// Parse CSV records. Headers use the same camelCase names as the JSON
/// contract (`orderCode`, `itemName`, `referenceRaw`, …).
pub fn records_from_csv<R: Read>(reader: R) -> Result<Vec<RawLabRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut records = Vec::new();
    for row in csv_reader.deserialize() {
        let record: RawLabRecord = row.context("deserialize CSV record")?;
        records.push(record);
    }
    Ok(records)
}

/// Load the pipeline configuration, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("open config file {}", path.display()))?;
            serde_json::from_reader(file)
                .with_context(|| format!("parse config from {}", path.display()))
        }
        None => Ok(PipelineConfig::default()),
    }
}

/// Load a copy template, or the built-in default when no path is given.
pub fn load_template(path: Option<&Path>) -> Result<FormatTemplate> {
    match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("open template file {}", path.display()))?;
            let template: FormatTemplate = serde_json::from_reader(file)
                .with_context(|| format!("parse template from {}", path.display()))?;
            template
                .validate()
                .with_context(|| format!("validate template from {}", path.display()))?;
            Ok(template)
        }
        None => Ok(FormatTemplate::default()),
    }
}
