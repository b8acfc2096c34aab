//! Command implementations.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::{debug, info};

use labclip_core::process_records;
use labclip_format::render;
use labclip_model::{HeaderField, ItemField, LayoutMode};

use crate::cli::{LayoutModeArg, ProcessArgs, RenderArgs};
use crate::ingest::{load_config, load_records, load_template};
use crate::summary::{apply_table_style, print_summary};

pub fn run_process(args: &ProcessArgs) -> Result<()> {
    let records = load_records(&args.records)?;
    let config = load_config(args.config.as_deref())?;
    debug!(records = records.len(), "loaded raw records");

    let groups = process_records(&records, &config);
    info!(
        records = records.len(),
        groups = groups.len(),
        "normalized records into groups"
    );

    let json = if args.pretty {
        serde_json::to_string_pretty(&groups).context("serialize groups")?
    } else {
        serde_json::to_string(&groups).context("serialize groups")?
    };
    write_output(args.output.as_deref(), &json)?;
    if !args.no_summary {
        print_summary(&groups);
    }
    Ok(())
}

pub fn run_render(args: &RenderArgs) -> Result<()> {
    let records = load_records(&args.records)?;
    let config = load_config(args.config.as_deref())?;
    let mut template = load_template(args.template.as_deref())?;
    if let Some(mode) = args.mode {
        template.mode = match mode {
            LayoutModeArg::Vertical => LayoutMode::Vertical,
            LayoutModeArg::Horizontal => LayoutMode::Horizontal,
        };
    }

    let groups = process_records(&records, &config);
    info!(
        records = records.len(),
        groups = groups.len(),
        mode = %template.mode,
        "rendering groups"
    );
    let text = render(&groups, &template);
    write_output(args.output.as_deref(), &text)?;
    Ok(())
}

pub fn run_tokens() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Section", "Field", "Emits"]);
    apply_table_style(&mut table);
    for field in HeaderField::ALL {
        table.add_row(vec!["header", field.as_str(), header_field_help(field)]);
    }
    for field in ItemField::ALL {
        table.add_row(vec!["item", field.as_str(), item_field_help(field)]);
    }
    println!("{table}");
    Ok(())
}

fn header_field_help(field: HeaderField) -> &'static str {
    match field {
        HeaderField::Date => "group date as YYYY/MM/DD",
        HeaderField::Facility => "reporting facility name",
        HeaderField::DiagnosisCode => "first-seen diagnosis code",
        HeaderField::DiagnosisName => "first-seen diagnosis name",
    }
}

fn item_field_help(field: ItemField) -> &'static str {
    match field {
        ItemField::ItemName => "short label, or raw item name when none resolved",
        ItemField::OrderCode => "order code of the test",
        ItemField::Value => "normalized value (merged range for repeat readings)",
        ItemField::Unit => "reported unit",
        ItemField::ReferenceDisplay => "resolved range: min-max, >min, <max, or empty",
    }
}

fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => fs::write(path, content)
            .with_context(|| format!("write output to {}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{content}").context("write output to stdout")
        }
    }
}
