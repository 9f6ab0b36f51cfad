//! Schema generation, data generation, and export commands.

use std::path::{Path, PathBuf};

use crate::api::{ModelType, Row};
use crate::commands::display;
use crate::commands::AppContext;
use crate::error::{Result, SynthError};
use crate::export::{write_export, ExportFormat};
use crate::workflow::{apply_schema_edit, run_data_step, run_schema_step, DataForm, SchemaForm};

/// File the schema command writes when `--out` is not given
pub const DEFAULT_SCHEMA_FILE: &str = "schema.json";

/// Resolve a `--model` argument, falling back to the configured default
fn resolve_model(ctx: &AppContext, model: Option<&str>) -> Result<ModelType> {
    match model {
        Some(m) => Ok(m.parse()?),
        None => ctx.config.defaults.model_type(),
    }
}

/// Generate a schema and save it as editable JSON
pub async fn generate_schema(
    ctx: &AppContext,
    description: &str,
    model: Option<&str>,
    columns: Option<u32>,
    out: Option<PathBuf>,
) -> Result<()> {
    let form = SchemaForm {
        description: description.to_string(),
        model: Some(resolve_model(ctx, model)?),
        column_count: columns.unwrap_or(ctx.config.defaults.column_count),
    };

    let outcome = run_schema_step(&ctx.client, &ctx.tracker, &form).await?;
    display::print_notifications(&outcome.notifications);
    display::print_schema(&outcome.response);

    let path = out.unwrap_or_else(|| PathBuf::from(DEFAULT_SCHEMA_FILE));
    std::fs::write(&path, serde_json::to_string_pretty(&outcome.response)?)?;
    println!(
        "Saved schema to {}. Edit it if needed, then run `synthdata data --schema {}`.",
        path.display(),
        path.display()
    );
    Ok(())
}

/// Generate rows for a (possibly hand-edited) schema file and export them
pub async fn generate_data(
    ctx: &AppContext,
    schema_path: &Path,
    model: Option<&str>,
    rows: Option<u32>,
    format: &str,
    out: Option<PathBuf>,
) -> Result<()> {
    let format: ExportFormat = format.parse()?;
    let text = std::fs::read_to_string(schema_path).map_err(|e| {
        SynthError::Validation(format!("Cannot read {}: {}", schema_path.display(), e))
    })?;
    let schema = apply_schema_edit(&text)?;

    let form = DataForm {
        model: Some(resolve_model(ctx, model)?),
        row_count: rows.unwrap_or(ctx.config.defaults.row_count),
    };

    let outcome = run_data_step(&ctx.client, &ctx.tracker, &schema, &form).await?;
    display::print_notifications(&outcome.notifications);
    display::print_rows_preview(&outcome.response.data);

    let path = out.unwrap_or_else(|| PathBuf::from(format.default_file_name()));
    write_export(&outcome.response.data, format, &path)?;
    println!("Saved {} to {}", format.to_string().to_uppercase(), path.display());
    Ok(())
}

/// Convert saved rows to another format
pub fn export(input: &Path, format: &str, out: Option<PathBuf>) -> Result<()> {
    let format: ExportFormat = format.parse()?;
    let text = std::fs::read_to_string(input)
        .map_err(|e| SynthError::Validation(format!("Cannot read {}: {}", input.display(), e)))?;
    let rows = parse_rows(&text)?;

    match out {
        Some(path) => {
            write_export(&rows, format, &path)?;
            println!("Saved {} to {}", format.to_string().to_uppercase(), path.display());
        }
        None => print!("{}", format.render(&rows)?),
    }
    Ok(())
}

/// Accept either a bare array of row objects or a full data response
pub fn parse_rows(text: &str) -> Result<Vec<Row>> {
    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|_| SynthError::Validation("Invalid JSON format".to_string()))?;

    let items = match &value {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(obj) => match obj.get("data") {
            Some(serde_json::Value::Array(items)) => items,
            _ => return Err(not_rows().into()),
        },
        _ => return Err(not_rows().into()),
    };

    items
        .iter()
        .map(|item| {
            item.as_object()
                .cloned()
                .ok_or_else(|| anyhow::Error::from(not_rows()))
        })
        .collect()
}

fn not_rows() -> SynthError {
    SynthError::Validation(
        "Expected a JSON array of row objects or a data response".to_string(),
    )
}
