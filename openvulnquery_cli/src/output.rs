use anyhow::{bail, Result};
use openvulnquery_api::types::{Advisory, AdvisoryFormat};
use serde_json::{Map, Value};
use tabled::builder::Builder;
use tabled::settings::Style;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

/// Columns shared by every advisory, in display order.
const COMMON_FIELDS: &[&str] = &[
    "advisory_id",
    "sir",
    "first_published",
    "last_updated",
    "cves",
    "bug_ids",
    "cvss_base_score",
    "advisory_title",
    "publication_url",
    "cwe",
    "product_names",
    "summary",
];

/// Columns only present on one format.
fn format_fields(format: AdvisoryFormat) -> &'static [&'static str] {
    match format {
        AdvisoryFormat::Cvrf => &["cvrf_url"],
        AdvisoryFormat::Oval => &["oval_url"],
        AdvisoryFormat::Ios => &["ios_release", "first_fixed"],
    }
}

/// Every column available for advisories of the given format.
pub fn available_fields(format: AdvisoryFormat) -> Vec<&'static str> {
    COMMON_FIELDS
        .iter()
        .chain(format_fields(format).iter())
        .copied()
        .collect()
}

/// Resolves `--fields` against the columns of the result format. An empty
/// selection means every column.
pub fn select_fields(format: AdvisoryFormat, requested: &[String]) -> Result<Vec<String>> {
    let available = available_fields(format);
    if requested.is_empty() {
        return Ok(available.iter().map(|f| f.to_string()).collect());
    }
    let mut selected = Vec::with_capacity(requested.len());
    for field in requested {
        let field = field.trim();
        if !available.contains(&field) {
            bail!(
                "unknown field '{}' for {} advisories; available: {}",
                field,
                format,
                available.join(", ")
            );
        }
        selected.push(field.to_string());
    }
    Ok(selected)
}

// -- Record builders --

fn build_records(advisories: &[Advisory], fields: &[String]) -> Result<Vec<Map<String, Value>>> {
    advisories
        .iter()
        .map(|advisory| -> Result<Map<String, Value>> {
            let mut value = serde_json::to_value(advisory)?;
            let map = value.as_object_mut().map(std::mem::take).unwrap_or_default();
            Ok(fields
                .iter()
                .map(|field| {
                    (
                        field.clone(),
                        map.get(field).cloned().unwrap_or(Value::Null),
                    )
                })
                .collect())
        })
        .collect()
}

fn build_rows(advisories: &[Advisory], fields: &[String]) -> Result<Vec<Vec<String>>> {
    Ok(build_records(advisories, fields)?
        .iter()
        .map(|record| {
            fields
                .iter()
                .map(|field| cell_text(record.get(field).unwrap_or(&Value::Null)))
                .collect()
        })
        .collect())
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(cell_text).collect::<Vec<_>>().join(";"),
        other => other.to_string(),
    }
}

// -- Output --

pub fn print_advisories(
    advisories: &[Advisory],
    fields: &[String],
    format: &OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Table => print_table(advisories, fields),
        OutputFormat::Json => print_json(&build_records(advisories, fields)?),
        OutputFormat::Csv => print_csv(advisories, fields),
    }
}

fn print_table(advisories: &[Advisory], fields: &[String]) -> Result<()> {
    let mut builder = Builder::default();
    builder.push_record(fields.iter().cloned());
    for row in build_rows(advisories, fields)? {
        builder.push_record(row);
    }
    let mut table = builder.build();
    table.with(Style::modern());
    println!("{}", table);
    Ok(())
}

fn print_csv(advisories: &[Advisory], fields: &[String]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    wtr.write_record(fields)?;
    for row in build_rows(advisories, fields)? {
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_json<T: serde::Serialize>(data: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}
