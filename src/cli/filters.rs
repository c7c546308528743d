//! Filters command handler.
//!
//! Lists the registered language filters in selection order.

use crate::filter::FilterRegistry;
use crate::pipeline::{write_output, OutputTarget};
use anyhow::Result;
use serde::Serialize;

#[derive(Serialize)]
struct FilterListing<'a> {
    name: &'a str,
    file_endings: &'a [String],
}

/// Render the filter list as an aligned table or as JSON.
pub fn render_filters(registry: &FilterRegistry, json: bool) -> Result<String> {
    let listings: Vec<FilterListing<'_>> = registry
        .iter()
        .map(|filter| FilterListing {
            name: filter.name(),
            file_endings: filter.file_endings(),
        })
        .collect();

    if json {
        return Ok(serde_json::to_string_pretty(&listings)?);
    }

    let width = listings
        .iter()
        .map(|l| l.name.len())
        .max()
        .unwrap_or(0)
        .max("FILTER".len());
    let mut lines = vec![format!("{:<width$}  ENDINGS", "FILTER")];
    for listing in &listings {
        let endings = if listing.file_endings.is_empty() {
            "(fallback)".to_string()
        } else {
            listing.file_endings.join(" ")
        };
        lines.push(format!("{:<width$}  {endings}", listing.name));
    }
    lines.push(String::new());
    Ok(lines.join("\n"))
}

/// Run the filters command.
pub fn run_filters(registry: &FilterRegistry, json: bool) -> Result<()> {
    let rendered = render_filters(registry, json)?;
    write_output(&rendered, &OutputTarget::Stdout, true)
}
