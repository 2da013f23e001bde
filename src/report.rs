//! Report Module
//!
//! Turns an [`AggregationResult`] into table rows and drives a full inspection
//! run: open store → native stats → single scan → table.

use std::io::Write;
use std::time::Instant;

use comfy_table::presets::{ASCII_FULL, UTF8_FULL};
use comfy_table::{CellAlignment, Table};
use tracing::info;

use crate::config::{Config, TableStyle};
use crate::error::{KeyspaceError, Result};
use crate::stats::{aggregate, format_bytes, AggregationResult};
use crate::storage::Store;

/// Column titles, in display order
pub const HEADER: [&str; 6] = [
    "Module",
    "Avg Key Size",
    "Avg Value Size",
    "Total Key Size",
    "Total Value Size",
    "Total Key Pairs",
];

/// Label of the synthetic totals row
pub const TOTAL_LABEL: &str = "Total";

/// One displayed table row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub label: String,
    /// Empty on the totals row
    pub avg_key_size: String,
    /// Empty on the totals row
    pub avg_value_size: String,
    pub total_key_size: String,
    pub total_value_size: String,
    pub count: u64,
}

impl Row {
    /// Cells in [`HEADER`] order
    pub fn cells(&self) -> [String; 6] {
        [
            self.label.clone(),
            self.avg_key_size.clone(),
            self.avg_value_size.clone(),
            self.total_key_size.clone(),
            self.total_value_size.clone(),
            self.count.to_string(),
        ]
    }
}

/// One row per namespace, sorted by label (byte-wise ascending)
pub fn rows(result: &AggregationResult) -> Vec<Row> {
    let mut namespaces: Vec<_> = result.namespaces().iter().collect();
    namespaces.sort_unstable_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

    namespaces
        .into_iter()
        .map(|(label, stats)| Row {
            label: label.clone(),
            avg_key_size: format_bytes(stats.avg_key_size()),
            avg_value_size: format_bytes(stats.avg_value_size()),
            total_key_size: format_bytes(stats.key_bytes),
            total_value_size: format_bytes(stats.value_bytes),
            count: stats.count,
        })
        .collect()
}

/// Grand totals; averages are left blank
pub fn total_row(result: &AggregationResult) -> Row {
    let total = result.total();
    Row {
        label: TOTAL_LABEL.to_string(),
        avg_key_size: String::new(),
        avg_value_size: String::new(),
        total_key_size: format_bytes(total.key_bytes),
        total_value_size: format_bytes(total.value_bytes),
        count: total.count,
    }
}

/// Render header, body and footer as a table
pub fn render_table<W: Write>(
    header: &[&str],
    body: &[Row],
    footer: &Row,
    style: TableStyle,
    out: &mut W,
) -> Result<()> {
    let mut table = Table::new();
    table.load_preset(match style {
        TableStyle::Utf8 => UTF8_FULL,
        TableStyle::Ascii => ASCII_FULL,
    });
    table.set_header(header.iter().copied());

    for row in body.iter().chain(std::iter::once(footer)) {
        table.add_row(row.cells());
    }

    for index in 1..header.len() {
        if let Some(column) = table.column_mut(index) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }

    writeln!(out, "{table}")?;
    Ok(())
}

/// Write the namespace table for a finished aggregation
pub fn write_report<W: Write>(result: &AggregationResult, style: TableStyle, out: &mut W) -> Result<()> {
    render_table(&HEADER, &rows(result), &total_row(result), style, out)
}

/// Inspect the store at `config.data_dir` and print its report to `out`
///
/// Prints the native stats first, then the table. The store is closed before
/// returning on every path.
pub fn run<W: Write>(config: &Config, out: &mut W) -> Result<AggregationResult> {
    let mut store = Store::open(config)?;

    let native = store.native_stats()?;
    writeln!(out, "{}", native)?;
    writeln!(out)?;

    let data_dir = store.data_dir().to_path_buf();
    let started = Instant::now();
    let records = store
        .records()
        .map_err(|e| KeyspaceError::Iteration(e.to_string()))?;
    let result = aggregate(records).map_err(|e| KeyspaceError::Iteration(e.to_string()))?;
    drop(store);

    info!(
        data_dir = %data_dir.display(),
        records = result.total().count,
        namespaces = result.namespaces().len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "scan complete"
    );

    write_report(&result, config.table_style, out)?;
    Ok(result)
}
