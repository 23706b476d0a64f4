//! Loads the product sheet: one column per product.
//!
//! Header cell is the product name, the first cell below it labels the
//! reference retailer, the second holds the reference URL, and every
//! further cell is a competitor URL. CSV files and Excel workbooks share
//! this layout; workbooks are read from their first sheet.

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// Extensions read as spreadsheets rather than CSV.
const WORKBOOK_EXTENSIONS: [&str; 4] = ["xlsx", "xlsm", "xls", "ods"];

/// URLs to compare for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRow {
    pub product_name: String,
    pub reference_url: String,
    pub competitor_urls: Vec<String>,
}

/// Reads a product sheet, choosing CSV or workbook parsing by file extension.
pub fn load_sheet(path: impl AsRef<Path>) -> Result<Vec<ProductRow>> {
    let path = path.as_ref();
    debug!("Loading product sheet from: {}", path.display());

    let is_workbook = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| WORKBOOK_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));

    if is_workbook {
        return load_workbook(path);
    }

    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open sheet: {}", path.display()))?;

    parse_sheet(file).with_context(|| format!("Failed to parse sheet: {}", path.display()))
}

/// Parses a product sheet from CSV data.
pub fn parse_sheet(reader: impl Read) -> Result<Vec<ProductRow>> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).trim(csv::Trim::All).from_reader(reader);

    let headers: Vec<String> =
        rdr.headers().context("Missing header row")?.iter().map(str::to_string).collect();

    let mut records = Vec::new();
    for (line, record) in rdr.records().enumerate() {
        let record = record.with_context(|| format!("Invalid record on data line {}", line + 1))?;
        records.push(record.iter().map(str::to_string).collect());
    }

    Ok(rows_from_grid(&headers, records))
}

/// Reads the first sheet of an Excel or OpenDocument workbook.
fn load_workbook(path: &Path) -> Result<Vec<ProductRow>> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open sheet: {}", path.display()))?;

    let range = workbook
        .worksheet_range_at(0)
        .with_context(|| format!("Workbook has no sheets: {}", path.display()))?
        .with_context(|| format!("Failed to parse sheet: {}", path.display()))?;

    let mut grid = range.rows().map(|row| row.iter().map(cell_text).collect::<Vec<_>>());
    let headers = grid.next().context("Missing header row")?;

    Ok(rows_from_grid(&headers, grid))
}

fn cell_text(cell: &Data) -> String {
    cell.to_string().trim().to_string()
}

/// Transposes header + record rows into one `ProductRow` per column.
fn rows_from_grid(
    headers: &[String],
    records: impl IntoIterator<Item = Vec<String>>,
) -> Vec<ProductRow> {
    let mut columns: Vec<Vec<String>> = vec![Vec::new(); headers.len()];

    for record in records {
        for (column, cell) in columns.iter_mut().zip(record) {
            if !cell.is_empty() {
                column.push(cell);
            }
        }
    }

    let rows = headers
        .iter()
        .zip(columns)
        .filter_map(|(product, cells)| product_row(product, cells))
        .collect::<Vec<_>>();

    debug!("Loaded {} products", rows.len());
    rows
}

fn product_row(product: &str, cells: Vec<String>) -> Option<ProductRow> {
    if product.is_empty() {
        warn!("Skipping column without a product name");
        return None;
    }

    let mut cells = cells.into_iter().skip(1);
    let Some(reference_url) = cells.next() else {
        warn!("Skipping {}: no reference URL", product);
        return None;
    };

    let competitor_urls = cells
        .filter(|url| {
            let valid = url.starts_with("http");
            if !valid {
                debug!("Skipping non-URL competitor entry for {}: {}", product, url);
            }
            valid
        })
        .collect();

    Some(ProductRow { product_name: product.to_string(), reference_url, competitor_urls })
}
