//! Output formatting for comparisons, page reports, and spot prices (table, JSON, markdown, CSV).

use crate::comparison::{CompareReport, ComparisonRow};
use crate::config::OutputFormat;
use crate::extract::PageReport;
use crate::spot::{Metal, SpotPriceSet};
use bigdecimal::BigDecimal;
use tracing::warn;

/// Formats results for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the rows of a comparison batch.
    ///
    /// Skipped-product warnings are not part of the output; callers report them separately.
    pub fn format_report(&self, report: &CompareReport) -> String {
        if report.is_empty() {
            return match self.format {
                OutputFormat::Json => self.json(report, "{}"),
                OutputFormat::Csv => write_csv(&REPORT_CSV_HEADER, Vec::<Vec<String>>::new()),
                _ => "No valid comparisons were extracted.".to_string(),
            };
        }

        match self.format {
            OutputFormat::Json => self.json(report, "{}"),
            OutputFormat::Table => self.table_rows(&report.rows),
            OutputFormat::Markdown => self.markdown_rows(&report.rows),
            OutputFormat::Csv => self.csv_rows(&report.rows),
        }
    }

    /// Formats the extraction of a single page.
    pub fn format_page(&self, page: &PageReport) -> String {
        match self.format {
            OutputFormat::Json => self.json(page, "{}"),
            OutputFormat::Table => self.table_page(page),
            OutputFormat::Markdown => self.markdown_page(page),
            OutputFormat::Csv => write_csv(
                &PAGE_CSV_HEADER,
                [vec![
                    page.url.clone(),
                    csv_price(page.total_price.as_ref()),
                    page.quantity.to_string(),
                    csv_price(page.unit_price.as_ref()),
                ]],
            ),
        }
    }

    /// Formats resolved spot prices.
    pub fn format_spot(&self, spot: &SpotPriceSet) -> String {
        match self.format {
            OutputFormat::Json => self.json(spot, "{}"),
            OutputFormat::Table => Metal::all()
                .iter()
                .map(|&m| format!("{:<8} {}", format!("{}:", m), price_or_na(spot.get(m))))
                .collect::<Vec<_>>()
                .join("\n"),
            OutputFormat::Markdown => {
                let mut lines = vec!["| Metal | Spot |".to_string(), "|-------|------|".to_string()];
                for &m in Metal::all() {
                    lines.push(format!("| {} | {} |", m, price_or_na(spot.get(m))));
                }
                lines.join("\n")
            }
            OutputFormat::Csv => write_csv(
                &SPOT_CSV_HEADER,
                Metal::all().iter().map(|&m| vec![m.to_string(), csv_price(spot.get(m))]),
            ),
        }
    }

    // JSON formatting

    fn json<T: serde::Serialize>(&self, value: &T, fallback: &str) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| fallback.to_string())
    }

    // Table formatting

    fn table_rows(&self, rows: &[ComparisonRow]) -> String {
        let product_width = 30;
        let price_width = 10;
        let pct_width = 8;

        let mut lines = Vec::new();

        lines.push(format!(
            "{:<product_width$}  {:>price_width$}  {:>price_width$}  {:>price_width$}  {:>price_width$}  {:>pct_width$}  {}",
            "Product", "Spot", "Reference", "Competitor", "Diff", "Diff %", "Competitor URL"
        ));
        lines.push(format!(
            "{:-<product_width$}  {:-<price_width$}  {:-<price_width$}  {:-<price_width$}  {:-<price_width$}  {:-<pct_width$}  {:-<40}",
            "", "", "", "", "", "", ""
        ));

        for row in rows {
            lines.push(format!(
                "{:<product_width$}  {:>price_width$}  {:>price_width$}  {:>price_width$}  {:>price_width$}  {:>pct_width$}  {}",
                truncate(&row.product, product_width),
                price_or_na(row.spot_price.as_ref()),
                format_price(&row.reference_price),
                price_or_na(row.competitor_price.as_ref()),
                price_or_na(row.difference.as_ref()),
                percent_or_na(row.percent_difference.as_ref()),
                row.competitor_url
            ));
        }

        lines.push(String::new());
        lines.push(format!("Total: {} comparisons", rows.len()));

        lines.join("\n")
    }

    fn table_page(&self, page: &PageReport) -> String {
        let vat = if page.prefer_tax_included { "preferred" } else { "ignored" };
        [
            format!("URL:         {}", page.url),
            format!("Price:       {}", price_or_na(page.total_price.as_ref())),
            format!("Quantity:    {}", page.quantity),
            format!("Unit price:  {}", price_or_na(page.unit_price.as_ref())),
            format!("VAT prices:  {}", vat),
        ]
        .join("\n")
    }

    // Markdown formatting

    fn markdown_rows(&self, rows: &[ComparisonRow]) -> String {
        let mut lines = Vec::new();

        lines.push("| Product | Spot | Reference | Competitor | Diff | Diff % | Link |".to_string());
        lines.push("|---------|------|-----------|------------|------|--------|------|".to_string());

        for row in rows {
            lines.push(format!(
                "| {} | {} | {} | {} | {} | {} | [competitor]({}) |",
                row.product,
                price_or_na(row.spot_price.as_ref()),
                format_price(&row.reference_price),
                price_or_na(row.competitor_price.as_ref()),
                price_or_na(row.difference.as_ref()),
                percent_or_na(row.percent_difference.as_ref()),
                row.competitor_url
            ));
        }

        lines.push(String::new());
        lines.push(format!("*{} comparisons*", rows.len()));

        lines.join("\n")
    }

    fn markdown_page(&self, page: &PageReport) -> String {
        [
            format!("## {}", page.url),
            String::new(),
            format!("- **Price:** {}", price_or_na(page.total_price.as_ref())),
            format!("- **Quantity:** {}", page.quantity),
            format!("- **Unit price:** {}", price_or_na(page.unit_price.as_ref())),
        ]
        .join("\n")
    }

    // CSV formatting

    fn csv_rows(&self, rows: &[ComparisonRow]) -> String {
        let records = rows.iter().map(|row| {
            vec![
                row.product.clone(),
                csv_price(row.spot_price.as_ref()),
                format_price(&row.reference_price),
                csv_price(row.competitor_price.as_ref()),
                csv_price(row.difference.as_ref()),
                csv_price(row.percent_difference.as_ref()),
                row.reference_url.clone(),
                row.competitor_url.clone(),
            ]
        });

        write_csv(&REPORT_CSV_HEADER, records)
    }
}

const REPORT_CSV_HEADER: [&str; 8] = [
    "product",
    "spot_price",
    "reference_price",
    "competitor_price",
    "difference",
    "percent_difference",
    "reference_url",
    "competitor_url",
];

const PAGE_CSV_HEADER: [&str; 4] = ["url", "total_price", "quantity", "unit_price"];

const SPOT_CSV_HEADER: [&str; 2] = ["metal", "spot_price"];

/// Writes a header and records as RFC 4180 CSV, without a trailing newline.
fn write_csv(header: &[&str], records: impl IntoIterator<Item = Vec<String>>) -> String {
    try_write_csv(header, records).unwrap_or_else(|e| {
        warn!("Failed to write CSV output: {}", e);
        header.join(",")
    })
}

fn try_write_csv(
    header: &[&str],
    records: impl IntoIterator<Item = Vec<String>>,
) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(header)?;
    for record in records {
        wtr.write_record(&record)?;
    }

    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    let text = String::from_utf8(bytes)?;
    Ok(text.trim_end_matches(['\r', '\n']).to_string())
}

/// Renders a price with exactly two decimals.
fn format_price(price: &BigDecimal) -> String {
    price.round(2).with_scale(2).to_string()
}

fn price_or_na(price: Option<&BigDecimal>) -> String {
    price.map(format_price).unwrap_or_else(|| "N/A".to_string())
}

fn percent_or_na(pct: Option<&BigDecimal>) -> String {
    pct.map(|p| format!("{}%", format_price(p))).unwrap_or_else(|| "N/A".to_string())
}

fn csv_price(price: Option<&BigDecimal>) -> String {
    price.map(format_price).unwrap_or_default()
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let head: String = s.chars().take(width - 3).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{ExtractionResult, Quantity};
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn make_report() -> CompareReport {
        CompareReport {
            spot: SpotPriceSet { gold: Some(dec("1823.45")), silver: None },
            rows: vec![
                ComparisonRow::new(
                    "1oz Gold Britannia",
                    Some(dec("1823.45")),
                    dec("1900"),
                    Some(dec("1950")),
                    "https://ref.example/gold",
                    "https://a.example/gold",
                ),
                ComparisonRow::new(
                    "1oz Gold Britannia",
                    Some(dec("1823.45")),
                    dec("1900"),
                    None,
                    "https://ref.example/gold",
                    "https://b.example/gold",
                ),
            ],
            warnings: vec!["Could not extract reference price for Silver Bar".to_string()],
        }
    }

    fn make_page() -> PageReport {
        let result = ExtractionResult {
            total_price: Some(dec("750")),
            quantity: Quantity::from_inferred(25).unwrap(),
        };
        PageReport::new("https://shop.example/tube", false, result)
    }

    #[test]
    fn test_format_price_two_decimals() {
        assert_eq!(format_price(&dec("29")), "29.00");
        assert_eq!(format_price(&dec("4.5")), "4.50");
        assert_eq!(format_price(&dec("2.6315")), "2.63");
        assert_eq!(price_or_na(None), "N/A");
        assert_eq!(csv_price(None), "");
    }

    #[test]
    fn test_table_report() {
        let output = Formatter::new(OutputFormat::Table).format_report(&make_report());

        assert!(output.contains("Product"));
        assert!(output.contains("Competitor URL"));
        assert!(output.contains("1oz Gold Britannia"));
        assert!(output.contains("1823.45"));
        assert!(output.contains("1950.00"));
        assert!(output.contains("50.00"));
        assert!(output.contains("2.63%"));
        assert!(output.contains("N/A"));
        assert!(output.contains("Total: 2 comparisons"));
        assert!(!output.contains("Silver Bar"));
    }

    #[test]
    fn test_table_long_product_truncated() {
        let mut report = make_report();
        report.rows[0].product = "A".repeat(60);

        let output = Formatter::new(OutputFormat::Table).format_report(&report);
        assert!(output.contains("..."));
        assert!(!output.contains(&"A".repeat(31)));
    }

    #[test]
    fn test_empty_report() {
        let report = CompareReport::default();

        let table = Formatter::new(OutputFormat::Table).format_report(&report);
        assert_eq!(table, "No valid comparisons were extracted.");

        let markdown = Formatter::new(OutputFormat::Markdown).format_report(&report);
        assert_eq!(markdown, "No valid comparisons were extracted.");

        let csv = Formatter::new(OutputFormat::Csv).format_report(&report);
        assert!(csv.starts_with("product,spot_price"));
        assert_eq!(csv.lines().count(), 1);

        let json = Formatter::new(OutputFormat::Json).format_report(&report);
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(parsed["rows"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_json_report() {
        let output = Formatter::new(OutputFormat::Json).format_report(&make_report());
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(parsed["rows"].as_array().unwrap().len(), 2);
        assert_eq!(parsed["rows"][0]["product"], "1oz Gold Britannia");
        assert!(parsed["rows"][1]["competitor_price"].is_null());
        assert_eq!(parsed["warnings"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_markdown_report() {
        let output = Formatter::new(OutputFormat::Markdown).format_report(&make_report());

        assert!(output.contains("| Product | Spot |"));
        assert!(output.contains("[competitor](https://a.example/gold)"));
        assert!(output.contains("| N/A |"));
        assert!(output.contains("*2 comparisons*"));
    }

    #[test]
    fn test_csv_report() {
        let output = Formatter::new(OutputFormat::Csv).format_report(&make_report());
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "product,spot_price,reference_price,competitor_price,difference,percent_difference,reference_url,competitor_url"
        );
        assert_eq!(
            lines[1],
            "1oz Gold Britannia,1823.45,1900.00,1950.00,50.00,2.63,https://ref.example/gold,https://a.example/gold"
        );
        assert_eq!(
            lines[2],
            "1oz Gold Britannia,1823.45,1900.00,,,,https://ref.example/gold,https://b.example/gold"
        );
    }

    #[test]
    fn test_csv_quotes_special_fields() {
        let mut report = make_report();
        report.rows.truncate(1);
        report.rows[0].product = "Gold, 1oz \"Britannia\"".to_string();
        report.rows[0].competitor_url = "https://a.example/gold?a=1,2".to_string();

        let output = Formatter::new(OutputFormat::Csv).format_report(&report);
        let line = output.lines().nth(1).unwrap();
        assert!(line.starts_with("\"Gold, 1oz \"\"Britannia\"\"\",1823.45,"));
        assert!(line.ends_with(",\"https://a.example/gold?a=1,2\""));

        // Output reads back with the same csv implementation
        let mut rdr = csv::Reader::from_reader(output.as_bytes());
        let record = rdr.records().next().unwrap().unwrap();
        assert_eq!(&record[0], "Gold, 1oz \"Britannia\"");
        assert_eq!(&record[7], "https://a.example/gold?a=1,2");
    }

    #[test]
    fn test_write_csv_without_records() {
        assert_eq!(write_csv(&SPOT_CSV_HEADER, Vec::<Vec<String>>::new()), "metal,spot_price");
    }

    #[test]
    fn test_format_page() {
        let page = make_page();

        let table = Formatter::new(OutputFormat::Table).format_page(&page);
        assert!(table.contains("Price:       750.00"));
        assert!(table.contains("Quantity:    25"));
        assert!(table.contains("Unit price:  30.00"));

        let csv = Formatter::new(OutputFormat::Csv).format_page(&page);
        assert_eq!(csv, "url,total_price,quantity,unit_price\nhttps://shop.example/tube,750.00,25,30.00");

        let json = Formatter::new(OutputFormat::Json).format_page(&page);
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["quantity"], 25);

        let markdown = Formatter::new(OutputFormat::Markdown).format_page(&page);
        assert!(markdown.contains("- **Unit price:** 30.00"));
    }

    #[test]
    fn test_format_spot() {
        let spot = SpotPriceSet { gold: Some(dec("1823.45")), silver: None };

        let table = Formatter::new(OutputFormat::Table).format_spot(&spot);
        assert!(table.contains("1823.45"));
        assert!(table.contains("N/A"));

        let csv = Formatter::new(OutputFormat::Csv).format_spot(&spot);
        assert_eq!(csv, "metal,spot_price\ngold,1823.45\nsilver,");
    }

    #[test]
    fn test_format_all_formats_non_empty() {
        let report = make_report();
        for format in [OutputFormat::Table, OutputFormat::Json, OutputFormat::Markdown, OutputFormat::Csv] {
            let formatter = Formatter::new(format);
            assert!(!formatter.format_report(&report).is_empty());
            assert!(!formatter.format_page(&make_page()).is_empty());
            assert!(!formatter.format_spot(&report.spot).is_empty());
        }
    }
}
