//! bullion-compare - Bullion price comparison across retailer pages
//!
//! Reads a product sheet, extracts per-unit prices from each retailer page,
//! and reports how competitors compare with the reference retailer.

use anyhow::Result;
use bullion_compare::commands::{CompareCommand, ExtractCommand, SpotCommand};
use bullion_compare::config::{Config, OutputFormat};
use bullion_compare::format::Formatter;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "bullion-compare",
    version,
    about = "Compare bullion prices across retailers",
    long_about = "Extracts per-unit prices from gold and silver retailer pages and compares competitors against a reference retailer."
)]
struct Cli {
    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "BULLION_PROXY")]
    proxy: Option<String>,

    /// Delay between requests in milliseconds
    #[arg(long, global = true, env = "BULLION_DELAY")]
    delay: Option<u64>,

    /// Per-request timeout in seconds
    #[arg(long, global = true, env = "BULLION_TIMEOUT")]
    timeout: Option<u64>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare every product in a CSV sheet
    #[command(alias = "c")]
    Compare {
        /// Product sheet (one column per product)
        sheet: PathBuf,

        /// Page quoting gold and silver spot prices
        #[arg(long, env = "BULLION_SPOT_URL")]
        spot_url: Option<String>,
    },

    /// Extract the price and quantity from a single page
    #[command(alias = "x")]
    Extract {
        /// Retailer page URL
        url: String,

        /// Prefer VAT-inclusive prices
        #[arg(long)]
        tax_included: bool,
    },

    /// Show current gold and silver spot prices
    Spot {
        /// Spot price page (defaults to spot_price_url from config)
        url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }
    if let Some(delay) = cli.delay {
        config.delay_ms = delay;
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_secs = timeout;
    }
    if let Some(format) = cli.format {
        config.format = format;
    }

    let formatter = Formatter::new(config.format);

    match cli.command {
        Commands::Compare { sheet, spot_url } => {
            if let Some(url) = spot_url {
                config.spot_price_url = Some(url);
            }

            let report = CompareCommand::new(config).execute(&sheet).await?;

            for warning in &report.warnings {
                eprintln!("Warning: {}", warning);
            }
            println!("{}", formatter.format_report(&report));
        }

        Commands::Extract { url, tax_included } => {
            let page = ExtractCommand::new(config).execute(&url, tax_included).await?;
            println!("{}", formatter.format_page(&page));
        }

        Commands::Spot { url } => {
            let spot = SpotCommand::new(config).execute(url.as_deref()).await?;
            println!("{}", formatter.format_spot(&spot));
        }
    }

    Ok(())
}
