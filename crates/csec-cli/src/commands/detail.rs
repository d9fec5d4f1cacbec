//! Detail command - extract a single product page.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use csec_core::{CanonicalField, DetailPage, PageFetcher, RecordExtractor};

use super::{is_url, load_config};
use crate::fetch::HttpFetcher;
use crate::output::{OutputFormat, format_records};

/// Arguments for the detail command.
#[derive(Args)]
pub struct DetailArgs {
    /// Detail page URL or saved HTML file
    #[arg(required = true)]
    input: String,

    /// Listing name to record for this product
    #[arg(long, default_value = "")]
    listing_name: String,

    /// Product URL to record when reading a saved file
    #[arg(long)]
    page_url: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Print the raw label/value pairs found in the HTML
    #[arg(long)]
    show_fields: bool,
}

pub async fn run(args: DetailArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let fetcher = HttpFetcher::new(&config.crawl)?;
    let extractor = RecordExtractor::new(&config)?;

    let (page_url, html) = if is_url(&args.input) {
        let html = fetcher.fetch_page(&args.input).await?;
        (args.input.clone(), html)
    } else {
        let path = PathBuf::from(&args.input);
        if !path.exists() {
            anyhow::bail!("Input file not found: {}", path.display());
        }
        let html = fs::read_to_string(&path)?;
        (args.page_url.clone().unwrap_or_else(|| args.input.clone()), html)
    };
    info!("Extracting {}", page_url);

    let page = DetailPage::parse(page_url, &html);

    if args.show_fields {
        let fields = extractor.html().extract(&page);
        eprintln!("{}", style("Fields found in HTML:").bold());
        for field in CanonicalField::ALL {
            if let Some(value) = fields.get(field) {
                eprintln!("  {:<26} {}", field.header(), value.text);
            }
        }
        eprintln!();
    }

    let record = extractor.extract_record(&page, &args.listing_name, &fetcher).await;
    let output = format_records(std::slice::from_ref(&record), args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    Ok(())
}
