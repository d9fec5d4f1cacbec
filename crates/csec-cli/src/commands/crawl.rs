//! Crawl command - extract every product on the certificate listing.

use std::path::PathBuf;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use csec_core::{CrawlEvent, Crawler};

use super::load_config;
use crate::fetch::HttpFetcher;
use crate::output::{OutputFormat, write_records};

/// Arguments for the crawl command.
#[derive(Args)]
pub struct CrawlArgs {
    /// Output file (default: from config or CSEC_OUT)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (default: from config)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Listing page to start from (default: from config or CSEC_URL)
    #[arg(long)]
    listing_url: Option<String>,

    /// Abort on the first detail page that fails
    #[arg(long)]
    fail_fast: bool,

    /// Also write the failed URLs to this CSV file
    #[arg(long)]
    failures: Option<PathBuf>,
}

pub async fn run(args: CrawlArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(url) = args.listing_url {
        config.crawl.listing_url = url;
    }
    if args.fail_fast {
        config.crawl.continue_on_error = false;
    }
    let output_path = args.output.unwrap_or_else(|| config.output.path.clone());
    let format = args.format.unwrap_or_else(|| config.output.format.into());

    let fetcher = HttpFetcher::new(&config.crawl)?;
    let crawler = Crawler::new(&config)?;

    println!(
        "{} Crawling {}",
        style("ℹ").blue(),
        config.crawl.listing_url
    );

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=>-"),
    );

    let report = crawler
        .run_with_progress(&fetcher, |event| match event {
            CrawlEvent::LinksCollected(count) => pb.set_length(count as u64),
            CrawlEvent::Started(link) => pb.set_message(link.name.clone()),
            CrawlEvent::Finished { .. } => pb.inc(1),
        })
        .await;
    pb.finish_and_clear();
    let report = report?;

    write_records(&output_path, &report.records, format)?;
    info!("Wrote {} record(s) to {}", report.records.len(), output_path.display());

    if let Some(failures_path) = &args.failures {
        let mut wtr = csv::Writer::from_path(failures_path)?;
        wtr.write_record(["url", "error"])?;
        for failure in &report.failures {
            wtr.write_record([&failure.url, &failure.error])?;
        }
        wtr.flush()?;
    }

    let elapsed = report.elapsed();
    println!();
    println!(
        "{} Saved {} rows to {}",
        style("✓").green(),
        report.records.len(),
        output_path.display()
    );
    if !report.failures.is_empty() {
        println!(
            "{} {} product page(s) failed:",
            style("⚠").yellow(),
            report.failures.len()
        );
        for failure in &report.failures {
            println!("  - {}: {}", failure.url, failure.error);
        }
    }
    println!(
        "   Elapsed: {}.{:03}s",
        elapsed.num_seconds(),
        elapsed.num_milliseconds() % 1000
    );

    Ok(())
}
