//! Itsef command - recover the evaluation facility from a certification report.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;

use csec_core::{ExtractionMode, IdentificationExtractor, PageFetcher};

use super::{is_url, load_config};
use crate::fetch::HttpFetcher;

/// Arguments for the itsef command.
#[derive(Args)]
pub struct ItsefArgs {
    /// Certification report PDF file or URL
    #[arg(required = true)]
    input: String,

    /// Recovery strategy: auto, text or layout
    #[arg(short, long, default_value = "auto")]
    mode: ExtractionMode,

    /// Label to look for instead of the configured one
    #[arg(long)]
    label: Option<String>,

    /// Print the identification section that text mode scans
    #[arg(long)]
    show_section: bool,
}

pub async fn run(args: ItsefArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(label) = args.label {
        config.pdf.target_label = label;
    }

    let data = if is_url(&args.input) {
        let fetcher = HttpFetcher::new(&config.crawl)?;
        fetcher.fetch_bytes(&args.input).await?
    } else {
        let path = PathBuf::from(&args.input);
        if !path.exists() {
            anyhow::bail!("Input file not found: {}", path.display());
        }
        fs::read(&path)?
    };

    let extractor = IdentificationExtractor::new(&config.pdf)?;

    if args.show_section {
        match extractor.section_text(&data) {
            Ok(section) => {
                eprintln!("{}", style("Identification section:").bold());
                eprintln!("{}", section.trim_end());
                eprintln!();
            }
            Err(e) => eprintln!("{} Could not read report text: {}", style("⚠").yellow(), e),
        }
    }

    let value = extractor.extract_with_mode(&data, args.mode);
    if value.is_empty() {
        anyhow::bail!(
            "No {} value found ({} mode)",
            config.pdf.target_label,
            args.mode
        );
    }

    println!("{}", value);
    Ok(())
}
