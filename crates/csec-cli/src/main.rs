//! CLI application for crawling CSEC certification records.

mod commands;
mod fetch;
mod output;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{config, crawl, detail, itsef};

/// CSEC certificates - Extract certification records from the CSEC registry
#[derive(Parser)]
#[command(name = "csec")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl the certificate listing and every product page
    Crawl(crawl::CrawlArgs),

    /// Extract a single product detail page
    Detail(detail::DetailArgs),

    /// Recover the ITSEF from a certification report PDF
    Itsef(itsef::ItsefArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Crawl(args) => crawl::run(args, cli.config.as_deref()).await,
        Commands::Detail(args) => detail::run(args, cli.config.as_deref()).await,
        Commands::Itsef(args) => itsef::run(args, cli.config.as_deref()).await,
        Commands::Config(args) => config::run(args).await,
    }
}
