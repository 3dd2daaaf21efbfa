use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use flat_scout::config::{load_config, Config};
use flat_scout::scrapers::{scraper_for, DomRiaScraper, Summary};
use flat_scout::Source;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Run marketplace extractors over saved pages and print the result as JSON
#[derive(Parser, Debug)]
#[command(name = "flat-scout", version)]
struct Cli {
    /// TOML file overriding default selectors and currencies
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read the pagination boundary off a listing page
    Stop {
        #[arg(long, value_enum)]
        source: Marketplace,
        markup: PathBuf,
    },
    /// List the offer stubs of a listing page
    Page {
        #[arg(long, value_enum)]
        source: Marketplace,
        markup: PathBuf,
    },
    /// Extract a flat from a detail page
    Offer {
        #[arg(long, value_enum)]
        source: Marketplace,
        #[arg(long)]
        url: String,
        markup: PathBuf,
        /// JSON stub from `page` carrying card-only fields
        #[arg(long)]
        summary: Option<PathBuf>,
    },
    /// Print the canonical URL a DOM.RIA detail page declares
    Junk {
        #[arg(long)]
        url: String,
        markup: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Marketplace {
    Olx,
    DomRia,
}

impl From<Marketplace> for Source {
    fn from(marketplace: Marketplace) -> Self {
        match marketplace {
            Marketplace::Olx => Source::Olx,
            Marketplace::DomRia => Source::DomRia,
        }
    }
}

async fn read(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

fn print<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr, stdout carries only JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => load_config(path),
        None => Config::default(),
    };

    match cli.command {
        Command::Stop { source, markup } => {
            let scraper = scraper_for(source.into(), &config)?;
            let markup = read(&markup).await?;
            print(&scraper.detect_boundary(Some(&markup)))?;
        }
        Command::Page { source, markup } => {
            let scraper = scraper_for(source.into(), &config)?;
            let markup = read(&markup).await?;
            print(&scraper.enumerate_page(Some(&markup)))?;
        }
        Command::Offer {
            source,
            url,
            markup,
            summary,
        } => {
            let scraper = scraper_for(source.into(), &config)?;
            let mut stub = match summary {
                Some(path) => serde_json::from_str::<Summary>(&read(&path).await?)
                    .with_context(|| format!("Invalid summary in {}", path.display()))?,
                None => Summary::default(),
            };
            stub.url = url;
            let offer = stub.merge(read(&markup).await?);

            let flat = scraper.extract_offer(Some(&offer));
            if flat.is_none() {
                info!(
                    "No {} offer could be extracted from {}",
                    scraper.source().name(),
                    markup.display()
                );
            }
            print(&flat)?;
        }
        Command::Junk { url, markup } => {
            let scraper = DomRiaScraper::new(&config.dom_ria)?;
            let offer = Summary::new(url).merge(read(&markup).await?);
            print(&scraper.detect_junk(Some(&offer)))?;
        }
    }

    Ok(())
}
