use std::path::PathBuf;
use std::process::ExitCode;

use bn_core::Result;
use bn_scraper::{BelvedereSource, NewsSource};
use chrono::Utc;
use clap::Parser;
use tracing::{info, Level};

const PREVIEW_TITLES: usize = 5;

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate an RSS feed from the City of Belvedere news page", long_about = None)]
struct Cli {
    /// Where to write the feed
    #[arg(default_value = "belvedere_news.xml")]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let cli = Cli::parse();
    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Failed to generate RSS feed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let source = BelvedereSource::new()?;

    let articles = source.fetch_articles().await?;
    info!("Found {} articles", articles.len());
    for article in articles.iter().take(PREVIEW_TITLES) {
        info!("- {}", article.title);
    }
    if articles.len() > PREVIEW_TITLES {
        info!("... and {} more", articles.len() - PREVIEW_TITLES);
    }

    // A page with no recognizable articles still produces a valid
    // channel-only feed; only fetch and write failures abort the run.
    let feed = bn_feed::render(&source.channel(), &articles, Utc::now())?;
    bn_feed::write_to(&cli.output, &feed)?;
    info!("RSS feed saved to {}", cli.output.display());

    Ok(())
}
