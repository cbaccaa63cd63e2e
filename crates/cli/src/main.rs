//! Binary entry point for the caption search tool.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use subscrape_core::caption::ParseOptions;
use subscrape_core::download::{download_captions, update_downloader};
use subscrape_core::render::{format_report, to_json};
use subscrape_core::timestamp::DEFAULT_LEAD_IN_SECS;
use subscrape_core::{CaptionSource, DirectorySource, MarkupPolicy, Query, SearchEngine, SearchError};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command line options for the binary.
#[derive(Parser)]
#[command(about = "Search downloaded caption tracks for a phrase and print timestamped links")]
struct Cli {
    /// Directory holding the `.vtt` caption files.
    #[arg(short, long, default_value = "vtt_files")]
    dir: PathBuf,

    /// Channel URL to download captions from when the directory has none.
    #[arg(long)]
    channel: Option<String>,

    /// Caption language to download.
    #[arg(long, default_value = "en")]
    lang: String,

    /// Also download captions for the channel's shorts.
    #[arg(long)]
    shorts: bool,

    /// Update yt-dlp before running.
    #[arg(long)]
    update: bool,

    /// Strip markup tags from caption lines instead of dropping tagged lines.
    #[arg(long)]
    strip_tags: bool,

    /// Seconds subtracted from each link so playback starts before the line.
    #[arg(long, default_value_t = DEFAULT_LEAD_IN_SECS)]
    lead_in: u64,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,

    /// Enable verbose debug and trace logs.
    #[arg(long)]
    debug: bool,

    /// Words to search for; joined with single spaces.
    #[arg(required = true, num_args = 1..)]
    query: Vec<String>,
}

/// Application entry point which parses CLI args and runs one search session.
fn main() -> Result<()> {
    let cli = Cli::parse();
    let filter = if cli.debug {
        EnvFilter::default()
            .add_directive("subscrape=trace".parse()?)
            .add_directive("subscrape_core=trace".parse()?)
            .add_directive("info".parse()?)
    } else {
        EnvFilter::default()
            .add_directive("subscrape=info".parse()?)
            .add_directive("subscrape_core=info".parse()?)
            .add_directive("warn".parse()?)
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let query = Query::new(cli.query.join(" "))?;
    if cli.update {
        update_downloader()?;
    }

    let source = DirectorySource::new(&cli.dir);
    if source.tracks()?.is_empty() {
        let Some(channel) = cli.channel.as_deref() else {
            return Err(SearchError::NoCaptionFiles {
                location: source.location(),
            }
            .into());
        };
        info!("no caption files in {}, downloading", cli.dir.display());
        download_captions(channel, &cli.lang, cli.shorts, &cli.dir)?;
    }

    let engine = SearchEngine::new(ParseOptions {
        markup: if cli.strip_tags {
            MarkupPolicy::Strip
        } else {
            MarkupPolicy::DropLine
        },
        lead_in_secs: cli.lead_in,
    });
    let report = engine.search(&source, &query)?;
    if cli.json {
        println!("{}", to_json(&report)?);
    } else {
        println!("\nSearching for '{}' in VTT captions:", query.as_str());
        println!("{}", format_report(&report));
    }
    Ok(())
}
