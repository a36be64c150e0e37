use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use youtube_transcript_extractor::cli::{Cli, Commands, OutputFormat};
use youtube_transcript_extractor::config::Config;
use youtube_transcript_extractor::transcript::{ResultStore, TranscriptSettings, Transcriptor};
use youtube_transcript_extractor::{input, output, resolver, YoutubeCaptionService};

/// Options of the `extract` command after merging with the config file
struct ExtractOptions {
    urls: Vec<String>,
    input: Option<PathBuf>,
    names: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    zip: Option<PathBuf>,
    format: OutputFormat,
    strict_ids: bool,
    split_concatenated: bool,
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing on stderr so stdout stays clean for reports
    let default_filter = if cli.verbose {
        "youtube_transcript_extractor=debug"
    } else {
        "youtube_transcript_extractor=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match &cli.config_file {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Extract {
            urls,
            input,
            names,
            output_dir,
            zip,
            format,
            strict_ids,
            split_concatenated,
        } => {
            let options = ExtractOptions {
                urls,
                input,
                names,
                output_dir: output_dir.or_else(|| config.app.output_dir.clone()),
                zip,
                format,
                strict_ids: strict_ids || config.app.strict_ids,
                split_concatenated,
                quiet: cli.quiet,
            };
            run_extract(&config, options).await?;
        }
        Commands::Resolve { urls } => {
            for url in urls {
                match resolver::resolve(&url) {
                    Some(video_id) => println!("{}\t{}", url, video_id),
                    None => println!("{}\t-", url),
                }
            }
        }
        Commands::Config { show, init } => {
            if init {
                let path = Config::init()?;
                println!("Default configuration written to: {}", path.display());
            } else if show {
                config.display();
            } else {
                println!("Config file lookup order:");
                println!("  1. ./config.yaml");
                println!("  2. {}", Config::user_config_path()?.display());
                println!("Run with --show to print the effective configuration or --init to create one.");
            }
        }
        Commands::Platforms => {
            println!("Supported platforms:");
            for host in resolver::ALLOWED_HOSTS {
                if host == resolver::SHORT_LINK_HOST {
                    println!("  • {} (YouTube short links)", host);
                } else {
                    println!("  • {} (YouTube)", host);
                }
            }
        }
    }

    Ok(())
}

async fn run_extract(config: &Config, options: ExtractOptions) -> Result<()> {
    let mut references: Vec<String> = options
        .urls
        .iter()
        .flat_map(|url| input::parse_references(url, options.split_concatenated))
        .collect();

    if let Some(path) = &options.input {
        let text = input::read_source(path)?;
        references.extend(input::parse_references(&text, options.split_concatenated));
    }

    if references.is_empty() {
        anyhow::bail!("Please enter at least one YouTube video URL.");
    }

    let names = match &options.names {
        Some(path) => input::read_names(path)?,
        None => Vec::new(),
    };

    tracing::info!("Found {} URLs to process", references.len());

    let service = YoutubeCaptionService::new(&config.captions)?;
    let transcriptor = Transcriptor::new(
        Box::new(service),
        TranscriptSettings {
            strict_ids: options.strict_ids,
        },
    );

    let progress = if options.quiet {
        ProgressBar::hidden()
    } else {
        let progress = ProgressBar::new_spinner();
        progress.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        progress.enable_steady_tick(Duration::from_millis(120));
        progress
    };
    progress.set_message(format!("Extracting transcripts (0/{})...", references.len()));

    let total = references.len();
    let print_progressively = options.format == OutputFormat::Text;
    let mut store = ResultStore::new();

    transcriptor
        .process_batch(&references, &mut store, |entry| {
            progress.set_message(format!(
                "Extracting transcripts ({}/{})...",
                entry.index, total
            ));
            if print_progressively {
                progress.suspend(|| {
                    println!(
                        "{}",
                        output::format_entry(entry, &names, config.app.preview_chars)
                    )
                });
            }
        })
        .await;

    progress.finish_and_clear();

    match options.format {
        OutputFormat::Text => println!("{}", output::format_summary(&store)),
        OutputFormat::Json => println!("{}", output::format_as_json(&store, &names)?),
    }

    if let Some(dir) = &options.output_dir {
        let written = output::save_transcripts(&store, dir, &names)?;
        if options.format == OutputFormat::Text {
            for path in &written {
                println!("Transcript saved to: {}", path.display());
            }
        }
        tracing::info!("Saved {} transcripts to {}", written.len(), dir.display());
    }

    if let Some(path) = &options.zip {
        let entries = output::save_zip(&store, path, &names)?;
        if options.format == OutputFormat::Text {
            println!("Transcripts bundled into: {}", path.display());
        }
        tracing::info!("Bundled {} transcripts into {}", entries.len(), path.display());
    }

    Ok(())
}
