use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "yt-transcripts",
    about = "YouTube Transcript Extractor - Pull English transcripts from one or more YouTube URLs",
    version,
    long_about = "A CLI tool that resolves YouTube video URLs (youtube.com, m.youtube.com, youtu.be), fetches their English captions and outputs them as plain text. URLs are processed one at a time; a failing URL never stops the rest of the batch."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Use this config file instead of the default lookup
    #[arg(long = "config", global = true, value_name = "FILE", env = "YT_TRANSCRIPTS_CONFIG")]
    pub config_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract transcripts for one or more YouTube URLs
    Extract {
        /// YouTube URLs to process, in order
        #[arg(value_name = "URL")]
        urls: Vec<String>,

        /// Read URLs from a file, one per line ("-" reads stdin)
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// File with one output file name per line, matched to URLs by position
        #[arg(long, value_name = "FILE")]
        names: Option<PathBuf>,

        /// Write each transcript into this directory
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Also bundle every transcript into this ZIP archive
        #[arg(long, value_name = "FILE")]
        zip: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Reject video IDs that do not look like YouTube IDs instead of trying them
        #[arg(long)]
        strict_ids: bool,

        /// Split lines that contain several URLs glued together
        #[arg(long)]
        split_concatenated: bool,
    },

    /// Print the video ID each URL resolves to, without fetching anything
    Resolve {
        /// URLs to resolve
        #[arg(value_name = "URL", required = true)]
        urls: Vec<String>,
    },

    /// Show or create the configuration file
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,

        /// Write a default configuration file to the user config directory
        #[arg(long, conflicts_with = "show")]
        init: bool,
    },

    /// List supported URL hosts
    Platforms,
}

#[derive(ValueEnum, Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable report with previews
    Text,
    /// JSON report with full transcripts
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_extract_arguments() {
        let cli = Cli::try_parse_from([
            "yt-transcripts",
            "extract",
            "https://youtu.be/a",
            "https://youtu.be/b",
            "--format",
            "json",
            "-o",
            "out",
            "--strict-ids",
            "--zip",
            "all.zip",
        ])
        .unwrap();

        match cli.command {
            Commands::Extract {
                urls,
                format,
                output_dir,
                zip,
                strict_ids,
                split_concatenated,
                ..
            } => {
                assert_eq!(urls, vec!["https://youtu.be/a", "https://youtu.be/b"]);
                assert_eq!(format, OutputFormat::Json);
                assert_eq!(output_dir, Some(PathBuf::from("out")));
                assert_eq!(zip, Some(PathBuf::from("all.zip")));
                assert!(strict_ids);
                assert!(!split_concatenated);
            }
            _ => panic!("expected extract command"),
        }
    }

    #[test]
    fn test_resolve_requires_urls() {
        assert!(Cli::try_parse_from(["yt-transcripts", "resolve"]).is_err());
    }

    #[test]
    fn test_config_flags_conflict() {
        assert!(Cli::try_parse_from(["yt-transcripts", "config", "--show", "--init"]).is_err());
    }
}
