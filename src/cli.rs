use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "visionary")]
#[command(author, version, about = "Find Dolby Vision and Atmos streams in a media library")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a library directory and report every media file
    Scan {
        /// Library root (defaults to library.root from the config)
        root: Option<PathBuf>,

        /// File extension to include (repeatable, overrides the config)
        #[arg(long = "ext", value_name = "EXT")]
        extensions: Vec<String>,

        /// Only list files with a Dolby Vision video stream
        #[arg(long)]
        dolby_vision: bool,

        /// Only list files with an Atmos audio stream
        #[arg(long)]
        atmos: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Probe a media file and display its classified streams
    Probe {
        /// File to probe
        #[arg(required = true)]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Extract the best video and audio streams of a file
    Extract {
        /// Input file
        #[arg(required = true)]
        file: PathBuf,

        /// Show the plan without running ffmpeg
        #[arg(long)]
        dry_run: bool,

        /// Directory for the extracted streams
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Skip the video stream
        #[arg(long)]
        no_video: bool,

        /// Skip the audio stream
        #[arg(long)]
        no_audio: bool,
    },

    /// Check that required external tools are available
    CheckTools,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
