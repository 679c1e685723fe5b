//! Command line definition.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug, PartialEq, Eq)]
#[command(name = "ivtc")]
#[command(about = "IVTC Workbench - manual inverse telecine projects", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Settings file (default: .config/settings.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Timecode file flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TimecodeFormat {
    /// Ranges of constant frame rate
    V1,
    /// One timestamp per output frame
    V2,
}

/// What `search` looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SearchKind {
    /// Frames whose mic reaches the configured minimum
    Mics,
    /// Frames whose decimate metric reaches the configured minimum
    #[value(name = "dmetrics")]
    DMetrics,
    /// Long runs of c matches
    CMatches,
    /// Interlaced fades grouped into ranges
    Fades,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create a project for a video
    New {
        /// Source video path
        video: String,

        /// Number of frames in the source
        frame_count: usize,

        /// Project file to write
        project: PathBuf,

        /// Source filter (default from settings)
        #[arg(long)]
        filter: Option<String>,
    },

    /// Summarise a project
    Info {
        project: PathBuf,
    },

    /// Apply a match pattern to a frame range
    Matches {
        project: PathBuf,
        first: usize,
        last: usize,
        /// Pattern over p, c, n, b, u
        pattern: String,
    },

    /// Apply a decimation pattern to a frame range
    Decimate {
        project: PathBuf,
        first: usize,
        last: usize,
        /// Pattern over k (keep) and d (drop)
        pattern: String,
    },

    /// Start a section at a frame
    Section {
        project: PathBuf,
        frame: usize,
    },

    /// Guess patterns for one section or the whole project
    Guess {
        project: PathBuf,

        /// Start frame of the section to guess
        #[arg(long)]
        section: Option<usize>,
    },

    /// List orphan fields
    Orphans {
        project: PathBuf,
    },

    /// Search the project metrics and matches
    Search {
        project: PathBuf,

        #[arg(value_enum)]
        kind: SearchKind,
    },

    /// Export timecodes
    Timecodes {
        project: PathBuf,

        #[arg(short, long, value_enum, default_value = "v2")]
        format: TimecodeFormat,

        /// Output file, relative paths land in the output folder
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export keyframes
    Keyframes {
        project: PathBuf,

        /// Output file, relative paths land in the output folder
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the filter pipeline
    Pipeline {
        project: PathBuf,

        /// Emit JSON instead of the pretty form
        #[arg(long)]
        json: bool,

        /// Stop before decimation
        #[arg(long)]
        preview: bool,

        /// Output file, relative paths land in the output folder
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Timestamp of an output frame
    FrameToTime {
        project: PathBuf,
        frame: usize,
    },

    /// Copy presets, custom lists and output settings from another project
    Import {
        project: PathBuf,
        from: PathBuf,
    },
}

impl Command {
    /// The project file the command works on.
    pub fn project(&self) -> &Path {
        match self {
            Command::New { project, .. }
            | Command::Info { project }
            | Command::Matches { project, .. }
            | Command::Decimate { project, .. }
            | Command::Section { project, .. }
            | Command::Guess { project, .. }
            | Command::Orphans { project }
            | Command::Search { project, .. }
            | Command::Timecodes { project, .. }
            | Command::Keyframes { project, .. }
            | Command::Pipeline { project, .. }
            | Command::FrameToTime { project, .. }
            | Command::Import { project, .. } => project,
        }
    }
}
