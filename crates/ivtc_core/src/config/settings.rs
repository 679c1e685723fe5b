//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Each section can be updated independently for atomic section-level updates.

use serde::{Deserialize, Serialize};

use crate::logging::LogLevel;
use crate::patterns::GuessConfig;
use crate::undo::DEFAULT_MAX_STEPS;

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub paths: PathSettings,

    #[serde(default)]
    pub logging: LoggingSettings,

    #[serde(default)]
    pub undo: UndoSettings,

    /// Defaults for new projects' guessing parameters.
    #[serde(default)]
    pub pattern_guessing: GuessConfig,

    #[serde(default)]
    pub script: ScriptSettings,

    #[serde(default)]
    pub search: SearchSettings,
}

/// Where exports and logs go.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSettings {
    /// Folder for timecodes, keyframes and pipeline descriptions.
    #[serde(default = "default_output_folder")]
    pub output_folder: String,

    #[serde(default = "default_logs_folder")]
    pub logs_folder: String,

    /// Last project opened.
    #[serde(default)]
    pub last_project_path: String,
}

fn default_output_folder() -> String {
    "ivtc_output".to_string()
}

fn default_logs_folder() -> String {
    ".logs".to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            output_folder: default_output_folder(),
            logs_folder: default_logs_folder(),
            last_project_path: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default)]
    pub level: LogLevel,

    /// Use compact log format.
    #[serde(default = "default_true")]
    pub compact: bool,

    /// Also write a timestamped log file into the logs folder.
    #[serde(default)]
    pub log_to_file: bool,

    /// Print the stage list whenever a pipeline is built.
    #[serde(default = "default_true")]
    pub show_pipeline_pretty: bool,
}

fn default_true() -> bool {
    true
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            compact: true,
            log_to_file: false,
            show_pipeline_pretty: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UndoSettings {
    /// Undo steps kept per project.
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
}

fn default_max_steps() -> usize {
    DEFAULT_MAX_STEPS
}

impl Default for UndoSettings {
    fn default() -> Self {
        Self {
            max_steps: default_max_steps(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptSettings {
    /// Source filter recorded in new projects.
    #[serde(default = "default_source_filter")]
    pub source_filter: String,

    /// Apply freeze frames in preview pipelines.
    #[serde(default)]
    pub preview_freeze_frames: bool,
}

fn default_source_filter() -> String {
    "lsmas.LWLibavSource".to_string()
}

impl Default for ScriptSettings {
    fn default() -> Self {
        Self {
            source_filter: default_source_filter(),
            preview_freeze_frames: false,
        }
    }
}

/// Thresholds used by the frame searches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_minimum_mic")]
    pub minimum_mic: i16,

    #[serde(default = "default_minimum_dmetric")]
    pub minimum_dmetric: i32,

    /// Shortest run of `c` matches reported.
    #[serde(default = "default_c_match_minimum")]
    pub c_match_minimum: usize,

    /// Gap tolerated inside one interlaced fade.
    #[serde(default)]
    pub fade_ignore_gaps: usize,
}

fn default_minimum_mic() -> i16 {
    20
}

fn default_minimum_dmetric() -> i32 {
    1000
}

fn default_c_match_minimum() -> usize {
    20
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            minimum_mic: default_minimum_mic(),
            minimum_dmetric: default_minimum_dmetric(),
            c_match_minimum: default_c_match_minimum(),
            fade_ignore_gaps: 0,
        }
    }
}

/// Names of config sections for targeted updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigSection {
    Paths,
    Logging,
    Undo,
    PatternGuessing,
    Script,
    Search,
}

impl ConfigSection {
    pub const ALL: [ConfigSection; 6] = [
        ConfigSection::Paths,
        ConfigSection::Logging,
        ConfigSection::Undo,
        ConfigSection::PatternGuessing,
        ConfigSection::Script,
        ConfigSection::Search,
    ];

    /// Get the TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Paths => "paths",
            ConfigSection::Logging => "logging",
            ConfigSection::Undo => "undo",
            ConfigSection::PatternGuessing => "pattern_guessing",
            ConfigSection::Script => "script",
            ConfigSection::Search => "search",
        }
    }

    /// Comment written above the table.
    pub fn description(&self) -> &'static str {
        match self {
            ConfigSection::Paths => "Output and log directories",
            ConfigSection::Logging => "Logging configuration",
            ConfigSection::Undo => "Undo history",
            ConfigSection::PatternGuessing => "Defaults for pattern guessing in new projects",
            ConfigSection::Script => "Pipeline generation",
            ConfigSection::Search => "Frame search thresholds",
        }
    }
}
