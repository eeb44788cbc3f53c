//! Runtime settings for Productivity Hub.
//!
//! Sources, strongest first: command-line flags, their environment
//! variables (`PRODHUB_DATA_DIR`, `PRODHUB_LOG`), the TOML file at
//! `~/.config/prodhub/config.toml`, then built-in defaults.
//!
//! The default file may be absent. A file named with `--config` must
//! exist.

use std::path::{Path, PathBuf};
use std::time::Duration;

use prodhub_core::alarm::parse_alarm_time;

/// Config file could not be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file exists but could not be read, or an explicit path is missing.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// File that was opened.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not valid TOML for these sections.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),
}

// ---------------------------------------------------------------------------
// On-disk shape. Every key is optional.
// ---------------------------------------------------------------------------

/// `config.toml` as written by the user.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    storage: StorageFileConfig,
    alarm: AlarmFileConfig,
    ui: UiFileConfig,
}

/// `[storage]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct StorageFileConfig {
    data_dir: Option<PathBuf>,
    in_memory: Option<bool>,
}

/// `[alarm]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct AlarmFileConfig {
    tick_ms: Option<u64>,
    sound: Option<String>,
    default_time: Option<String>,
}

/// `[ui]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct UiFileConfig {
    poll_timeout_ms: Option<u64>,
    clock_format: Option<String>,
    date_format: Option<String>,
}

// ---------------------------------------------------------------------------
// Settings after merging
// ---------------------------------------------------------------------------

/// How a ringing alarm is sounded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundSetting {
    /// Ring the terminal bell on every tick.
    Bell,
    /// No audio; the overlay alone signals the alarm.
    Mute,
    /// Run this program (and arguments), restarting it while ringing.
    Command(Vec<String>),
}

impl SoundSetting {
    /// Parse the `[alarm] sound` value: `"bell"`, `"none"`, or a command
    /// line split on whitespace.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "bell" => Self::Bell,
            "none" | "off" | "" => Self::Mute,
            line => Self::Command(line.split_whitespace().map(str::to_string).collect()),
        }
    }
}

/// Fully resolved application configuration.
#[derive(Debug, Clone)]
pub struct HubConfig {
    // -- Storage --
    /// Directory holding `todos.json` and `alarms.json`. `None` when no
    /// data directory could be determined.
    pub data_dir: Option<PathBuf>,
    /// Keep everything in memory; nothing is written to disk.
    pub in_memory: bool,

    // -- Alarm --
    /// Period of the alarm scheduler tick.
    pub tick: Duration,
    /// Alarm audio.
    pub sound: SoundSetting,
    /// Time the alarm form is pre-filled with (`HH:MM`).
    pub default_time: String,

    // -- UI --
    /// How long the event loop waits for a key before redrawing.
    pub poll_timeout: Duration,
    /// Live clock format string (chrono).
    pub clock_format: String,
    /// Date line format string (chrono).
    pub date_format: String,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            data_dir: dirs::data_dir().map(|d| d.join("prodhub")),
            in_memory: false,
            tick: Duration::from_millis(1000),
            sound: SoundSetting::Bell,
            default_time: "07:30".to_string(),
            poll_timeout: Duration::from_millis(50),
            clock_format: "%H:%M:%S".to_string(),
            date_format: "%A, %B %-d, %Y".to_string(),
        }
    }
}

impl HubConfig {
    /// Read the config file named by `cli` (or the default one) and
    /// merge it under the command-line values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the config file cannot be read or parsed.
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Ok(Self::resolve(cli, &file))
    }

    /// Flags win over the file, the file wins over defaults. Unusable
    /// file values are logged and replaced by defaults.
    fn resolve(cli: &CliArgs, file: &ConfigFile) -> Self {
        let defaults = Self::default();

        let sound = if cli.mute {
            SoundSetting::Mute
        } else {
            file.alarm
                .sound
                .as_deref()
                .map_or(defaults.sound, SoundSetting::parse)
        };

        let default_time = match file.alarm.default_time.as_deref() {
            Some(raw) => parse_alarm_time(raw).unwrap_or_else(|err| {
                tracing::warn!(error = %err, "ignoring [alarm] default_time");
                defaults.default_time.clone()
            }),
            None => defaults.default_time.clone(),
        };

        Self {
            data_dir: cli
                .data_dir
                .clone()
                .or_else(|| file.storage.data_dir.clone())
                .or(defaults.data_dir),
            in_memory: cli.in_memory || file.storage.in_memory.unwrap_or(defaults.in_memory),
            tick: file
                .alarm
                .tick_ms
                .filter(|&ms| ms > 0)
                .map_or(defaults.tick, Duration::from_millis),
            sound,
            default_time,
            poll_timeout: file
                .ui
                .poll_timeout_ms
                .map_or(defaults.poll_timeout, Duration::from_millis),
            clock_format: file
                .ui
                .clock_format
                .clone()
                .unwrap_or(defaults.clock_format),
            date_format: file
                .ui
                .date_format
                .clone()
                .unwrap_or(defaults.date_format),
        }
    }
}

/// Command-line flags.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "To-do list, alarm clock and calculator for the terminal")]
pub struct CliArgs {
    /// Path to config file (default: `~/.config/prodhub/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory for saved tasks and alarms.
    #[arg(long, env = "PRODHUB_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Keep tasks and alarms in memory only.
    #[arg(long)]
    pub in_memory: bool,

    /// Ring alarms silently.
    #[arg(long)]
    pub mute: bool,

    /// Tracing filter, e.g. `debug` or `prodhub_core=trace`.
    #[arg(long, default_value = "info", env = "PRODHUB_LOG")]
    pub log_level: String,

    /// Path to log file (default: `$TMPDIR/prodhub.log`).
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Parse `explicit_path`, or the default location when `None`. Only the
/// default location may be missing.
fn load_config_file(explicit_path: Option<&Path>) -> Result<ConfigFile, ConfigError> {
    if let Some(path) = explicit_path {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        return Ok(toml::from_str(&text)?);
    }

    let Some(path) = dirs::config_dir().map(|d| d.join("prodhub").join("config.toml")) else {
        return Ok(ConfigFile::default());
    };

    match std::fs::read_to_string(&path) {
        Ok(text) => Ok(toml::from_str(&text)?),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(source) => Err(ConfigError::ReadFile { path, source }),
    }
}
