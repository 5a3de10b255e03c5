use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::cli::{CliArgs, CliSources};
use crate::formats::Format;

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub(crate) struct FileConfig {
    pub(crate) output: Option<OutputFileConfig>,
    pub(crate) normalize: Option<NormalizeFileConfig>,
    pub(crate) display: Option<DisplayFileConfig>,
}

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
#[serde(default)]
pub(crate) struct OutputFileConfig {
    pub(crate) format: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
#[serde(default)]
pub(crate) struct NormalizeFileConfig {
    pub(crate) dedupe: Option<bool>,
    pub(crate) merge_overlapping: Option<bool>,
    pub(crate) clean_text: Option<bool>,
    pub(crate) offset_seconds: Option<f64>,
}

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
#[serde(default)]
pub(crate) struct DisplayFileConfig {
    pub(crate) font_size: Option<u32>,
    pub(crate) color: Option<String>,
    pub(crate) position: Option<String>,
}

#[derive(Debug)]
pub struct EffectiveSettings {
    pub output: OutputSettings,
    pub normalize: NormalizeSettings,
    pub display: DisplaySettings,
}

#[derive(Debug, Clone, Default)]
pub struct OutputSettings {
    pub format: Option<Format>,
}

#[derive(Debug, Clone, Default)]
pub struct NormalizeSettings {
    pub dedupe: bool,
    pub merge_overlapping: bool,
    pub clean_text: bool,
    pub offset_seconds: f64,
}

/// Presentation settings carried as plain data; consumers receive them as
/// parameters and nothing reads ambient storage.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplaySettings {
    pub font_size: u32,
    pub color: String,
    pub position: SubtitlePosition,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            font_size: 16,
            color: "#ffffff".to_string(),
            position: SubtitlePosition::Bottom,
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SubtitlePosition {
    Top,
    Bottom,
}

impl SubtitlePosition {
    pub fn as_str(self) -> &'static str {
        match self {
            SubtitlePosition::Top => "top",
            SubtitlePosition::Bottom => "bottom",
        }
    }
}

impl FromStr for SubtitlePosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(SubtitlePosition::Top),
            "bottom" => Ok(SubtitlePosition::Bottom),
            other => Err(other.to_string()),
        }
    }
}

#[derive(Debug)]
pub struct ResolvedSettings {
    pub settings: EffectiveSettings,
    pub config_path: Option<PathBuf>,
}

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    InvalidValue {
        path: Option<PathBuf>,
        field: &'static str,
        value: String,
    },
    NotFound {
        path: PathBuf,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(
                    f,
                    "failed to read config file {}: {}",
                    path.display(),
                    source
                )
            }
            ConfigError::Parse { path, source } => {
                write!(
                    f,
                    "failed to parse config file {}: {}",
                    path.display(),
                    source
                )
            }
            ConfigError::InvalidValue { path, field, value } => {
                if let Some(path) = path {
                    write!(
                        f,
                        "invalid value '{}' for '{}' in {}",
                        value,
                        field,
                        path.display()
                    )
                } else {
                    write!(f, "invalid value '{}' for '{}'", value, field)
                }
            }
            ConfigError::NotFound { path } => {
                write!(f, "config file {} does not exist", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            ConfigError::InvalidValue { .. } => None,
            ConfigError::NotFound { .. } => None,
        }
    }
}

pub fn resolve_settings(
    cli: &CliArgs,
    sources: &CliSources,
) -> Result<ResolvedSettings, ConfigError> {
    let (file, config_path) = load_config(cli.config.as_deref())?;
    merge(cli, sources, file, config_path)
}

fn load_config(path_override: Option<&Path>) -> Result<(FileConfig, Option<PathBuf>), ConfigError> {
    if let Some(path) = path_override {
        let path = path.to_path_buf();
        if !path.exists() {
            return Err(ConfigError::NotFound { path });
        }
        let config = load_file_config(&path)?;
        return Ok((config, Some(path)));
    }

    if let Some(project_path) = project_config_path()
        && project_path.exists()
    {
        let config = load_file_config(&project_path)?;
        return Ok((config, Some(project_path)));
    }

    let Some(default_path) = default_config_path() else {
        return Ok((FileConfig::default(), None));
    };
    if !default_path.exists() {
        return Ok((FileConfig::default(), None));
    }
    let config = load_file_config(&default_path)?;
    Ok((config, Some(default_path)))
}

fn merge(
    cli: &CliArgs,
    sources: &CliSources,
    file: FileConfig,
    config_path: Option<PathBuf>,
) -> Result<ResolvedSettings, ConfigError> {
    let FileConfig {
        output: file_output,
        normalize: file_normalize,
        display: file_display,
    } = file;

    let output_cfg = file_output.unwrap_or_default();
    let normalize_cfg = file_normalize.unwrap_or_default();
    let display_cfg = file_display.unwrap_or_default();

    let format = resolve_format(
        cli.format.clone(),
        output_cfg.format,
        !sources.format_from_cli,
        config_path.as_ref(),
    )?;

    let offset_seconds = resolve_offset(
        cli.offset,
        normalize_cfg.offset_seconds,
        !sources.offset_from_cli,
        config_path.as_ref(),
    )?;

    let normalize = NormalizeSettings {
        dedupe: resolve_flag(cli.dedupe, normalize_cfg.dedupe, !sources.dedupe_from_cli),
        merge_overlapping: resolve_flag(
            cli.merge_overlapping,
            normalize_cfg.merge_overlapping,
            !sources.merge_overlapping_from_cli,
        ),
        clean_text: resolve_flag(
            cli.clean_text,
            normalize_cfg.clean_text,
            !sources.clean_text_from_cli,
        ),
        offset_seconds,
    };

    let display = resolve_display(display_cfg, config_path.as_ref())?;

    Ok(ResolvedSettings {
        settings: EffectiveSettings {
            output: OutputSettings { format },
            normalize,
            display,
        },
        config_path,
    })
}

pub(crate) fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("rs", "subtitle-studio", "subtitle-studio")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

pub(crate) fn load_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(config)
}

fn project_config_path() -> Option<PathBuf> {
    env::current_dir().ok().map(|dir| dir.join("config.toml"))
}

fn normalize_string(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn resolve_format(
    cli_value: Option<String>,
    file_value: Option<String>,
    use_file: bool,
    config_path: Option<&PathBuf>,
) -> Result<Option<Format>, ConfigError> {
    let (raw, path) = match normalize_string(cli_value) {
        Some(value) => (Some(value), None),
        None => {
            if use_file {
                (normalize_string(file_value), config_path)
            } else {
                (None, None)
            }
        }
    };

    let Some(value) = raw else {
        return Ok(None);
    };

    match Format::from_str(&value) {
        Ok(format) => Ok(Some(format)),
        Err(_) => Err(ConfigError::InvalidValue {
            path: path.cloned(),
            field: "format",
            value,
        }),
    }
}

fn resolve_offset(
    cli_value: f64,
    file_value: Option<f64>,
    use_file: bool,
    config_path: Option<&PathBuf>,
) -> Result<f64, ConfigError> {
    if use_file && let Some(value) = file_value {
        if !value.is_finite() {
            return Err(ConfigError::InvalidValue {
                path: config_path.cloned(),
                field: "offset_seconds",
                value: value.to_string(),
            });
        }
        return Ok(value);
    }
    Ok(cli_value)
}

fn resolve_flag(cli_value: bool, file_value: Option<bool>, use_file: bool) -> bool {
    if cli_value {
        return true;
    }
    if use_file && let Some(value) = file_value {
        return value;
    }
    false
}

fn resolve_display(
    display: DisplayFileConfig,
    config_path: Option<&PathBuf>,
) -> Result<DisplaySettings, ConfigError> {
    let defaults = DisplaySettings::default();

    let position = match normalize_string(display.position) {
        Some(value) => match SubtitlePosition::from_str(&value) {
            Ok(position) => position,
            Err(_) => {
                return Err(ConfigError::InvalidValue {
                    path: config_path.cloned(),
                    field: "display_position",
                    value,
                });
            }
        },
        None => defaults.position,
    };

    let font_size = match display.font_size {
        Some(0) => {
            return Err(ConfigError::InvalidValue {
                path: config_path.cloned(),
                field: "display_font_size",
                value: "0".into(),
            });
        }
        Some(size) => size,
        None => defaults.font_size,
    };

    Ok(DisplaySettings {
        font_size,
        color: normalize_string(display.color).unwrap_or(defaults.color),
        position,
    })
}
