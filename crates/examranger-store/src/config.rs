//! Application configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use examranger_core::engine::EngineConfig;

/// Settings for the built-in question generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorSettings {
    /// Base artificial delay before questions are returned.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    /// Random extra delay added on top of `delay_ms`.
    #[serde(default = "default_jitter_ms")]
    pub jitter_ms: u64,
    /// Questions generated when no count is given.
    #[serde(default = "default_count")]
    pub default_count: usize,
    /// Fixed seed for reproducible question sets.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_delay_ms() -> u64 {
    2000
}
fn default_jitter_ms() -> u64 {
    1000
}
fn default_count() -> usize {
    30
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            delay_ms: default_delay_ms(),
            jitter_ms: default_jitter_ms(),
            default_count: default_count(),
            seed: None,
        }
    }
}

/// Top-level examranger configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamrangerConfig {
    /// JSON file holding the catalog and all results.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
    /// Refuse submissions to exams with no questions.
    #[serde(default)]
    pub reject_empty_exams: bool,
    #[serde(default)]
    pub generator: GeneratorSettings,
}

fn default_data_file() -> PathBuf {
    PathBuf::from("./examranger-data.json")
}

impl Default for ExamrangerConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            reject_empty_exams: false,
            generator: GeneratorSettings::default(),
        }
    }
}

impl ExamrangerConfig {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            reject_empty_exams: self.reject_empty_exams,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are copied as-is and never scanned again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + end];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `examranger.toml` in the current directory
/// 2. `~/.config/examranger/config.toml`
///
/// Environment variable overrides: `EXAMRANGER_DATA_FILE`, `EXAMRANGER_GENERATOR_SEED`.
pub fn load_config() -> Result<ExamrangerConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<ExamrangerConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("examranger.toml");
            if local.exists() {
                Some(local)
            } else {
                config_dir()
                    .map(|dir| dir.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<ExamrangerConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "config loaded");
            config
        }
        None => ExamrangerConfig::default(),
    };

    // Apply env var overrides
    if let Ok(data_file) = std::env::var("EXAMRANGER_DATA_FILE") {
        config.data_file = PathBuf::from(data_file);
    }
    if let Ok(seed) = std::env::var("EXAMRANGER_GENERATOR_SEED") {
        let seed = seed
            .trim()
            .parse::<u64>()
            .with_context(|| format!("EXAMRANGER_GENERATOR_SEED is not a number: {seed}"))?;
        config.generator.seed = Some(seed);
    }

    config.data_file = PathBuf::from(resolve_env_vars(&config.data_file.to_string_lossy()));

    Ok(config)
}

fn config_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("examranger"))
}
