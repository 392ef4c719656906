//! Global settings.
//!
//! Loaded from .siftr.yml in the working directory or
//! ~/.config/siftr/siftr.yml, with defaults for everything.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SiftrError};

/// Global settings for Siftr.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GlobalSettings {
    /// LLM judge settings.
    pub llm: LlmSettings,

    /// Search defaults a project may override.
    pub defaults: SearchDefaults,

    /// Human escalation settings.
    pub escalation: EscalationSettings,

    /// Record source settings.
    pub sources: SourceSettings,

    /// Directory holding project files.
    #[serde(rename = "projects-dir")]
    pub projects_dir: PathBuf,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            llm: LlmSettings::default(),
            defaults: SearchDefaults::default(),
            escalation: EscalationSettings::default(),
            sources: SourceSettings::default(),
            projects_dir: PathBuf::from(super::DEFAULT_PROJECTS_DIR),
        }
    }
}

impl GlobalSettings {
    /// Load settings with the fallback chain.
    ///
    /// Search order:
    /// 1. Explicit path if provided
    /// 2. .siftr.yml in current directory
    /// 3. ~/.config/siftr/siftr.yml
    /// 4. Defaults
    pub fn load(explicit_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::load_from_file(path);
        }

        let project_settings = PathBuf::from(".siftr.yml");
        if project_settings.exists() {
            match Self::load_from_file(&project_settings) {
                Ok(settings) => {
                    log::info!("loaded settings from .siftr.yml");
                    return Ok(settings);
                }
                Err(e) => {
                    log::warn!("failed to load .siftr.yml: {e}");
                }
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_settings = config_dir.join("siftr").join("siftr.yml");
            if user_settings.exists() {
                match Self::load_from_file(&user_settings) {
                    Ok(settings) => {
                        log::info!("loaded settings from {}", user_settings.display());
                        return Ok(settings);
                    }
                    Err(e) => {
                        log::warn!("failed to load {}: {e}", user_settings.display());
                    }
                }
            }
        }

        log::info!("no settings file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)?;
        let settings: Self = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Validate the settings.
    pub fn validate(&self) -> Result<()> {
        if self.llm.timeout_ms == 0 {
            return Err(SiftrError::Config("llm.timeout-ms must be > 0".to_string()));
        }
        if self.sources.timeout_ms == 0 {
            return Err(SiftrError::Config("sources.timeout-ms must be > 0".to_string()));
        }
        if self.defaults.max_iterations == 0 {
            return Err(SiftrError::Config("defaults.max-iterations must be > 0".to_string()));
        }
        if !(0.0..=1.0).contains(&self.defaults.precision_threshold) {
            return Err(SiftrError::Config(
                "defaults.precision-threshold must be within [0, 1]".to_string(),
            ));
        }
        if self.defaults.max_results_per_iter == 0 {
            return Err(SiftrError::Config(
                "defaults.max-results-per-iter must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// LLM judge settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Model name.
    pub model: String,

    /// Timeout per judge call in milliseconds.
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Environment variable holding the API key.
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: super::DEFAULT_MODEL.to_string(),
            timeout_ms: 60_000,
            api_key_env: super::DEFAULT_API_KEY_ENV.to_string(),
        }
    }
}

impl LlmSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Search defaults, overridable per project.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchDefaults {
    /// Maximum refinement iterations.
    #[serde(rename = "max-iterations")]
    pub max_iterations: u32,

    /// Target precision in [0, 1].
    #[serde(rename = "precision-threshold")]
    pub precision_threshold: f64,

    /// Records fetched per iteration.
    #[serde(rename = "max-results-per-iter")]
    pub max_results_per_iter: usize,
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self {
            max_iterations: 5,
            precision_threshold: 0.8,
            max_results_per_iter: 20,
        }
    }
}

/// Human escalation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EscalationSettings {
    /// Upper bound on one escalation wait in milliseconds; 0 waits
    /// indefinitely.
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for EscalationSettings {
    fn default() -> Self {
        Self { timeout_ms: 0 }
    }
}

impl EscalationSettings {
    pub fn timeout(&self) -> Option<Duration> {
        if self.timeout_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.timeout_ms))
        }
    }
}

/// Record source settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SourceSettings {
    /// Timeout per search request in milliseconds.
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Email for the OpenAlex polite pool.
    #[serde(rename = "openalex-mailto")]
    pub openalex_mailto: Option<String>,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            openalex_mailto: None,
        }
    }
}

impl SourceSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
