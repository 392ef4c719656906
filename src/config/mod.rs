//! Configuration for Siftr.
//!
//! Two layers, merged before the loop starts:
//! 1. Global settings (.siftr.yml or ~/.config/siftr/siftr.yml)
//! 2. Per-project files (<projects-dir>/<name>.yml) holding the query,
//!    criteria, database choice, and per-project overrides

pub use self::project::{Database, ProjectConfig, SearchConfig};
pub use self::settings::{
    EscalationSettings, GlobalSettings, LlmSettings, SearchDefaults, SourceSettings,
};

mod project;
mod settings;

use std::path::PathBuf;

use crate::error::Result;

/// Default LLM model.
pub const DEFAULT_MODEL: &str = "gemini-1.5-pro-latest";

/// Default environment variable holding the LLM API key.
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Default directory holding project files.
pub const DEFAULT_PROJECTS_DIR: &str = "projects";

/// Load global settings from the standard search paths.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. .siftr.yml in current directory (project-local settings)
/// 3. ~/.config/siftr/siftr.yml (user settings)
/// 4. Default values
pub fn load_settings(explicit_path: Option<&PathBuf>) -> Result<GlobalSettings> {
    GlobalSettings::load(explicit_path)
}

/// Load and validate a project file from the configured projects directory.
pub fn load_project(settings: &GlobalSettings, name: &str) -> Result<ProjectConfig> {
    ProjectConfig::load(&settings.projects_dir, name)
}
