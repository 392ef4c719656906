//! Per-project configuration.
//!
//! A project file names the database, the initial query, the screening
//! criteria, and any overrides of the global search defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SiftrError};
use crate::judge::Criteria;
use crate::refine::LoopParams;

use super::settings::SearchDefaults;

/// Which database backs the record source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    #[default]
    Openalex,
    Scopus,
    Wos,
}

impl std::fmt::Display for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Database::Openalex => "openalex",
            Database::Scopus => "scopus",
            Database::Wos => "wos",
        };
        write!(f, "{label}")
    }
}

/// Search section of a project file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Query for the first iteration.
    #[serde(rename = "initial-query")]
    pub initial_query: String,

    /// Override of defaults.max-iterations.
    #[serde(rename = "max-iterations", default)]
    pub max_iterations: Option<u32>,

    /// Override of defaults.precision-threshold.
    #[serde(rename = "precision-threshold", default)]
    pub precision_threshold: Option<f64>,

    /// Override of defaults.max-results-per-iter.
    #[serde(rename = "max-results-per-iter", default)]
    pub max_results_per_iter: Option<usize>,
}

/// One review project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name shown in the console.
    pub name: String,

    /// Free-form description.
    #[serde(default)]
    pub description: String,

    /// Database backing the record source.
    #[serde(default)]
    pub database: Database,

    /// Search parameters.
    pub search: SearchConfig,

    /// Screening criteria.
    pub criteria: Criteria,
}

impl ProjectConfig {
    /// Load a project file from the projects directory.
    ///
    /// Tries `<name>.yml`, `<name>.yaml`, and `<name>` verbatim.
    pub fn load(projects_dir: &Path, name: &str) -> Result<Self> {
        let candidates = [
            projects_dir.join(format!("{name}.yml")),
            projects_dir.join(format!("{name}.yaml")),
            projects_dir.join(name),
        ];

        let path = candidates.iter().find(|p| p.is_file()).ok_or_else(|| {
            SiftrError::Project(format!(
                "project '{name}' not found in {}",
                projects_dir.display()
            ))
        })?;

        Self::load_from_file(path)
    }

    fn load_from_file(path: &PathBuf) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let project: Self = serde_yaml::from_str(&content)?;
        project.validate()?;
        Ok(project)
    }

    /// Validate the project before the loop runs.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(SiftrError::Project("project name cannot be empty".to_string()));
        }
        if self.search.initial_query.trim().is_empty() {
            return Err(SiftrError::Project("search.initial-query cannot be empty".to_string()));
        }
        if self.criteria.inclusion.trim().is_empty() {
            return Err(SiftrError::Project("criteria.inclusion cannot be empty".to_string()));
        }
        if self.criteria.exclusion.trim().is_empty() {
            return Err(SiftrError::Project("criteria.exclusion cannot be empty".to_string()));
        }
        if let Some(0) = self.search.max_iterations {
            return Err(SiftrError::Project("search.max-iterations must be > 0".to_string()));
        }
        if let Some(threshold) = self.search.precision_threshold {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(SiftrError::Project(
                    "search.precision-threshold must be within [0, 1]".to_string(),
                ));
            }
        }
        if let Some(0) = self.search.max_results_per_iter {
            return Err(SiftrError::Project(
                "search.max-results-per-iter must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve loop parameters against the global defaults.
    pub fn loop_params(&self, defaults: &SearchDefaults, escalation_timeout: Option<Duration>) -> LoopParams {
        LoopParams {
            initial_query: self.search.initial_query.clone(),
            criteria: self.criteria.clone(),
            max_iterations: self.search.max_iterations.unwrap_or(defaults.max_iterations),
            precision_threshold: self
                .search
                .precision_threshold
                .unwrap_or(defaults.precision_threshold),
            max_results: self
                .search
                .max_results_per_iter
                .unwrap_or(defaults.max_results_per_iter),
            escalation_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PROJECT_YAML: &str = "\
name: attempts
description: Reproducibility attempts in ML
database: scopus
search:
  initial-query: reproducibility AND evaluation
  max-iterations: 3
criteria:
  inclusion: empirical reproducibility studies
  exclusion: editorials and opinion pieces
";

    fn write_project(dir: &Path, file_name: &str, content: &str) {
        let mut file = fs::File::create(dir.join(file_name)).unwrap();
        write!(file, "{content}").unwrap();
    }

    #[test]
    fn test_load_by_stem() {
        let dir = tempfile::tempdir().unwrap();
        write_project(dir.path(), "attempts.yml", PROJECT_YAML);

        let project = ProjectConfig::load(dir.path(), "attempts").unwrap();
        assert_eq!(project.name, "attempts");
        assert_eq!(project.database, Database::Scopus);
        assert_eq!(project.search.max_iterations, Some(3));
        assert!(project.search.precision_threshold.is_none());
    }

    #[test]
    fn test_load_yaml_extension_fallback() {
        let dir = tempfile::tempdir().unwrap();
        write_project(dir.path(), "attempts.yaml", PROJECT_YAML);
        assert!(ProjectConfig::load(dir.path(), "attempts").is_ok());
    }

    #[test]
    fn test_load_missing_project() {
        let dir = tempfile::tempdir().unwrap();
        let result = ProjectConfig::load(dir.path(), "nope");
        assert!(matches!(result, Err(SiftrError::Project(_))));
    }

    #[test]
    fn test_database_defaults_to_openalex() {
        let yaml = "\
name: p
search:
  initial-query: q
criteria:
  inclusion: a
  exclusion: b
";
        let project: ProjectConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(project.database, Database::Openalex);
    }

    #[test]
    fn test_validate_rejects_empty_criteria() {
        let yaml = "\
name: p
search:
  initial-query: q
criteria:
  inclusion: ''
  exclusion: b
";
        let project: ProjectConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(project.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_iterations() {
        let yaml = "\
name: p
search:
  initial-query: q
  max-iterations: 0
criteria:
  inclusion: a
  exclusion: b
";
        let project: ProjectConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(project.validate().is_err());
    }

    #[test]
    fn test_loop_params_resolution() {
        let project: ProjectConfig = serde_yaml::from_str(PROJECT_YAML).unwrap();
        let defaults = SearchDefaults::default();

        let params = project.loop_params(&defaults, Some(Duration::from_secs(120)));
        assert_eq!(params.initial_query, "reproducibility AND evaluation");
        // project override wins
        assert_eq!(params.max_iterations, 3);
        // unset fields fall back to defaults
        assert_eq!(params.precision_threshold, defaults.precision_threshold);
        assert_eq!(params.max_results, defaults.max_results_per_iter);
        assert_eq!(params.escalation_timeout, Some(Duration::from_secs(120)));
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_database_display() {
        assert_eq!(Database::Openalex.to_string(), "openalex");
        assert_eq!(Database::Scopus.to_string(), "scopus");
        assert_eq!(Database::Wos.to_string(), "wos");
    }
}
