//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/orgtree/orgtree.toml`
//! 3. Local config: `<project_dir>/.orgtree.toml`
//! 4. Environment variables: `ORGTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{expand_env_vars, TreeType, DEFAULT_VAR_PREFIX};

pub const LOCAL_CONFIG_FILE: &str = ".orgtree.toml";

/// Unified configuration for orgtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Directory holding `<category>.json` token bundles (default: `<project_dir>/tokens`)
    pub tokens_dir: PathBuf,
    /// Export target for generated token files (default: `<project_dir>/tokens/dist`)
    pub dist_dir: PathBuf,
    /// Prefix for CSS custom properties (default: "aeg")
    pub var_prefix: String,
    /// Tree shape used when placing new members
    pub tree_type: TreeType,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tokens_dir: PathBuf::from("tokens"),
            dist_dir: PathBuf::from("tokens/dist"),
            var_prefix: DEFAULT_VAR_PREFIX.to_string(),
            tree_type: TreeType::Unilevel,
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub tokens_dir: Option<PathBuf>,
    pub dist_dir: Option<PathBuf>,
    pub var_prefix: Option<String>,
    pub tree_type: Option<TreeType>,
}

/// Get the XDG config directory for orgtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "orgtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("orgtree.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(LOCAL_CONFIG_FILE)
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Overlay wins where it specifies a value.
    ///
    /// Relative paths in a file layer are resolved against `base`, the
    /// directory of the file they came from.
    fn merge_with(&self, overlay: &RawSettings, base: Option<&Path>) -> Self {
        let resolve = |p: &PathBuf| match base {
            Some(dir) if p.is_relative() => dir.join(p),
            _ => p.clone(),
        };
        Self {
            tokens_dir: overlay
                .tokens_dir
                .as_ref()
                .map(resolve)
                .unwrap_or_else(|| self.tokens_dir.clone()),
            dist_dir: overlay
                .dist_dir
                .as_ref()
                .map(resolve)
                .unwrap_or_else(|| self.dist_dir.clone()),
            var_prefix: overlay
                .var_prefix
                .clone()
                .unwrap_or_else(|| self.var_prefix.clone()),
            tree_type: overlay.tree_type.unwrap_or(self.tree_type),
        }
    }

    /// Relative paths joined onto `dir`.
    fn rooted_at(mut self, dir: &Path) -> Self {
        if self.tokens_dir.is_relative() {
            self.tokens_dir = dir.join(&self.tokens_dir);
        }
        if self.dist_dir.is_relative() {
            self.dist_dir = dir.join(&self.dist_dir);
        }
        self
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        self.tokens_dir = PathBuf::from(expand_env_vars(&self.tokens_dir.to_string_lossy()));
        self.dist_dir = PathBuf::from(expand_env_vars(&self.dist_dir.to_string_lossy()));
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional project directory for local config; the
    ///   compiled default paths are resolved against it
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = match project_dir {
            Some(project) => Self::default().rooted_at(project),
            None => Self::default(),
        };

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw, None);
            }
        }

        if let Some(project) = project_dir {
            let local_path = local_config_path(project);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw, Some(project));
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply ORGTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("ORGTREE").separator("__"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("tokens_dir") {
            settings.tokens_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("dist_dir") {
            settings.dist_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("var_prefix") {
            settings.var_prefix = val;
        }
        if let Ok(val) = config.get_string("tree_type") {
            settings.tree_type = match val.to_lowercase().as_str() {
                "unilevel" => TreeType::Unilevel,
                "binary" => TreeType::Binary,
                other => {
                    return Err(ApplicationError::Config {
                        message: format!("unknown tree_type: {}", other),
                    })
                }
            };
        }

        Ok(settings)
    }

    /// Render as TOML for `config show`.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {}", e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_partial_overlay_when_merging_then_unspecified_fields_kept() {
        let overlay = RawSettings {
            var_prefix: Some("acme".into()),
            ..RawSettings::default()
        };
        let merged = Settings::default().merge_with(&overlay, None);
        assert_eq!(merged.var_prefix, "acme");
        assert_eq!(merged.tokens_dir, PathBuf::from("tokens"));
        assert_eq!(merged.tree_type, TreeType::Unilevel);
    }

    #[test]
    fn given_relative_path_in_local_config_when_merging_then_resolved_against_project() {
        let overlay = RawSettings {
            tokens_dir: Some(PathBuf::from("design/tokens")),
            ..RawSettings::default()
        };
        let merged = Settings::default().merge_with(&overlay, Some(Path::new("/work/app")));
        assert_eq!(merged.tokens_dir, PathBuf::from("/work/app/design/tokens"));
    }

    #[test]
    fn given_defaults_when_rooting_then_relative_paths_joined_and_absolute_kept() {
        let settings = Settings {
            dist_dir: PathBuf::from("/srv/dist"),
            ..Settings::default()
        }
        .rooted_at(Path::new("/work/app"));

        assert_eq!(settings.tokens_dir, PathBuf::from("/work/app/tokens"));
        assert_eq!(settings.dist_dir, PathBuf::from("/srv/dist"));
    }
}
