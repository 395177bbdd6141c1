use std::{fs, io, path::{Path, PathBuf}};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE_NAME: &'static str = "cmlistfile.yaml";

#[derive(Error, Debug)]
pub enum ConfigLoadError {
  #[error("Unable to read {path}: {source}")]
  Io {
    path: String,
    source: io::Error
  },

  #[error("Invalid YAML in {path}: {source}")]
  Yaml {
    path: String,
    source: serde_yaml::Error
  }
}

fn default_true() -> bool {
  true
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ToolConfig {
  // Generator expression errors still fail the evaluation, but print nothing.
  #[serde(default)]
  pub quiet_genex_errors: bool,
  #[serde(default = "default_true")]
  pub warn_legacy_policy: bool,
  #[serde(default = "default_true")]
  pub echo_diagnostics: bool
}

impl Default for ToolConfig {
  fn default() -> Self {
    Self {
      quiet_genex_errors: false,
      warn_legacy_policy: true,
      echo_diagnostics: true
    }
  }
}

impl ToolConfig {
  /*
    An explicitly given config file must exist. Without one, cmlistfile.yaml in the
    working directory is used when present, and the defaults otherwise.
  */
  pub fn load(explicit_path: Option<&Path>) -> Result<Self, ConfigLoadError> {
    if let Some(config_path) = explicit_path {
      return load_yaml_file(config_path);
    }

    let default_path: PathBuf = PathBuf::from(DEFAULT_CONFIG_FILE_NAME);

    if default_path.is_file() {
      return load_yaml_file(&default_path);
    }

    return Ok(Self::default());
  }
}

pub fn parse_yaml_str<T: serde::de::DeserializeOwned>(
  yaml_str: &str,
  path_label: &str
) -> Result<T, ConfigLoadError> {
  return serde_yaml::from_str::<T>(yaml_str)
    .map_err(|source| ConfigLoadError::Yaml {
      path: path_label.to_string(),
      source
    });
}

pub fn load_yaml_file<T: serde::de::DeserializeOwned>(file_path: &Path) -> Result<T, ConfigLoadError> {
  let path_label: String = file_path.to_string_lossy().to_string();

  let yaml_string: String = fs::read_to_string(file_path)
    .map_err(|source| ConfigLoadError::Io {
      path: path_label.clone(),
      source
    })?;

  return parse_yaml_str(&yaml_string, &path_label);
}
