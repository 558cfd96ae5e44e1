//! Persistent settings stored in `~/.cmmt.yml`.
//!
//! The configuration is loaded once at process start and passed by reference
//! to every component that needs it. Only the `--init` flow writes it back.

pub mod init;

use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::ConfigError;

pub use init::run_init;

/// Model used when the config file does not name one.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// File name of the config file inside the home directory.
const CONFIG_FILE_NAME: &str = ".cmmt.yml";

/// Environment variable that overrides the config file location.
const CONFIG_ENV_VAR: &str = "CMMT_CONFIG";

/// Settings persisted between runs.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(rename = "openai_api_key", default)]
    pub api_key: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Completion token cap. `None` or `0` means the backend default.
    #[serde(default)]
    pub max_tokens: Option<u32>,

    /// Pathspec globs excluded from the staged diff, in order.
    #[serde(default)]
    pub ignore_files: Vec<String>,

    #[serde(default)]
    pub extra_info: Option<String>,

    /// Keys this version does not know about, kept so saving never drops them.
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_yaml::Value>,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            base_url: None,
            max_tokens: None,
            ignore_files: Vec::new(),
            extra_info: None,
            other: BTreeMap::new(),
        }
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = if self.api_key.is_empty() {
            "<unset>"
        } else {
            "<redacted>"
        };
        f.debug_struct("Configuration")
            .field("api_key", &key)
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("max_tokens", &self.max_tokens)
            .field("ignore_files", &self.ignore_files)
            .field("extra_info", &self.extra_info)
            .finish_non_exhaustive()
    }
}

impl Configuration {
    /// The API key, or `MissingCredential` if none is configured.
    pub fn require_credential(&self) -> Result<&str, ConfigError> {
        let key = self.api_key.trim();
        if key.is_empty() {
            return Err(ConfigError::MissingCredential);
        }
        Ok(key)
    }

    /// Max tokens to request, only when configured and greater than zero.
    pub fn effective_max_tokens(&self) -> Option<u32> {
        self.max_tokens.filter(|&n| n > 0)
    }

    /// Configured extra info, if non-empty.
    pub fn extra_info(&self) -> Option<&str> {
        self.extra_info.as_deref().filter(|s| !s.is_empty())
    }
}

/// Resolve the config file path.
///
/// `CMMT_CONFIG` wins when set and non-empty; otherwise `$HOME/.cmmt.yml`.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    if let Ok(path) = env::var(CONFIG_ENV_VAR)
        && !path.is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    match env::var("HOME") {
        Ok(home) if !home.is_empty() => Ok(PathBuf::from(home).join(CONFIG_FILE_NAME)),
        _ => Err(ConfigError::HomeNotFound),
    }
}

/// Load the configuration from `path`. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<Configuration, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Configuration::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    // An empty file parses as YAML null rather than a mapping.
    if content.trim().is_empty() {
        return Ok(Configuration::default());
    }

    serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Write the configuration to `path`, replacing any existing file.
///
/// The YAML goes to a temp file next to `path` first and is renamed into
/// place, so a failed write leaves the old config intact.
pub fn save_config(path: &Path, config: &Configuration) -> Result<(), ConfigError> {
    let yaml = serde_yaml::to_string(config).map_err(ConfigError::Serialize)?;
    let write_err = |source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir).map_err(write_err)?;
    file.write_all(yaml.as_bytes()).map_err(write_err)?;
    file.persist(path).map_err(|e| write_err(e.error))?;

    debug!("Saved config to {}", path.display());
    Ok(())
}
