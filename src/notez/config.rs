use crate::error::{NotezError, Result};
use crate::upload::MAX_UPLOAD_BYTES;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_LOG_FILTER: &str = "notez=info";

/// Configuration for notez, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotezConfig {
    /// Session owner used when neither `--owner` nor `NOTEZ_OWNER` is given
    #[serde(default)]
    pub owner: Option<String>,

    /// Largest file the uploader accepts, in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,

    /// Base URL blobs are served from (defaults to `file://<data dir>/blobs`)
    #[serde(default)]
    pub blob_base_url: Option<String>,

    /// Text extraction program and its arguments; reads stdin, writes text to stdout
    #[serde(default)]
    pub extract_command: Vec<String>,

    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_max_upload_bytes() -> u64 {
    MAX_UPLOAD_BYTES
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl Default for NotezConfig {
    fn default() -> Self {
        Self {
            owner: None,
            max_upload_bytes: MAX_UPLOAD_BYTES,
            blob_base_url: None,
            extract_command: Vec::new(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl NotezConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(NotezError::Io)?;
        let config: NotezConfig =
            serde_json::from_str(&content).map_err(NotezError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(NotezError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(NotezError::Serialization)?;
        fs::write(config_path, content).map_err(NotezError::Io)?;
        Ok(())
    }

    /// First non-blank of: explicit flag, environment, config file.
    pub fn resolve_owner(&self, flag: Option<&str>, env: Option<&str>) -> Option<String> {
        [flag, env, self.owner.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|owner| !owner.is_empty())
            .map(String::from)
    }
}
