use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::SettingsError;

pub const SETTINGS_FILE: &str = "vless2clash.yaml";

pub const DEFAULT_SOURCE_URL: &str = "https://raw.githubusercontent.com/x45fh56/tgs/refs/heads/main/Servers/Protocols/Categorized_Servers/1_VLESS_REALITY_TCP.txt";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Settings {
    pub source_url: String,
    pub output: PathBuf,
    pub timeout_secs: u64,

    pub mixed_port: u16,
    pub allow_lan: bool,
    pub log_level: String,
    pub external_controller: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            output: PathBuf::from("files").join("clash.yaml"),
            timeout_secs: 15,
            mixed_port: 7890,
            allow_lan: false,
            log_level: "silent".to_string(),
            external_controller: "127.0.0.1:9090".to_string(),
        }
    }
}

impl Settings {
    /// Reads settings from `path`. A missing file means all defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(SettingsError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        Self::from_yaml(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }
}
