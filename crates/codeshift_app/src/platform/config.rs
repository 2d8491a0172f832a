use std::fs;
use std::path::Path;
use std::time::Duration;

use codeshift_core::{DisplayMode, StreamErrorPolicy};
use codeshift_engine::{LanguageHint, UploadSettings, ViewerLanguages};
use serde::{Deserialize, Serialize};

use super::logging::LogDestination;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageSetting {
    pub id: String,
    pub file_ext: String,
}

impl From<LanguageSetting> for LanguageHint {
    fn from(setting: LanguageSetting) -> Self {
        LanguageHint::new(setting.id, setting.file_ext)
    }
}

/// Contents of `codeshift.ron`. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
    pub mount_timeout_ms: u64,
    pub source_language: LanguageSetting,
    pub target_language: LanguageSetting,
    pub display_mode: DisplayMode,
    pub stream_error_policy: StreamErrorPolicy,
    pub log_destination: LogDestination,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let upload = UploadSettings::default();
        let languages = ViewerLanguages::default();
        Self {
            base_url: upload.base_url,
            connect_timeout_secs: upload.connect_timeout.as_secs(),
            read_timeout_secs: upload.read_timeout.as_secs(),
            mount_timeout_ms: 2_000,
            source_language: LanguageSetting {
                id: languages.source.id,
                file_ext: languages.source.file_ext,
            },
            target_language: LanguageSetting {
                id: languages.target.id,
                file_ext: languages.target.file_ext,
            },
            display_mode: DisplayMode::Editor,
            stream_error_policy: StreamErrorPolicy::LogOnly,
            log_destination: LogDestination::Terminal,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn upload_settings(&self) -> UploadSettings {
        UploadSettings {
            base_url: self.base_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            read_timeout: Duration::from_secs(self.read_timeout_secs),
        }
    }

    pub fn languages(&self) -> ViewerLanguages {
        ViewerLanguages {
            source: self.source_language.clone().into(),
            target: self.target_language.clone().into(),
        }
    }

    pub fn mount_timeout(&self) -> Duration {
        Duration::from_millis(self.mount_timeout_ms)
    }
}

/// Result of reading the settings file. Logging is not up yet while the
/// file is read, so a problem is handed back to be logged by the caller.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: AppConfig,
    pub problem: Option<String>,
}

pub fn load(path: &Path) -> LoadedConfig {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return LoadedConfig {
                config: AppConfig::default(),
                problem: None,
            };
        }
        Err(err) => {
            return LoadedConfig {
                config: AppConfig::default(),
                problem: Some(format!("Failed to read settings from {:?}: {}", path, err)),
            };
        }
    };

    match ron::from_str(&content) {
        Ok(config) => LoadedConfig {
            config,
            problem: None,
        },
        Err(err) => LoadedConfig {
            config: AppConfig::default(),
            problem: Some(format!("Failed to parse settings from {:?}: {}", path, err)),
        },
    }
}
