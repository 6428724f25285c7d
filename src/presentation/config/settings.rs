use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment as EnvironmentSource, File};
use serde::Deserialize;

use super::environment::Environment;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub transcription: TranscriptionSettings,
    pub auth: AuthSettings,
    pub storage: StorageSettings,
    pub export: ExportSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionSettings {
    pub provider: TranscriptionProviderSetting,
    #[serde(default)]
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    pub response_format: ResponseFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptionProviderSetting {
    Deepgram,
    Mock,
}

/// Shape of a successful `/transcribe` response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// `{"result": "<transcript>"}`
    Transcript,
    /// `{"transcription": <backend document>}`
    Full,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub enabled: bool,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub uploads_dir: String,
    pub max_upload_mb: usize,
    pub stale_upload_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportSettings {
    pub output_dir: String,
    #[serde(default)]
    pub retention_days: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("auth is enabled but no api key is configured")]
    MissingAuthKey,
    #[error("storage.max_upload_mb must be greater than zero")]
    ZeroUploadLimit,
    #[error("transcription.timeout_secs must be greater than zero")]
    ZeroTimeout,
}

impl Settings {
    /// Loads settings from defaults, the optional per-environment file,
    /// `APP_`-prefixed variables and the legacy flat variables
    /// (`PORT`, `DEEPGRAM_API_KEY`, `X_API_KEY`), in increasing priority.
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        Self::load_from(&environment.settings_file(), std::env::vars())
    }

    /// Same layering as [`Settings::load`] with an explicit settings file
    /// stem and variable set in place of the process environment.
    pub fn load_from(
        settings_file: &str,
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Self, ConfigError> {
        let vars: config::Map<String, String> = vars.into_iter().collect();
        let flat = |key: &str| vars.get(key).cloned();

        Self::defaults()?
            .add_source(File::with_name(settings_file).required(false))
            .add_source(
                EnvironmentSource::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .source(Some(vars.clone())),
            )
            .set_override_option("server.port", flat("PORT"))?
            .set_override_option("transcription.api_key", flat("DEEPGRAM_API_KEY"))?
            .set_override_option("auth.api_key", flat("X_API_KEY"))?
            .build()?
            .try_deserialize()
    }

    /// Loads settings from defaults overlaid with a single file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        Self::defaults()?
            .add_source(File::from(path))
            .build()?
            .try_deserialize()
    }

    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("transcription.provider", "deepgram")?
            .set_default("transcription.base_url", "https://api.deepgram.com")?
            .set_default("transcription.model", "nova-2")?
            .set_default("transcription.timeout_secs", 120)?
            .set_default("transcription.response_format", "transcript")?
            .set_default("auth.enabled", false)?
            .set_default("storage.uploads_dir", "uploads")?
            .set_default("storage.max_upload_mb", 100)?
            .set_default("storage.stale_upload_secs", 3600)?
            .set_default("export.output_dir", "output")?
            .set_default("logging.level", "info")?
            .set_default("logging.enable_json", false)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.auth.enabled && self.inbound_api_key().is_none() {
            return Err(SettingsError::MissingAuthKey);
        }
        if self.storage.max_upload_mb == 0 {
            return Err(SettingsError::ZeroUploadLimit);
        }
        if self.transcription.timeout_secs == 0 {
            return Err(SettingsError::ZeroTimeout);
        }
        Ok(())
    }

    /// The key inbound requests must present, when enforcement is on.
    pub fn inbound_api_key(&self) -> Option<&str> {
        if !self.auth.enabled {
            return None;
        }
        self.auth.api_key.as_deref().filter(|k| !k.is_empty())
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.storage.max_upload_mb.saturating_mul(1024 * 1024)
    }

    pub fn transcription_timeout(&self) -> Duration {
        Duration::from_secs(self.transcription.timeout_secs)
    }

    pub fn stale_upload_age(&self) -> Duration {
        Duration::from_secs(self.storage.stale_upload_secs)
    }

    pub fn uploads_path(&self) -> io::Result<PathBuf> {
        resolve_dir(&self.storage.uploads_dir)
    }

    pub fn output_path(&self) -> io::Result<PathBuf> {
        resolve_dir(&self.export.output_dir)
    }
}

/// Relative directories are anchored at the process working directory once,
/// at startup.
fn resolve_dir(dir: &str) -> io::Result<PathBuf> {
    let path = Path::new(dir);
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
