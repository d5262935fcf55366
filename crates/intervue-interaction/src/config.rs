//! Configuration file management.
//!
//! Reads `config.toml` (interview settings) and `secret.json` (collaborator
//! credentials) from `~/.config/intervue/`. Missing files fall back to
//! defaults; credentials can also come from environment variables.

use intervue_core::config::{InterviewSettings, OpenAIConfig, SecretConfig};
use intervue_core::{IntervueError, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE: &str = "config.toml";
pub const SECRET_FILE: &str = "secret.json";

pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_BASE_URL: &str = "OPENAI_URL";
pub const ENV_MODEL: &str = "OPENAI_QNA_MODEL";

/// File-backed configuration storage.
///
/// Responsibilities:
/// - Load `config.toml` into `InterviewSettings`
/// - Load `secret.json` into `SecretConfig`
/// - Write `config.toml` back (e.g. to seed a default file)
pub struct ConfigStorage {
    dir: PathBuf,
}

impl ConfigStorage {
    /// Creates a storage rooted at `~/.config/intervue`.
    pub fn new() -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| IntervueError::config("Could not determine home directory"))?;
        Ok(Self {
            dir: home.join(".config").join("intervue"),
        })
    }

    /// Creates a storage rooted at a custom directory (for testing).
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn settings_path(&self) -> PathBuf {
        self.dir.join(SETTINGS_FILE)
    }

    pub fn secret_path(&self) -> PathBuf {
        self.dir.join(SECRET_FILE)
    }

    /// Loads interview settings; a missing file yields the defaults.
    pub fn load_settings(&self) -> Result<InterviewSettings> {
        let path = self.settings_path();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(InterviewSettings::default());
        }
        let content = fs::read_to_string(&path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save_settings(&self, settings: &InterviewSettings) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let content = toml::to_string_pretty(settings)?;
        fs::write(self.settings_path(), content)?;
        Ok(())
    }

    /// Loads the secret configuration; a missing file yields an empty one.
    pub fn load_secret(&self) -> Result<SecretConfig> {
        let path = self.secret_path();
        if !path.exists() {
            return Ok(SecretConfig::default());
        }
        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Resolves OpenAI credentials.
    ///
    /// Priority:
    /// 1. `secret.json`
    /// 2. Environment variables (`OPENAI_API_KEY`, `OPENAI_URL`, `OPENAI_QNA_MODEL`)
    pub fn resolve_openai(&self) -> Result<Option<OpenAIConfig>> {
        if let Some(openai) = self.load_secret()?.openai {
            return Ok(Some(openai));
        }
        Ok(openai_from_env(|key| std::env::var(key).ok()))
    }
}

/// Builds an `OpenAIConfig` from an environment lookup function.
pub fn openai_from_env<F>(lookup: F) -> Option<OpenAIConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let api_key = lookup(ENV_API_KEY).filter(|key| !key.trim().is_empty())?;
    Some(OpenAIConfig {
        api_key,
        model_name: lookup(ENV_MODEL).filter(|m| !m.trim().is_empty()),
        base_url: lookup(ENV_BASE_URL).filter(|u| !u.trim().is_empty()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_env_lookup_requires_api_key() {
        let env: HashMap<&str, &str> = HashMap::from([(ENV_MODEL, "gpt-4o")]);
        assert!(openai_from_env(|k| env.get(k).map(|v| v.to_string())).is_none());
    }

    #[test]
    fn test_env_lookup_reads_all_fields() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_API_KEY, "sk-test"),
            (ENV_MODEL, "gpt-4o"),
            (ENV_BASE_URL, "http://localhost:8080/v1"),
        ]);
        let config = openai_from_env(|k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.model_name.as_deref(), Some("gpt-4o"));
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:8080/v1"));
    }

    #[test]
    fn test_blank_optional_env_values_are_ignored() {
        let env: HashMap<&str, &str> = HashMap::from([(ENV_API_KEY, "sk-test"), (ENV_MODEL, " ")]);
        let config = openai_from_env(|k| env.get(k).map(|v| v.to_string())).unwrap();
        assert!(config.model_name.is_none());
    }
}
