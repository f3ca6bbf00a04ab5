use crate::core::error::{ChatError, Result};
use crate::pipeline::guard::StatementPolicy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Token budget sent with every completion request unless overridden.
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

const DEFAULT_BIND: &str = "0.0.0.0:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    pub url: Option<String>,
    pub model: Option<String>,
    pub token: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub headers: HashMap<String, String>,
}

/// Validated completion endpoint settings. Only obtainable through
/// [`CompletionConfig::validate`], so every field that must be present is.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionSettings {
    pub endpoint: String,
    pub model: String,
    pub token: String,
    pub max_tokens: u32,
    pub temperature: Option<f32>,
    pub headers: HashMap<String, String>,
}

impl CompletionConfig {
    pub fn validate(&self) -> Result<CompletionSettings> {
        fn present(value: &Option<String>) -> Option<String> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        }

        let endpoint = present(&self.url);
        let model = present(&self.model);
        let token = present(&self.token);

        match (endpoint, model, token) {
            (Some(endpoint), Some(model), Some(token)) => Ok(CompletionSettings {
                endpoint,
                model,
                token,
                max_tokens: self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
                temperature: self.temperature,
                headers: self.headers.clone(),
            }),
            (endpoint, model, token) => {
                let missing: Vec<&str> = [
                    ("CHAT_API_URL", endpoint.is_none()),
                    ("CHAT_API_MODEL", model.is_none()),
                    ("CHAT_API_TOKEN", token.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, absent)| absent.then_some(name))
                .collect();

                Err(ChatError::ConfigMissing(format!(
                    "CHAT_API_URL, CHAT_API_MODEL, CHAT_API_TOKEN are mandatory (missing: {})",
                    missing.join(", ")
                )))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl DatabaseConfig {
    pub fn url(&self) -> Result<&str> {
        self.url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| ChatError::ConfigMissing("DATABASE_URL is mandatory".to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing` filter expression, e.g. `info` or `crystal_chat=debug`.
    pub level: String,
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterConfig {
    /// Escape catalog text before it is interpolated into HTML.
    pub escape_html: bool,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub completion: CompletionConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub log: LogConfig,
    pub statement_policy: StatementPolicy,
    pub formatter: FormatterConfig,
}

impl Config {
    fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".crystal-chat")
    }

    pub fn default_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    /// Load the configuration file, then apply environment overrides.
    ///
    /// With no explicit path the default file is created on first run. An
    /// explicit path that does not exist is an error.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let mut config = match path {
            Some(path) => Self::read(path)?,
            None => {
                let path = Self::default_path();
                if path.exists() {
                    Self::read(&path)?
                } else {
                    let config = Config::default();
                    if let Err(e) = config.save(&path) {
                        tracing::warn!(path = %path.display(), error = %e, "could not write default config");
                    }
                    config
                }
            }
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn read(path: &Path) -> Result<Config> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ChatError::Config(format!("Read {}: {}", path.display(), e)))?;
        serde_yml::from_str::<Config>(&contents)
            .map_err(|e| ChatError::Config(format!("Parse {}: {}", path.display(), e)))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let yaml_content = serde_yml::to_string(self)?;
        fs::write(path, yaml_content)?;
        Ok(())
    }

    /// Overlay values from the environment. `lookup` is `std::env::var` in
    /// production.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("CHAT_API_URL") {
            self.completion.url = Some(v);
        }
        if let Some(v) = lookup("CHAT_API_MODEL") {
            self.completion.model = Some(v);
        }
        if let Some(v) = lookup("CHAT_API_TOKEN") {
            self.completion.token = Some(v);
        }
        if let Some(v) = lookup("CHAT_API_MAX_TOKENS") {
            match v.trim().parse::<u32>() {
                Ok(n) if n > 0 => self.completion.max_tokens = Some(n),
                _ => tracing::warn!(value = %v, "ignoring invalid CHAT_API_MAX_TOKENS"),
            }
        }
        if let Some(v) = lookup("CHAT_API_TEMPERATURE") {
            match v.trim().parse::<f32>() {
                Ok(t) => self.completion.temperature = Some(t),
                Err(_) => tracing::warn!(value = %v, "ignoring invalid CHAT_API_TEMPERATURE"),
            }
        }
        if let Some(v) = lookup("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Some(v) = lookup("CRYSTAL_CHAT_BIND") {
            self.server.bind = v;
        }
        if let Some(v) = lookup("CRYSTAL_CHAT_LOG") {
            self.log.level = v;
        }
        if let Some(v) = lookup("CRYSTAL_CHAT_LOG_JSON") {
            self.log.json = v == "1" || v.eq_ignore_ascii_case("true");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn validate_reports_every_missing_field() {
        let err = CompletionConfig::default().validate().unwrap_err();
        match err {
            ChatError::ConfigMissing(msg) => {
                assert!(msg.contains("missing: CHAT_API_URL, CHAT_API_MODEL, CHAT_API_TOKEN"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn validate_treats_blank_token_as_missing() {
        let config = CompletionConfig {
            url: Some("http://localhost/v1/chat/completions".into()),
            model: Some("gpt-4o-mini".into()),
            token: Some("   ".into()),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ChatError::ConfigMissing(ref m) if m.ends_with("(missing: CHAT_API_TOKEN)")));
    }

    #[test]
    fn validate_applies_default_token_budget() {
        let config = CompletionConfig {
            url: Some("http://localhost/v1/chat/completions".into()),
            model: Some("gpt-4o-mini".into()),
            token: Some("secret".into()),
            ..Default::default()
        };
        let settings = config.validate().unwrap();
        assert_eq!(settings.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(settings.temperature, None);
    }

    #[test]
    fn env_overrides_file_values() {
        let mut config = Config::default();
        config.completion.model = Some("from-file".into());
        config.apply_env(env(&[
            ("CHAT_API_MODEL", "from-env"),
            ("CHAT_API_MAX_TOKENS", "256"),
            ("DATABASE_URL", "postgres://localhost/crystals"),
            ("CRYSTAL_CHAT_LOG_JSON", "true"),
        ]));

        assert_eq!(config.completion.model.as_deref(), Some("from-env"));
        assert_eq!(config.completion.max_tokens, Some(256));
        assert_eq!(config.database.url().unwrap(), "postgres://localhost/crystals");
        assert!(config.log.json);
    }

    #[test]
    fn invalid_token_budget_keeps_default() {
        let mut config = Config::default();
        config.apply_env(env(&[("CHAT_API_MAX_TOKENS", "lots")]));
        assert_eq!(config.completion.max_tokens, None);
    }

    #[test]
    fn missing_database_url_is_reported() {
        let config = Config::default();
        assert!(matches!(
            config.database.url(),
            Err(ChatError::ConfigMissing(_))
        ));
    }

    #[test]
    fn reads_partial_yaml_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            "completion:\n  url: http://llm.local/v1/chat/completions\n  model: m\n  temperature: 0.2\nstatement_policy: guarded\n",
        )
        .unwrap();

        let config = Config::read(&path).unwrap();
        assert_eq!(config.completion.temperature, Some(0.2));
        assert_eq!(config.statement_policy, StatementPolicy::Guarded);
        assert_eq!(config.server.bind, DEFAULT_BIND);
        assert_eq!(config.database.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert!(!config.formatter.escape_html);
    }

    #[test]
    fn save_then_read_preserves_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        let mut config = Config::default();
        config.formatter.escape_html = true;
        config.completion.headers.insert("X-Title".into(), "crystal-chat".into());

        config.save(&path).unwrap();
        assert_eq!(Config::read(&path).unwrap(), config);
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(dir.path().join("absent.yaml").as_path())).unwrap_err();
        assert!(matches!(err, ChatError::Config(_)));
    }
}
