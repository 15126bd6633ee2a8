use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use teloxide::types::ChatId;

/// Environment variable holding the Telegram bot token.
pub const TELEGRAM_TOKEN_VAR: &str = "TELEGRAM_BOT_TOKEN";
/// Environment variable holding the OpenAI API key.
pub const OPENAI_KEY_VAR: &str = "OPENAI_API_KEY";

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// A required environment variable is unset or empty.
    MissingEnv(&'static str),
    /// Failed to read the settings file.
    ReadFile { path: PathBuf, source: std::io::Error },
    /// Failed to parse JSON.
    ParseJson { path: PathBuf, source: serde_json::Error },
    /// Validation error.
    Validation(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingEnv(var) => {
                write!(f, "{} not found in environment variables", var)
            }
            Self::ReadFile { path, source } => {
                write!(f, "failed to read settings file '{}': {}", path.display(), source)
            }
            Self::ParseJson { path, source } => {
                write!(f, "failed to parse settings file '{}': {}", path.display(), source)
            }
            Self::Validation(msg) => write!(f, "config validation error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ReadFile { source, .. } => Some(source),
            Self::ParseJson { source, .. } => Some(source),
            Self::MissingEnv(_) | Self::Validation(_) => None,
        }
    }
}

/// Non-secret settings, optionally read from a JSON file.
#[derive(Deserialize, Default)]
struct SettingsFile {
    openai_base_url: Option<String>,
    chat_model: Option<String>,
    transcription_model: Option<String>,
    max_completion_tokens: Option<u32>,
    /// Directory for state files (logs). Defaults to current directory.
    data_dir: Option<String>,
    log_chat_id: Option<i64>,
}

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TRANSCRIPTION_MODEL: &str = "whisper-1";
pub const DEFAULT_MAX_COMPLETION_TOKENS: u32 = 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_bot_token: String,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub chat_model: String,
    pub transcription_model: String,
    pub max_completion_tokens: u32,
    /// Directory for state files (logs).
    pub data_dir: PathBuf,
    /// Chat that receives forwarded log lines, if any.
    pub log_chat_id: Option<ChatId>,
}

impl Config {
    /// Load secrets from the process environment and settings from an optional file.
    pub fn load(settings_path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::from_sources(|var| std::env::var(var).ok(), settings_path)
    }

    /// Build a config from an environment lookup and an optional settings file.
    pub fn from_sources<F>(env: F, settings_path: Option<&Path>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let telegram_bot_token = require(&env, TELEGRAM_TOKEN_VAR)?;
        let openai_api_key = require(&env, OPENAI_KEY_VAR)?;

        // Telegram tokens are formatted as {bot_id}:{secret} where bot_id is numeric
        let token_parts: Vec<&str> = telegram_bot_token.split(':').collect();
        if token_parts.len() != 2 || token_parts[0].parse::<u64>().is_err() || token_parts[1].is_empty() {
            return Err(ConfigError::Validation(format!(
                "{} appears invalid (expected format: 123456789:ABCdefGHI...)",
                TELEGRAM_TOKEN_VAR
            )));
        }

        let file = match settings_path {
            Some(path) => read_settings(path)?,
            None => SettingsFile::default(),
        };

        let max_completion_tokens = file.max_completion_tokens.unwrap_or(DEFAULT_MAX_COMPLETION_TOKENS);
        if max_completion_tokens == 0 {
            return Err(ConfigError::Validation("max_completion_tokens must be positive".into()));
        }

        let openai_base_url = file
            .openai_base_url
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string());

        Ok(Self {
            telegram_bot_token,
            openai_api_key,
            openai_base_url,
            chat_model: file.chat_model.unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
            transcription_model: file
                .transcription_model
                .unwrap_or_else(|| DEFAULT_TRANSCRIPTION_MODEL.to_string()),
            max_completion_tokens,
            data_dir: file.data_dir.map(PathBuf::from).unwrap_or_else(|| PathBuf::from(".")),
            log_chat_id: file.log_chat_id.map(ChatId),
        })
    }
}

fn require<F>(env: &F, var: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match env(var) {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(ConfigError::MissingEnv(var)),
    }
}

fn read_settings(path: &Path) -> Result<SettingsFile, ConfigError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ReadFile { path: path.to_path_buf(), source: e })?;
    serde_json::from_str(&content).map_err(|e| ConfigError::ParseJson { path: path.to_path_buf(), source: e })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const TOKEN: &str = "123456789:ABCdefGHIjklMNOpqrsTUVwxyz";

    fn write_settings(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |var: &str| map.get(var).cloned()
    }

    fn assert_err<T>(result: Result<T, ConfigError>) -> ConfigError {
        match result {
            Ok(_) => panic!("expected error, got Ok"),
            Err(e) => e,
        }
    }

    #[test]
    fn test_defaults_from_env_only() {
        let config = Config::from_sources(env(&[(TELEGRAM_TOKEN_VAR, TOKEN), (OPENAI_KEY_VAR, "sk-test")]), None)
            .expect("should load");
        assert_eq!(config.telegram_bot_token, TOKEN);
        assert_eq!(config.openai_api_key, "sk-test");
        assert_eq!(config.openai_base_url, DEFAULT_OPENAI_BASE_URL);
        assert_eq!(config.chat_model, "gpt-4o-mini");
        assert_eq!(config.transcription_model, "whisper-1");
        assert_eq!(config.max_completion_tokens, 1024);
        assert_eq!(config.data_dir, PathBuf::from("."));
        assert!(config.log_chat_id.is_none());
    }

    #[test]
    fn test_missing_telegram_token() {
        let err = assert_err(Config::from_sources(env(&[(OPENAI_KEY_VAR, "sk-test")]), None));
        assert!(matches!(err, ConfigError::MissingEnv(TELEGRAM_TOKEN_VAR)));
        assert!(err.to_string().contains("TELEGRAM_BOT_TOKEN"));
    }

    #[test]
    fn test_missing_openai_key() {
        let err = assert_err(Config::from_sources(env(&[(TELEGRAM_TOKEN_VAR, TOKEN)]), None));
        assert!(matches!(err, ConfigError::MissingEnv(OPENAI_KEY_VAR)));
    }

    #[test]
    fn test_blank_secret_counts_as_missing() {
        let err = assert_err(Config::from_sources(
            env(&[(TELEGRAM_TOKEN_VAR, TOKEN), (OPENAI_KEY_VAR, "   ")]),
            None,
        ));
        assert!(matches!(err, ConfigError::MissingEnv(OPENAI_KEY_VAR)));
    }

    #[test]
    fn test_invalid_token_format() {
        for token in ["invalid_token_no_colon", "notanumber:ABCdef", "123456789:"] {
            let err = assert_err(Config::from_sources(
                env(&[(TELEGRAM_TOKEN_VAR, token), (OPENAI_KEY_VAR, "sk-test")]),
                None,
            ));
            assert!(matches!(err, ConfigError::Validation(_)), "token {token:?}");
        }
    }

    #[test]
    fn test_settings_file_overrides() {
        let file = write_settings(r#"{
            "openai_base_url": "http://localhost:9000/v1/",
            "chat_model": "gpt-4o",
            "max_completion_tokens": 512,
            "data_dir": "/var/lib/promptsmith",
            "log_chat_id": -100123
        }"#);
        let config = Config::from_sources(
            env(&[(TELEGRAM_TOKEN_VAR, TOKEN), (OPENAI_KEY_VAR, "sk-test")]),
            Some(file.path()),
        )
        .expect("should load");
        assert_eq!(config.openai_base_url, "http://localhost:9000/v1");
        assert_eq!(config.chat_model, "gpt-4o");
        assert_eq!(config.transcription_model, "whisper-1");
        assert_eq!(config.max_completion_tokens, 512);
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/promptsmith"));
        assert_eq!(config.log_chat_id, Some(ChatId(-100123)));
    }

    #[test]
    fn test_zero_max_tokens_rejected() {
        let file = write_settings(r#"{ "max_completion_tokens": 0 }"#);
        let err = assert_err(Config::from_sources(
            env(&[(TELEGRAM_TOKEN_VAR, TOKEN), (OPENAI_KEY_VAR, "sk-test")]),
            Some(file.path()),
        ));
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_file_not_found() {
        let err = assert_err(Config::from_sources(
            env(&[(TELEGRAM_TOKEN_VAR, TOKEN), (OPENAI_KEY_VAR, "sk-test")]),
            Some(Path::new("/nonexistent/path/settings.json")),
        ));
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }

    #[test]
    fn test_invalid_json() {
        let file = write_settings("{ invalid json }");
        let err = assert_err(Config::from_sources(
            env(&[(TELEGRAM_TOKEN_VAR, TOKEN), (OPENAI_KEY_VAR, "sk-test")]),
            Some(file.path()),
        ));
        assert!(matches!(err, ConfigError::ParseJson { .. }));
    }
}
