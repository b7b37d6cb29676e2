use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;
use turing_core::gateway::GatewayConfig;
use turing_core::rules::GameRules;
use turing_core::votes::TiePolicy;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Where AI players get their words from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Provider {
    OpenRouter,
    OpenAI,
    /// Offline library lines, no network.
    Canned,
}

impl Provider {
    pub fn api_base(self) -> Option<&'static str> {
        match self {
            Provider::OpenRouter => Some("https://openrouter.ai/api/v1"),
            Provider::OpenAI => Some("https://api.openai.com/v1"),
            Provider::Canned => None,
        }
    }
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub provider: Provider,
    pub openrouter_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub chat_model: String,
    pub log_level: Level,
    pub prompts_path: PathBuf,
    pub blocked_words: Vec<String>,
    pub rules: GameRules,
    pub gateway: GatewayConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 3000)),
            provider: Provider::OpenRouter,
            openrouter_api_key: None,
            openai_api_key: None,
            chat_model: "liquid/lfm-7b".to_string(),
            log_level: Level::INFO,
            prompts_path: PathBuf::from("./prompts"),
            blocked_words: Vec::new(),
            rules: GameRules::default(),
            gateway: GatewayConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        let defaults = Self::default();

        let bind_address = match std::env::var("BIND_ADDRESS") {
            Ok(raw) => raw
                .parse::<SocketAddr>()
                .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?,
            Err(_) => defaults.bind_address,
        };

        let provider_str =
            std::env::var("AI_PROVIDER").unwrap_or_else(|_| "openrouter".to_string());
        let provider = match provider_str.to_lowercase().as_str() {
            "openrouter" => Provider::OpenRouter,
            "openai" => Provider::OpenAI,
            "canned" => Provider::Canned,
            other => {
                return Err(ConfigError::InvalidValue(
                    "AI_PROVIDER".to_string(),
                    format!("'{other}' is not one of openrouter, openai, canned"),
                ));
            }
        };

        let openrouter_api_key = std::env::var("OPENROUTER_API_KEY").ok();
        let openai_api_key = std::env::var("OPENAI_API_KEY").ok();

        let chat_model = std::env::var("CHAT_MODEL").unwrap_or(defaults.chat_model);

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let prompts_path = std::env::var("PROMPTS_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.prompts_path);

        let blocked_words = std::env::var("BLOCKED_WORDS")
            .map(|raw| {
                raw.split(',')
                    .map(|w| w.trim().to_string())
                    .filter(|w| !w.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let mut rules = defaults.rules;
        rules.durations.asking = seconds("ASK_SECONDS", rules.durations.asking)?;
        rules.durations.answering = seconds("ANSWER_SECONDS", rules.durations.answering)?;
        rules.durations.voting = seconds("VOTE_SECONDS", rules.durations.voting)?;
        rules.durations.reveal = seconds("REVEAL_SECONDS", rules.durations.reveal)?;
        if let Some(target) = number("SOLO_TARGET_ROUNDS")? {
            rules.solo_target_rounds = target;
        }
        rules.max_rounds = number("MAX_ROUNDS")?;
        if let Ok(raw) = std::env::var("TIE_POLICY") {
            rules.tie_policy = raw
                .parse::<TiePolicy>()
                .map_err(|e| ConfigError::InvalidValue("TIE_POLICY".to_string(), e))?;
        }

        match provider {
            Provider::OpenRouter if openrouter_api_key.is_none() => {
                return Err(ConfigError::MissingVar(
                    "OPENROUTER_API_KEY must be set for 'openrouter' provider".to_string(),
                ));
            }
            Provider::OpenAI if openai_api_key.is_none() => {
                return Err(ConfigError::MissingVar(
                    "OPENAI_API_KEY must be set for 'openai' provider".to_string(),
                ));
            }
            _ => {}
        }

        Ok(Self {
            bind_address,
            provider,
            openrouter_api_key,
            openai_api_key,
            chat_model,
            log_level,
            prompts_path,
            blocked_words,
            rules,
            gateway: defaults.gateway,
        })
    }

    /// The key for the configured provider, if it needs one.
    pub fn api_key(&self) -> Option<&str> {
        match self.provider {
            Provider::OpenRouter => self.openrouter_api_key.as_deref(),
            Provider::OpenAI => self.openai_api_key.as_deref(),
            Provider::Canned => None,
        }
    }
}

fn number(var: &str) -> Result<Option<u32>, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse::<u32>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidValue(var.to_string(), e.to_string())),
        Err(_) => Ok(None),
    }
}

fn seconds(var: &str, default: Duration) -> Result<Duration, ConfigError> {
    match number(var)? {
        Some(0) => Err(ConfigError::InvalidValue(
            var.to_string(),
            "must be at least 1 second".to_string(),
        )),
        Some(secs) => Ok(Duration::from_secs(u64::from(secs))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use tracing::Level;

    const VARS: [&str; 15] = [
        "BIND_ADDRESS",
        "AI_PROVIDER",
        "OPENROUTER_API_KEY",
        "OPENAI_API_KEY",
        "CHAT_MODEL",
        "RUST_LOG",
        "PROMPTS_PATH",
        "BLOCKED_WORDS",
        "ASK_SECONDS",
        "ANSWER_SECONDS",
        "VOTE_SECONDS",
        "REVEAL_SECONDS",
        "SOLO_TARGET_ROUNDS",
        "MAX_ROUNDS",
        "TIE_POLICY",
    ];

    fn clear_env_vars() {
        for var in VARS {
            unsafe {
                env::remove_var(var);
            }
        }
    }

    fn set_minimal_env_openrouter() {
        unsafe {
            env::set_var("OPENROUTER_API_KEY", "test-openrouter-key");
        }
    }

    #[test]
    fn test_config_error_display() {
        let missing_var = ConfigError::MissingVar("TEST_VAR".to_string());
        assert_eq!(
            format!("{}", missing_var),
            "Missing environment variable: TEST_VAR"
        );

        let invalid_value =
            ConfigError::InvalidValue("TEST_VAR".to_string(), "bad_value".to_string());
        assert_eq!(
            format!("{}", invalid_value),
            "Invalid value for environment variable TEST_VAR: bad_value"
        );
    }

    #[test]
    fn test_provider_api_base() {
        assert!(Provider::OpenRouter.api_base().unwrap().contains("openrouter.ai"));
        assert!(Provider::OpenAI.api_base().unwrap().contains("api.openai.com"));
        assert_eq!(Provider::Canned.api_base(), None);
    }

    #[test]
    #[serial]
    fn test_config_from_env_minimal_openrouter() {
        clear_env_vars();
        set_minimal_env_openrouter();

        let config = Config::from_env().expect("Config should load successfully");

        assert_eq!(config.bind_address.to_string(), "0.0.0.0:3000");
        assert_eq!(config.provider, Provider::OpenRouter);
        assert_eq!(config.api_key(), Some("test-openrouter-key"));
        assert_eq!(config.chat_model, "liquid/lfm-7b");
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.prompts_path, PathBuf::from("./prompts"));
        assert!(config.blocked_words.is_empty());
        assert_eq!(config.rules, GameRules::default());
    }

    #[test]
    #[serial]
    fn test_config_canned_needs_no_key() {
        clear_env_vars();
        unsafe {
            env::set_var("AI_PROVIDER", "Canned");
        }

        let config = Config::from_env().expect("Config should load successfully");

        assert_eq!(config.provider, Provider::Canned);
        assert_eq!(config.api_key(), None);
    }

    #[test]
    #[serial]
    fn test_config_from_env_custom_values() {
        clear_env_vars();
        unsafe {
            env::set_var("BIND_ADDRESS", "127.0.0.1:8080");
            env::set_var("AI_PROVIDER", "openai");
            env::set_var("OPENAI_API_KEY", "custom-openai-key");
            env::set_var("CHAT_MODEL", "gpt-4o-mini");
            env::set_var("RUST_LOG", "debug");
            env::set_var("PROMPTS_PATH", "/custom/prompts");
            env::set_var("BLOCKED_WORDS", "darn, heck,,");
            env::set_var("ASK_SECONDS", "20");
            env::set_var("REVEAL_SECONDS", "5");
            env::set_var("SOLO_TARGET_ROUNDS", "4");
            env::set_var("MAX_ROUNDS", "12");
            env::set_var("TIE_POLICY", "eliminate_all");
        }

        let config = Config::from_env().expect("Config should load successfully");

        assert_eq!(config.bind_address.to_string(), "127.0.0.1:8080");
        assert_eq!(config.provider, Provider::OpenAI);
        assert_eq!(config.api_key(), Some("custom-openai-key"));
        assert_eq!(config.chat_model, "gpt-4o-mini");
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(config.prompts_path, PathBuf::from("/custom/prompts"));
        assert_eq!(config.blocked_words, vec!["darn", "heck"]);
        assert_eq!(config.rules.durations.asking, Duration::from_secs(20));
        assert_eq!(config.rules.durations.answering, Duration::from_secs(30));
        assert_eq!(config.rules.durations.reveal, Duration::from_secs(5));
        assert_eq!(config.rules.solo_target_rounds, 4);
        assert_eq!(config.rules.max_rounds, Some(12));
        assert_eq!(config.rules.tie_policy, TiePolicy::EliminateAll);
    }

    #[test]
    #[serial]
    fn test_config_invalid_bind_address() {
        clear_env_vars();
        set_minimal_env_openrouter();
        unsafe {
            env::set_var("BIND_ADDRESS", "not-a-valid-address");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "BIND_ADDRESS"),
            _ => panic!("Expected InvalidValue for BIND_ADDRESS"),
        }
    }

    #[test]
    #[serial]
    fn test_config_invalid_log_level() {
        clear_env_vars();
        set_minimal_env_openrouter();
        unsafe {
            env::set_var("RUST_LOG", "not-a-level");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "RUST_LOG"),
            _ => panic!("Expected InvalidValue for RUST_LOG"),
        }
    }

    #[test]
    #[serial]
    fn test_config_invalid_durations_and_policy() {
        clear_env_vars();
        set_minimal_env_openrouter();
        unsafe {
            env::set_var("VOTE_SECONDS", "0");
        }
        match Config::from_env().unwrap_err() {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "VOTE_SECONDS"),
            _ => panic!("Expected InvalidValue for VOTE_SECONDS"),
        }

        clear_env_vars();
        set_minimal_env_openrouter();
        unsafe {
            env::set_var("TIE_POLICY", "coin_flip");
        }
        match Config::from_env().unwrap_err() {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "TIE_POLICY"),
            _ => panic!("Expected InvalidValue for TIE_POLICY"),
        }
    }

    #[test]
    #[serial]
    fn test_config_unknown_provider() {
        clear_env_vars();
        unsafe {
            env::set_var("AI_PROVIDER", "gemini");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue(var, msg) => {
                assert_eq!(var, "AI_PROVIDER");
                assert!(msg.contains("gemini"));
            }
            _ => panic!("Expected InvalidValue for AI_PROVIDER"),
        }
    }

    #[test]
    #[serial]
    fn test_config_missing_openrouter_key() {
        clear_env_vars();

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::MissingVar(msg) => {
                assert!(msg.contains("OPENROUTER_API_KEY"));
            }
            _ => panic!("Expected MissingVar for OPENROUTER_API_KEY"),
        }
    }

    #[test]
    #[serial]
    fn test_config_missing_openai_key() {
        clear_env_vars();
        unsafe {
            env::set_var("AI_PROVIDER", "openai");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::MissingVar(msg) => {
                assert!(msg.contains("OPENAI_API_KEY"));
            }
            _ => panic!("Expected MissingVar for OPENAI_API_KEY"),
        }
    }
}
