//! Engine configuration from the process environment.

use std::str::FromStr;

use taleturn_domain::DicePolicy;

use super::ollama::{DEFAULT_OLLAMA_BASE_URL, DEFAULT_OLLAMA_MODEL, DEFAULT_TIMEOUT_SECS};

pub const DEFAULT_TEMPERATURE: f32 = 0.8;
pub const DEFAULT_MAX_RETRIES: u32 = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub server_host: String,
    pub server_port: u16,
    /// SQLite file for sessions; `None` keeps everything in memory.
    pub session_db: Option<String>,
    pub ollama_url: String,
    pub ollama_model: String,
    pub llm_timeout_secs: u64,
    pub llm_max_retries: u32,
    pub llm_temperature: f32,
    /// Cap on generated tokens; `None` leaves it to the model.
    pub llm_max_tokens: Option<u32>,
    pub dice_policy: DicePolicy,
    /// Fixed RNG seed for reproducible rolls.
    pub random_seed: Option<u64>,
    pub cors_allowed_origins: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".into(),
            server_port: 3000,
            session_db: None,
            ollama_url: DEFAULT_OLLAMA_BASE_URL.into(),
            ollama_model: DEFAULT_OLLAMA_MODEL.into(),
            llm_timeout_secs: DEFAULT_TIMEOUT_SECS,
            llm_max_retries: DEFAULT_MAX_RETRIES,
            llm_temperature: DEFAULT_TEMPERATURE,
            llm_max_tokens: None,
            dice_policy: DicePolicy::default(),
            random_seed: None,
            cors_allowed_origins: None,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        Self {
            server_host: var("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: parse_or(
                "SERVER_PORT",
                var("SERVER_PORT").or_else(|| var("PORT")),
                defaults.server_port,
            ),
            session_db: var("SESSION_DB"),
            ollama_url: var("OLLAMA_BASE_URL")
                .or_else(|| var("OLLAMA_URL"))
                .unwrap_or(defaults.ollama_url),
            ollama_model: var("OLLAMA_MODEL").unwrap_or(defaults.ollama_model),
            llm_timeout_secs: parse_or(
                "LLM_TIMEOUT_SECS",
                var("LLM_TIMEOUT_SECS"),
                defaults.llm_timeout_secs,
            ),
            llm_max_retries: parse_or(
                "LLM_MAX_RETRIES",
                var("LLM_MAX_RETRIES"),
                defaults.llm_max_retries,
            ),
            llm_temperature: parse_or(
                "LLM_TEMPERATURE",
                var("LLM_TEMPERATURE"),
                defaults.llm_temperature,
            ),
            llm_max_tokens: parse_optional("LLM_MAX_TOKENS", var("LLM_MAX_TOKENS")),
            dice_policy: parse_or("DICE_POLICY", var("DICE_POLICY"), defaults.dice_policy),
            random_seed: parse_optional("RANDOM_SEED", var("RANDOM_SEED")),
            cors_allowed_origins: var("CORS_ALLOWED_ORIGINS"),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_or<T: FromStr>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Malformed configuration value, using default");
            default
        }),
    }
}

fn parse_optional<T: FromStr>(key: &str, raw: Option<String>) -> Option<T> {
    let raw = raw?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "Ignoring malformed configuration value");
            None
        }
    }
}

/// Load `.env.local` then `.env` from the repository root; earlier files win.
pub fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
