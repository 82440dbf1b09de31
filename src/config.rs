// src/config.rs

use std::{env, str::FromStr};

use dotenvy::dotenv;
use url::Url;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub rust_log: String,
    pub bind_addr: String,
    pub ai: AiConfig,
}

/// Settings for the external quiz generator.
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// Base URL of an OpenAI-compatible API, always ending with '/'.
    pub api_base_url: Url,
    /// Without a key the generator is disabled.
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
    /// Extra attempts after the first failed one.
    pub max_retries: u32,
    pub default_question_count: u32,
    pub max_question_count: u32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_base_url: Url::parse("https://api.openai.com/v1/").expect("static URL is valid"),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 30,
            max_retries: 2,
            default_question_count: 5,
            max_question_count: 20,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set");

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let defaults = AiConfig::default();

        let api_base_url = match env::var("AI_API_BASE_URL") {
            Ok(raw) => parse_base_url(&raw)
                .unwrap_or_else(|| panic!("AI_API_BASE_URL is not a valid URL: {}", raw)),
            Err(_) => defaults.api_base_url,
        };

        let api_key = env::var("AI_API_KEY").ok().filter(|key| !key.trim().is_empty());

        let model = env::var("AI_MODEL").unwrap_or(defaults.model);

        let ai = AiConfig {
            api_base_url,
            api_key,
            model,
            timeout_secs: env_or("AI_TIMEOUT_SECS", defaults.timeout_secs),
            max_retries: env_or("AI_MAX_RETRIES", defaults.max_retries),
            default_question_count: env_or(
                "AI_DEFAULT_QUESTION_COUNT",
                defaults.default_question_count,
            ),
            max_question_count: env_or("AI_MAX_QUESTION_COUNT", defaults.max_question_count),
        };

        Self {
            database_url,
            rust_log,
            bind_addr,
            ai,
        }
    }
}

/// Parses a base URL and appends a trailing slash so `Url::join` keeps the path.
pub fn parse_base_url(raw: &str) -> Option<Url> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    };
    Url::parse(&with_slash).ok()
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|_| panic!("{} has an invalid value: {}", key, raw)),
        Err(_) => default,
    }
}
