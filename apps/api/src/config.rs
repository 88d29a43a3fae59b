use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::generation::normalizer::ELLIPSIS;
use crate::render::SkillsLayout;

pub const DEFAULT_AI_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_AI_MODEL: &str = "meta-llama/llama-4-scout-17b-16e-instruct";

const TEMPERATURE_RANGE: RangeInclusive<f32> = 0.0..=2.0;
const MAX_TOKENS_RANGE: RangeInclusive<u32> = 1..=32_768;
const TIMEOUT_SECS_RANGE: RangeInclusive<u64> = 1..=600;
const MAX_RETRIES_RANGE: RangeInclusive<u32> = 0..=10;
const BACKOFF_MS_RANGE: RangeInclusive<u64> = 0..=60_000;
// Must leave room for the ellipsis of a clipped summary.
const SUMMARY_CHARS_RANGE: RangeInclusive<usize> = ELLIPSIS.len()..=20_000;

/// Application configuration loaded from environment variables.
/// Startup fails if the AI provider key is missing.
#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub ai_endpoint: String,
    pub ai_model: String,
    pub ai_temperature: f32,
    pub ai_max_tokens: u32,
    pub ai_timeout: Duration,
    pub ai_max_retries: u32,
    pub ai_backoff_step: Duration,
    pub summary_max_chars: usize,
    pub skills_layout: SkillsLayout,
    pub port: u16,
    pub rust_log: String,
}

// Hand-written so the API key never reaches a log line.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("ai_endpoint", &self.ai_endpoint)
            .field("ai_model", &self.ai_model)
            .field("ai_temperature", &self.ai_temperature)
            .field("ai_max_tokens", &self.ai_max_tokens)
            .field("ai_timeout", &self.ai_timeout)
            .field("ai_max_retries", &self.ai_max_retries)
            .field("ai_backoff_step", &self.ai_backoff_step)
            .field("summary_max_chars", &self.summary_max_chars)
            .field("skills_layout", &self.skills_layout)
            .field("port", &self.port)
            .field("rust_log", &self.rust_log)
            .finish()
    }
}

impl Config {
    /// Defaults for everything except the credential.
    pub fn with_api_key(api_key: String) -> Self {
        Config {
            api_key,
            ai_endpoint: DEFAULT_AI_ENDPOINT.to_string(),
            ai_model: DEFAULT_AI_MODEL.to_string(),
            ai_temperature: 0.2,
            ai_max_tokens: 1200,
            ai_timeout: Duration::from_secs(60),
            ai_max_retries: 2,
            ai_backoff_step: Duration::from_millis(800),
            summary_max_chars: 500,
            skills_layout: SkillsLayout::Bullets,
            port: 8080,
            rust_log: "info".to_string(),
        }
    }

    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::with_api_key(resolve_api_key(&lookup)?);

        Ok(Config {
            ai_endpoint: lookup("AI_ENDPOINT").unwrap_or(defaults.ai_endpoint.clone()),
            ai_model: lookup("AI_MODEL").unwrap_or(defaults.ai_model.clone()),
            ai_temperature: parse_in_range(
                &lookup,
                "AI_TEMPERATURE",
                defaults.ai_temperature,
                TEMPERATURE_RANGE,
            )?,
            ai_max_tokens: parse_in_range(
                &lookup,
                "AI_MAX_TOKENS",
                defaults.ai_max_tokens,
                MAX_TOKENS_RANGE,
            )?,
            ai_timeout: Duration::from_secs(parse_in_range(
                &lookup,
                "AI_TIMEOUT_SECS",
                defaults.ai_timeout.as_secs(),
                TIMEOUT_SECS_RANGE,
            )?),
            ai_max_retries: parse_in_range(
                &lookup,
                "AI_MAX_RETRIES",
                defaults.ai_max_retries,
                MAX_RETRIES_RANGE,
            )?,
            ai_backoff_step: Duration::from_millis(parse_in_range(
                &lookup,
                "AI_BACKOFF_MS",
                defaults.ai_backoff_step.as_millis() as u64,
                BACKOFF_MS_RANGE,
            )?),
            summary_max_chars: parse_in_range(
                &lookup,
                "SUMMARY_MAX_CHARS",
                defaults.summary_max_chars,
                SUMMARY_CHARS_RANGE,
            )?,
            skills_layout: parse_or(&lookup, "SKILLS_LAYOUT", defaults.skills_layout)?,
            port: parse_or(&lookup, "PORT", defaults.port)?,
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log.clone()),
            ..defaults
        })
    }
}

/// `GROQ_API_KEY` wins; otherwise the file named by `GROQ_API_KEY_FILE` (mounted secrets).
fn resolve_api_key<F>(lookup: &F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = lookup("GROQ_API_KEY").filter(|k| !k.trim().is_empty()) {
        return Ok(key.trim().to_string());
    }

    if let Some(path) = lookup("GROQ_API_KEY_FILE") {
        let key = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read API key file '{path}'"))?;
        if !key.trim().is_empty() {
            return Ok(key.trim().to_string());
        }
    }

    bail!("Set GROQ_API_KEY (or GROQ_API_KEY_FILE) in the environment or a .env file")
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{key} has an invalid value '{raw}': {e}")),
        None => Ok(default),
    }
}

fn parse_in_range<F, T>(lookup: &F, key: &str, default: T, range: RangeInclusive<T>) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + PartialOrd + fmt::Display,
    T::Err: fmt::Display,
{
    let value = parse_or(lookup, key, default)?;
    if !range.contains(&value) {
        bail!(
            "{key} must be between {} and {}, got {value}",
            range.start(),
            range.end()
        );
    }
    Ok(value)
}
