use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Keys granting the unlimited tier. Empty unless `PRO_API_KEYS` is set.
    pub pro_api_keys: Vec<String>,
    pub free_daily_limit: usize,
    pub max_upload_bytes: usize,
    pub public_base_url: String,
    /// External checkout link advertised on the Pro plan. Omitted when unset.
    pub pro_signup_url: Option<String>,
    /// Optional JSON rule table overriding the built-in keyword lists.
    pub rules_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup, so parsing can be tested
    /// without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pro_api_keys = lookup("PRO_API_KEYS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Config {
            port: parse_or(&lookup, "PORT", 8000)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            pro_api_keys,
            free_daily_limit: parse_or(&lookup, "FREE_DAILY_LIMIT", 3)?,
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            public_base_url: lookup("PUBLIC_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| "http://localhost:8000".to_string()),
            pro_signup_url: lookup("PRO_SIGNUP_URL")
                .map(|u| u.trim().to_string())
                .filter(|u| !u.is_empty()),
            rules_path: lookup("RULES_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        })
    }

    /// Where free-tier callers are sent once their daily quota runs out.
    pub fn upgrade_url(&self) -> String {
        format!("{}/pricing", self.public_base_url)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        None => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Self::from_lookup(|_| None).expect("defaults always parse")
    }
}
