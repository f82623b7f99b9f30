//! Application configuration, resolved once at startup.
//!
//! Sources, in priority order:
//!   1. process environment (after `.env.local` / `.env` are loaded)
//!   2. OS keychain, for the API key only
//!   3. built-in defaults
//!
//! A missing API key is not fatal. The app starts with analysis disabled
//! and every classify call fails with `AnalysisError::MissingCredential`.

use crate::llm::prompts::{DEFAULT_LANGUAGE, DEFAULT_MODEL};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Keychain coordinates for a stored API key.
const KEYRING_SERVICE: &str = "zeytin-ai";
const KEYRING_USER: &str = "gemini";

/// Env vars checked for the API key, first non-empty wins.
const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

#[derive(Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    pub request_timeout: Duration,
    pub response_language: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &self.api_key.as_ref().map(|k| format!("<{} chars>", k.len())))
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("request_timeout", &self.request_timeout)
            .field("response_language", &self.response_language)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            response_language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl AppConfig {
    /// Resolve from the process environment, falling back to the keychain
    /// for the API key.
    pub fn from_env() -> Self {
        let mut config = Self::from_lookup(|key| std::env::var(key).ok());
        if config.api_key.is_none() {
            config.api_key = keychain_api_key();
        }
        config
    }

    /// Resolve from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let request_timeout = match get("ANALYSIS_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    log::warn!(
                        "[CONFIG] Ignoring invalid ANALYSIS_TIMEOUT_SECS={:?}, using {}s",
                        raw,
                        DEFAULT_TIMEOUT_SECS
                    );
                    defaults.request_timeout
                }
            },
            None => defaults.request_timeout,
        };

        Self {
            api_key: API_KEY_VARS.iter().find_map(|var| get(*var)),
            model: get("GEMINI_MODEL").unwrap_or(defaults.model),
            api_base: get("GEMINI_API_BASE")
                .map(|b| b.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base),
            request_timeout,
            response_language: get("ANALYSIS_LANGUAGE").unwrap_or(defaults.response_language),
        }
    }

    pub fn analysis_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    /// Log the outcome of resolution. Warns, never fails, on a missing key.
    pub fn log_summary(&self) {
        if self.analysis_enabled() {
            log::info!("[CONFIG] API key found, analysis enabled");
        } else {
            log::warn!(
                "[CONFIG] No GEMINI_API_KEY (or API_KEY) set and none in keychain; analysis disabled"
            );
        }
        log::info!(
            "[CONFIG] Model: {}, timeout: {}s, language: {}",
            self.model,
            self.request_timeout.as_secs(),
            self.response_language
        );
    }
}

/// Load `.env.local` then `.env` from `dir`. The first file found wins.
pub fn load_env_files(dir: &Path) {
    for env_file in [".env.local", ".env"] {
        let path = dir.join(env_file);
        if path.exists() {
            match dotenvy::from_path(&path) {
                Ok(_) => log::info!("[STARTUP] Loaded {}", path.display()),
                Err(e) => log::warn!("[STARTUP] Failed to load {}: {}", path.display(), e),
            }
            return;
        }
    }
}

fn keychain_api_key() -> Option<String> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER).ok()?;
    match entry.get_password() {
        Ok(key) if !key.is_empty() => {
            log::info!("[CONFIG] Loaded API key from OS keychain");
            Some(key)
        }
        _ => None,
    }
}
