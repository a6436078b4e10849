//! Configuration loading and capability construction.
//!
//! Precedence is resolved once at startup: explicit config file, then
//! environment overrides, then `${VAR}` references inside values. The core
//! only ever sees already-resolved capability handles.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use tutorkit_core::traits::{Judge, Tutor};
use tutorkit_core::Error;

use crate::chat::ChatClient;
use crate::judge::ChatJudge;
use crate::tutor::ChatTutor;

const DEFAULT_BASE_URL: &str = "https://api.deepseek.com";
const DEFAULT_MODEL: &str = "deepseek-chat";

/// Top-level tutorkit configuration.
///
/// Note: Custom Debug impl masks the API key to prevent accidental exposure
/// in logs.
#[derive(Clone, Serialize, Deserialize)]
pub struct TutorkitConfig {
    /// API key for the chat endpoint. Supports `${VAR}` references.
    #[serde(default)]
    pub api_key: String,
    /// Chat-completions endpoint base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,
    /// Actor id stamped onto interaction records.
    #[serde(default = "default_actor_id")]
    pub actor_id: String,
    /// Per-request timeout for chat calls, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Questions per quiz.
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,
    /// Max concurrent Judge calls during an assessment pass.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
    /// Question bank TOML file.
    #[serde(default = "default_bank_path")]
    pub bank_path: PathBuf,
    /// Interaction log (JSON lines) output path.
    #[serde(default = "default_log_path")]
    pub log_path: PathBuf,
}

impl std::fmt::Debug for TutorkitConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TutorkitConfig")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("actor_id", &self.actor_id)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("sample_size", &self.sample_size)
            .field("parallelism", &self.parallelism)
            .field("bank_path", &self.bank_path)
            .field("log_path", &self.log_path)
            .finish()
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}
fn default_actor_id() -> String {
    "anonymous".to_string()
}
fn default_request_timeout_secs() -> u64 {
    120
}
fn default_sample_size() -> usize {
    5
}
fn default_parallelism() -> usize {
    4
}
fn default_bank_path() -> PathBuf {
    PathBuf::from("bank.toml")
}
fn default_log_path() -> PathBuf {
    PathBuf::from("./tutorkit-logs/interactions.jsonl")
}

impl Default for TutorkitConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            model: default_model(),
            actor_id: default_actor_id(),
            request_timeout_secs: default_request_timeout_secs(),
            sample_size: default_sample_size(),
            parallelism: default_parallelism(),
            bank_path: default_bank_path(),
            log_path: default_log_path(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `tutorkit.toml` in the current directory
/// 2. `~/.config/tutorkit/config.toml`
///
/// Environment variable overrides: `TUTORKIT_API_KEY`, `TUTORKIT_ACTOR_ID`.
pub fn load_config() -> Result<TutorkitConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<TutorkitConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("tutorkit.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            global.exists().then_some(global)
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<TutorkitConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => TutorkitConfig::default(),
    };

    if let Ok(key) = std::env::var("TUTORKIT_API_KEY") {
        config.api_key = key;
    }
    if let Ok(id) = std::env::var("TUTORKIT_ACTOR_ID") {
        config.actor_id = id;
    }

    config.api_key = resolve_env_vars(&config.api_key);
    config.base_url = resolve_env_vars(&config.base_url);
    config.actor_id = resolve_env_vars(&config.actor_id);

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("tutorkit"))
}

/// Resolved capability handles handed to the orchestrator.
pub struct Capabilities {
    pub judge: Arc<dyn Judge>,
    pub tutor: Arc<dyn Tutor>,
}

/// Build the Judge and Tutor capabilities from resolved configuration.
///
/// Fails with `Configuration` when the key is absent, so an unreachable
/// capability is caught before any session starts rather than mid-pass.
pub fn create_capabilities(config: &TutorkitConfig) -> Result<Capabilities, Error> {
    if config.api_key.trim().is_empty() {
        return Err(Error::Configuration(
            "no API key configured (set TUTORKIT_API_KEY or api_key in tutorkit.toml)".into(),
        ));
    }
    let judge_client = ChatClient::with_timeout(
        &config.api_key,
        &config.base_url,
        &config.model,
        config.request_timeout_secs,
    );
    let tutor_client = ChatClient::with_timeout(
        &config.api_key,
        &config.base_url,
        &config.model,
        config.request_timeout_secs,
    );
    Ok(Capabilities {
        judge: Arc::new(ChatJudge::new(judge_client)),
        tutor: Arc::new(ChatTutor::new(tutor_client)),
    })
}
