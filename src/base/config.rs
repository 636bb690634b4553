//! Load configuration via `config` crate with env-override support.

use std::{ops::Deref, sync::Arc};

use serde::Deserialize;

use super::types::Res;

/// Default OpenAI model used by the evaluator agents.
fn default_openai_evaluator_model() -> String {
    "gpt-4.1-mini".to_string()
}

/// Default OpenAI model used for conflict resolution.
fn default_openai_resolver_model() -> String {
    "gpt-4.1".to_string()
}

/// Default sampling temperature for all triage calls.
fn default_openai_temperature() -> f32 {
    0.2
}

/// Default max output tokens per call.
fn default_openai_max_tokens() -> u32 {
    1024
}

/// Default bound, in seconds, on any single LLM call.
fn default_llm_timeout_secs() -> u64 {
    60
}

/// Default spam short-circuit threshold.
fn default_spam_confidence_threshold() -> u8 {
    70
}

/// Configuration for the mailroom application.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ConfigInner {
    /// OpenAI API key (`MAILROOM_OPENAI_API_KEY`). Required; startup fails
    /// without it, before any email is processed.
    pub openai_api_key: String,
    /// OpenAI model for the four evaluator agents (`MAILROOM_OPENAI_EVALUATOR_MODEL`).
    #[serde(default = "default_openai_evaluator_model")]
    pub openai_evaluator_model: String,
    /// OpenAI model for the conflict-resolution step (`MAILROOM_OPENAI_RESOLVER_MODEL`).
    #[serde(default = "default_openai_resolver_model")]
    pub openai_resolver_model: String,
    /// Sampling temperature (`MAILROOM_OPENAI_TEMPERATURE`).
    /// Value between 0 and 2; triage wants mostly-deterministic replies,
    /// so the default is low.
    #[serde(default = "default_openai_temperature")]
    pub openai_temperature: f32,
    /// Max output tokens per call (`MAILROOM_OPENAI_MAX_TOKENS`).
    #[serde(default = "default_openai_max_tokens")]
    pub openai_max_tokens: u32,
    /// Bound on any single LLM call, in seconds (`MAILROOM_LLM_TIMEOUT_SECS`).
    /// Expiry is treated the same as a call failure.
    #[serde(default = "default_llm_timeout_secs")]
    pub llm_timeout_secs: u64,
    /// Spam short-circuit threshold (`MAILROOM_SPAM_CONFIDENCE_THRESHOLD`).
    /// The spam filter wins outright when its confidence exceeds this.
    #[serde(default = "default_spam_confidence_threshold")]
    pub spam_confidence_threshold: u8,
}

impl Config {
    pub fn load(explicit_path: Option<&std::path::Path>) -> Res<Self> {
        let mut cfg = config::Config::builder().add_source(config::Environment::default().prefix("MAILROOM"));

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if std::path::Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        let result = Config {
            inner: Arc::new(cfg.build()?.try_deserialize()?),
        };

        if result.openai_api_key.is_empty() {
            return Err(anyhow::anyhow!("OpenAI API key is required (MAILROOM_OPENAI_API_KEY)."));
        }

        if result.openai_temperature < 0.0 || result.openai_temperature > 2.0 {
            return Err(anyhow::anyhow!("OpenAI temperature must be between 0 and 2."));
        }

        if result.openai_max_tokens < 1 || result.openai_max_tokens > 128000 {
            return Err(anyhow::anyhow!("OpenAI max tokens must be between 1 and 128000."));
        }

        if result.llm_timeout_secs == 0 {
            return Err(anyhow::anyhow!("LLM timeout must be at least 1 second."));
        }

        if result.spam_confidence_threshold > 100 {
            return Err(anyhow::anyhow!("Spam confidence threshold must be between 0 and 100."));
        }

        Ok(result)
    }
}
