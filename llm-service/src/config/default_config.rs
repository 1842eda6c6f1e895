//! Review-capability configs loaded strictly from environment variables.
//!
//! # Environment variables
//!
//! - `OPENROUTER_API_KEY` = API key (mandatory)
//! - `OPENROUTER_URL`     = API base, defaults to `https://openrouter.ai/api/v1`
//! - `REVIEW_MODEL`       = model id, defaults to `moonshotai/kimi-k2`
//! - `LLM_MAX_TOKENS`     = optional max tokens (u32)
//! - `LLM_TIMEOUT_SECS`   = optional per-call timeout (u64)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{LlmServiceError, env_opt_u32, env_opt_u64, must_env},
};

const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1";
const DEFAULT_MODEL: &str = "moonshotai/kimi-k2";

/// Constructs the OpenRouter config used for code analysis calls.
///
/// # Errors
///
/// - [`ConfigError::MissingVar`](crate::error_handler::ConfigError::MissingVar)
///   if `OPENROUTER_API_KEY` is absent or empty
/// - [`ConfigError::InvalidNumber`](crate::error_handler::ConfigError::InvalidNumber)
///   if a numeric variable fails to parse
///
/// # Defaults
///
/// - `temperature = Some(0.1)` (near-deterministic review output)
/// - `max_tokens  = Some(4000)` unless overridden
/// - `timeout_secs = Some(120)` unless overridden
pub fn config_openrouter() -> Result<LlmModelConfig, LlmServiceError> {
    let api_key = must_env("OPENROUTER_API_KEY")?;
    let endpoint = std::env::var("OPENROUTER_URL")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
    let model = std::env::var("REVIEW_MODEL")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());
    let max_tokens = env_opt_u32("LLM_MAX_TOKENS")?.or(Some(4000));
    let timeout_secs = env_opt_u64("LLM_TIMEOUT_SECS")?.or(Some(120));

    Ok(LlmModelConfig {
        provider: LlmProvider::OpenRouter,
        model,
        endpoint,
        api_key: Some(api_key),
        max_tokens,
        temperature: Some(0.1),
        timeout_secs,
    })
}
