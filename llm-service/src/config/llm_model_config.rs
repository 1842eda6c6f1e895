use crate::config::llm_provider::LlmProvider;

/// Configuration for a chat-completions client.
///
/// Passed by value into the service constructor; clone it when several
/// clients share the same settings. `endpoint` is the API base including the
/// version segment (e.g. `https://openrouter.ai/api/v1`); the service appends
/// the route.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    /// Provider/backend for this config.
    pub provider: LlmProvider,

    /// Model identifier (e.g. `"moonshotai/kimi-k2"`).
    pub model: String,

    /// API base URL including the version segment.
    pub endpoint: String,

    /// API key; required for both supported providers.
    pub api_key: Option<String>,

    /// Maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// Sampling temperature.
    pub temperature: Option<f32>,

    /// Request timeout in seconds (also bounds each analysis call).
    pub timeout_secs: Option<u64>,
}
