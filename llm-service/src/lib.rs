//! LLM capability client for the code review pipeline.
//!
//! The crate exposes a single high-level operation: send a system prompt and
//! a code payload to an OpenAI-compatible chat-completions endpoint and get
//! back the raw model text. OpenRouter is the primary provider; plain OpenAI
//! endpoints speak the same wire format and are supported by the same client.
//!
//! Configuration is explicit: construct an [`config::llm_model_config::LlmModelConfig`]
//! (directly or from env via [`config::default_config`]) and inject it into
//! [`services::openrouter_service::OpenRouterService::new`]. There is no
//! process-wide implicit state.

pub mod config;
pub mod error_handler;
pub mod services;

pub use config::llm_model_config::LlmModelConfig;
pub use config::llm_provider::LlmProvider;
pub use error_handler::LlmServiceError;
pub use services::openrouter_service::OpenRouterService;
