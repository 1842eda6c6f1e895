//! The analysis capability boundary.
//!
//! Everything the pipeline knows about the model backend fits in one
//! operation: hand over a system prompt and a code payload, get raw text
//! back. The dispatcher is generic over this trait, so tests script it and
//! the binary plugs in the real client or [`NullCapability`].

use tracing::debug;

use llm_service::services::openrouter_service::OpenRouterService;
use thiserror::Error;

use crate::types::AnalysisKind;

/// Failure of a single capability call. Never aborts the run; the
/// dispatcher degrades the affected result to empty and records the reason.
#[derive(Debug, Error)]
pub enum CapabilityError {
    /// No backend is configured.
    #[error("capability not configured")]
    Unavailable,

    /// The backend call failed (transport, status, timeout, decode).
    #[error("backend error: {0}")]
    Backend(String),
}

/// External analysis backend, treated as an opaque request/response function.
pub trait AnalysisCapability {
    /// When false the dispatcher skips remote calls entirely and every
    /// enabled kind degrades to an empty result.
    fn is_available(&self) -> bool {
        true
    }

    /// Sends one analysis request and returns the raw model text. The
    /// return value may be arbitrary non-JSON; callers parse defensively.
    async fn analyze(
        &self,
        system_prompt: &str,
        content: &str,
        kind: AnalysisKind,
    ) -> Result<String, CapabilityError>;
}

impl AnalysisCapability for OpenRouterService {
    async fn analyze(
        &self,
        system_prompt: &str,
        content: &str,
        kind: AnalysisKind,
    ) -> Result<String, CapabilityError> {
        debug!(kind = %kind, content_len = content.len(), "dispatching analysis call");
        OpenRouterService::analyze(self, system_prompt, content)
            .await
            .map_err(|err| CapabilityError::Backend(err.to_string()))
    }
}

/// Explicit "no backend" capability; always reports unavailable and, if
/// called anyway, returns an empty JSON object that parses to zero items.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCapability;

impl AnalysisCapability for NullCapability {
    fn is_available(&self) -> bool {
        false
    }

    async fn analyze(
        &self,
        _system_prompt: &str,
        _content: &str,
        _kind: AnalysisKind,
    ) -> Result<String, CapabilityError> {
        Ok("{}".to_string())
    }
}
