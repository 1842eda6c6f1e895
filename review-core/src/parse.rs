//! Defensive parsing of semi-trusted model output.
//!
//! Models are asked for bare JSON but routinely wrap it in code fences or
//! prose. Every parser here first strips that noise, then deserializes into
//! the tolerant payload types. The parsers return `Result`; call sites must
//! handle the error variant by substituting the empty default — a parse
//! failure is never propagated as a run-aborting error.

use serde::Deserialize;
use thiserror::Error;

use crate::types::{ArchitectureReview, PerformanceSuggestion, SecurityFinding, StyleIssue};

/// Model output did not contain a parseable payload.
#[derive(Debug, Error)]
#[error("payload parse error: {0}")]
pub struct ParseError(#[from] serde_json::Error);

/// Trims code fences, BOMs, and surrounding prose around a JSON object.
pub fn sanitize_json_block(raw: &str) -> String {
    let cleaned = raw
        .replace("```json", "")
        .replace("```", "")
        .replace('\u{feff}', "");
    let cleaned = cleaned.trim();
    // Take the outermost brace pair; models sometimes add prose around it.
    if let (Some(start), Some(end)) = (cleaned.find('{'), cleaned.rfind('}')) {
        if start < end {
            return cleaned[start..=end].to_string();
        }
    }
    cleaned.to_string()
}

#[derive(Debug, Default, Deserialize)]
struct SecurityEnvelope {
    #[serde(default)]
    findings: Vec<SecurityFinding>,
}

#[derive(Debug, Default, Deserialize)]
struct PerformanceEnvelope {
    #[serde(default)]
    suggestions: Vec<PerformanceSuggestion>,
}

#[derive(Debug, Default, Deserialize)]
struct StyleEnvelope {
    #[serde(default)]
    issues: Vec<StyleIssue>,
}

/// Parses a security payload (`{"findings": [...]}`).
pub fn parse_security(raw: &str) -> Result<Vec<SecurityFinding>, ParseError> {
    let envelope: SecurityEnvelope = serde_json::from_str(&sanitize_json_block(raw))?;
    Ok(envelope.findings)
}

/// Parses a performance payload (`{"suggestions": [...]}`).
pub fn parse_performance(raw: &str) -> Result<Vec<PerformanceSuggestion>, ParseError> {
    let envelope: PerformanceEnvelope = serde_json::from_str(&sanitize_json_block(raw))?;
    Ok(envelope.suggestions)
}

/// Parses a style payload (`{"issues": [...]}`).
pub fn parse_style(raw: &str) -> Result<Vec<StyleIssue>, ParseError> {
    let envelope: StyleEnvelope = serde_json::from_str(&sanitize_json_block(raw))?;
    Ok(envelope.issues)
}

/// Parses the whole-codebase architecture payload.
pub fn parse_architecture(raw: &str) -> Result<ArchitectureReview, ParseError> {
    Ok(serde_json::from_str(&sanitize_json_block(raw))?)
}
