//! Analysis kinds, payload items, severity buckets, and the aggregate.
//!
//! Payload structs are deliberately tolerant: every field is optional with
//! a default, and the aliases accept the upper-case keys the analysis
//! prompts request. Line fields accept a string (`"12"`, `"12-30"`), a bare
//! number, or null. Anything the model got wrong simply deserializes to
//! `None`; bucket selection then falls back to the kind's default tier.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use code_ingest::types::FileRecord;

/// Enumerated analysis category; selects the prompt, the cache namespace,
/// and the bucket schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisKind {
    Security,
    Performance,
    Architecture,
    Style,
}

impl AnalysisKind {
    /// Stable lowercase tag (cache namespace, report keys).
    pub fn as_str(self) -> &'static str {
        match self {
            AnalysisKind::Security => "security",
            AnalysisKind::Performance => "performance",
            AnalysisKind::Architecture => "architecture",
            AnalysisKind::Style => "style",
        }
    }

    /// Parses a lowercase tag; `None` for anything unknown.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "security" => Some(AnalysisKind::Security),
            "performance" => Some(AnalysisKind::Performance),
            "architecture" => Some(AnalysisKind::Architecture),
            "style" => Some(AnalysisKind::Style),
            _ => None,
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One security finding as reported by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityFinding {
    #[serde(default, alias = "SEVERITY")]
    pub severity: Option<String>,
    #[serde(default, alias = "LINE_NUMBER", deserialize_with = "de_lines")]
    pub line_number: Option<String>,
    #[serde(default, alias = "VULNERABILITY_TYPE")]
    pub vulnerability_type: Option<String>,
    #[serde(default, alias = "DESCRIPTION")]
    pub description: Option<String>,
    #[serde(default, alias = "IMPACT")]
    pub impact: Option<String>,
    #[serde(default, alias = "REMEDIATION")]
    pub remediation: Option<String>,
    #[serde(default, alias = "CWE_ID")]
    pub cwe_id: Option<String>,
    #[serde(default, alias = "CONFIDENCE")]
    pub confidence: Option<String>,
}

/// Line range the model attached to a performance suggestion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestionLocation {
    #[serde(default, deserialize_with = "de_lines")]
    pub lines: Option<String>,
}

/// One performance suggestion as reported by the model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSuggestion {
    #[serde(default)]
    pub location: SuggestionLocation,
    #[serde(default)]
    pub issue: Option<String>,
    #[serde(default)]
    pub recommendation: Option<String>,
    #[serde(default)]
    pub impact: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
}

/// One style/maintainability issue as reported by the model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleIssue {
    #[serde(default, alias = "SEVERITY")]
    pub severity: Option<String>,
    #[serde(default, deserialize_with = "de_lines")]
    pub lines: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub recommendation: Option<String>,
    #[serde(default)]
    pub rule: Option<String>,
}

/// Whole-codebase architecture review; kept free-form since its schema is
/// the loosest of the four.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArchitectureReview {
    #[serde(default)]
    pub issues: Vec<serde_json::Value>,
    #[serde(default)]
    pub recommendations: Vec<serde_json::Value>,
}

/// Security findings bucketed by severity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecurityBuckets {
    pub critical: Vec<SecurityFinding>,
    pub high: Vec<SecurityFinding>,
    pub medium: Vec<SecurityFinding>,
    pub low: Vec<SecurityFinding>,
    pub info: Vec<SecurityFinding>,
}

impl SecurityBuckets {
    /// Places a finding into exactly one bucket; unknown or missing
    /// severities land in `info`.
    pub fn push(&mut self, finding: SecurityFinding) {
        let tier = finding.severity.as_deref().map(str::to_lowercase);
        let bucket = match tier.as_deref() {
            Some("critical") => &mut self.critical,
            Some("high") => &mut self.high,
            Some("medium") => &mut self.medium,
            Some("low") => &mut self.low,
            _ => &mut self.info,
        };
        bucket.push(finding);
    }

    pub fn total(&self) -> usize {
        self.critical.len() + self.high.len() + self.medium.len() + self.low.len() + self.info.len()
    }
}

/// Performance suggestions bucketed by expected impact.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerformanceBuckets {
    pub high: Vec<PerformanceSuggestion>,
    pub medium: Vec<PerformanceSuggestion>,
    pub low: Vec<PerformanceSuggestion>,
}

impl PerformanceBuckets {
    /// Unknown or missing impact falls back to `low`.
    pub fn push(&mut self, suggestion: PerformanceSuggestion) {
        let tier = suggestion.impact.as_deref().map(str::to_lowercase);
        let bucket = match tier.as_deref() {
            Some("high") => &mut self.high,
            Some("medium") => &mut self.medium,
            _ => &mut self.low,
        };
        bucket.push(suggestion);
    }

    pub fn total(&self) -> usize {
        self.high.len() + self.medium.len() + self.low.len()
    }
}

/// Style issues bucketed by severity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StyleBuckets {
    pub high: Vec<StyleIssue>,
    pub medium: Vec<StyleIssue>,
    pub low: Vec<StyleIssue>,
    pub info: Vec<StyleIssue>,
}

impl StyleBuckets {
    /// Unknown or missing severity falls back to `info`.
    pub fn push(&mut self, issue: StyleIssue) {
        let tier = issue.severity.as_deref().map(str::to_lowercase);
        let bucket = match tier.as_deref() {
            Some("high") => &mut self.high,
            Some("medium") => &mut self.medium,
            Some("low") => &mut self.low,
            _ => &mut self.info,
        };
        bucket.push(issue);
    }

    pub fn total(&self) -> usize {
        self.high.len() + self.medium.len() + self.low.len() + self.info.len()
    }
}

/// Projection of a [`FileRecord`] for the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSummary {
    pub path: String,
    pub language: String,
    pub size: u64,
}

impl From<&FileRecord> for FileSummary {
    fn from(f: &FileRecord) -> Self {
        Self {
            path: f.path.clone(),
            language: f.language.to_string(),
            size: f.size,
        }
    }
}

/// One degraded analysis call, surfaced so silent degradation stays visible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisFailure {
    pub path: String,
    pub kind: AnalysisKind,
    pub reason: String,
}

/// Per-kind bucketed results plus cross-cutting metadata.
///
/// Seeded once per run from the original (unprioritized) file list and only
/// mutated by the dispatcher's aggregation pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AggregatedResult {
    pub security: SecurityBuckets,
    pub performance: PerformanceBuckets,
    pub architecture: ArchitectureReview,
    pub style: StyleBuckets,
    pub files_count: usize,
    pub overall_score: u32,
    pub files_summary: Vec<FileSummary>,
    pub analysis_errors: Vec<AnalysisFailure>,
}

impl AggregatedResult {
    /// Seeds an empty aggregate over the original file list.
    pub fn seed(files: &[FileRecord]) -> Self {
        Self {
            files_count: files.len(),
            overall_score: 100,
            files_summary: files.iter().map(FileSummary::from).collect(),
            ..Default::default()
        }
    }

    /// Folds bucket sizes into the overall score, saturating at 0.
    pub(crate) fn fold_score(&mut self) {
        let deductions = (self.security.critical.len() * 15
            + self.security.high.len() * 10
            + self.security.medium.len() * 5
            + self.security.low.len() * 2
            + self.performance.high.len() * 5
            + self.performance.medium.len() * 3
            + self.performance.low.len()
            + self.style.high.len() * 3
            + self.style.medium.len() * 2
            + self.style.low.len()) as u32;
        self.overall_score = 100u32.saturating_sub(deductions);
    }
}

/// Accepts `"12"`, `"12-30"`, a bare number, or null for line fields.
fn de_lines<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn security_severity_is_case_insensitive() {
        let mut buckets = SecurityBuckets::default();
        buckets.push(SecurityFinding {
            severity: Some("CRITICAL".into()),
            ..empty_finding()
        });
        buckets.push(SecurityFinding {
            severity: Some("Medium".into()),
            ..empty_finding()
        });
        assert_eq!(buckets.critical.len(), 1);
        assert_eq!(buckets.medium.len(), 1);
        assert_eq!(buckets.total(), 2);
    }

    #[test]
    fn unknown_security_severity_lands_in_info() {
        let mut buckets = SecurityBuckets::default();
        buckets.push(SecurityFinding {
            severity: Some("moderate".into()),
            ..empty_finding()
        });
        buckets.push(empty_finding());
        assert_eq!(buckets.info.len(), 2);
    }

    #[test]
    fn unknown_performance_impact_lands_in_low() {
        let mut buckets = PerformanceBuckets::default();
        buckets.push(PerformanceSuggestion {
            impact: Some("moderate".into()),
            ..Default::default()
        });
        buckets.push(PerformanceSuggestion::default());
        assert_eq!(buckets.low.len(), 2);
    }

    #[test]
    fn score_fold_saturates_at_zero() {
        let mut agg = AggregatedResult::seed(&[]);
        for _ in 0..10 {
            agg.security.push(SecurityFinding {
                severity: Some("critical".into()),
                ..empty_finding()
            });
        }
        agg.fold_score();
        assert_eq!(agg.overall_score, 0);
    }

    fn empty_finding() -> SecurityFinding {
        SecurityFinding {
            severity: None,
            line_number: None,
            vulnerability_type: None,
            description: None,
            impact: None,
            remediation: None,
            cwe_id: None,
            confidence: None,
        }
    }
}
