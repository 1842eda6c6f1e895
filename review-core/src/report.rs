//! Final report assembly over the aggregated analysis results.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::{
    AggregatedResult, AnalysisFailure, ArchitectureReview, FileSummary, PerformanceBuckets,
    SecurityBuckets, StyleBuckets,
};

/// The consumer-facing review report. Every per-kind section is always
/// present; kinds that were disabled or degraded simply carry their empty
/// placeholder.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub executive_summary: String,
    pub security_analysis: SecurityBuckets,
    pub performance_analysis: PerformanceBuckets,
    pub architecture_review: ArchitectureReview,
    pub style_review: StyleBuckets,
    pub files_count: usize,
    pub overall_score: u32,
    pub files_summary: Vec<FileSummary>,
    pub analysis_errors: Vec<AnalysisFailure>,
    pub generated_at: DateTime<Utc>,
}

/// Folds an aggregate into the final report.
pub fn summarize(results: AggregatedResult) -> Report {
    let executive_summary = executive_summary(&results);
    Report {
        executive_summary,
        security_analysis: results.security,
        performance_analysis: results.performance,
        architecture_review: results.architecture,
        style_review: results.style,
        files_count: results.files_count,
        overall_score: results.overall_score,
        files_summary: results.files_summary,
        analysis_errors: results.analysis_errors,
        generated_at: Utc::now(),
    }
}

fn executive_summary(results: &AggregatedResult) -> String {
    let mut summary = format!(
        "Reviewed {} file(s): {} security finding(s) ({} critical, {} high), \
         {} performance suggestion(s), {} architecture issue(s), {} style issue(s). \
         Overall score: {}/100.",
        results.files_count,
        results.security.total(),
        results.security.critical.len(),
        results.security.high.len(),
        results.performance.total(),
        results.architecture.issues.len(),
        results.style.total(),
        results.overall_score,
    );
    if !results.analysis_errors.is_empty() {
        summary.push_str(&format!(
            " {} analysis call(s) degraded; see analysis_errors.",
            results.analysis_errors.len()
        ));
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AnalysisKind, SecurityFinding};

    #[test]
    fn empty_aggregate_yields_placeholder_sections() {
        let report = summarize(AggregatedResult::seed(&[]));
        assert_eq!(report.files_count, 0);
        assert_eq!(report.overall_score, 100);
        assert_eq!(report.security_analysis.total(), 0);
        assert!(report.architecture_review.issues.is_empty());
        assert!(report.executive_summary.contains("Reviewed 0 file(s)"));
        assert!(!report.executive_summary.contains("degraded"));
    }

    #[test]
    fn summary_counts_items_and_degradations() {
        let mut agg = AggregatedResult::seed(&[]);
        agg.security.push(SecurityFinding {
            severity: Some("critical".into()),
            description: Some("secret in source".into()),
            line_number: None,
            vulnerability_type: None,
            impact: None,
            remediation: None,
            cwe_id: None,
            confidence: None,
        });
        agg.analysis_errors.push(AnalysisFailure {
            path: "app.py".into(),
            kind: AnalysisKind::Style,
            reason: "capability failure: timeout".into(),
        });
        agg.fold_score();

        let report = summarize(agg);
        assert!(report.executive_summary.contains("1 security finding(s)"));
        assert!(report.executive_summary.contains("1 critical"));
        assert!(report.executive_summary.contains("85/100"));
        assert!(report.executive_summary.contains("1 analysis call(s) degraded"));
        assert_eq!(report.analysis_errors.len(), 1);
    }

    #[test]
    fn report_serializes_with_all_sections() {
        let report = summarize(AggregatedResult::seed(&[]));
        let json = serde_json::to_value(&report).unwrap();
        for key in [
            "executive_summary",
            "security_analysis",
            "performance_analysis",
            "architecture_review",
            "style_review",
            "files_count",
            "overall_score",
            "files_summary",
            "analysis_errors",
            "generated_at",
        ] {
            assert!(json.get(key).is_some(), "missing section {key}");
        }
    }
}
